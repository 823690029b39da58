// src/models/reports.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// Janela de tempo selecionada no formulário de relatório.
// Datas do período personalizado são inclusivas e no fuso de exibição.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "tipo", rename_all = "camelCase")]
pub enum ReportPeriod {
    Hoje,
    UltimosSeteDias,
    UltimosTrintaDias,
    Personalizado {
        #[schema(value_type = String, example = "2025-10-01")]
        inicio: NaiveDate,
        #[schema(value_type = String, example = "2025-10-23")]
        fim: NaiveDate,
    },
}

impl ReportPeriod {
    pub fn label(&self) -> String {
        match self {
            ReportPeriod::Hoje => "Hoje".to_string(),
            ReportPeriod::UltimosSeteDias => "Últimos 7 dias".to_string(),
            ReportPeriod::UltimosTrintaDias => "Últimos 30 dias".to_string(),
            ReportPeriod::Personalizado { inicio, fim } => format!(
                "{} a {}",
                inicio.format("%d/%m/%Y"),
                fim.format("%d/%m/%Y")
            ),
        }
    }
}

// Título só com espaços conta como ausente.
fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("O título do relatório é obrigatório.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportPayload {
    // Ausente no JSON vira "" e cai na validação (400), não na extração (422).
    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 120, message = "O título deve ter até 120 caracteres.")
    )]
    #[schema(example = "Relatório Mensal - Outubro 2025")]
    pub titulo: String,

    #[validate(required(message = "O campo 'periodo' é obrigatório."))]
    pub periodo: Option<ReportPeriod>,

    #[schema(example = "Enf. Maria Santos")]
    pub responsavel: Option<String>,
}

impl GenerateReportPayload {
    // Regra: no período personalizado o início não pode ser depois do fim.
    pub fn validate_consistency(&self) -> Result<(), ValidationError> {
        if let Some(ReportPeriod::Personalizado { inicio, fim }) = self.periodo {
            if inicio > fim {
                let mut err = ValidationError::new("InvalidPeriodRange");
                err.message =
                    Some("A data inicial deve ser anterior ou igual à data final.".into());
                return Err(err);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(titulo: &str, periodo: Option<ReportPeriod>) -> GenerateReportPayload {
        GenerateReportPayload {
            titulo: titulo.to_string(),
            periodo,
            responsavel: None,
        }
    }

    #[test]
    fn titulo_and_periodo_are_required() {
        let errors = payload("", None).validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("titulo"));
        assert!(fields.contains_key("periodo"));
    }

    #[test]
    fn blank_titulo_is_rejected() {
        let errors = payload("   ", Some(ReportPeriod::Hoje)).validate().unwrap_err();

        assert_eq!(
            errors.field_errors()["titulo"][0].message.as_deref(),
            Some("O título do relatório é obrigatório.")
        );
    }

    #[test]
    fn titulo_longer_than_120_chars_is_rejected() {
        let long = "a".repeat(121);

        assert!(payload(&long, Some(ReportPeriod::Hoje)).validate().is_err());
    }

    #[test]
    fn missing_titulo_key_deserializes_and_fails_validation() {
        let parsed: GenerateReportPayload =
            serde_json::from_str(r#"{"periodo":{"tipo":"hoje"}}"#).unwrap();

        assert_eq!(parsed.titulo, "");
        assert!(parsed.validate().unwrap_err().field_errors().contains_key("titulo"));
    }

    #[test]
    fn accepts_a_complete_payload() {
        assert!(payload("Mensal", Some(ReportPeriod::Hoje)).validate().is_ok());
    }

    #[test]
    fn rejects_custom_period_with_start_after_end() {
        let periodo = ReportPeriod::Personalizado {
            inicio: NaiveDate::from_ymd_opt(2025, 10, 23).unwrap(),
            fim: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
        };

        assert!(payload("Mensal", Some(periodo)).validate_consistency().is_err());
    }

    #[test]
    fn periodo_is_read_from_tagged_json() {
        let body = r#"{"titulo":"X","periodo":{"tipo":"personalizado",
            "inicio":"2025-10-01","fim":"2025-10-23"}}"#;

        let parsed: GenerateReportPayload = serde_json::from_str(body).unwrap();

        assert_eq!(
            parsed.periodo.unwrap().label(),
            "01/10/2025 a 23/10/2025"
        );
    }
}
