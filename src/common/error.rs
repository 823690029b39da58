// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Erros internos da aplicação.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Falha na requisição à API do SmartLab: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("API do SmartLab respondeu com status {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro ao gerar o PDF: {0}")]
    PdfRender(String),

    #[error("Configuração inválida: {0}")]
    Config(String),
}

// O erro que sai pela API: status + mensagem já traduzida.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<HashMap<String, Vec<String>>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let pt = locale.is_portuguese();

        match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => m.to_string(),
                            None => e.code.to_string(),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let message = if pt {
                    "Um ou mais campos são inválidos."
                } else {
                    "One or more fields are invalid."
                };
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    message: message.to_string(),
                    details: Some(details),
                }
            }
            AppError::Upstream(_) | AppError::UpstreamStatus(_) => {
                tracing::warn!("Falha na API do SmartLab: {}", self);
                let message = if pt {
                    "Não foi possível conectar à API do SmartLab."
                } else {
                    "Could not reach the SmartLab API."
                };
                ApiError::new(StatusCode::BAD_GATEWAY, message)
            }
            // Todos os outros erros viram 500, com o detalhe só no log.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                let message = if pt {
                    "Ocorreu um erro inesperado."
                } else {
                    "An unexpected error occurred."
                };
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn validation_errors_keep_field_messages() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.message = Some("O título do relatório é obrigatório.".into());
        errors.add("titulo", err);

        let api_error = AppError::ValidationError(errors).to_api_error(&Locale("pt".to_string()));

        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.message, "Um ou mais campos são inválidos.");
        let details = api_error.details.unwrap();
        assert_eq!(details["titulo"], vec!["O título do relatório é obrigatório."]);
    }

    #[test]
    fn internal_errors_are_translated() {
        let err = AppError::PdfRender("boom".to_string());

        let en = err.to_api_error(&Locale("en".to_string()));
        let pt = err.to_api_error(&Locale("pt".to_string()));

        assert_eq!(en.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(en.message, "An unexpected error occurred.");
        assert_eq!(pt.message, "Ocorreu um erro inesperado.");
    }
}
