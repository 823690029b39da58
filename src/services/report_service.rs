// src/services/report_service.rs

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use genpdf::{elements, style, Element};

use crate::{
    common::error::AppError,
    models::{
        dashboard::ProcedureSummary,
        reports::ReportPeriod,
        transactions::EnrichedTransaction,
    },
    services::aggregation::{share_of, summarize_by_procedure},
};

// Tudo o que vai para o PDF, já calculado.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub titulo: String,
    pub responsavel: Option<String>,
    pub periodo_label: String,
    pub gerado_em: String,
    pub total_retiradas: u32,
    pub total_itens: u64,
    pub procedimentos_distintos: usize,
    pub funcionarios_distintos: usize,
    pub resumo: Vec<ProcedureSummary>,
    pub registros: Vec<EnrichedTransaction>,
}

// Intervalo de datas (inclusivo) no fuso de exibição
pub fn period_range(period: &ReportPeriod, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    match *period {
        ReportPeriod::Hoje => (today, today),
        ReportPeriod::UltimosSeteDias => (today - Duration::days(6), today),
        ReportPeriod::UltimosTrintaDias => (today - Duration::days(29), today),
        ReportPeriod::Personalizado { inicio, fim } => (inicio, fim),
    }
}

// Registros sem data válida nunca entram num relatório por período.
pub fn filter_by_period(
    records: &[EnrichedTransaction],
    period: &ReportPeriod,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Vec<EnrichedTransaction> {
    let today = now.with_timezone(&offset).date_naive();
    let (start, end) = period_range(period, today);

    records
        .iter()
        .filter(|record| {
            record
                .timestamp_date
                .map(|ts| {
                    let day = ts.with_timezone(&offset).date_naive();
                    day >= start && day <= end
                })
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

#[derive(Clone)]
pub struct ReportService {
    fonts_dir: PathBuf,
    display_offset: FixedOffset,
}

impl ReportService {
    pub fn new(fonts_dir: PathBuf, display_offset: FixedOffset) -> Self {
        Self {
            fonts_dir,
            display_offset,
        }
    }

    pub fn build_report(
        &self,
        titulo: &str,
        responsavel: Option<&str>,
        period: &ReportPeriod,
        records: &[EnrichedTransaction],
        now: DateTime<Utc>,
    ) -> ReportData {
        let registros = filter_by_period(records, period, now, self.display_offset);
        let resumo = summarize_by_procedure(&registros);

        let funcionarios: HashSet<&str> =
            registros.iter().map(|r| r.employee_id.as_str()).collect();

        ReportData {
            titulo: titulo.trim().to_string(),
            responsavel: responsavel
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            periodo_label: period.label(),
            gerado_em: now
                .with_timezone(&self.display_offset)
                .format("%d/%m/%Y %H:%M")
                .to_string(),
            total_retiradas: registros.len() as u32,
            total_itens: registros
                .iter()
                .fold(0u64, |acc, r| acc.saturating_add(r.quantidade_total)),
            procedimentos_distintos: resumo.len(),
            funcionarios_distintos: funcionarios.len(),
            resumo,
            registros,
        }
    }

    pub fn render_pdf(&self, report: &ReportData) -> Result<Vec<u8>, AppError> {
        // Carrega a fonte da pasta configurada (FONTS_DIR)
        let font_family =
            genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None).map_err(|_| {
                AppError::FontNotFound(format!(
                    "Roboto não encontrada em {}",
                    self.fonts_dir.display()
                ))
            })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(report.titulo.clone());
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(elements::Paragraph::new("SMARTLAB")
            .styled(style::Style::new().bold().with_font_size(18)));
        doc.push(elements::Paragraph::new("Relatório de Retiradas")
            .styled(style::Style::new().with_font_size(10)));
        doc.push(elements::Break::new(1.5));

        doc.push(elements::Paragraph::new(report.titulo.clone())
            .styled(style::Style::new().bold().with_font_size(14)));
        doc.push(elements::Paragraph::new(format!("Período: {}", report.periodo_label)));
        doc.push(elements::Paragraph::new(format!("Gerado em: {}", report.gerado_em)));
        if let Some(responsavel) = &report.responsavel {
            doc.push(elements::Paragraph::new(format!("Responsável: {}", responsavel)));
        }

        doc.push(elements::Break::new(2));

        // --- ESTATÍSTICAS ---
        let style_bold = style::Style::new().bold();
        doc.push(elements::Paragraph::new("RESUMO")
            .styled(style::Style::new().bold().with_font_size(12)));
        let stats = [
            ("Total de retiradas", report.total_retiradas.to_string()),
            ("Total de itens", report.total_itens.to_string()),
            ("Procedimentos distintos", report.procedimentos_distintos.to_string()),
            ("Funcionários distintos", report.funcionarios_distintos.to_string()),
        ];
        for (label, value) in stats {
            doc.push(elements::Paragraph::new(format!("{label}: {value}")));
        }
        doc.push(elements::Break::new(1));

        if !report.resumo.is_empty() {
            // Pesos das colunas: Procedimento (4), Retiradas (1), Itens (1), % (1)
            let mut table = elements::TableLayout::new(vec![4, 1, 1, 1]);
            table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

            table.row()
                .element(elements::Paragraph::new("Procedimento").styled(style_bold))
                .element(elements::Paragraph::new("Retiradas").styled(style_bold))
                .element(elements::Paragraph::new("Itens").styled(style_bold))
                .element(elements::Paragraph::new("%").styled(style_bold))
                .push()
                .map_err(pdf_error)?;

            for entry in &report.resumo {
                table.row()
                    .element(elements::Paragraph::new(entry.name.clone()))
                    .element(elements::Paragraph::new(entry.retiradas.to_string()))
                    .element(elements::Paragraph::new(entry.itens_total.to_string()))
                    .element(elements::Paragraph::new(format!(
                        "{:.1}%",
                        share_of(entry.retiradas, report.total_retiradas)
                    )))
                    .push()
                    .map_err(pdf_error)?;
            }

            doc.push(table);
        }

        doc.push(elements::Break::new(2));

        // --- UMA LINHA POR RETIRADA ---
        doc.push(elements::Paragraph::new("RETIRADAS")
            .styled(style::Style::new().bold().with_font_size(12)));

        if report.registros.is_empty() {
            doc.push(elements::Paragraph::new("Nenhuma retirada no período.")
                .styled(style::Style::new().italic()));
        } else {
            let mut table = elements::TableLayout::new(vec![2, 1, 3, 3, 4]);
            table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

            table.row()
                .element(elements::Paragraph::new("Data").styled(style_bold))
                .element(elements::Paragraph::new("Horário").styled(style_bold))
                .element(elements::Paragraph::new("Funcionário").styled(style_bold))
                .element(elements::Paragraph::new("Procedimento").styled(style_bold))
                .element(elements::Paragraph::new("Itens").styled(style_bold))
                .push()
                .map_err(pdf_error)?;

            for registro in &report.registros {
                let mut itens = vec![registro.item.clone()];
                itens.extend(registro.itens_adicionais.iter().cloned());

                table.row()
                    .element(elements::Paragraph::new(registro.data.clone()))
                    .element(elements::Paragraph::new(registro.horario.clone()))
                    .element(elements::Paragraph::new(registro.funcionario_nome.clone()))
                    .element(elements::Paragraph::new(registro.procedimento.clone()))
                    .element(elements::Paragraph::new(itens.join(", ")))
                    .push()
                    .map_err(pdf_error)?;
            }

            doc.push(table);
        }

        // Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(pdf_error)?;

        Ok(buffer)
    }
}

fn pdf_error(e: genpdf::error::Error) -> AppError {
    AppError::PdfRender(e.to_string())
}
