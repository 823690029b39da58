// src/handlers/reports.rs

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::reports::GenerateReportPayload,
};

// POST /api/reports/withdrawals
#[utoipa::path(
    post,
    path = "/api/reports/withdrawals",
    tag = "Reports",
    request_body = GenerateReportPayload,
    responses(
        (status = 200, description = "Relatório de retiradas em PDF (application/pdf)"),
        (status = 400, description = "Campos obrigatórios ausentes ou período inválido")
    )
)]
pub async fn generate_withdrawals_report(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<GenerateReportPayload>,
) -> Result<Response, ApiError> {
    // Validação padrão do Validator
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    payload.validate_consistency().map_err(|e| {
        let mut errors = validator::ValidationErrors::new();
        errors.add("periodo", e);
        AppError::ValidationError(errors).to_api_error(&locale)
    })?;

    // `validate` já garantiu o período
    let Some(period) = payload.periodo else {
        return Err(ApiError::new(
            axum::http::StatusCode::BAD_REQUEST,
            "O campo 'periodo' é obrigatório.",
        ));
    };

    let snapshot = app_state.dashboard_service.current().await;
    let report = app_state.report_service.build_report(
        &payload.titulo,
        payload.responsavel.as_deref(),
        &period,
        &snapshot.transactions,
        Utc::now(),
    );

    tracing::info!(
        "Gerando relatório '{}' ({}): {} retiradas",
        report.titulo,
        report.periodo_label,
        report.total_retiradas
    );

    let pdf_bytes = app_state
        .report_service
        .render_pdf(&report)
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    // Configura os Headers para o navegador baixar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"relatorio_retiradas_{}.pdf\"", Uuid::new_v4()),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
