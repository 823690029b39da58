// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
        handlers::dashboard::get_monitoring,
        handlers::dashboard::get_transactions,
        handlers::dashboard::get_analytics,
        handlers::dashboard::get_analytics_summary,
        handlers::dashboard::refresh_dashboard,

        // --- Reports ---
        handlers::reports::generate_withdrawals_report,
    ),
    components(
        schemas(
            // --- DASHBOARD ---
            models::dashboard::ProcedureFrequency,
            models::dashboard::ProcedureSummary,
            models::dashboard::AnalyticsOverview,
            models::dashboard::DashboardSnapshot,
            models::dashboard::MonitoringView,
            models::dashboard::TransactionsView,

            // --- Monitoring ---
            models::monitoring::SensorReading,
            models::monitoring::MonitoringReading,

            // --- Transactions ---
            models::transactions::ProcedureItem,
            models::transactions::Procedure,
            models::transactions::WithdrawalRecord,
            models::transactions::EnrichedTransaction,

            // --- Reports ---
            models::reports::ReportPeriod,
            models::reports::GenerateReportPayload,
        )
    ),
    tags(
        (
            name = "Dashboard",
            description = "Sensores, histórico de retiradas e gráficos do SmartLab"
        ),
        (name = "Reports", description = "Relatórios de retiradas em PDF")
    )
)]
pub struct ApiDoc;
