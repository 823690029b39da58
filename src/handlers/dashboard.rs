// src/handlers/dashboard.rs

use axum::{extract::State, Json};

use crate::{
    config::AppState,
    models::dashboard::{
        AnalyticsOverview, DashboardSnapshot, MonitoringView, ProcedureSummary, TransactionsView,
    },
};

// Nenhuma rota daqui falha: se a API cair, o snapshot vem com os dados
// de demonstração e `usingFallback = true`.

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (
            status = 200,
            description = "Snapshot completo do painel (sensores, histórico e gráficos)",
            body = DashboardSnapshot
        )
    )
)]
pub async fn get_dashboard(State(app_state): State<AppState>) -> Json<DashboardSnapshot> {
    let snapshot = app_state.dashboard_service.current().await;
    Json((*snapshot).clone())
}

// GET /api/dashboard/monitoring
#[utoipa::path(
    get,
    path = "/api/dashboard/monitoring",
    tag = "Dashboard",
    responses(
        (
            status = 200,
            description = "Temperatura, umidade e status operacional",
            body = MonitoringView
        )
    )
)]
pub async fn get_monitoring(State(app_state): State<AppState>) -> Json<MonitoringView> {
    let snapshot = app_state.dashboard_service.current().await;

    Json(MonitoringView {
        monitoring: snapshot.monitoring.clone(),
        using_fallback: snapshot.using_fallback,
        error_message: snapshot.error_message.clone(),
    })
}

// GET /api/dashboard/transactions
#[utoipa::path(
    get,
    path = "/api/dashboard/transactions",
    tag = "Dashboard",
    responses(
        (
            status = 200,
            description = "Histórico de retiradas, da mais recente para a mais antiga",
            body = TransactionsView
        )
    )
)]
pub async fn get_transactions(State(app_state): State<AppState>) -> Json<TransactionsView> {
    let snapshot = app_state.dashboard_service.current().await;

    Json(TransactionsView {
        transactions: snapshot.transactions.clone(),
        using_fallback: snapshot.using_fallback,
        error_message: snapshot.error_message.clone(),
    })
}

// GET /api/dashboard/analytics
#[utoipa::path(
    get,
    path = "/api/dashboard/analytics",
    tag = "Dashboard",
    responses(
        (
            status = 200,
            description = "Retiradas por procedimento (gráfico de barras)",
            body = AnalyticsOverview
        )
    )
)]
pub async fn get_analytics(State(app_state): State<AppState>) -> Json<AnalyticsOverview> {
    let snapshot = app_state.dashboard_service.current().await;
    Json(snapshot.overview.clone())
}

// GET /api/dashboard/analytics/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/analytics/summary",
    tag = "Dashboard",
    responses(
        (
            status = 200,
            description = "Retiradas e total de itens por procedimento",
            body = Vec<ProcedureSummary>
        )
    )
)]
pub async fn get_analytics_summary(
    State(app_state): State<AppState>,
) -> Json<Vec<ProcedureSummary>> {
    let snapshot = app_state.dashboard_service.current().await;
    Json(snapshot.summary.clone())
}

// POST /api/dashboard/refresh
#[utoipa::path(
    post,
    path = "/api/dashboard/refresh",
    tag = "Dashboard",
    responses(
        (
            status = 200,
            description = "Atualização manual (botão \"Tentar novamente\")",
            body = DashboardSnapshot
        )
    )
)]
pub async fn refresh_dashboard(State(app_state): State<AppState>) -> Json<DashboardSnapshot> {
    tracing::info!("Atualização manual do painel solicitada");
    let snapshot = app_state.dashboard_service.refresh().await;
    Json((*snapshot).clone())
}
