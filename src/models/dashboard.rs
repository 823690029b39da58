// src/models/dashboard.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{monitoring::MonitoringReading, transactions::EnrichedTransaction};

// 1. Gráfico de barras: retiradas por procedimento
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureFrequency {
    #[schema(example = "Curativo simples")]
    pub name: String,
    #[schema(example = 3)]
    pub quantidade: u32,
    #[schema(example = "#3b82f6")]
    pub color: String,
}

// 2. Resumo agrupado (retiradas + total de itens)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureSummary {
    #[schema(example = "Curativo simples")]
    pub name: String,
    #[schema(example = 2)]
    pub retiradas: u32,
    #[schema(example = 5)]
    pub itens_total: u64,
}

// 3. Cards do topo do gráfico
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOverview {
    pub total_retiradas: u32,
    pub procedimentos_distintos: usize,
    // Ausente quando não há dados (estado "Nenhum dado disponível")
    pub mais_retirado: Option<ProcedureFrequency>,
    pub chart: Vec<ProcedureFrequency>,
}

// Resultado aplicado de um refresh completo
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub monitoring: MonitoringReading,
    pub transactions: Vec<EnrichedTransaction>,
    pub summary: Vec<ProcedureSummary>,
    pub overview: AnalyticsOverview,
    pub using_fallback: bool,
    pub error_message: Option<String>,
    pub refreshed_at: DateTime<Utc>,
    pub sequence: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringView {
    pub monitoring: MonitoringReading,
    pub using_fallback: bool,
    pub error_message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsView {
    pub transactions: Vec<EnrichedTransaction>,
    pub using_fallback: bool,
    pub error_message: Option<String>,
}
