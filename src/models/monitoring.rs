// src/models/monitoring.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Resposta de GET /laboratory/monitoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    #[schema(value_type = f64, example = 24.7)]
    pub value: Decimal,
    #[schema(example = "°C")]
    pub unit: String,
    #[schema(example = "Normal")]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringReading {
    pub temperature: SensorReading,
    pub humidity: SensorReading,
    #[schema(example = "Operacional")]
    pub operational_status: String,
}
