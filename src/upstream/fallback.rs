// src/upstream/fallback.rs

// Dados de demonstração usados quando a API do SmartLab não responde.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;

use crate::models::{
    monitoring::{MonitoringReading, SensorReading},
    transactions::{Procedure, ProcedureItem, WithdrawalRecord},
};

pub fn monitoring() -> MonitoringReading {
    MonitoringReading {
        temperature: SensorReading {
            value: Decimal::new(247, 1),
            unit: "°C".to_string(),
            status: "Normal".to_string(),
        },
        humidity: SensorReading {
            value: Decimal::from(53),
            unit: "%".to_string(),
            status: "Normal".to_string(),
        },
        operational_status: "Operacional".to_string(),
    }
}

// O timestamp é o momento do fallback, como no painel original.
pub fn transactions(now: DateTime<Utc>) -> Vec<WithdrawalRecord> {
    vec![WithdrawalRecord {
        employee_id: "3cfba964-545e-4e68-adaa-867ab2b0d155".to_string(),
        employee_name: None,
        procedure: Procedure {
            id: "a2e5fa7a-2784-4071-a65c-db8faac3f8df".to_string(),
            name: "Curativo simples".to_string(),
            items: vec![
                ProcedureItem {
                    id: "a5fc7a2e-a4a6-414a-87d6-b95fe2ea3dd3".to_string(),
                    name: "Luvas descartáveis".to_string(),
                    quantity: 1,
                },
                ProcedureItem {
                    id: "7386b220-d207-41d1-90d4-c6f548579df8".to_string(),
                    name: "Gaze estéril".to_string(),
                    quantity: 1,
                },
            ],
        },
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }]
}
