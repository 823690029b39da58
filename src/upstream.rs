// src/upstream.rs

pub mod fallback;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::form_urlencoded::byte_serialize;

use crate::{
    common::error::AppError,
    config::Settings,
    models::{monitoring::MonitoringReading, transactions::WithdrawalRecord},
};

pub const MONITORING_ENDPOINT: &str = "/laboratory/monitoring";
pub const TRANSACTIONS_ENDPOINT: &str = "/transactions/";

// A fronteira com a API do SmartLab. O núcleo só precisa de
// "um future que devolve esses formatos ou falha".
#[async_trait]
pub trait SmartLabSource: Send + Sync {
    async fn monitoring(&self) -> Result<MonitoringReading, AppError>;
    async fn transactions(&self) -> Result<Vec<WithdrawalRecord>, AppError>;
}

#[derive(Clone)]
pub struct SmartLabClient {
    http: reqwest::Client,
    base_url: String,
    cors_proxy: Option<String>,
}

impl SmartLabClient {
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent("smartlab-dashboard/0.1")
            .timeout(settings.upstream_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            cors_proxy: settings
                .use_cors_proxy
                .then(|| settings.cors_proxy_url.clone()),
        })
    }

    // Com proxy: prefixo do proxy + URL completa codificada
    // (https://corsproxy.io/?https%3A%2F%2F...).
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, AppError> {
        let full_url = format!("{}{}", self.base_url, endpoint);

        let url = match &self.cors_proxy {
            Some(proxy) => {
                let encoded: String = byte_serialize(full_url.as_bytes()).collect();
                Url::parse(&format!("{proxy}{encoded}"))
            }
            None => Url::parse(&full_url),
        };

        url.map_err(|e| AppError::Config(format!("URL inválida para {endpoint}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, AppError> {
        let url = self.endpoint_url(endpoint)?;
        tracing::debug!("GET {}", url);

        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamStatus(response.status()));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl SmartLabSource for SmartLabClient {
    async fn monitoring(&self) -> Result<MonitoringReading, AppError> {
        self.get_json(MONITORING_ENDPOINT).await
    }

    async fn transactions(&self) -> Result<Vec<WithdrawalRecord>, AppError> {
        let raw: Vec<Value> = self.get_json(TRANSACTIONS_ENDPOINT).await?;
        Ok(parse_records(raw))
    }
}

// Um registro malformado é descartado sozinho; o resto do lote segue.
pub fn parse_records(raw: Vec<Value>) -> Vec<WithdrawalRecord> {
    let total = raw.len();

    let records: Vec<WithdrawalRecord> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Retirada #{} ignorada, formato inválido: {}", index, e);
                None
            }
        })
        .collect();

    if records.len() < total {
        tracing::warn!("{} de {} retiradas descartadas", total - records.len(), total);
    }
    records
}
