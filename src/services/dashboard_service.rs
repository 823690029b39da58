// src/services/dashboard_service.rs

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    models::{
        dashboard::DashboardSnapshot,
        monitoring::MonitoringReading,
        transactions::WithdrawalRecord,
    },
    services::{
        aggregation,
        enrichment::{enrich_transactions, EnrichmentOptions},
        name_cache::NameResolver,
    },
    upstream::{fallback, SmartLabSource},
};

pub const FALLBACK_MESSAGE: &str =
    "Não foi possível conectar à API. Exibindo dados de demonstração.";

// (dados, usando fallback?, mensagem de erro)
#[derive(Debug, Clone)]
pub struct FetchOutcome<T> {
    pub data: T,
    pub using_fallback: bool,
    pub error_message: Option<String>,
}

impl<T> FetchOutcome<T> {
    fn live(data: T) -> Self {
        Self {
            data,
            using_fallback: false,
            error_message: None,
        }
    }

    fn fallback(data: T, cause: String) -> Self {
        Self {
            data,
            using_fallback: true,
            error_message: Some(format!("{FALLBACK_MESSAGE} ({cause})")),
        }
    }
}

#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn SmartLabSource>,
    resolver: Arc<NameResolver>,
    options: Arc<EnrichmentOptions>,
    next_sequence: Arc<AtomicU64>,
    snapshot: Arc<RwLock<Option<Arc<DashboardSnapshot>>>>,
}

impl DashboardService {
    pub fn new(
        source: Arc<dyn SmartLabSource>,
        resolver: Arc<NameResolver>,
        options: EnrichmentOptions,
    ) -> Self {
        Self {
            source,
            resolver,
            options: Arc::new(options),
            next_sequence: Arc::new(AtomicU64::new(0)),
            snapshot: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn fetch_monitoring(&self) -> FetchOutcome<MonitoringReading> {
        match self.source.monitoring().await {
            Ok(reading) => FetchOutcome::live(reading),
            Err(e) => {
                tracing::warn!(
                    "⚠️ Monitoramento indisponível, usando dados de demonstração: {}",
                    e
                );
                FetchOutcome::fallback(fallback::monitoring(), e.to_string())
            }
        }
    }

    pub async fn fetch_transactions(&self) -> FetchOutcome<Vec<WithdrawalRecord>> {
        match self.source.transactions().await {
            Ok(records) => FetchOutcome::live(records),
            Err(e) => {
                tracing::warn!(
                    "⚠️ Transações indisponíveis, usando dados de demonstração: {}",
                    e
                );
                FetchOutcome::fallback(fallback::transactions(Utc::now()), e.to_string())
            }
        }
    }

    // Busca -> fallback -> enriquecimento -> agregação -> troca do snapshot.
    // Refreshes podem se sobrepor; só o de maior sequência é aplicado.
    pub async fn refresh(&self) -> Arc<DashboardSnapshot> {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let (monitoring, transactions) =
            tokio::join!(self.fetch_monitoring(), self.fetch_transactions());

        let snapshot = Arc::new(self.build_snapshot(sequence, monitoring, transactions));
        self.apply(snapshot).await
    }

    pub async fn current(&self) -> Arc<DashboardSnapshot> {
        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            return Arc::clone(snapshot);
        }
        self.refresh().await
    }

    fn build_snapshot(
        &self,
        sequence: u64,
        monitoring: FetchOutcome<MonitoringReading>,
        transactions: FetchOutcome<Vec<WithdrawalRecord>>,
    ) -> DashboardSnapshot {
        let enriched = enrich_transactions(&transactions.data, &*self.resolver, &self.options);
        let overview = aggregation::overview(&enriched);
        let summary = aggregation::summarize_by_procedure(&enriched);

        tracing::debug!(
            "Refresh #{}: {} retiradas, {} procedimentos",
            sequence,
            enriched.len(),
            overview.procedimentos_distintos
        );

        DashboardSnapshot {
            monitoring: monitoring.data,
            transactions: enriched,
            summary,
            overview,
            using_fallback: monitoring.using_fallback || transactions.using_fallback,
            error_message: transactions.error_message.or(monitoring.error_message),
            refreshed_at: Utc::now(),
            sequence,
        }
    }

    async fn apply(&self, snapshot: Arc<DashboardSnapshot>) -> Arc<DashboardSnapshot> {
        let mut current = self.snapshot.write().await;

        if let Some(existing) = current.as_ref() {
            if existing.sequence > snapshot.sequence {
                tracing::debug!(
                    "Descartando resposta obsoleta #{} (aplicado: #{})",
                    snapshot.sequence,
                    existing.sequence
                );
                return Arc::clone(existing);
            }
        }

        *current = Some(Arc::clone(&snapshot));
        snapshot
    }
}
