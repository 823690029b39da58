// src/services/refresher.rs

use std::time::Duration;

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::services::dashboard_service::DashboardService;

// Timer que refaz busca -> enriquecimento -> agregação a cada intervalo.
pub struct Refresher {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Refresher {
    pub fn spawn(service: DashboardService, every: Duration) -> Self {
        let (shutdown, mut stop) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = stop.changed() => break,
                    _ = ticker.tick() => {}
                }

                // O refresh em andamento também é abandonado no desligamento,
                // para não atualizar estado depois do descarte.
                tokio::select! {
                    _ = stop.changed() => break,
                    snapshot = service.refresh() => {
                        if snapshot.using_fallback {
                            tracing::debug!(
                                "Refresh #{} com dados de demonstração",
                                snapshot.sequence
                            );
                        }
                    }
                }
            }

            tracing::info!("🛑 Atualização periódica encerrada.");
        });

        tracing::info!("🔄 Atualização periódica a cada {:?}", every);
        Self { shutdown, handle }
    }

    pub async fn shutdown(self) {
        // Erro aqui só significa que a task já terminou
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            tracing::error!("Task de atualização terminou com erro: {}", e);
        }
    }
}
