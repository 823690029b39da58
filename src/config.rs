// src/config.rs

use std::{env, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use chrono::FixedOffset;

use crate::{
    common::error::AppError,
    services::{
        dashboard_service::DashboardService,
        enrichment::EnrichmentOptions,
        name_cache::{NameResolver, DEFAULT_NAME_POOL},
        report_service::ReportService,
    },
    upstream::{SmartLabClient, SmartLabSource},
};

const DEFAULT_API_BASE_URL: &str = "https://api.smartlab-next.space";
const DEFAULT_CORS_PROXY_URL: &str = "https://corsproxy.io/?";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub use_cors_proxy: bool,
    pub cors_proxy_url: String,
    pub upstream_timeout: Duration,
    pub refresh_interval: Duration,
    pub display_offset: FixedOffset,
    pub sector_label: String,
    pub employee_name_pool: Vec<String>,
    pub fonts_dir: PathBuf,
    pub bind_addr: String,
    pub cors_allowed_origin: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            use_cors_proxy: true,
            cors_proxy_url: DEFAULT_CORS_PROXY_URL.to_string(),
            upstream_timeout: Duration::from_secs(8),
            refresh_interval: Duration::from_secs(10),
            // Horário de Brasília
            display_offset: FixedOffset::west_opt(3 * 3600).expect("offset fixo válido"),
            sector_label: "Laboratório Central".to_string(),
            employee_name_pool: DEFAULT_NAME_POOL.iter().map(|n| n.to_string()).collect(),
            fonts_dir: PathBuf::from("./fonts"),
            bind_addr: "0.0.0.0:3000".to_string(),
            cors_allowed_origin: None,
        }
    }
}

impl Settings {
    // Lê as variáveis de ambiente; o que faltar fica com o padrão.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Settings::default();

        let offset_minutes: i32 = env_or("DISPLAY_UTC_OFFSET_MINUTES", -180)?;
        let display_offset = FixedOffset::east_opt(offset_minutes * 60).ok_or_else(|| {
            AppError::Config(format!(
                "DISPLAY_UTC_OFFSET_MINUTES fora do intervalo: {offset_minutes}"
            ))
        })?;

        let employee_name_pool = match env::var("EMPLOYEE_NAME_POOL") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => defaults.employee_name_pool,
        };

        Ok(Self {
            api_base_url: env::var("SMARTLAB_API_BASE_URL").unwrap_or(defaults.api_base_url),
            use_cors_proxy: env_or("USE_CORS_PROXY", defaults.use_cors_proxy)?,
            cors_proxy_url: env::var("CORS_PROXY_URL").unwrap_or(defaults.cors_proxy_url),
            upstream_timeout: Duration::from_secs(env_or("UPSTREAM_TIMEOUT_SECS", 8)?),
            refresh_interval: Duration::from_secs(
                env_or::<u64>("REFRESH_INTERVAL_SECS", 10)?.max(1),
            ),
            display_offset,
            sector_label: env::var("SECTOR_LABEL").unwrap_or(defaults.sector_label),
            employee_name_pool,
            fonts_dir: env::var("FONTS_DIR").map(PathBuf::from).unwrap_or(defaults.fonts_dir),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").ok().filter(|o| !o.is_empty()),
        })
    }

    pub fn enrichment_options(&self) -> EnrichmentOptions {
        EnrichmentOptions {
            display_offset: self.display_offset,
            sector_label: self.sector_label.clone(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{key} inválida: '{raw}'"))),
        Err(_) => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub dashboard_service: DashboardService,
    pub report_service: ReportService,
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Settings::from_env()?;
        let client = SmartLabClient::new(&settings)?;

        tracing::info!(
            "✅ Cliente da API configurado para {} (proxy CORS: {})",
            settings.api_base_url,
            settings.use_cors_proxy
        );

        Ok(Self::with_source(settings, Arc::new(client)))
    }

    // Monta o gráfico de dependências a partir de uma fonte qualquer (a API real ou um stub).
    pub fn with_source(settings: Settings, source: Arc<dyn SmartLabSource>) -> Self {
        let resolver = Arc::new(NameResolver::from_entropy(settings.employee_name_pool.clone()));
        let dashboard_service =
            DashboardService::new(source, resolver, settings.enrichment_options());
        let report_service =
            ReportService::new(settings.fonts_dir.clone(), settings.display_offset);

        Self {
            settings: Arc::new(settings),
            dashboard_service,
            report_service,
        }
    }
}
