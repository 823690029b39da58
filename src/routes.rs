// src/routes.rs

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    common::error::AppError,
    config::{AppState, Settings},
    docs::ApiDoc,
    handlers,
};

fn cors_layer(settings: &Settings) -> Result<CorsLayer, AppError> {
    match &settings.cors_allowed_origin {
        Some(origin) => {
            let origin = origin.parse::<HeaderValue>().map_err(|_| {
                AppError::Config(format!("CORS_ALLOWED_ORIGIN inválida: '{origin}'"))
            })?;
            Ok(CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT_LANGUAGE]))
        }
        None => Ok(CorsLayer::permissive()),
    }
}

pub fn build_router(app_state: AppState) -> Result<Router, AppError> {
    let cors = cors_layer(&app_state.settings)?;

    let dashboard_routes = Router::new()
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/api/dashboard/monitoring", get(handlers::dashboard::get_monitoring))
        .route("/api/dashboard/transactions", get(handlers::dashboard::get_transactions))
        .route("/api/dashboard/analytics", get(handlers::dashboard::get_analytics))
        .route("/api/dashboard/analytics/summary", get(handlers::dashboard::get_analytics_summary))
        .route("/api/dashboard/refresh", post(handlers::dashboard::refresh_dashboard));

    let report_routes = Router::new()
        .route("/api/reports/withdrawals", post(handlers::reports::generate_withdrawals_report));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(dashboard_routes)
        .merge(report_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    Ok(app)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::services::dashboard_service::tests::{record, StubSource};

    fn app(records: Option<Vec<crate::models::transactions::WithdrawalRecord>>) -> Router {
        let state = AppState::with_source(Settings::default(), Arc::new(StubSource { records }));
        build_router(state).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str, lang: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT_LANGUAGE, lang)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = app(Some(Vec::new())).oneshot(get("/api/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn dashboard_falls_back_when_the_api_is_down() {
        let response = app(None).oneshot(get("/api/dashboard")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["usingFallback"], true);
        assert!(json["errorMessage"].is_string());
        assert_eq!(json["transactions"][0]["procedimento"], "Curativo simples");
        assert_eq!(json["monitoring"]["temperature"]["value"], 24.7);
    }

    #[tokio::test]
    async fn transactions_are_served_most_recent_first() {
        let records = vec![
            record("Antigo", "2025-10-23T10:00:00Z"),
            record("Recente", "2025-10-23T12:00:00Z"),
        ];

        let response = app(Some(records))
            .oneshot(get("/api/dashboard/transactions"))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["usingFallback"], false);
        assert_eq!(json["transactions"][0]["procedimento"], "Recente");
        assert_eq!(json["transactions"][0]["horario"], "09:00");
        assert_eq!(json["transactions"][0]["data"], "23/10/2025");
    }

    #[tokio::test]
    async fn analytics_has_an_explicit_empty_state() {
        let response = app(Some(Vec::new()))
            .oneshot(get("/api/dashboard/analytics"))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["totalRetiradas"], 0);
        assert!(json["maisRetirado"].is_null());
        assert_eq!(json["chart"], Value::Array(Vec::new()));
    }

    #[tokio::test]
    async fn summary_groups_by_procedure() {
        let records = vec![
            record("Triagem", "2025-10-23T10:00:00Z"),
            record("Triagem", "2025-10-23T11:00:00Z"),
        ];

        let response = app(Some(records))
            .oneshot(get("/api/dashboard/analytics/summary"))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json[0]["name"], "Triagem");
        assert_eq!(json[0]["retiradas"], 2);
        assert_eq!(json[0]["itensTotal"], 4);
    }

    #[tokio::test]
    async fn report_requires_titulo_and_periodo() {
        let response = app(Some(Vec::new()))
            .oneshot(post_json("/api/reports/withdrawals", r#"{"titulo":""}"#, "pt-BR"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Um ou mais campos são inválidos.");
        assert!(json["details"]["titulo"].is_array());
        assert!(json["details"]["periodo"].is_array());
    }

    #[tokio::test]
    async fn report_without_titulo_is_a_400_with_details() {
        let body = r#"{"periodo":{"tipo":"hoje"}}"#;

        let response = app(Some(Vec::new()))
            .oneshot(post_json("/api/reports/withdrawals", body, "pt-BR"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["details"]["titulo"][0], "O título do relatório é obrigatório.");
    }

    #[tokio::test]
    async fn report_with_blank_titulo_is_rejected() {
        let body = r#"{"titulo":"   ","periodo":{"tipo":"hoje"}}"#;

        let response = app(Some(Vec::new()))
            .oneshot(post_json("/api/reports/withdrawals", body, "pt-BR"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["details"]["titulo"].is_array());
        assert!(json["details"].get("periodo").is_none());
    }

    #[tokio::test]
    async fn report_rejects_an_inverted_custom_period() {
        let body = r#"{"titulo":"Outubro","periodo":{"tipo":"personalizado",
            "inicio":"2025-10-23","fim":"2025-10-01"}}"#;

        let response = app(Some(Vec::new()))
            .oneshot(post_json("/api/reports/withdrawals", body, "en-US"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "One or more fields are invalid.");
        assert!(json["details"]["periodo"].is_array());
    }

    #[test]
    fn invalid_cors_origin_is_a_config_error() {
        let settings = Settings {
            cors_allowed_origin: Some("bad\norigin".to_string()),
            ..Settings::default()
        };

        assert!(matches!(cors_layer(&settings), Err(AppError::Config(_))));
    }
}
