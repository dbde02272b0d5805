pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::cv::handlers as cv;
use crate::dashboard;
use crate::home;
use crate::listing::handlers as listing;
use crate::partials;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.frontend_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        // Job listing
        .route("/api/v1/jobs", get(listing::handle_list_jobs))
        .route("/api/v1/jobs/reload", post(listing::handle_reload_jobs))
        .route("/api/v1/jobs/:id", get(listing::handle_get_job))
        .route(
            "/api/v1/listing/sessions",
            post(listing::handle_create_session),
        )
        .route(
            "/api/v1/listing/sessions/:id",
            get(listing::handle_get_session).delete(listing::handle_close_session),
        )
        .route(
            "/api/v1/listing/sessions/:id/input",
            post(listing::handle_session_input),
        )
        // Pages
        .route("/api/v1/home", get(home::handle_home))
        .route("/api/v1/dashboard", get(dashboard::handle_dashboard))
        .route(
            "/api/v1/dashboard/insights",
            post(dashboard::handle_chart_insights),
        )
        .route("/api/v1/layout", get(partials::handle_layout))
        // CVs
        .route("/api/v1/cvs", post(cv::handle_upload_cv))
        .route("/api/v1/cvs/:id", get(cv::handle_cv_analysis))
        .route("/api/v1/cvs/:id/matches", post(cv::handle_cv_matches))
        .route("/api/v1/cvs/:id/document", get(cv::handle_cv_document))
        .fallback_service(static_files)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::gateway::{Gateway, GatewayError, JobSource};
    use crate::listing::session::SessionRegistry;
    use crate::models::job::{JobRecord, JobsPage};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    struct FakeSource;

    #[async_trait]
    impl JobSource for FakeSource {
        async fn list_jobs(&self, _limit: usize) -> Result<JobsPage, GatewayError> {
            let jobs = (1..=25)
                .map(|id| JobRecord {
                    id,
                    job_title: Some(if id % 5 == 0 { "Rust Engineer" } else { "Tester" }.to_string()),
                    work_location: Some("Hà Nội: Cầu Giấy".to_string()),
                    ..Default::default()
                })
                .collect();
            Ok(JobsPage {
                jobs,
                total: Some(400),
            })
        }
    }

    async fn test_app() -> Router {
        // Nothing listens on the discard port; these tests never reach the backend.
        let gateway = Gateway::new("http://127.0.0.1:9", Duration::from_millis(200));
        let config = Config {
            api_base_url: "http://127.0.0.1:9".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            frontend_dir: "/nonexistent/portal-frontend".to_string(),
            http_timeout_secs: 1,
            catalog_limit: 100,
            stats_concurrency: 2,
            search_debounce_ms: 500,
            session_idle_secs: 1800,
            match_model: "test-model".to_string(),
        };
        build_router(AppState {
            applications: Arc::new(gateway.clone()),
            gateway,
            catalog: Catalog::load(&FakeSource, 100).await,
            sessions: SessionRegistry::default(),
            config,
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "talentbridge-portal");
    }

    #[tokio::test]
    async fn test_list_jobs_applies_query() {
        let app = test_app().await;
        let (status, body) = send(&app, get("/api/v1/jobs?search=rust&view=list")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matched_total"], 5);
        assert_eq!(body["page_size"], 12);
        assert_eq!(body["reported_total"], 400);
        assert_eq!(body["location_options"], json!(["Hà Nội"]));
        assert!(body["load_error"].is_null());

        let (_, body) = send(&app, get("/api/v1/jobs?page=2")).await;
        assert_eq!(body["cards"].as_array().unwrap().len(), 5);
        assert_eq!(body["total_pages"], 2);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            post_json("/api/v1/listing/sessions", json!({ "view": "grid" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["matched_total"], 25);
        let id = body["session_id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            post_json(
                &format!("/api/v1/listing/sessions/{id}/input"),
                json!({ "kind": "event", "event": { "type": "set_search", "value": "rust" } }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matched_total"], 5);

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/listing/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, get(&format!("/api/v1/listing/sessions/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_layout_with_missing_partials() {
        let app = test_app().await;
        let (status, body) = send(&app, get("/api/v1/layout")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "header": null, "footer": null }));
    }
}
