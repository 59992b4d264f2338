use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db_persistence::DbPersistence,
    metrics::{metrics_handler, track_metrics, Metrics},
    routes::api_routes,
};

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type HttpServerResult<T> = Result<T, HttpServerError>;

#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Arc<DbPersistence>,
    pub metrics: Arc<Metrics>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub open_tasks: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

/// Create the HTTP server router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(get_status))
        .route("/metrics", get(metrics_handler))
        .merge(api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .layer(middleware::from_fn(track_metrics))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        service: "TaskBoard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Get service status and task counts
async fn get_status(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    let total_tasks = state
        .db
        .tasks
        .task_count()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let completed_tasks = state
        .db
        .tasks
        .completed_count()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let response = StatusResponse {
        status: "running".to_string(),
        total_tasks: total_tasks as usize,
        completed_tasks: completed_tasks as usize,
        open_tasks: (total_tasks - completed_tasks) as usize,
    };

    Ok(Json(response))
}

/// Start the HTTP server
pub async fn start_server(db: Arc<DbPersistence>, bind_address: &str) -> HttpServerResult<()> {
    let state = AppState {
        db,
        metrics: Arc::new(Metrics::new()),
    };
    let app = create_router(state);

    tracing::info!("Starting HTTP server on {}", bind_address);

    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{test_app_state::create_test_app_state, test_db::reset_database};
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn setup_test_router() -> Router {
        let state = create_test_app_state().await;
        reset_database(state.db.pool()).await;
        create_router(state)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_task(app: &Router, title: &str) -> Value {
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/tasks",
                json!({ "title": title }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        response_json(response).await
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = setup_test_router().await;

        let response = app
            .oneshot(empty_request(Method::GET, "/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["service"], "TaskBoard");
    }

    #[tokio::test]
    async fn test_create_task_returns_created_task() {
        let app = setup_test_router().await;

        let task = create_task(&app, "Buy milk").await;
        assert_eq!(task["title"], "Buy milk");
        assert_eq!(task["completed"], false);
        assert!(task["id"].is_string());
        assert!(task["created_at"].is_string());
        assert!(task["updated_at"].is_string());
    }

    #[tokio::test]
    async fn test_create_task_with_empty_title_is_unprocessable() {
        let app = setup_test_router().await;

        let response = app
            .oneshot(json_request(Method::POST, "/tasks", json!({ "title": "" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = response_json(response).await;
        assert_eq!(body["errors"][0]["field"], "title");
    }

    #[tokio::test]
    async fn test_get_unknown_task_is_not_found() {
        let app = setup_test_router().await;

        let response = app
            .oneshot(empty_request(
                Method::GET,
                "/tasks/0192e4a0-2f3b-4c59-9d8a-222222222222",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_task_title_and_completed() {
        let app = setup_test_router().await;
        let task = create_task(&app, "old title").await;
        let uri = format!("/tasks/{}", task["id"].as_str().unwrap());

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PATCH,
                &uri,
                json!({ "title": "new title", "completed": true }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let updated = response_json(response).await;
        assert_eq!(updated["title"], "new title");
        assert_eq!(updated["completed"], true);
        assert_eq!(updated["id"], task["id"]);
    }

    #[tokio::test]
    async fn test_update_with_empty_title_leaves_task_unchanged() {
        let app = setup_test_router().await;
        let task = create_task(&app, "keep me").await;
        let uri = format!("/tasks/{}", task["id"].as_str().unwrap());

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                &uri,
                json!({ "title": "", "completed": true }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, &uri))
            .await
            .unwrap();
        let stored = response_json(response).await;
        assert_eq!(stored["title"], "keep me");
        assert_eq!(stored["completed"], false);
    }

    #[tokio::test]
    async fn test_toggle_complete_round_trip() {
        let app = setup_test_router().await;
        let task = create_task(&app, "toggle me").await;
        let uri = format!("/tasks/{}/toggle_complete", task["id"].as_str().unwrap());

        let response = app
            .clone()
            .oneshot(empty_request(Method::PATCH, &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let toggled = response_json(response).await;
        assert_eq!(toggled["completed"], true);

        let response = app
            .clone()
            .oneshot(empty_request(Method::PATCH, &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let toggled_back = response_json(response).await;
        assert_eq!(toggled_back["completed"], false);
    }

    #[tokio::test]
    async fn test_toggle_unknown_task_is_not_found() {
        let app = setup_test_router().await;

        let response = app
            .oneshot(empty_request(
                Method::PATCH,
                "/tasks/0192e4a0-2f3b-4c59-9d8a-333333333333/toggle_complete",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_task_then_get_is_not_found() {
        let app = setup_test_router().await;
        let task = create_task(&app, "short lived").await;
        let uri = format!("/tasks/{}", task["id"].as_str().unwrap());

        let response = app
            .clone()
            .oneshot(empty_request(Method::DELETE, &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Deleting again fails too.
        let response = app
            .clone()
            .oneshot(empty_request(Method::DELETE, &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_returns_created_tasks_in_order() {
        let app = setup_test_router().await;
        let first = create_task(&app, "first").await;
        let second = create_task(&app, "second").await;

        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, "/tasks"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        let tasks = body.as_array().unwrap();
        let ids: Vec<&Value> = tasks.iter().map(|t| &t["id"]).collect();
        let first_pos = ids.iter().position(|id| **id == first["id"]).unwrap();
        let second_pos = ids.iter().position(|id| **id == second["id"]).unwrap();
        assert!(first_pos < second_pos);
    }
}
