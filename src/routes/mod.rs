use axum::Router;

use crate::{http_server::AppState, routes::task::task_routes};

pub mod task;

/// The explicit route table, assembled once at startup.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(task_routes())
}
