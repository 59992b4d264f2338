use axum::{
    routing::{get, patch},
    Router,
};

use crate::{
    handlers::task::{
        create_task, delete_task, get_task, list_tasks, toggle_complete, update_task,
    },
    http_server::AppState,
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:task_id",
            get(get_task)
                .put(update_task)
                .patch(update_task)
                .delete(delete_task),
        )
        .route("/tasks/:task_id/toggle_complete", patch(toggle_complete))
}
