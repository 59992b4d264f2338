use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::db_persistence::DbError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(ValidationErrors),
    #[error("{0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Server error: {0}")]
    Server(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        pub struct ErrorResponse {
            pub error: String,
        }

        match self {
            AppError::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
            }
            AppError::NotFound(err_msg) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { error: err_msg })).into_response()
            }
            // A missing row surfacing from the store is still a 404, not a 500.
            AppError::Database(DbError::TaskNotFound(task_id)) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Task not found: {}", task_id),
                }),
            )
                .into_response(),
            AppError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: String::from("Internal server error."),
                    }),
                )
                    .into_response()
            }
            AppError::Config(_) | AppError::Server(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: String::from("Internal server error."),
                }),
            )
                .into_response(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    field: String,
    message: String,
}

// Collection of validation errors
#[derive(Debug, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}
impl ValidationErrors {
    pub fn new() -> Self {
        ValidationErrors { errors: Vec::new() }
    }

    pub fn add(&mut self, field: &str, error: String) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: error,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Default for ValidationErrors {
    fn default() -> Self {
        Self::new()
    }
}
