use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct TaskId(pub Uuid);
impl TaskId {
    pub fn generate() -> Self {
        TaskId(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct TaskTitle(pub String);
impl TaskTitle {
    pub fn from(input: &str) -> Result<Self, String> {
        if input.trim().is_empty() {
            return Err(String::from("Title shouldn't be empty."));
        }

        Ok(TaskTitle(input.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    // Internal row id, carries insertion order. Never serialized.
    #[serde(skip)]
    pub id: Option<i64>,
    #[serde(rename = "id")]
    pub task_id: TaskId,
    pub title: TaskTitle,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(input: TaskInput) -> Result<Self, AppError> {
        let mut errors = ValidationErrors::new();

        let title = match TaskTitle::from(&input.title) {
            Ok(title) => title,
            Err(e) => {
                errors.add("title", e);
                TaskTitle(String::new())
            }
        };

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let now = Utc::now();
        Ok(Task {
            id: None,
            task_id: TaskId::generate(),
            title,
            completed: false,
            created_at: now,
            updated_at: now,
        })
    }
}

// And an unvalidated version that we can deserialize directly from JSON
#[derive(Debug, Deserialize)]
pub struct TaskInput {
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl UpdateTaskInput {
    /// Validates the optional title before the store is touched, so a
    /// rejected update leaves the stored task unchanged.
    pub fn validated_title(&self) -> Result<Option<TaskTitle>, AppError> {
        match self.title.as_deref() {
            Some(raw) => match TaskTitle::from(raw) {
                Ok(title) => Ok(Some(title)),
                Err(e) => {
                    let mut errors = ValidationErrors::new();
                    errors.add("title", e);
                    Err(AppError::Validation(errors))
                }
            },
            None => Ok(None),
        }
    }
}
