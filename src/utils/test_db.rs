use sqlx::PgPool;

use crate::{
    models::task::{Task, TaskInput},
    repositories::task::TaskRepository,
};

pub async fn reset_database(pool: &PgPool) {
    sqlx::query("TRUNCATE tasks RESTART IDENTITY CASCADE")
        .execute(pool)
        .await
        .expect("Failed to truncate tables for tests");
}

pub async fn create_persisted_task(repo: &TaskRepository, title: &str) -> Task {
    let task = Task::new(TaskInput {
        title: title.to_string(),
    })
    .unwrap();
    repo.create(&task).await.unwrap()
}
