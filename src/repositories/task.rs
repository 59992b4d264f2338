use sqlx::PgPool;

use crate::{
    db_persistence::DbError,
    models::task::{Task, TaskId, TaskTitle},
    repositories::DbResult,
};

#[derive(Clone, Debug)]
pub struct TaskRepository {
    pool: PgPool,
}
impl TaskRepository {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn create(&self, new_task: &Task) -> DbResult<Task> {
        let task = sqlx::query_as::<_, Task>(
            "
            INSERT INTO tasks (task_id, title, completed, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            ",
        )
        .bind(new_task.task_id)
        .bind(&new_task.title)
        .bind(new_task.completed)
        .bind(new_task.created_at)
        .bind(new_task.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn get_task(&self, task_id: TaskId) -> DbResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE task_id = $1")
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    pub async fn get_all_tasks(&self) -> DbResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    /// Applies the provided fields in one statement; omitted fields keep
    /// their stored values. Concurrent updates on the same row serialize on
    /// the row lock.
    pub async fn update_task(
        &self,
        task_id: TaskId,
        title: Option<TaskTitle>,
        completed: Option<bool>,
    ) -> DbResult<Task> {
        let task = sqlx::query_as::<_, Task>(
            "
            UPDATE tasks
            SET title = COALESCE($1, title),
                completed = COALESCE($2, completed),
                updated_at = NOW()
            WHERE task_id = $3
            RETURNING *
            ",
        )
        .bind(title)
        .bind(completed)
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;

        task.ok_or_else(|| DbError::TaskNotFound(task_id.0.to_string()))
    }

    /// Flips `completed` in a single statement, so concurrent toggles on the
    /// same task cannot lose updates.
    pub async fn toggle_complete(&self, task_id: TaskId) -> DbResult<Task> {
        let task = sqlx::query_as::<_, Task>(
            "
            UPDATE tasks
            SET completed = NOT completed, updated_at = NOW()
            WHERE task_id = $1
            RETURNING *
            ",
        )
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;

        task.ok_or_else(|| DbError::TaskNotFound(task_id.0.to_string()))
    }

    pub async fn delete_task(&self, task_id: TaskId) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE task_id = $1")
            .bind(task_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::TaskNotFound(task_id.0.to_string()));
        }

        Ok(())
    }

    pub async fn task_count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn completed_count(&self) -> DbResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FILTER (WHERE completed) FROM tasks")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
