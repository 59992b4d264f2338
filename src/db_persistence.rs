use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::repositories::{task::TaskRepository, DbResult};

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Task not found: {0}")]
    TaskNotFound(String),
}

#[derive(Debug, Clone)]
pub struct DbPersistence {
    pub tasks: TaskRepository,

    pool: PgPool,
}

impl DbPersistence {
    pub async fn new(database_url: &str) -> DbResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let tasks = TaskRepository::new(&pool);

        Ok(Self { tasks, pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
