use std::sync::Arc;

use crate::{config::Config, db_persistence::DbPersistence, http_server::AppState, metrics::Metrics};

pub async fn create_test_app_state() -> AppState {
    let config = Config::load_test_env().expect("Failed to load test configuration");
    let db = DbPersistence::new(config.get_database_url())
        .await
        .expect("Failed to connect to test database");

    AppState {
        db: Arc::new(db),
        metrics: Arc::new(Metrics::new()),
    }
}
