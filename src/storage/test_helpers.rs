//! Shared test helpers for storage tests.

use sqlx::SqlitePool;

use crate::models::NodeRecord;
use crate::storage::NodeStore;

/// Creates an initialized in-memory node store.
pub async fn create_test_store() -> NodeStore {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    let store = NodeStore::from_pool(pool);
    store
        .initialize()
        .await
        .expect("Failed to create nodes table");
    store
}

/// A node in 198.51.100.0/24 whose coordinates depend on `n`.
pub fn test_record(n: u8) -> NodeRecord {
    NodeRecord {
        ip: format!("198.51.100.{n}"),
        port: "8333".to_string(),
        lat: 10.0 + f64::from(n),
        lon: -20.0 - f64::from(n),
    }
}
