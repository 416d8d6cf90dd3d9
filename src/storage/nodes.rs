//! The `nodes` table.

use std::collections::HashSet;
use std::path::Path;

use log::error;
use sqlx::{Row, SqlitePool};

use super::pool::init_db_pool_with_path;
use crate::error_handling::DatabaseError;
use crate::models::NodeRecord;

/// Durable table of enriched nodes, unique by address.
///
/// Written by a single task during bootstrap or refresh; read by the front end
/// afterwards.
#[derive(Debug, Clone)]
pub struct NodeStore {
    pool: SqlitePool,
}

impl NodeStore {
    /// Opens (creating if needed) the SQLite file at `db_path`.
    ///
    /// The schema is not touched; see `initialize`.
    pub async fn open(db_path: &Path) -> Result<Self, DatabaseError> {
        let pool = init_db_pool_with_path(db_path).await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Pool for read-only consumers such as the front end.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Whether the `nodes` table exists.
    pub async fn is_initialized(&self) -> Result<bool, DatabaseError> {
        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='nodes'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(tables > 0)
    }

    /// Creates the `nodes` and `bootstrap_state` tables if they don't exist.
    /// Safe to call repeatedly.
    pub async fn initialize(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS nodes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ip TEXT NOT NULL UNIQUE,
            port TEXT NOT NULL,
            lat REAL NOT NULL,
            lon REAL NOT NULL
        )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS bootstrap_state (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            completed_at TEXT NOT NULL
        )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Whether a bootstrap ran to completion against this store.
    ///
    /// A store whose bootstrap was interrupted has its tables but no marker.
    pub async fn is_bootstrapped(&self) -> Result<bool, DatabaseError> {
        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='bootstrap_state'",
        )
        .fetch_one(&self.pool)
        .await?;
        if tables == 0 {
            return Ok(false);
        }

        let markers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bootstrap_state")
            .fetch_one(&self.pool)
            .await?;
        Ok(markers > 0)
    }

    /// Records that bootstrap finished. The first completion time is kept.
    pub async fn mark_bootstrapped(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO bootstrap_state (id, completed_at) VALUES (1, ?)
            ON CONFLICT(id) DO NOTHING",
        )
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Inserts one node as its own statement.
    ///
    /// Returns `false` when a node with the same address is already stored;
    /// the existing row is left untouched.
    pub async fn insert(&self, record: &NodeRecord) -> Result<bool, DatabaseError> {
        match sqlx::query(
            "INSERT INTO nodes (ip, port, lat, lon) VALUES (?, ?, ?, ?)
            ON CONFLICT(ip) DO NOTHING",
        )
        .bind(&record.ip)
        .bind(&record.port)
        .bind(record.lat)
        .bind(record.lon)
        .execute(&self.pool)
        .await
        {
            Ok(result) => Ok(result.rows_affected() > 0),
            Err(e) => {
                error!("Error when inserting node {}: {}", record.ip, e);
                Err(e.into())
            }
        }
    }

    /// Returns up to `n` distinct nodes chosen uniformly at random.
    pub async fn sample_random(&self, n: usize) -> Result<Vec<NodeRecord>, DatabaseError> {
        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        let rows = sqlx::query("SELECT ip, port, lat, lon FROM nodes ORDER BY RANDOM() LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| -> Result<NodeRecord, DatabaseError> {
                Ok(NodeRecord {
                    ip: row.try_get("ip")?,
                    port: row.try_get("port")?,
                    lat: row.try_get("lat")?,
                    lon: row.try_get("lon")?,
                })
            })
            .collect()
    }

    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM nodes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Every stored address, for skipping known nodes during refresh.
    pub async fn known_addresses(&self) -> Result<HashSet<String>, DatabaseError> {
        let addresses: Vec<String> = sqlx::query_scalar("SELECT ip FROM nodes")
            .fetch_all(&self.pool)
            .await?;
        Ok(addresses.into_iter().collect())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
