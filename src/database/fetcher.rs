//! # Load Row Fetcher
//!
//! Async access to the cluster's loads metadata table.
//!
//! ## Overview
//!
//! The analytical cluster exposes load history through an
//! `information_schema.loads` view reachable over its MySQL-protocol
//! frontend port. [`SqlLoadFetcher`] queries it with bound parameters and
//! maps rows straight into [`RawLoadRow`]; normalization happens later in
//! the event collector, never here.
//!
//! ## Contract
//!
//! - Zero matching rows return an empty vec, never an error. Callers rely
//!   on this to distinguish "nothing to analyze" from "metadata store
//!   unreachable".
//! - Transport failures surface as [`FetchError`]; the analysis pipeline
//!   maps them to an `error` outcome for that single call.
//! - No retries here; retry policy belongs to the owner of the pool.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::models::load_record::RawLoadRow;

/// Errors raised by the metadata store boundary.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("metadata query failed: {0}")]
    Query(#[from] sqlx::Error),
    #[error("metadata store unavailable: {0}")]
    Unavailable(String),
}

/// Which table's load history to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSelector {
    pub database: String,
    /// `None` fetches every table in the database; the pipeline still
    /// deep-analyzes the busiest one
    pub table: Option<String>,
}

impl LoadSelector {
    pub fn table(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table: Some(table.into()),
        }
    }

    pub fn database(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table: None,
        }
    }
}

impl std::fmt::Display for LoadSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", self.database, table),
            None => write!(f, "{}.*", self.database),
        }
    }
}

/// Time window and row cap for one fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchWindow {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

impl FetchWindow {
    /// Window covering the trailing `hours` before `now`.
    pub fn last_hours(now: DateTime<Utc>, hours: i64) -> Self {
        Self {
            since: Some(now - chrono::Duration::hours(hours)),
            until: None,
            limit: Some(crate::constants::system::DEFAULT_FETCH_LIMIT),
        }
    }
}

/// Row-fetch collaborator consumed by the analysis pipeline.
///
/// Implementations return an empty sequence (never an error) when no data
/// exists for the selector.
#[async_trait]
pub trait LoadFetcher: Send + Sync {
    async fn fetch_loads(
        &self,
        selector: &LoadSelector,
        window: &FetchWindow,
    ) -> Result<Vec<RawLoadRow>, FetchError>;
}

/// [`LoadFetcher`] backed by the cluster's MySQL-protocol frontend.
#[derive(Clone)]
pub struct SqlLoadFetcher {
    pool: MySqlPool,
}

impl SqlLoadFetcher {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Connect a new pool from a database URL.
    pub async fn connect(database_url: &str) -> Result<Self, FetchError> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;
        Ok(Self::new(pool))
    }

    fn build_query(selector: &LoadSelector, window: &FetchWindow) -> String {
        let mut sql = String::from(
            "SELECT database_name, table_name, label, state, \
             create_time, load_start_time, load_commit_time, load_finish_time, \
             scan_bytes \
             FROM information_schema.loads \
             WHERE database_name = ?",
        );
        if selector.table.is_some() {
            sql.push_str(" AND table_name = ?");
        }
        if window.since.is_some() {
            sql.push_str(" AND create_time >= ?");
        }
        if window.until.is_some() {
            sql.push_str(" AND create_time < ?");
        }
        sql.push_str(" ORDER BY create_time ASC");
        if window.limit.is_some() {
            sql.push_str(" LIMIT ?");
        }
        sql
    }
}

#[async_trait]
impl LoadFetcher for SqlLoadFetcher {
    async fn fetch_loads(
        &self,
        selector: &LoadSelector,
        window: &FetchWindow,
    ) -> Result<Vec<RawLoadRow>, FetchError> {
        let sql = Self::build_query(selector, window);
        let mut query = sqlx::query_as::<_, RawLoadRow>(&sql).bind(&selector.database);
        if let Some(table) = &selector.table {
            query = query.bind(table);
        }
        if let Some(since) = window.since {
            query = query.bind(since.naive_utc());
        }
        if let Some(until) = window.until {
            query = query.bind(until.naive_utc());
        }
        if let Some(limit) = window.limit {
            query = query.bind(limit);
        }

        let rows = query.fetch_all(&self.pool).await?;
        crate::logging::log_fetch_operation(&selector.to_string(), "ok", Some(rows.len()));
        Ok(rows)
    }
}
