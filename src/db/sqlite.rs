use crate::db::schema::SQLITE_INIT;
use crate::error::CelebrateError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

/// Injectable storage handle shared by every handler. Cloning is cheap.
#[derive(Clone)]
pub struct MarketStorage {
    pool: SqlitePool,
}

impl MarketStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and apply the schema.
    pub async fn connect(database_url: &str) -> Result<Self, CelebrateError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        info!(database_url = %database_url, "storage ready");
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), CelebrateError> {
        // execute multiple statements one at a time (sqlx::query runs a single statement)
        for stmt in SQLITE_INIT.split(';') {
            let s = strip_sql_comments(stmt);
            if s.is_empty() {
                continue;
            }
            sqlx::query(&s).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn strip_sql_comments(stmt: &str) -> String {
    stmt.lines()
        .map(|line| line.split_once("--").map_or(line, |(code, _)| code))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

pub(crate) fn now_rfc3339() -> (DateTime<Utc>, String) {
    let now = Utc::now();
    (now, now.to_rfc3339())
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, CelebrateError> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
        .with_timezone(&Utc))
}

pub(crate) fn to_json_column<T: Serialize>(value: &T) -> Result<String, CelebrateError> {
    Ok(serde_json::to_string(value)?)
}

pub(crate) fn from_json_column<T: DeserializeOwned>(raw: &str) -> Result<T, CelebrateError> {
    serde_json::from_str(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)).into())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_are_stripped_from_statements() {
        let s = strip_sql_comments("\n  -- leading\n CREATE TABLE t (a TEXT) -- trailing\n");
        assert_eq!(s, "CREATE TABLE t (a TEXT)");
        assert!(strip_sql_comments("\n -- only a comment\n").is_empty());
    }

    #[tokio::test]
    async fn schema_is_idempotent() {
        let storage = test_support::memory_storage().await;
        storage.init_schema().await.unwrap();
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
             ('categories', 'packages', 'inclusions', 'users', 'sessions')",
        )
        .fetch_one(storage.pool())
        .await
        .unwrap();
        assert_eq!(count, 5);
    }
}
