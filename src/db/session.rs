use chrono::{DateTime, Utc};

use super::models::DbSession;
use super::sqlite::{MarketStorage, now_rfc3339};
use crate::error::CelebrateError;

impl MarketStorage {
    pub async fn insert_session(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<(), CelebrateError> {
        let (_, now) = now_rfc3339();
        sqlx::query(
            "INSERT INTO sessions (token, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at.timestamp())
        .bind(now)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Load a session by token, filtering out expired rows at query level.
    pub async fn load_session(&self, token: &str) -> Result<Option<DbSession>, CelebrateError> {
        let rec: Option<(String, i64, i64)> = sqlx::query_as(
            "SELECT token, user_id, expires_at FROM sessions WHERE token = ? AND expires_at > ?",
        )
        .bind(token)
        .bind(Utc::now().timestamp())
        .fetch_optional(self.pool())
        .await?;

        rec.map(|(token, user_id, expires_at)| -> Result<DbSession, CelebrateError> {
            let expires_at = DateTime::from_timestamp(expires_at, 0).ok_or_else(|| {
                sqlx::Error::Decode(format!("session expiry out of range: {expires_at}").into())
            })?;
            Ok(DbSession {
                token,
                user_id,
                expires_at,
            })
        })
        .transpose()
    }

    pub async fn delete_session(&self, token: &str) -> Result<(), CelebrateError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Bulk-delete every session past its expiry. Returns the number removed.
    pub async fn delete_expired_sessions(&self) -> Result<u64, CelebrateError> {
        let done = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(Utc::now().timestamp())
            .execute(self.pool())
            .await?;
        Ok(done.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::db::sqlite::test_support::memory_storage;

    #[tokio::test]
    async fn expired_sessions_are_invisible_and_swept() {
        let storage = memory_storage().await;
        let now = Utc::now();
        storage.insert_session("live", 1, now + Duration::hours(1)).await.unwrap();
        storage.insert_session("stale", 1, now - Duration::hours(1)).await.unwrap();

        assert_eq!(storage.load_session("live").await.unwrap().unwrap().user_id, 1);
        assert!(storage.load_session("stale").await.unwrap().is_none());

        assert_eq!(storage.delete_expired_sessions().await.unwrap(), 1);
        assert!(storage.load_session("live").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn deleted_session_no_longer_loads() {
        let storage = memory_storage().await;
        storage
            .insert_session("tok", 3, Utc::now() + Duration::hours(24))
            .await
            .unwrap();
        storage.delete_session("tok").await.unwrap();
        assert!(storage.load_session("tok").await.unwrap().is_none());
    }
}
