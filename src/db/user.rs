use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::models::{DbUser, NewUser};
use super::sqlite::{MarketStorage, now_rfc3339, parse_timestamp};
use crate::error::CelebrateError;
use crate::types::auth::UserType;

const USER_COLUMNS: &str = "id, contact_num, username, email, hashed_pass, salt_pass, user_type, \
    created_at, updated_at";

impl MarketStorage {
    /// Insert a user. Any UNIQUE clash (contact number, username, email) maps to `UserExists`.
    pub async fn insert_user(&self, user: NewUser) -> Result<DbUser, CelebrateError> {
        let (_, now) = now_rfc3339();
        let res = sqlx::query(
            r#"
            INSERT INTO users (
                contact_num, username, email, hashed_pass, salt_pass, user_type,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.contact_num)
        .bind(user.username)
        .bind(user.email)
        .bind(user.hashed_pass)
        .bind(user.salt_pass)
        .bind(user.user_type.as_str())
        .bind(&now)
        .bind(&now)
        .execute(self.pool())
        .await
        .map_err(CelebrateError::from);

        match res {
            Ok(done) => self
                .get_user(done.last_insert_rowid())
                .await?
                .ok_or(CelebrateError::UserNotFound),
            Err(e) if e.is_unique_violation() => Err(CelebrateError::UserExists),
            Err(e) => Err(e),
        }
    }

    pub async fn contact_num_taken(&self, contact_num: i64) -> Result<bool, CelebrateError> {
        let rec: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE contact_num = ?")
            .bind(contact_num)
            .fetch_optional(self.pool())
            .await?;
        Ok(rec.is_some())
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<DbUser>, CelebrateError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.map(Self::row_to_user).transpose()
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<DbUser>, CelebrateError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(self.pool())
            .await?;
        row.map(Self::row_to_user).transpose()
    }

    pub async fn list_users(&self) -> Result<Vec<DbUser>, CelebrateError> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .fetch_all(self.pool())
            .await?;
        rows.into_iter().map(Self::row_to_user).collect()
    }

    pub async fn any_user_of_type(&self, user_type: UserType) -> Result<bool, CelebrateError> {
        let rec: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE user_type = ? LIMIT 1")
            .bind(user_type.as_str())
            .fetch_optional(self.pool())
            .await?;
        Ok(rec.is_some())
    }

    fn row_to_user(row: SqliteRow) -> Result<DbUser, CelebrateError> {
        let user_type_raw: String = row.try_get("user_type")?;
        let user_type = UserType::parse(&user_type_raw).ok_or_else(|| {
            sqlx::Error::Decode(format!("unknown user_type `{user_type_raw}`").into())
        })?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(DbUser {
            id: row.try_get("id")?,
            contact_num: row.try_get("contact_num")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            hashed_pass: row.try_get("hashed_pass")?,
            salt_pass: row.try_get("salt_pass")?,
            user_type,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::db::models::NewUser;
    use crate::db::sqlite::test_support::memory_storage;
    use crate::error::CelebrateError;
    use crate::types::auth::UserType;

    fn user(contact: i64, name: &str, email: &str) -> NewUser {
        NewUser {
            contact_num: contact,
            username: name.into(),
            email: email.into(),
            hashed_pass: "$2b$04$hash".into(),
            salt_pass: "salt".into(),
            user_type: UserType::Admin,
        }
    }

    #[tokio::test]
    async fn duplicate_email_maps_to_user_exists() {
        let storage = memory_storage().await;
        storage.insert_user(user(1, "a", "a@x.io")).await.unwrap();
        let err = storage.insert_user(user(2, "b", "a@x.io")).await.unwrap_err();
        assert!(matches!(err, CelebrateError::UserExists));
    }

    #[tokio::test]
    async fn lookup_by_email_and_role() {
        let storage = memory_storage().await;
        assert!(!storage.any_user_of_type(UserType::Admin).await.unwrap());
        let stored = storage.insert_user(user(9876543210, "root", "root@x.io")).await.unwrap();
        let found = storage.find_user_by_email("root@x.io").await.unwrap().unwrap();
        assert_eq!(found, stored);
        assert!(storage.any_user_of_type(UserType::Admin).await.unwrap());
        assert!(!storage.any_user_of_type(UserType::User).await.unwrap());
        assert!(storage.contact_num_taken(9876543210).await.unwrap());
    }
}
