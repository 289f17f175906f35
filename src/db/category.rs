use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::sqlite::{MarketStorage, from_json_column, now_rfc3339, parse_timestamp, to_json_column};
use crate::error::CelebrateError;
use crate::types::category::Category;
use crate::types::image::StoredImage;

const CATEGORY_COLUMNS: &str = "id, category_name, description, image, created_at, updated_at";

impl MarketStorage {
    /// Case-insensitive name lookup, used before insert.
    pub async fn category_name_taken(&self, name: &str) -> Result<bool, CelebrateError> {
        let rec: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM categories WHERE category_name_key = ?")
                .bind(category_name_key(name))
                .fetch_optional(self.pool())
                .await?;
        Ok(rec.is_some())
    }

    /// Insert a category. A name clash that slipped past the pre-check surfaces
    /// as `CategoryExists` via the unique index on the lowercased name.
    pub async fn insert_category(
        &self,
        name: &str,
        description: &str,
        image: Option<&StoredImage>,
    ) -> Result<Category, CelebrateError> {
        let image_json = image.map(to_json_column).transpose()?;
        let (_, now) = now_rfc3339();
        let res = sqlx::query(
            r#"
            INSERT INTO categories (
                category_name, category_name_key, description, image, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(category_name_key(name))
        .bind(description)
        .bind(image_json)
        .bind(&now)
        .bind(&now)
        .execute(self.pool())
        .await
        .map_err(CelebrateError::from);

        match res {
            Ok(done) => self.require_category(done.last_insert_rowid()).await,
            Err(e) if e.is_unique_violation() => Err(CelebrateError::CategoryExists),
            Err(e) => Err(e),
        }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, CelebrateError> {
        let rows = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id"
        ))
        .fetch_all(self.pool())
        .await?;
        rows.into_iter().map(Self::row_to_category).collect()
    }

    pub async fn count_categories(&self) -> Result<i64, CelebrateError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(self.pool())
            .await?;
        Ok(rec.0)
    }

    pub async fn get_category(&self, id: i64) -> Result<Option<Category>, CelebrateError> {
        let row = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        row.map(Self::row_to_category).transpose()
    }

    /// Exact (case-sensitive) name lookup, as the storefront filter does.
    pub async fn find_category_id_by_name(&self, name: &str) -> Result<Option<i64>, CelebrateError> {
        let rec: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM categories WHERE category_name = ? COLLATE BINARY")
                .bind(name)
                .fetch_optional(self.pool())
                .await?;
        Ok(rec.map(|r| r.0))
    }

    /// Returns whether a row was deleted.
    pub async fn delete_category(&self, id: i64) -> Result<bool, CelebrateError> {
        let done = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn require_category(&self, id: i64) -> Result<Category, CelebrateError> {
        self.get_category(id)
            .await?
            .ok_or(CelebrateError::NotFound("Category"))
    }

    fn row_to_category(row: SqliteRow) -> Result<Category, CelebrateError> {
        let image_json: Option<String> = row.try_get("image")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Category {
            id: row.try_get("id")?,
            category_name: row.try_get("category_name")?,
            description: row.try_get("description")?,
            image: image_json.as_deref().map(from_json_column).transpose()?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}

/// Unicode-aware case folding, so `Été` and `été` collide.
fn category_name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
