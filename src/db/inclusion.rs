use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::sqlite::{MarketStorage, from_json_column, now_rfc3339, parse_timestamp, to_json_column};
use crate::error::CelebrateError;
use crate::types::inclusion::{Inclusion, InclusionPoint, InclusionWithPackage};

const INCLUSION_COLUMNS: &str = "i.id, i.package_id, i.points, i.created_at, i.updated_at";

impl MarketStorage {
    pub async fn insert_inclusion(
        &self,
        package_id: i64,
        points: &[InclusionPoint],
    ) -> Result<Inclusion, CelebrateError> {
        let points_json = to_json_column(&points)?;
        let (_, now) = now_rfc3339();
        let done = sqlx::query(
            "INSERT INTO inclusions (package_id, points, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(package_id)
        .bind(points_json)
        .bind(&now)
        .bind(&now)
        .execute(self.pool())
        .await?;

        self.get_inclusion(done.last_insert_rowid())
            .await?
            .ok_or(CelebrateError::NotFound("Inclusion"))
    }

    /// All inclusions with the referenced package name, oldest first.
    pub async fn list_inclusions(&self) -> Result<Vec<InclusionWithPackage>, CelebrateError> {
        let rows = sqlx::query(&format!(
            r#"SELECT {INCLUSION_COLUMNS}, p.package_name
               FROM inclusions i LEFT JOIN packages p ON p.id = i.package_id
               ORDER BY i.id"#
        ))
        .fetch_all(self.pool())
        .await?;
        rows.into_iter()
            .map(Self::row_to_inclusion_with_package)
            .collect()
    }

    /// One inclusion with its package name, in the listing's shape.
    pub async fn get_inclusion_with_package(
        &self,
        id: i64,
    ) -> Result<Option<InclusionWithPackage>, CelebrateError> {
        let row = sqlx::query(&format!(
            r#"SELECT {INCLUSION_COLUMNS}, p.package_name
               FROM inclusions i LEFT JOIN packages p ON p.id = i.package_id
               WHERE i.id = ?"#
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        row.map(Self::row_to_inclusion_with_package).transpose()
    }

    pub async fn list_inclusions_for_package(
        &self,
        package_id: i64,
    ) -> Result<Vec<Inclusion>, CelebrateError> {
        let rows = sqlx::query(&format!(
            "SELECT {INCLUSION_COLUMNS} FROM inclusions i WHERE i.package_id = ? ORDER BY i.id"
        ))
        .bind(package_id)
        .fetch_all(self.pool())
        .await?;
        rows.into_iter().map(Self::row_to_inclusion).collect()
    }

    pub async fn get_inclusion(&self, id: i64) -> Result<Option<Inclusion>, CelebrateError> {
        let row = sqlx::query(&format!(
            "SELECT {INCLUSION_COLUMNS} FROM inclusions i WHERE i.id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        row.map(Self::row_to_inclusion).transpose()
    }

    /// Returns whether a row was deleted.
    pub async fn delete_inclusion(&self, id: i64) -> Result<bool, CelebrateError> {
        let done = sqlx::query("DELETE FROM inclusions WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(done.rows_affected() > 0)
    }

    fn row_to_inclusion_with_package(
        row: SqliteRow,
    ) -> Result<InclusionWithPackage, CelebrateError> {
        let package_name: Option<String> = row.try_get("package_name")?;
        Ok(InclusionWithPackage {
            inclusion: Self::row_to_inclusion(row)?,
            package_name,
        })
    }

    fn row_to_inclusion(row: SqliteRow) -> Result<Inclusion, CelebrateError> {
        let points: String = row.try_get("points")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Inclusion {
            id: row.try_get("id")?,
            package_id: row.try_get("package_id")?,
            points: from_json_column(&points)?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}
