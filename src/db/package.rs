use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::sqlite::{MarketStorage, from_json_column, now_rfc3339, parse_timestamp, to_json_column};
use crate::error::CelebrateError;
use crate::types::package::{NewPackage, Package};

const PACKAGE_COLUMNS: &str = "id, category_id, package_name, package_desc, price, \
    discount_price, package_review, experience, location, policy, need_to_know, images, \
    created_at, updated_at";

impl MarketStorage {
    pub async fn insert_package(&self, pkg: NewPackage) -> Result<Package, CelebrateError> {
        let policy = to_json_column(&pkg.policy)?;
        let need_to_know = to_json_column(&pkg.need_to_know)?;
        let images = to_json_column(&pkg.images)?;
        let (_, now) = now_rfc3339();

        let done = sqlx::query(
            r#"
            INSERT INTO packages (
                category_id, package_name, package_desc, price, discount_price,
                package_review, experience, location, policy, need_to_know, images,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(pkg.category_id)
        .bind(pkg.package_name)
        .bind(pkg.package_desc)
        .bind(pkg.price)
        .bind(pkg.discount_price)
        .bind(pkg.package_review)
        .bind(pkg.experience)
        .bind(pkg.location)
        .bind(policy)
        .bind(need_to_know)
        .bind(images)
        .bind(&now)
        .bind(&now)
        .execute(self.pool())
        .await?;

        self.get_package(done.last_insert_rowid())
            .await?
            .ok_or(CelebrateError::NotFound("Package"))
    }

    pub async fn list_packages(&self) -> Result<Vec<Package>, CelebrateError> {
        let rows = sqlx::query(&format!("SELECT {PACKAGE_COLUMNS} FROM packages ORDER BY id"))
            .fetch_all(self.pool())
            .await?;
        rows.into_iter().map(Self::row_to_package).collect()
    }

    pub async fn list_packages_in_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<Package>, CelebrateError> {
        let rows = sqlx::query(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages WHERE category_id = ? ORDER BY id"
        ))
        .bind(category_id)
        .fetch_all(self.pool())
        .await?;
        rows.into_iter().map(Self::row_to_package).collect()
    }

    pub async fn get_package(&self, id: i64) -> Result<Option<Package>, CelebrateError> {
        let row = sqlx::query(&format!("SELECT {PACKAGE_COLUMNS} FROM packages WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.map(Self::row_to_package).transpose()
    }

    pub async fn package_exists(&self, id: i64) -> Result<bool, CelebrateError> {
        let rec: Option<(i64,)> = sqlx::query_as("SELECT id FROM packages WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(rec.is_some())
    }

    fn row_to_package(row: SqliteRow) -> Result<Package, CelebrateError> {
        let policy: String = row.try_get("policy")?;
        let need_to_know: String = row.try_get("need_to_know")?;
        let images: String = row.try_get("images")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Package {
            id: row.try_get("id")?,
            category_id: row.try_get("category_id")?,
            package_name: row.try_get("package_name")?,
            package_desc: row.try_get("package_desc")?,
            price: row.try_get("price")?,
            discount_price: row.try_get("discount_price")?,
            package_review: row.try_get("package_review")?,
            experience: row.try_get("experience")?,
            location: row.try_get("location")?,
            policy: from_json_column(&policy)?,
            need_to_know: from_json_column(&need_to_know)?,
            images: from_json_column(&images)?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::db::sqlite::test_support::memory_storage;
    use crate::types::image::StoredImage;
    use crate::types::package::{NeedToKnow, NewPackage, PolicyPoint};

    fn sample(category_id: i64, name: &str) -> NewPackage {
        NewPackage {
            category_id,
            package_name: name.to_string(),
            package_desc: "desc".into(),
            price: "1000".into(),
            discount_price: "900".into(),
            package_review: "4.8".into(),
            experience: "Evening".into(),
            location: "Mumbai".into(),
            policy: vec![
                PolicyPoint { point: "No refunds".into() },
                PolicyPoint { point: "Arrive early".into() },
            ],
            need_to_know: vec![NeedToKnow { name: "Bring ID".into() }],
            images: vec![StoredImage {
                name: "package-1-abc.jpg".into(),
                content_type: "image/jpeg".into(),
                description: String::new(),
                url: "/uploads/package-1-abc.jpg".into(),
            }],
        }
    }

    #[tokio::test]
    async fn embedded_lists_keep_their_order() {
        let storage = memory_storage().await;
        let pkg = storage.insert_package(sample(1, "Gala")).await.unwrap();
        let loaded = storage.get_package(pkg.id).await.unwrap().unwrap();
        assert_eq!(loaded.policy[0].point, "No refunds");
        assert_eq!(loaded.policy[1].point, "Arrive early");
        assert_eq!(loaded.images[0].url, "/uploads/package-1-abc.jpg");
        assert_eq!(loaded, pkg);
    }

    #[tokio::test]
    async fn category_filter_only_returns_matching_rows() {
        let storage = memory_storage().await;
        storage.insert_package(sample(1, "A")).await.unwrap();
        storage.insert_package(sample(2, "B")).await.unwrap();
        storage.insert_package(sample(1, "C")).await.unwrap();
        let names: Vec<_> = storage
            .list_packages_in_category(1)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.package_name)
            .collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(storage.list_packages().await.unwrap().len(), 3);
    }
}
