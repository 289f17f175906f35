use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::image::{ImageOutcome, ImageRemoval, ImageUpload, StoredImage};
use super::{Validate, blank};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddCategoryRequest {
    #[serde(rename = "CategoryName")]
    pub category_name: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Image", default)]
    pub image: Option<ImageUpload>,
}

impl Validate for AddCategoryRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        if blank(&self.category_name) {
            vec!["CategoryName"]
        } else {
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(rename = "CategoryName")]
    pub category_name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Image")]
    pub image: Option<StoredImage>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CategoryCreated {
    pub message: &'static str,
    pub category: Category,
    /// Present only when the request carried an image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageOutcome>,
}

#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct CategoryEnvelope {
    pub category: Category,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCategoryQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryDeleted {
    pub message: &'static str,
    pub image: ImageRemoval,
}
