use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::image::{ImageOutcome, ImageUpload, StoredImage};
use super::{RecordRef, Validate, blank, blank_ref};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyPoint {
    pub point: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NeedToKnow {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddPackageRequest {
    #[serde(rename = "CategoryId")]
    pub category_id: Option<RecordRef>,
    #[serde(rename = "PackageName")]
    pub package_name: Option<String>,
    #[serde(rename = "PackageDesc")]
    pub package_desc: Option<String>,
    #[serde(rename = "Price")]
    pub price: Option<String>,
    #[serde(rename = "DiscountPrice")]
    pub discount_price: Option<String>,
    #[serde(rename = "PackageReview")]
    pub package_review: Option<String>,
    #[serde(rename = "Experience")]
    pub experience: Option<String>,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Policy", default)]
    pub policy: Vec<PolicyPoint>,
    #[serde(rename = "NeedToKnow", default)]
    pub need_to_know: Vec<NeedToKnow>,
    #[serde(rename = "Images", default)]
    pub images: Vec<ImageUpload>,
}

impl Validate for AddPackageRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        let text_fields = [
            ("PackageName", &self.package_name),
            ("PackageDesc", &self.package_desc),
            ("Price", &self.price),
            ("DiscountPrice", &self.discount_price),
            ("PackageReview", &self.package_review),
            ("Experience", &self.experience),
            ("Location", &self.location),
        ];
        let mut missing = Vec::new();
        if blank_ref(&self.category_id) {
            missing.push("CategoryId");
        }
        missing.extend(
            text_fields
                .into_iter()
                .filter(|(_, value)| blank(value))
                .map(|(name, _)| name),
        );
        missing
    }
}

/// Fully validated package fields, ready for insert.
#[derive(Debug, Clone)]
pub struct NewPackage {
    pub category_id: i64,
    pub package_name: String,
    pub package_desc: String,
    pub price: String,
    pub discount_price: String,
    pub package_review: String,
    pub experience: String,
    pub location: String,
    pub policy: Vec<PolicyPoint>,
    pub need_to_know: Vec<NeedToKnow>,
    pub images: Vec<StoredImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Package {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(rename = "CategoryId")]
    pub category_id: i64,
    #[serde(rename = "PackageName")]
    pub package_name: String,
    #[serde(rename = "PackageDesc")]
    pub package_desc: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "DiscountPrice")]
    pub discount_price: String,
    #[serde(rename = "PackageReview")]
    pub package_review: String,
    #[serde(rename = "Experience")]
    pub experience: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Policy")]
    pub policy: Vec<PolicyPoint>,
    #[serde(rename = "NeedToKnow")]
    pub need_to_know: Vec<NeedToKnow>,
    #[serde(rename = "Images")]
    pub images: Vec<StoredImage>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PackageCreated {
    pub message: &'static str,
    pub success: bool,
    pub package: Package,
    pub images: Vec<ImageOutcome>,
}

#[derive(Debug, Serialize)]
pub struct PackageList {
    pub packages: Vec<Package>,
    pub count: usize,
}

/// Flattened card the storefront renders.
#[derive(Debug, Clone, Serialize)]
pub struct StorefrontPackage {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    #[serde(rename = "discountPrice")]
    pub discount_price: String,
    pub category: i64,
    pub image: String,
    pub review: String,
    pub experience: String,
    pub location: String,
}

impl StorefrontPackage {
    pub fn from_package(pkg: Package, placeholder: &str) -> Self {
        let image = pkg
            .images
            .first()
            .map(|img| img.url.clone())
            .unwrap_or_else(|| placeholder.to_string());
        Self {
            id: pkg.id,
            name: pkg.package_name,
            description: pkg.package_desc,
            price: pkg.price,
            discount_price: pkg.discount_price,
            category: pkg.category_id,
            image,
            review: pkg.package_review,
            experience: pkg.experience,
            location: pkg.location,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StorefrontQuery {
    pub category: Option<String>,
}
