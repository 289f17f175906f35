use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RecordRef, Validate, blank_ref};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InclusionPoint {
    #[serde(rename = "IconName", default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
    #[serde(rename = "Point")]
    pub point: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddInclusionRequest {
    #[serde(rename = "packageId")]
    pub package_id: Option<RecordRef>,
    /// May be empty; a package can also collect several inclusion records.
    pub points: Option<Vec<InclusionPoint>>,
}

impl Validate for AddInclusionRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank_ref(&self.package_id) {
            missing.push("packageId");
        }
        if self.points.is_none() {
            missing.push("points");
        }
        missing
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inclusion {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(rename = "PackageId")]
    pub package_id: i64,
    #[serde(rename = "Points")]
    pub points: Vec<InclusionPoint>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Inclusion listing row with the package reference resolved for display.
#[derive(Debug, Clone, Serialize)]
pub struct InclusionWithPackage {
    #[serde(flatten)]
    pub inclusion: Inclusion,
    /// `None` when the referenced package no longer exists.
    #[serde(rename = "PackageName")]
    pub package_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InclusionCreated {
    pub message: &'static str,
    pub inclusion: Inclusion,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteInclusionRequest {
    pub id: Option<RecordRef>,
}

impl Validate for DeleteInclusionRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        if blank_ref(&self.id) { vec!["id"] } else { Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_points_list_is_not_missing() {
        let req: AddInclusionRequest =
            serde_json::from_value(json!({ "packageId": 4, "points": [] })).unwrap();
        assert!(req.missing_fields().is_empty());
    }

    #[test]
    fn icon_name_is_optional() {
        let req: AddInclusionRequest = serde_json::from_value(json!({
            "packageId": "4",
            "points": [{ "Point": "Welcome drink" }, { "IconName": "cake", "Point": "Cake" }]
        }))
        .unwrap();
        let points = req.points.unwrap();
        assert_eq!(points[0].icon_name, None);
        assert_eq!(points[1].icon_name.as_deref(), Some("cake"));
    }
}
