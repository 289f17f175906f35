use serde::{Deserialize, Serialize};

/// Image as uploaded by the admin forms.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageUpload {
    pub name: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    /// Bare base64 or a `data:<mime>;base64,` URL. The package form sends it as `url`.
    #[serde(rename = "base64Data", alias = "url")]
    pub base64_data: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Image persisted under the uploads directory, embedded in its owner record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredImage {
    pub name: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    Stored,
    Failed,
}

/// Per-image result so callers can tell a full upload from a partial one.
#[derive(Debug, Clone, Serialize)]
pub struct ImageOutcome {
    pub index: usize,
    pub status: ImageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageOutcome {
    pub fn stored(index: usize, image: &StoredImage) -> Self {
        Self {
            index,
            status: ImageStatus::Stored,
            url: Some(image.url.clone()),
            error: None,
        }
    }

    pub fn failed(index: usize, error: impl ToString) -> Self {
        Self {
            index,
            status: ImageStatus::Failed,
            url: None,
            error: Some(error.to_string()),
        }
    }
}

/// What happened to a record's backing file on delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRemoval {
    /// The record had no image.
    None,
    Removed,
    /// The record pointed at a file that was already gone.
    Missing,
    Failed,
}
