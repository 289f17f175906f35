use std::path::{Path, PathBuf};

use base64::Engine;
use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::CelebrateError;
use crate::types::image::{ImageRemoval, ImageUpload, StoredImage};

/// Owner kind, used as the generated filename prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Category,
    Package,
}

impl ImageKind {
    fn prefix(&self) -> &'static str {
        match self {
            ImageKind::Category => "category",
            ImageKind::Package => "package",
        }
    }
}

/// Writes decoded uploads under `root` and hands out public URLs under `public_prefix`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    public_prefix: String,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    pub async fn save(
        &self,
        kind: ImageKind,
        upload: &ImageUpload,
    ) -> Result<StoredImage, CelebrateError> {
        let bytes = decode_payload(&upload.base64_data)?;

        fs::create_dir_all(&self.root).await?;
        let file_name = generate_file_name(kind, &upload.name);
        fs::write(self.root.join(&file_name), &bytes).await?;

        info!(file = %file_name, bytes = bytes.len(), "image stored");
        Ok(StoredImage {
            url: format!("{}/{}", self.public_prefix, file_name),
            name: file_name,
            content_type: upload.content_type.clone(),
            description: upload.description.clone().unwrap_or_default(),
        })
    }

    /// Best-effort removal of the file behind a public URL.
    pub async fn remove(&self, url: &str) -> ImageRemoval {
        let Some(file_name) = url.rsplit('/').next().filter(|n| is_plain_file_name(n)) else {
            warn!(url = %url, "refusing to remove image outside the upload directory");
            return ImageRemoval::Failed;
        };

        match fs::remove_file(self.root.join(file_name)).await {
            Ok(()) => {
                info!(file = %file_name, "image removed");
                ImageRemoval::Removed
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(file = %file_name, "image already gone");
                ImageRemoval::Missing
            }
            Err(e) => {
                warn!(file = %file_name, error = %e, "failed to remove image");
                ImageRemoval::Failed
            }
        }
    }
}

/// Strip an optional `data:<mime>;base64,` header and decode the rest.
fn decode_payload(payload: &str) -> Result<Vec<u8>, CelebrateError> {
    let encoded = payload
        .rsplit_once(";base64,")
        .map_or(payload, |(_, data)| data)
        .trim();
    if encoded.is_empty() {
        return Err(CelebrateError::ImagePayload("empty image data".to_string()));
    }
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| CelebrateError::ImagePayload(format!("invalid base64 data: {e}")))
}

/// `{kind}-{unix_millis}-{6 random chars}.{ext}`
fn generate_file_name(kind: ImageKind, original_name: &str) -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(6)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!(
        "{}-{}-{}.{}",
        kind.prefix(),
        Utc::now().timestamp_millis(),
        suffix,
        extension_of(original_name)
    )
}

fn extension_of(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "jpg".to_string())
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
