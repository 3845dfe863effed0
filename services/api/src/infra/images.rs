use std::path::PathBuf;

use anyhow::Context as _;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::domain::repository::ImageStore;
use crate::domain::types::ImagePayload;
use crate::error::ApiServiceError;

/// Parse a `data:image/<subtype>;base64,<payload>` URI.
///
/// Only png, jpeg, gif and webp subtypes are accepted; anything else,
/// including a bare base64 string without the scheme, is rejected.
pub fn parse_data_uri(uri: &str) -> Result<ImagePayload, ApiServiceError> {
    let rest = uri
        .strip_prefix("data:image/")
        .ok_or(ApiServiceError::InvalidImage)?;
    let (subtype, payload) = rest
        .split_once(";base64,")
        .ok_or(ApiServiceError::InvalidImage)?;
    let ext = match subtype {
        "png" => "png",
        "jpeg" | "jpg" => "jpg",
        "gif" => "gif",
        "webp" => "webp",
        _ => return Err(ApiServiceError::InvalidImage),
    };
    let data = BASE64
        .decode(payload)
        .map_err(|_| ApiServiceError::InvalidImage)?;
    if data.is_empty() {
        return Err(ApiServiceError::InvalidImage);
    }
    Ok(ImagePayload { ext, data })
}

/// Filesystem-backed image store rooted at the media directory.
#[derive(Clone)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageStore for FsImageStore {
    async fn store(&self, dir: &str, ext: &str, data: &[u8]) -> Result<String, ApiServiceError> {
        let relative = format!("{dir}/{}.{ext}", uuid::Uuid::new_v4());
        let full = self.root.join(&relative);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("create media directory")?;
        }
        tokio::fs::write(&full, data)
            .await
            .context("write image file")?;
        Ok(relative)
    }

    async fn remove(&self, path: &str) -> Result<(), ApiServiceError> {
        match tokio::fs::remove_file(self.root.join(path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e).context("remove image file").into()),
        }
    }
}
