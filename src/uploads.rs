use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::domain::errors::DomainError;

/// URL prefix the upload directory is served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

const IMAGES_DIR: &str = "images";

/// Maps an accepted image content type to the extension it is stored with.
/// The filename's own extension is only consulted for `image/jpeg`, to keep `.jpeg`.
pub fn image_extension(content_type: &str, filename: Option<&str>) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/jpeg" | "image/jpg" => {
            let keeps_jpeg = filename
                .and_then(|f| Path::new(f).extension())
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("jpeg"));
            Some(if keeps_jpeg { "jpeg" } else { "jpg" })
        }
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct StoredImage {
    pub filename: String,
    pub url: String,
}

/// Writes uploaded images under `<root>/images` with random names.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    /// Fails once `received` exceeds the configured limit.
    pub fn check_size(&self, received: usize) -> Result<(), DomainError> {
        if received > self.max_bytes {
            return Err(DomainError::InvalidInput(format!(
                "File too large (max {} bytes)",
                self.max_bytes
            )));
        }
        Ok(())
    }

    pub async fn save_image(&self, extension: &str, bytes: &[u8]) -> Result<StoredImage, DomainError> {
        if bytes.is_empty() {
            return Err(DomainError::InvalidInput("Uploaded file is empty".to_string()));
        }
        self.check_size(bytes.len())?;

        let dir = self.root.join(IMAGES_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| DomainError::Internal(format!("creating {}: {}", dir.display(), e)))?;

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let path = dir.join(&filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::Internal(format!("writing {}: {}", path.display(), e)))?;
        log::info!("stored upload {} ({} bytes)", path.display(), bytes.len());

        Ok(StoredImage {
            url: format!("{}/{}/{}", PUBLIC_PREFIX, IMAGES_DIR, filename),
            filename,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("catalogue-uploads-{}", Uuid::new_v4()))
    }

    #[test]
    fn accepted_image_types() {
        assert_eq!(image_extension("image/png", None), Some("png"));
        assert_eq!(image_extension("image/webp", Some("a.webp")), Some("webp"));
        assert_eq!(image_extension("IMAGE/GIF", None), Some("gif"));
        assert_eq!(image_extension("image/jpeg", Some("photo.JPEG")), Some("jpeg"));
        assert_eq!(image_extension("image/jpeg; charset=binary", Some("photo.jpg")), Some("jpg"));
    }

    #[test]
    fn other_types_are_rejected() {
        assert_eq!(image_extension("text/plain", Some("notes.png")), None);
        assert_eq!(image_extension("image/svg+xml", None), None);
        assert_eq!(image_extension("application/octet-stream", None), None);
    }

    #[test]
    fn size_limit_is_inclusive() {
        let store = UploadStore::new(temp_root(), 4);
        assert!(store.check_size(4).is_ok());
        assert!(matches!(store.check_size(5), Err(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn save_image_writes_under_images() {
        let root = temp_root();
        let store = UploadStore::new(&root, 1024);

        let stored = store.save_image("png", b"\x89PNG").await.expect("save failed");

        assert!(stored.filename.ends_with(".png"));
        assert_eq!(stored.url, format!("/uploads/images/{}", stored.filename));
        let written = std::fs::read(root.join("images").join(&stored.filename)).unwrap();
        assert_eq!(written, b"\x89PNG");
        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let store = UploadStore::new(temp_root(), 1024);
        assert!(store.save_image("png", b"").await.is_err());
    }
}
