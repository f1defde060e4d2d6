//! # Upload service
//!
//! Stores images posted as `multipart/form-data` under
//! `UPLOAD_DIR/<category>/<uuid>.<ext>` and describes them with
//! [`UploadedFile`]. The directory tree is served read-only by `actix-files`
//! under [`UploadConfig::public_path`].

use std::path::{Path, PathBuf};

use actix_multipart::{Field, Multipart};
use futures_util::TryStreamExt;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use singleton_macro::service;

use crate::config::UploadConfig;
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::domain::models::uploads::{UploadCategory, UploadedFile};

const ACCEPTED_TYPES: [(&str, &str); 4] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

/// File extension for an accepted image content type.
pub fn extension_for(mime_type: &str) -> Option<&'static str> {
    ACCEPTED_TYPES
        .iter()
        .find(|(accepted, _)| accepted.eq_ignore_ascii_case(mime_type))
        .map(|(_, ext)| *ext)
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    let ext = ext.to_ascii_lowercase();
    let ext = if ext == "jpeg" { "jpg".to_string() } else { ext };
    ACCEPTED_TYPES
        .iter()
        .find(|(_, known)| *known == ext)
        .map(|(mime, _)| *mime)
}

/// Client file name reduced to its last path segment.
pub fn sanitize_original_name(raw: Option<&str>) -> String {
    let name = raw
        .unwrap_or_default()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() {
        return "upload".to_string();
    }
    name.chars().filter(|c| !c.is_control()).take(255).collect()
}

/// Only generated names (`<uuid>.<ext>`) may be looked up on disk.
fn is_safe_file_name(file_name: &str) -> bool {
    !file_name.is_empty()
        && file_name.len() <= 100
        && !file_name.starts_with('.')
        && !file_name.contains("..")
        && file_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
}

/// Where uploads live on disk and how they are addressed.
///
/// The default reads [`UploadConfig`].
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub root: PathBuf,
    pub public_path: String,
    pub max_file_size: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            root: UploadConfig::root_dir(),
            public_path: UploadConfig::public_path(),
            max_file_size: UploadConfig::max_file_size(),
        }
    }
}

#[service(name = "upload")]
pub struct UploadService {
    settings: UploadSettings,
}

impl UploadService {
    fn category_dir(&self, category: UploadCategory) -> PathBuf {
        self.settings.root.join(category.dir_name())
    }

    fn public_url(&self, category: UploadCategory, file_name: &str) -> String {
        format!("{}/{}/{}", self.settings.public_path, category.dir_name(), file_name)
    }

    /// Creates one sub-directory per upload category.
    pub async fn ensure_directories(&self) -> AppResult<()> {
        for category in UploadCategory::ALL {
            let dir = self.category_dir(category);
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("cannot create {}", dir.display()))?;
        }
        log::info!("Upload directory ready at {}", self.settings.root.display());
        Ok(())
    }

    /// Stores the first file part of `payload`.
    pub async fn store_first(
        &self,
        category: UploadCategory,
        mut payload: Multipart,
    ) -> AppResult<UploadedFile> {
        while let Some(field) = payload
            .try_next()
            .await
            .map_err(|e| AppError::ValidationError(format!("malformed upload: {}", e)))?
        {
            let is_file = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .is_some();
            if is_file {
                return self.store(category, field).await;
            }
        }

        Err(AppError::ValidationError("no file was uploaded".to_string()))
    }

    /// Streams `field` to disk, enforcing the image type and the size limit.
    pub async fn store(&self, category: UploadCategory, mut field: Field) -> AppResult<UploadedFile> {
        let mime_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();
        let ext = extension_for(&mime_type).ok_or_else(|| {
            AppError::ValidationError("only JPEG, PNG, WEBP and GIF images are allowed".to_string())
        })?;

        let original_name = sanitize_original_name(
            field.content_disposition().and_then(|cd| cd.get_filename()),
        );
        let file_name = format!("{}.{}", Uuid::new_v4(), ext);
        let path = self.category_dir(category).join(&file_name);

        let mut file = tokio::fs::File::create(&path)
            .await
            .context("cannot create upload file")?;

        let mut size: usize = 0;
        loop {
            let chunk = match field.try_next().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => {
                    discard(&path).await;
                    return Err(AppError::ValidationError(format!("upload interrupted: {}", e)));
                }
            };

            size += chunk.len();
            if size > self.settings.max_file_size {
                drop(file);
                discard(&path).await;
                return Err(AppError::ValidationError(format!(
                    "file exceeds the {} MB limit",
                    self.settings.max_file_size / (1024 * 1024)
                )));
            }

            if let Err(e) = file.write_all(&chunk).await {
                discard(&path).await;
                return Err(e).context("cannot write upload");
            }
        }

        if size == 0 {
            drop(file);
            discard(&path).await;
            return Err(AppError::ValidationError("uploaded file is empty".to_string()));
        }
        file.flush().await.context("cannot write upload")?;

        log::info!("Stored {} upload {} ({} bytes)", category.dir_name(), file_name, size);

        Ok(UploadedFile {
            url: self.public_url(category, &file_name),
            file_name,
            original_name,
            mime_type,
            size: size as i64,
        })
    }

    pub async fn exists(&self, category: UploadCategory, file_name: &str) -> AppResult<bool> {
        if !is_safe_file_name(file_name) {
            return Ok(false);
        }
        tokio::fs::try_exists(self.category_dir(category).join(file_name))
            .await
            .context("cannot inspect upload directory")
    }

    /// Describes a previously stored file, `None` when it is not on disk.
    pub async fn metadata_for(
        &self,
        category: UploadCategory,
        file_name: &str,
    ) -> AppResult<Option<UploadedFile>> {
        if !self.exists(category, file_name).await? {
            return Ok(None);
        }

        let path = self.category_dir(category).join(file_name);
        let metadata = tokio::fs::metadata(&path)
            .await
            .with_context(|| format!("cannot read {}", file_name))?;
        let mime_type = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(mime_for_extension)
            .unwrap_or("application/octet-stream");

        Ok(Some(UploadedFile {
            file_name: file_name.to_string(),
            original_name: file_name.to_string(),
            url: self.public_url(category, file_name),
            mime_type: mime_type.to_string(),
            size: metadata.len() as i64,
        }))
    }
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        log::warn!("Failed to remove partial upload {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_at(root: PathBuf) -> UploadService {
        UploadService {
            settings: UploadSettings {
                root,
                public_path: "/uploads".to_string(),
                max_file_size: 1024,
            },
        }
    }

    #[test]
    fn test_extension_mapping() {
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("IMAGE/PNG"), Some("png"));
        assert_eq!(extension_for("application/pdf"), None);
        assert_eq!(mime_for_extension("JPEG"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("exe"), None);
    }

    #[test]
    fn test_original_name_is_reduced_to_basename() {
        assert_eq!(sanitize_original_name(Some("C:\\fakepath\\receipt.png")), "receipt.png");
        assert_eq!(sanitize_original_name(Some("../../etc/passwd")), "passwd");
        assert_eq!(sanitize_original_name(Some("   ")), "upload");
        assert_eq!(sanitize_original_name(None), "upload");
    }

    #[tokio::test]
    async fn test_exists_rejects_traversal() {
        let service = service_at(std::env::temp_dir());
        assert!(!service.exists(UploadCategory::Payments, "../secret.png").await.unwrap());
        assert!(!service.exists(UploadCategory::Payments, "a/b.png").await.unwrap());
        assert!(!service.exists(UploadCategory::Payments, "").await.unwrap());
    }

    #[tokio::test]
    async fn test_metadata_for_stored_file() {
        let root = std::env::temp_dir().join(format!("uploads-{}", Uuid::new_v4()));
        let service = service_at(root.clone());
        service.ensure_directories().await.unwrap();

        let file_name = format!("{}.png", Uuid::new_v4());
        tokio::fs::write(root.join("payments").join(&file_name), b"png-bytes")
            .await
            .unwrap();

        let meta = service
            .metadata_for(UploadCategory::Payments, &file_name)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(meta.mime_type, "image/png");
        assert_eq!(meta.size, 9);
        assert_eq!(meta.url, format!("/uploads/payments/{}", file_name));

        assert!(service
            .metadata_for(UploadCategory::Payments, "missing.png")
            .await
            .unwrap()
            .is_none());

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_unusable_root_reports_path_in_internal_error() {
        let blocker = std::env::temp_dir().join(format!("uploads-file-{}", Uuid::new_v4()));
        tokio::fs::write(&blocker, b"not a directory").await.unwrap();

        let result = service_at(blocker.clone()).ensure_directories().await;

        match result {
            Err(AppError::InternalError(msg)) => {
                assert!(msg.starts_with("cannot create"));
                assert!(msg.contains(&blocker.display().to_string()));
            }
            other => panic!("Expected InternalError, got {:?}", other),
        }
        let _ = tokio::fs::remove_file(&blocker).await;
    }
}
