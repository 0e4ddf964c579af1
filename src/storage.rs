// src/storage.rs
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::auth::token::generate_token_default;
use crate::domain::form::ImageUpload;
use crate::errors::ServerError;

/// A stored listing image: the file name inside the store plus the public
/// URL it is served under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub url: String,
    pub stored_name: String,
}

/// On-disk blob store for listing images. Files are keyed by a generated
/// unique name scoped to the uploading user and the original file name, and
/// served back under /uploads/.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn ensure_dir(&self) -> Result<(), ServerError> {
        fs::create_dir_all(&self.root)
            .map_err(|e| ServerError::ExternalError(format!("create upload dir failed: {e}")))
    }

    /// Store one image under "{user_id}-{original}-{random}".
    pub fn store(
        &self,
        user_id: i64,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, ServerError> {
        let stored_name = format!(
            "{}-{}-{}",
            user_id,
            sanitize_file_name(file_name),
            generate_token_default()
        );

        let path = self.root.join(&stored_name);
        let mut file = fs::File::create(&path)
            .map_err(|e| ServerError::ExternalError(format!("store image failed: {e}")))?;
        file.write_all(bytes)
            .map_err(|e| ServerError::ExternalError(format!("store image failed: {e}")))?;

        Ok(StoredImage {
            url: format!("/uploads/{stored_name}"),
            stored_name,
        })
    }

    /// Staged commit for a whole submission: store every upload, and if any
    /// store fails delete the files that already landed so an aborted
    /// submission leaves no orphan blobs behind.
    pub fn store_all(
        &self,
        user_id: i64,
        uploads: &[ImageUpload],
    ) -> Result<Vec<StoredImage>, ServerError> {
        let mut stored: Vec<StoredImage> = Vec::with_capacity(uploads.len());

        for upload in uploads {
            match self.store(user_id, &upload.file_name, &upload.bytes) {
                Ok(image) => stored.push(image),
                Err(e) => {
                    self.delete_all(&stored);
                    return Err(e);
                }
            }
        }

        Ok(stored)
    }

    /// Best-effort removal; a file that is already gone is not an error.
    pub fn delete(&self, stored_name: &str) {
        if let Err(e) = fs::remove_file(self.root.join(stored_name)) {
            if e.kind() != std::io::ErrorKind::NotFound {
                eprintln!("failed to remove stored image {stored_name}: {e}");
            }
        }
    }

    pub fn delete_all(&self, images: &[StoredImage]) {
        for image in images {
            self.delete(&image.stored_name);
        }
    }

    pub fn delete_names(&self, names: &[String]) {
        for name in names {
            self.delete(name);
        }
    }

    /// Read a stored file back for serving. Rejects names that could escape
    /// the store directory.
    pub fn read(&self, stored_name: &str) -> Result<Option<Vec<u8>>, ServerError> {
        if stored_name.contains('/') || stored_name.contains('\\') || stored_name.contains("..") {
            return Ok(None);
        }
        match fs::read(self.root.join(stored_name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ServerError::ExternalError(format!("read image failed: {e}"))),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Keep the original file name recognizable but path-safe.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}
