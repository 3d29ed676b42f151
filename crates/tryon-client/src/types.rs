//! Request-side types.

use std::path::Path;

use crate::error::ClientResult;

/// An image selected for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name sent with the multipart part
    pub file_name: String,
    /// MIME type sent with the multipart part
    pub content_type: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Create an upload from in-memory bytes, guessing the MIME type from the name.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Override the MIME type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Read an image from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn guess_content_type(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

/// Pagination for `GET /tryon/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub skip: u32,
    pub limit: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self { skip: 0, limit: 10 }
    }
}
