//! Object storage port - binary upload and public URL resolution.

use async_trait::async_trait;

/// Output format for a transformed image variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Webp,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Webp => "webp",
        }
    }
}

/// Requested transformation for a public URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransformOptions {
    pub width: Option<u32>,
    pub format: Option<ImageFormat>,
    /// Encode quality, 1-100.
    pub quality: Option<u8>,
}

/// Object storage trait - abstraction over the binary storage backend.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `path` and return the public URL.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Public URL for a stored object, optionally as a transformed variant.
    async fn public_url(
        &self,
        path: &str,
        transform: Option<TransformOptions>,
    ) -> Result<String, StorageError>;
}

/// Object storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Transform failed: {0}")]
    Transform(String),

    #[error("Connection error: {0}")]
    Connection(String),
}
