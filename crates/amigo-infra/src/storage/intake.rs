//! Image intake - compress an upload and hand it to object storage.

use std::sync::Arc;

use uuid::Uuid;

use amigo_core::ports::{ObjectStorage, StorageError};

use super::image::compress_to_ceiling;

/// Converts a user-selected image into a compact uploadable form and stores
/// it. On success the returned public URL goes into the block's settings;
/// on failure nothing is recorded and nothing is retried.
pub struct ImageIntake {
    storage: Arc<dyn ObjectStorage>,
}

impl ImageIntake {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    /// Compress `data` and upload it under a fresh random key.
    pub async fn upload(&self, data: &[u8]) -> Result<String, IntakeError> {
        let compressed =
            compress_to_ceiling(data).map_err(|e| IntakeError::Codec(e.to_string()))?;
        tracing::debug!(
            input_bytes = data.len(),
            output_bytes = compressed.bytes.len(),
            quality = compressed.quality,
            "Image compressed for upload"
        );

        // Compressed images are always re-encoded as JPEG.
        let path = format!("post-images/{}.jpg", Uuid::new_v4());
        let url = self
            .storage
            .upload(&path, compressed.bytes, "image/jpeg")
            .await?;
        Ok(url)
    }
}

/// Image intake errors.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Image processing failed: {0}")]
    Codec(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryObjectStorage;
    use image::{DynamicImage, ImageOutputFormat, RgbImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, image::Rgb([120, 80, 40])));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageOutputFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[tokio::test]
    async fn upload_returns_public_url() {
        let storage = Arc::new(InMemoryObjectStorage::new("https://storage.test"));
        let intake = ImageIntake::new(storage);

        let url = intake.upload(&png_bytes()).await.unwrap();
        assert!(url.starts_with("https://storage.test/object/public/posts/post-images/"));
        assert!(url.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn undecodable_upload_fails_without_storing() {
        let storage = Arc::new(InMemoryObjectStorage::new("https://storage.test"));
        let intake = ImageIntake::new(Arc::clone(&storage) as Arc<dyn ObjectStorage>);

        let err = intake.upload(b"not an image").await.unwrap_err();
        assert!(matches!(err, IntakeError::Codec(_)));
        assert_eq!(storage.object_count().await, 0);
    }
}
