//! In-memory object storage - used by tests and the stub server.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use amigo_core::ports::{ObjectStorage, StorageError, TransformOptions};

use super::image::apply_transform;

struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

/// In-memory object store serving URLs under the managed-storage path
/// layout (`{base}/object/public/posts/{path}`). Transformed variants are
/// produced eagerly so a bad transform surfaces as an error the caller can
/// fall back from, exactly like the hosted backend.
pub struct InMemoryObjectStorage {
    base_url: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl InMemoryObjectStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/object/public/posts/{}", self.base_url, path)
    }

    /// Number of stored objects, for assertions.
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Raw stored bytes, for assertions.
    pub async fn stored_bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(path).map(|o| o.bytes.clone())
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let mut objects = self.objects.write().await;
        tracing::debug!(path = %path, size = bytes.len(), content_type = %content_type, "Object stored");
        objects.insert(
            path.to_owned(),
            StoredObject {
                bytes,
                content_type: content_type.to_owned(),
            },
        );
        Ok(self.url_for(path))
    }

    async fn public_url(
        &self,
        path: &str,
        transform: Option<TransformOptions>,
    ) -> Result<String, StorageError> {
        let objects = self.objects.read().await;
        let object = objects
            .get(path)
            .ok_or_else(|| StorageError::NotFound(path.to_owned()))?;

        let Some(options) = transform else {
            return Ok(self.url_for(path));
        };

        // Re-encode now; failure means the variant cannot be served.
        apply_transform(&object.bytes, &options)
            .map_err(|e| StorageError::Transform(e.to_string()))?;

        let mut query = Vec::new();
        if let Some(width) = options.width {
            query.push(format!("width={width}"));
        }
        if let Some(format) = options.format {
            query.push(format!("format={}", format.as_str()));
        }
        if let Some(quality) = options.quality {
            query.push(format!("quality={quality}"));
        }
        tracing::debug!(path = %path, content_type = %object.content_type, "Serving transformed variant");
        Ok(format!("{}?{}", self.url_for(path), query.join("&")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amigo_core::domain::render::display_image_url;
    use amigo_core::ports::ImageFormat;
    use image::{DynamicImage, ImageOutputFormat, RgbImage};
    use std::io::Cursor;

    fn jpeg_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, image::Rgb([10, 20, 30])));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageOutputFormat::Jpeg(80)).unwrap();
        buffer.into_inner()
    }

    #[tokio::test]
    async fn upload_then_resolve_public_url() {
        let storage = InMemoryObjectStorage::new("https://storage.test");
        let url = storage
            .upload("post-images/a.jpg", jpeg_bytes(), "image/jpeg")
            .await
            .unwrap();
        assert_eq!(url, "https://storage.test/object/public/posts/post-images/a.jpg");
        assert_eq!(storage.public_url("post-images/a.jpg", None).await.unwrap(), url);
    }

    #[tokio::test]
    async fn transformed_url_carries_parameters() {
        let storage = InMemoryObjectStorage::new("https://storage.test");
        storage
            .upload("post-images/b.jpg", jpeg_bytes(), "image/jpeg")
            .await
            .unwrap();
        let url = storage
            .public_url(
                "post-images/b.jpg",
                Some(TransformOptions {
                    width: Some(32),
                    format: Some(ImageFormat::Webp),
                    quality: Some(80),
                }),
            )
            .await
            .unwrap();
        assert!(url.ends_with("post-images/b.jpg?width=32&format=webp&quality=80"));
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let storage = InMemoryObjectStorage::new("https://storage.test");
        let err = storage.public_url("nope.jpg", None).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn display_url_falls_back_on_transform_failure() {
        let storage = InMemoryObjectStorage::new("https://storage.test");
        // Store something that is not an image under an image path.
        let url = storage
            .upload("post-images/broken.jpg", b"junk".to_vec(), "image/jpeg")
            .await
            .unwrap();
        assert_eq!(display_image_url(&storage, &url).await, url);

        // A healthy object gets the optimized variant.
        let ok_url = storage
            .upload("post-images/ok.jpg", jpeg_bytes(), "image/jpeg")
            .await
            .unwrap();
        let optimized = display_image_url(&storage, &ok_url).await;
        assert!(optimized.contains("format=webp"));

        // Foreign URLs pass through untouched.
        let foreign = "https://elsewhere.example/photo.png";
        assert_eq!(display_image_url(&storage, foreign).await, foreign);
    }
}
