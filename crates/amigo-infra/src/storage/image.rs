//! Image downscaling and re-encoding.
//!
//! Two consumers: the intake path compresses uploads under a size ceiling
//! before they leave the client, and the in-memory object store applies
//! transform parameters when serving public URLs.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageOutputFormat, ImageResult, load_from_memory};

use amigo_core::ports::{ImageFormat, TransformOptions};

/// Neither output dimension may exceed this.
pub const MAX_DIMENSION: u32 = 1920;
/// Upload size ceiling: 500 KB.
pub const SIZE_CEILING_BYTES: usize = 500 * 1024;
/// First JPEG quality attempted.
pub const QUALITY_START: u8 = 80;
/// Quality floor; the result is accepted here even if still over budget.
pub const QUALITY_FLOOR: u8 = 30;
/// Quality decrement between attempts.
pub const QUALITY_STEP: u8 = 10;

/// A compressed upload, with the quality the encoder settled on.
#[derive(Debug, Clone)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub quality: u8,
}

/// Target dimensions preserving aspect ratio: only the larger dimension is
/// checked against [`MAX_DIMENSION`] and scaled down; the other follows.
pub fn scaled_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width > height {
        if width > MAX_DIMENSION {
            let scaled = (f64::from(height) * f64::from(MAX_DIMENSION) / f64::from(width)).round();
            return (MAX_DIMENSION, scaled as u32);
        }
    } else if height > MAX_DIMENSION {
        let scaled = (f64::from(width) * f64::from(MAX_DIMENSION) / f64::from(height)).round();
        return (scaled as u32, MAX_DIMENSION);
    }
    (width, height)
}

/// Downscale and re-encode an uploaded image to fit the size ceiling.
///
/// Encodes JPEG at decreasing quality, stopping as soon as the result fits
/// or the floor is reached; at most
/// `(QUALITY_START - QUALITY_FLOOR) / QUALITY_STEP + 1` encodes.
pub fn compress_to_ceiling(data: &[u8]) -> ImageResult<CompressedImage> {
    let image = load_from_memory(data)?;
    let (width, height) = scaled_dimensions(image.width(), image.height());
    let image = if (width, height) == (image.width(), image.height()) {
        image
    } else {
        image.resize_exact(width, height, FilterType::Triangle)
    };

    let mut quality = QUALITY_START;
    loop {
        let bytes = encode(&image, ImageOutputFormat::Jpeg(quality))?;
        if bytes.len() <= SIZE_CEILING_BYTES || quality <= QUALITY_FLOOR {
            return Ok(CompressedImage { bytes, quality });
        }
        quality -= QUALITY_STEP;
    }
}

/// Apply transform options to stored bytes: resize to the requested width
/// (aspect preserved) and re-encode in the requested format.
pub fn apply_transform(data: &[u8], options: &TransformOptions) -> ImageResult<Vec<u8>> {
    let mut image = load_from_memory(data)?;
    if let Some(width) = options.width
        && image.width() > width
    {
        let height =
            (f64::from(image.height()) * f64::from(width) / f64::from(image.width())).round();
        image = image.resize_exact(width, height as u32, FilterType::Triangle);
    }
    let format = match options.format.unwrap_or(ImageFormat::Jpeg) {
        ImageFormat::Jpeg => ImageOutputFormat::Jpeg(options.quality.unwrap_or(QUALITY_START)),
        ImageFormat::Webp => ImageOutputFormat::WebP,
    };
    encode(&image, format)
}

fn encode(image: &DynamicImage, format: ImageOutputFormat) -> ImageResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format)?;
    Ok(buffer.into_inner())
}
