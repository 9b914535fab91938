//! Raster decode, downscale and re-encode.

use super::format::TargetFormat;
use crate::error::{ConvertError, ConvertResult};
use image::{DynamicImage, ImageFormat, imageops::FilterType};
use std::io::Cursor;
use tracing::debug;

/// Width of every image the image converter produces.
pub const MAX_WIDTH: u32 = 800;

/// Decodes any supported raster format, sniffing the codec from the bytes.
pub fn decode(input: &[u8]) -> ConvertResult<DynamicImage> {
    image::load_from_memory(input).map_err(|e| ConvertError::Decode(e.to_string()))
}

/// Scales `img` to exactly [`MAX_WIDTH`] keeping its aspect ratio. Narrower
/// images are enlarged.
pub fn fit_width(img: DynamicImage) -> DynamicImage {
    let height = ((u64::from(img.height()) * u64::from(MAX_WIDTH)) / u64::from(img.width())).max(1);
    debug!(
        "Resizing {}x{} -> {}x{}",
        img.width(),
        img.height(),
        MAX_WIDTH,
        height
    );
    img.resize_exact(MAX_WIDTH, height as u32, FilterType::Lanczos3)
}

pub fn encode(img: &DynamicImage, target: TargetFormat) -> ConvertResult<Vec<u8>> {
    let format = target.image_format().ok_or_else(|| {
        ConvertError::Encode(format!("{} is not an image format", target))
    })?;

    // JPEG has no alpha channel and the WebP encoder only takes 8-bit RGB(A).
    let prepared = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        ImageFormat::WebP => DynamicImage::ImageRgba8(img.to_rgba8()),
        _ => img.clone(),
    };

    let mut buf = Vec::new();
    prepared
        .write_to(&mut Cursor::new(&mut buf), format)
        .map_err(|e| ConvertError::Encode(e.to_string()))?;
    Ok(buf)
}

pub fn image_to_image(input: &[u8], target: TargetFormat) -> ConvertResult<Vec<u8>> {
    if target.image_format().is_none() {
        return Err(ConvertError::Encode(format!(
            "{} is not an image format",
            target
        )));
    }
    let img = fit_width(decode(input)?);
    let out = encode(&img, target)?;
    debug!("Encoded {} image: {} bytes", target, out.len());
    Ok(out)
}
