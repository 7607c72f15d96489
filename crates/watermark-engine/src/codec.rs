//! Decoding of fetched bytes and JPEG encoding of the final composite.

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;

use crate::EngineError;
use crate::placement::ImageDimensions;

/// Decode raw image bytes. The format is guessed from the content.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, EngineError> {
    image::load_from_memory(bytes).map_err(EngineError::Decode)
}

pub fn dimensions_of(img: &DynamicImage) -> ImageDimensions {
    ImageDimensions::new(img.width(), img.height())
}

/// Encode as baseline JPEG. Alpha is dropped.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, EngineError> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    rgb.write_with_encoder(encoder).map_err(EngineError::Encode)?;
    Ok(buf)
}
