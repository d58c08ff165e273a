use image_crate::ImageError;
use thiserror::Error;

use crate::image::{decoder, encoder, scaler, ArtifactSpec};

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("not a decodable image: {0}")]
    Decode(#[from] ImageError),

    #[error("encoder produced no data for a {0}x{1} image")]
    Encode(u32, u32),
}

/// Turns raw downloaded bytes into an artifact matching an [`ArtifactSpec`].
pub trait Transcoder {
    fn convert(&self, raw: &[u8], spec: &ArtifactSpec) -> Result<Vec<u8>, TranscodeError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageTranscoder;

impl Transcoder for ImageTranscoder {
    fn convert(&self, raw: &[u8], spec: &ArtifactSpec) -> Result<Vec<u8>, TranscodeError> {
        let image = decoder::normalize(decoder::decode(raw)?);
        let image = scaler::downscale(image, spec.max_width);
        let (width, height) = image.dimensions();
        let encoded = encoder::encode(&image, spec.format, spec.quality);
        if encoded.is_empty() {
            return Err(TranscodeError::Encode(width, height));
        }
        Ok(encoded)
    }
}
