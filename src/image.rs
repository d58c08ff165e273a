use serde::{Deserialize, Serialize};

use crate::image::encoder::OutputFormat;

pub mod decoder;
pub mod encoder;
pub mod scaler;

/// Target shape of every artifact written during a run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ArtifactSpec {
    pub max_width: u32,
    pub format: OutputFormat,
    pub quality: u8,
}

impl Default for ArtifactSpec {
    fn default() -> Self {
        ArtifactSpec {
            max_width: 1920,
            format: OutputFormat::Webp,
            quality: 85,
        }
    }
}
