use image_crate::RgbImage;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Webp,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Webp => "webp",
        }
    }

    pub fn mime(&self) -> mime::Mime {
        match self {
            OutputFormat::Webp => "image/webp".parse().unwrap_or(mime::IMAGE_STAR),
        }
    }
}

pub fn encode(image: &RgbImage, format: OutputFormat, quality: u8) -> Vec<u8> {
    match format {
        OutputFormat::Webp => {
            let (width, height) = image.dimensions();
            let encoder = webp::Encoder::from_rgb(image.as_raw(), width, height);
            encoder.encode(quality.min(100) as f32).to_vec()
        }
    }
}
