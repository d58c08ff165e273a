use std::io::Cursor;

use image_crate::io::Reader as ImageReader;
use image_crate::{DynamicImage, ImageError, RgbImage};

pub fn decode(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    reader.decode()
}

/// Collapses alpha, palette and 16-bit variants into plain 8-bit RGB.
pub fn normalize(image: DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_crate::{ImageOutputFormat, Rgba, RgbaImage};

    fn png_with_alpha() -> Vec<u8> {
        let image = RgbaImage::from_pixel(4, 3, Rgba([200, 10, 10, 64]));
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut bytes, ImageOutputFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_decode_guesses_format() {
        let image = decode(&png_with_alpha()).unwrap();
        assert_eq!((image.width(), image.height()), (4, 3));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode(b"<html>not an image</html>").is_err());
    }

    #[test]
    fn test_normalize_drops_alpha() {
        let image = decode(&png_with_alpha()).unwrap();
        let rgb = normalize(image);
        assert_eq!(rgb.dimensions(), (4, 3));
        assert_eq!(rgb.as_raw().len(), 4 * 3 * 3);
    }
}
