use image_crate::imageops::{self, FilterType};
use image_crate::RgbImage;

/// Dimensions after fitting `(width, height)` into `max_width`, keeping the ratio.
pub fn fit_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let scaled = (height as f64 * max_width as f64 / width as f64).round() as u32;
    (max_width, scaled.max(1))
}

pub fn downscale(image: RgbImage, max_width: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let (target_width, target_height) = fit_width(width, height, max_width);
    if (target_width, target_height) == (width, height) {
        return image;
    }
    imageops::resize(&image, target_width, target_height, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_crate::Rgb;

    #[test]
    fn test_fit_width_keeps_small_images() {
        assert_eq!(fit_width(800, 600, 1920), (800, 600));
        assert_eq!(fit_width(1920, 1080, 1920), (1920, 1080));
    }

    #[test]
    fn test_fit_width_rounds_height() {
        assert_eq!(fit_width(4000, 3000, 1920), (1920, 1440));
        // 1000 * 1920 / 3001 = 639.78...
        assert_eq!(fit_width(3001, 1000, 1920), (1920, 640));
    }

    #[test]
    fn test_fit_width_never_collapses_height() {
        assert_eq!(fit_width(10000, 2, 100), (100, 1));
    }

    #[test]
    fn test_downscale() {
        let image = RgbImage::from_pixel(300, 150, Rgb([1, 2, 3]));
        let scaled = downscale(image, 100);
        assert_eq!(scaled.dimensions(), (100, 50));
    }
}
