//! Image preprocessing filters for OCR
//!
//! Optional enhancements applied to the document crop before OCR to
//! improve recognition on low-contrast or small photographs.

use image::RgbImage;
use tracing::debug;

use crate::config::OcrPreprocessing;

/// Apply the configured filters to a document crop.
///
/// Returns the input unchanged when preprocessing is disabled. Upscaling
/// happens first so the other filters work on the final resolution.
pub fn apply_preprocessing(image: &RgbImage, settings: &OcrPreprocessing) -> RgbImage {
    if !settings.enabled {
        debug!("OCR preprocessing disabled");
        return image.clone();
    }

    debug!(
        "OCR preprocessing: grayscale={}, invert={}, contrast={}, sharpen={}, scale={}",
        settings.grayscale, settings.invert, settings.contrast, settings.sharpen, settings.scale
    );

    let mut result = if settings.scale > 1 {
        upscale(image, settings.scale)
    } else {
        image.clone()
    };

    if (settings.contrast - 1.0).abs() > 0.01 {
        apply_contrast(&mut result, settings.contrast);
    }

    if settings.sharpen > 0.01 {
        result = apply_sharpen(&result, settings.sharpen);
    }

    if settings.grayscale {
        apply_grayscale(&mut result);
    }

    if settings.invert {
        apply_invert(&mut result);
    }

    result
}

/// Bilinear upscale by an integer factor.
fn upscale(image: &RgbImage, scale: u32) -> RgbImage {
    image::imageops::resize(
        image,
        image.width() * scale,
        image.height() * scale,
        image::imageops::FilterType::Triangle,
    )
}

/// Contrast adjustment around the midpoint. Factor > 1.0 increases contrast.
fn apply_contrast(image: &mut RgbImage, factor: f32) {
    for pixel in image.pixels_mut() {
        for c in 0..3 {
            let val = pixel.0[c] as f32;
            pixel.0[c] = ((val - 128.0) * factor + 128.0).clamp(0.0, 255.0) as u8;
        }
    }
}

/// Convert to grayscale in place, keeping the RGB layout.
fn apply_grayscale(image: &mut RgbImage) {
    for pixel in image.pixels_mut() {
        // Standard luminance weights
        let gray = (0.299 * pixel.0[0] as f32
            + 0.587 * pixel.0[1] as f32
            + 0.114 * pixel.0[2] as f32) as u8;
        pixel.0 = [gray, gray, gray];
    }
}

/// Invert colors (light text on dark documents).
fn apply_invert(image: &mut RgbImage) {
    for pixel in image.pixels_mut() {
        pixel.0 = [255 - pixel.0[0], 255 - pixel.0[1], 255 - pixel.0[2]];
    }
}

/// Unsharp-mask style sharpening with a 3x3 kernel. Strength 0.0 is a
/// no-op, 1.0 is strong.
fn apply_sharpen(image: &RgbImage, strength: f32) -> RgbImage {
    let (w, h) = image.dimensions();
    let mut result = image.clone();
    if w < 3 || h < 3 {
        return result;
    }

    let center_weight = 1.0 + 4.0 * strength;
    let neighbor_weight = -strength;

    // Edges are left untouched
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let mut out = [0u8; 3];
            for c in 0..3 {
                let center = image.get_pixel(x, y).0[c] as f32;
                let top = image.get_pixel(x, y - 1).0[c] as f32;
                let bottom = image.get_pixel(x, y + 1).0[c] as f32;
                let left = image.get_pixel(x - 1, y).0[c] as f32;
                let right = image.get_pixel(x + 1, y).0[c] as f32;

                let sharpened = center * center_weight
                    + (top + bottom + left + right) * neighbor_weight;
                out[c] = sharpened.clamp(0.0, 255.0) as u8;
            }
            result.put_pixel(x, y, image::Rgb(out));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_preprocessing_disabled_is_identity() {
        let img = RgbImage::from_pixel(4, 4, Rgb([100, 150, 200]));
        let settings = OcrPreprocessing::default();
        assert_eq!(apply_preprocessing(&img, &settings), img);
    }

    #[test]
    fn test_contrast_increase() {
        let mut img = RgbImage::from_pixel(1, 1, Rgb([100, 128, 200]));
        apply_contrast(&mut img, 2.0);
        // (100-128)*2+128 = 72, midpoint stays, 200 clamps to 255
        assert_eq!(img.get_pixel(0, 0).0, [72, 128, 255]);
    }

    #[test]
    fn test_grayscale_red_pixel() {
        let mut img = RgbImage::from_pixel(1, 1, Rgb([255, 0, 0]));
        apply_grayscale(&mut img);
        // 0.299 * 255 = 76
        assert_eq!(img.get_pixel(0, 0).0, [76, 76, 76]);
    }

    #[test]
    fn test_invert() {
        let mut img = RgbImage::from_pixel(1, 1, Rgb([0, 100, 255]));
        apply_invert(&mut img);
        assert_eq!(img.get_pixel(0, 0).0, [255, 155, 0]);
    }

    #[test]
    fn test_upscale_doubles_dimensions() {
        let img = RgbImage::from_pixel(3, 5, Rgb([10, 10, 10]));
        let scaled = upscale(&img, 2);
        assert_eq!(scaled.dimensions(), (6, 10));
    }

    #[test]
    fn test_sharpen_flat_image_unchanged() {
        let img = RgbImage::from_pixel(5, 5, Rgb([120, 120, 120]));
        let sharpened = apply_sharpen(&img, 1.0);
        // Uniform image has no edges to enhance
        assert_eq!(sharpened.get_pixel(2, 2).0, [120, 120, 120]);
    }

    #[test]
    fn test_enabled_pipeline_scales() {
        let img = RgbImage::from_pixel(2, 2, Rgb([100, 100, 100]));
        let settings = OcrPreprocessing {
            enabled: true,
            scale: 2,
            ..Default::default()
        };
        let out = apply_preprocessing(&img, &settings);
        assert_eq!(out.dimensions(), (4, 4));
    }
}
