//! Document region location
//!
//! Finds the document-shaped region in a photo by masking pixels inside a
//! fixed color range (documents photographed against a darker background
//! come out as a bright connected blob), tracing contours with imageproc,
//! and cropping the bounding box of the largest outer contour.

use image::{GrayImage, Luma, RgbImage};
use imageproc::contours::{find_contours, BorderType, Contour};

use crate::vision::VisionError;

/// Inclusive lower bound of the document color range, RGB order.
pub const MASK_LOWER_RGB: [u8; 3] = [100, 110, 110];
/// Inclusive upper bound of the document color range, RGB order.
pub const MASK_UPPER_RGB: [u8; 3] = [255, 255, 255];

/// Axis-aligned bounding box in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Locate the document region and return the cropped image.
pub fn locate_document(image: &RgbImage) -> Result<RgbImage, VisionError> {
    let bbox = document_bounds(image)?;
    Ok(image::imageops::crop_imm(image, bbox.x, bbox.y, bbox.width, bbox.height).to_image())
}

/// Compute the bounding box of the largest document-colored contour.
pub fn document_bounds(image: &RgbImage) -> Result<BoundingBox, VisionError> {
    let mask = color_range_mask(image, MASK_LOWER_RGB, MASK_UPPER_RGB);
    let contours = find_contours::<u32>(&mask);

    let largest = contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && !c.points.is_empty())
        .max_by(|a, b| {
            contour_area(a)
                .partial_cmp(&contour_area(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .ok_or(VisionError::NoDocumentRegion)?;

    Ok(contour_bounding_box(largest, image.width(), image.height()))
}

/// Binary mask of pixels with every channel inside [lower, upper].
fn color_range_mask(image: &RgbImage, lower: [u8; 3], upper: [u8; 3]) -> GrayImage {
    let mut mask = GrayImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let inside = (0..3).all(|c| pixel.0[c] >= lower[c] && pixel.0[c] <= upper[c]);
        mask.put_pixel(x, y, Luma([if inside { 255 } else { 0 }]));
    }
    mask
}

/// Polygon area of a traced contour (shoelace formula).
fn contour_area(contour: &Contour<u32>) -> f64 {
    let pts = &contour.points;
    if pts.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0f64;
    for i in 0..pts.len() {
        let p = pts[i];
        let q = pts[(i + 1) % pts.len()];
        sum += f64::from(p.x) * f64::from(q.y) - f64::from(q.x) * f64::from(p.y);
    }
    (sum / 2.0).abs()
}

/// Bounding box of a contour, clamped to the image dimensions.
fn contour_bounding_box(contour: &Contour<u32>, img_w: u32, img_h: u32) -> BoundingBox {
    let min_x = contour.points.iter().map(|p| p.x).min().unwrap_or(0);
    let min_y = contour.points.iter().map(|p| p.y).min().unwrap_or(0);
    let max_x = contour.points.iter().map(|p| p.x).max().unwrap_or(0);
    let max_y = contour.points.iter().map(|p| p.y).max().unwrap_or(0);

    BoundingBox {
        x: min_x,
        y: min_y,
        width: (max_x - min_x + 1).min(img_w - min_x),
        height: (max_y - min_y + 1).min(img_h - min_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// Dark background with a bright rectangle at a known position.
    fn synthetic_document(img_w: u32, img_h: u32, bbox: BoundingBox) -> RgbImage {
        let mut img = RgbImage::from_pixel(img_w, img_h, Rgb([20, 20, 20]));
        for y in bbox.y..bbox.y + bbox.height {
            for x in bbox.x..bbox.x + bbox.width {
                img.put_pixel(x, y, Rgb([230, 230, 230]));
            }
        }
        img
    }

    #[test]
    fn test_mask_separates_bright_region() {
        let img = synthetic_document(
            40,
            40,
            BoundingBox { x: 10, y: 10, width: 12, height: 8 },
        );
        let mask = color_range_mask(&img, MASK_LOWER_RGB, MASK_UPPER_RGB);
        assert_eq!(mask.get_pixel(15, 12).0[0], 255);
        assert_eq!(mask.get_pixel(2, 2).0[0], 0);
    }

    #[test]
    fn test_document_bounds_finds_rectangle() {
        let expected = BoundingBox { x: 8, y: 6, width: 20, height: 14 };
        let img = synthetic_document(60, 50, expected);
        let bbox = document_bounds(&img).unwrap();
        assert_eq!(bbox, expected);
    }

    #[test]
    fn test_largest_region_wins() {
        let big = BoundingBox { x: 5, y: 5, width: 30, height: 20 };
        let mut img = synthetic_document(80, 60, big);
        // Smaller second blob, well separated from the first
        for y in 40..48 {
            for x in 60..70 {
                img.put_pixel(x, y, Rgb([230, 230, 230]));
            }
        }
        let bbox = document_bounds(&img).unwrap();
        assert_eq!(bbox, big);
    }

    #[test]
    fn test_no_region_is_an_error() {
        let img = RgbImage::from_pixel(30, 30, Rgb([10, 10, 10]));
        assert!(matches!(
            document_bounds(&img),
            Err(VisionError::NoDocumentRegion)
        ));
    }

    #[test]
    fn test_crop_has_expected_dimensions() {
        let bbox = BoundingBox { x: 3, y: 4, width: 16, height: 10 };
        let img = synthetic_document(40, 40, bbox);
        let crop = locate_document(&img).unwrap();
        assert_eq!(crop.dimensions(), (16, 10));
        assert_eq!(crop.get_pixel(0, 0).0, [230, 230, 230]);
    }
}
