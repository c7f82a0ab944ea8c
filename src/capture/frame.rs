//! Frame data structures for captured camera content

use image::RgbImage;
use std::time::Instant;

/// A captured frame from the camera
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// Raw RGB pixel data
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Timestamp when frame was captured
    pub timestamp: Instant,
}

impl CapturedFrame {
    /// Create a new captured frame
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp: Instant::now(),
        }
    }

    /// Build a frame from a decoded image
    pub fn from_image(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height)
    }

    /// Get frame dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Reinterpret the raw buffer as an image. Returns `None` if the
    /// buffer does not match the stated dimensions.
    pub fn to_image(&self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_image_roundtrip() {
        let img = RgbImage::from_pixel(3, 2, Rgb([5, 6, 7]));
        let frame = CapturedFrame::from_image(img.clone());
        assert_eq!(frame.dimensions(), (3, 2));
        assert_eq!(frame.to_image().unwrap(), img);
    }

    #[test]
    fn test_bad_buffer_is_none() {
        let frame = CapturedFrame::new(vec![0u8; 5], 3, 2);
        assert!(frame.to_image().is_none());
    }
}
