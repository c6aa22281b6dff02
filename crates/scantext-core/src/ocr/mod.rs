//! OCR boundary.
//!
//! The extractor only sees [`RawText`]. Anything that turns an image into
//! ordered text lines implements [`TextRecognizer`]; the `native` feature
//! provides one backed by `pure-onnx-ocr`.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;
use crate::models::receipt::RawText;

/// Anything that can read text lines off an image.
pub trait TextRecognizer {
    /// Recognize the image and return its lines in reading order.
    fn recognize(&self, image: &DynamicImage) -> Result<RawText, OcrError>;
}

/// A detected text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrOutput {
    /// Recognized text boxes.
    pub boxes: Vec<TextBox>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrOutput {
    /// Sort boxes by reading order (top-to-bottom, left-to-right).
    pub fn sort_by_reading_order(&mut self) {
        self.boxes.sort_by(|a, b| {
            let (ax, ay, _, _) = a.rect();
            let (bx, by, _, _) = b.rect();

            // Group by approximate vertical position (within 20 pixels)
            let row_a = (ay / 20.0) as i32;
            let row_b = (by / 20.0) as i32;

            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
            }
        });
    }

    /// One line per box, in the current box order.
    pub fn raw_text(&self) -> RawText {
        self.boxes.iter().map(|b| b.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_box(text: &str, x: f32, y: f32) -> TextBox {
        TextBox {
            bbox: [x, y, x + 50.0, y, x + 50.0, y + 10.0, x, y + 10.0],
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_reading_order() {
        let mut output = OcrOutput {
            boxes: vec![
                text_box("Rp 23.500", 200.0, 105.0),
                text_box("TOKO MAJU", 10.0, 2.0),
                text_box("TOTAL", 10.0, 101.0),
            ],
            processing_time_ms: 0,
            image_size: (400, 200),
        };

        output.sort_by_reading_order();

        assert_eq!(
            output.raw_text(),
            RawText::from_lines(["TOKO MAJU", "TOTAL", "Rp 23.500"])
        );
    }
}
