use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

use crate::utils::MaskError;

/// Pixel box of an OCR word, `(left, top, width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        BoundingBox {
            left,
            top,
            width,
            height,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// One word-level OCR result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrToken {
    pub text: String,
    pub bounding_box: BoundingBox,
}

impl OcrToken {
    pub fn new(text: impl Into<String>, bounding_box: BoundingBox) -> Self {
        OcrToken {
            text: text.into(),
            bounding_box,
        }
    }
}

/// Rectangle `(x0, y0)..(x1, y1)` to be painted over, half-open on the far edges.
///
/// Corners are kept as `i64` so that `left + width` can never overflow, no
/// matter what the OCR engine reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskRegion {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl MaskRegion {
    pub fn from_box(bbox: &BoundingBox) -> Self {
        let x0 = i64::from(bbox.left);
        let y0 = i64::from(bbox.top);
        MaskRegion {
            x0,
            y0,
            x1: x0 + i64::from(bbox.width),
            y1: y0 + i64::from(bbox.height),
        }
    }

    /// Intersects the region with a `width x height` image. Returns `None`
    /// when nothing drawable is left.
    pub fn clip(&self, width: u32, height: u32) -> Option<Rect> {
        let x0 = self.x0.max(0);
        let y0 = self.y0.max(0);
        let x1 = self.x1.min(i64::from(width));
        let y1 = self.y1.min(i64::from(height));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        // Clipped to the image, so the corners fit in i32 for any decodable image.
        Some(Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0) as u32, (y1 - y0) as u32))
    }
}

/// A rectangle drawn by hand on top of the auto-masked image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualMask {
    pub bounding_box: BoundingBox,
}

#[derive(Deserialize)]
struct CanvasDocument {
    #[serde(default)]
    objects: Vec<CanvasObject>,
}

#[derive(Deserialize)]
struct CanvasObject {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    left: f64,
    #[serde(default)]
    top: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
}

impl ManualMask {
    /// Reads the rectangles out of a drawing-canvas JSON export. Only objects
    /// of type `rect` are kept; coordinates are truncated toward zero.
    pub fn parse_canvas_json(json: &str) -> Result<Vec<ManualMask>, MaskError> {
        let document: CanvasDocument = serde_json::from_str(json)?;
        let masks = document
            .objects
            .into_iter()
            .filter(|obj| obj.kind == "rect")
            .map(|obj| ManualMask {
                bounding_box: BoundingBox::new(
                    obj.left as i32,
                    obj.top as i32,
                    obj.width.max(0.0) as u32,
                    obj.height.max(0.0) as u32,
                ),
            })
            .collect();
        Ok(masks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_clips_to_image() {
        let region = MaskRegion::from_box(&BoundingBox::new(-5, 90, 20, 30));
        let rect = region.clip(100, 100).unwrap();
        assert_eq!((rect.left(), rect.top()), (0, 90));
        assert_eq!((rect.width(), rect.height()), (15, 10));
    }

    #[test]
    fn test_region_outside_image_is_empty() {
        let region = MaskRegion::from_box(&BoundingBox::new(200, 200, 10, 10));
        assert!(region.clip(100, 100).is_none());
    }

    #[test]
    fn test_degenerate_region_is_empty() {
        let bbox = BoundingBox::new(10, 10, 0, 25);
        assert!(bbox.is_degenerate());
        assert!(MaskRegion::from_box(&bbox).clip(100, 100).is_none());
    }

    #[test]
    fn test_huge_box_does_not_overflow() {
        let region = MaskRegion::from_box(&BoundingBox::new(i32::MAX, 0, u32::MAX, 1));
        assert_eq!(region.x1, i64::from(i32::MAX) + i64::from(u32::MAX));
        assert!(region.clip(100, 100).is_none());
    }

    #[test]
    fn test_parse_canvas_keeps_only_rects() {
        let json = r#"{
            "version": "4.4.0",
            "objects": [
                {"type": "rect", "left": 10.7, "top": 20.2, "width": 30.9, "height": 5.0},
                {"type": "path", "left": 1, "top": 1, "width": 1, "height": 1},
                {"type": "rect", "left": 0, "top": 0, "width": 4, "height": 4}
            ]
        }"#;
        let masks = ManualMask::parse_canvas_json(json).unwrap();
        assert_eq!(masks.len(), 2);
        assert_eq!(masks[0].bounding_box, BoundingBox::new(10, 20, 30, 5));
        assert_eq!(masks[1].bounding_box, BoundingBox::new(0, 0, 4, 4));
    }

    #[test]
    fn test_parse_canvas_rejects_garbage() {
        let err = ManualMask::parse_canvas_json("not json").unwrap_err();
        assert_eq!(err.kind(), crate::utils::ErrorKind::ManualMask);
    }
}
