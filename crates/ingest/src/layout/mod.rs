//! Page layout model: blocks of lines of spans, each with a bounding box.
//!
//! The serde shape follows the common "dict" layout dump:
//! `{"bbox": [x0, y0, x1, y1], "text": "...", "lines": [{"spans": [{"text": "..."}]}]}`.
//! Coordinates are in page points with the origin at the top-left corner.

mod reader;

pub use reader::PdfDocument;

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, serialized as `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// True when the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// True when both rectangles are non-empty and their interiors overlap.
    ///
    /// Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x0 < other.x1
            && other.x0 < self.x1
            && self.y0 < other.y1
            && other.y0 < self.y1
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

impl From<[f32; 4]> for Rect {
    fn from(v: [f32; 4]) -> Self {
        Rect::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Rect> for [f32; 4] {
    fn from(r: Rect) -> Self {
        [r.x0, r.y0, r.x1, r.y1]
    }
}

/// A run of text drawn with one font.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Span {
    pub text: String,

    #[serde(default)]
    pub font: String,

    #[serde(default)]
    pub size: f32,

    #[serde(default)]
    pub bbox: Rect,
}

/// Spans sharing one baseline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    #[serde(default)]
    pub bbox: Rect,

    pub spans: Vec<Span>,
}

/// One region of a page.
///
/// A block carries flat `text`, structured `lines`, both, or neither
/// (e.g. an image region).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutBlock {
    pub bbox: Rect,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<Line>,
}

impl LayoutBlock {
    /// Block with flat text only.
    pub fn with_text(bbox: Rect, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: Some(text.into()),
            lines: Vec::new(),
        }
    }

    /// Block with line/span structure only.
    pub fn with_lines(bbox: Rect, lines: Vec<Line>) -> Self {
        Self {
            bbox,
            text: None,
            lines,
        }
    }

    pub fn has_lines(&self) -> bool {
        !self.lines.is_empty()
    }
}

/// Layout of one page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub blocks: Vec<LayoutBlock>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 15.0, 15.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_empty_rect_never_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let empty = Rect::new(5.0, 5.0, 5.0, 8.0);
        assert!(empty.is_empty());
        assert!(!a.intersects(&empty));
    }

    #[test]
    fn test_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, -5.0, 20.0, 8.0);
        assert_eq!(a.union(&b), Rect::new(0.0, -5.0, 20.0, 10.0));
        assert_eq!(Rect::default().union(&a), a);
    }

    #[test]
    fn test_block_deserialize_dict_shape() {
        let block: LayoutBlock = serde_json::from_value(serde_json::json!({
            "bbox": [10.0, 20.0, 200.0, 40.0],
            "lines": [{"spans": [{"text": "Name"}, {"text": "Value"}]}]
        }))
        .unwrap();

        assert_eq!(block.bbox, Rect::new(10.0, 20.0, 200.0, 40.0));
        assert!(block.text.is_none());
        assert_eq!(block.lines[0].spans[1].text, "Value");
    }

    #[test]
    fn test_block_serialize_skips_missing_parts() {
        let block = LayoutBlock::with_text(Rect::new(0.0, 0.0, 1.0, 1.0), "hi");
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"bbox": [0.0, 0.0, 1.0, 1.0], "text": "hi"})
        );
    }
}
