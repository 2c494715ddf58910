//! Caller-supplied node descriptors.
//!
//! A [`ViewBox`] places a node on the canvas: a center point, an extent,
//! an optional label, and whether the node may be dragged. It is a plain
//! value. Resizing a node means handing it a new `ViewBox` and letting the
//! node recompute its anchors; nothing derived from it is patched in place.

use crate::error::NodeError;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewBox {
    /// Center x, in surface units.
    pub x: f64,
    /// Center y, in surface units.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub is_draggable: bool,
}

impl ViewBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            text: None,
            is_draggable: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.is_draggable = draggable;
        self
    }

    /// The label to render, if any. An empty string counts as no label.
    pub fn label(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Axis-aligned bounds around the center.
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center(), (self.width, self.height))
    }

    /// Check the geometric preconditions: finite center, finite and
    /// non-negative extents. Zero extents are valid (label-only markers).
    pub fn validate(&self) -> Result<(), NodeError> {
        for (field, value) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !value.is_finite() {
                return Err(NodeError::NonFiniteGeometry { field, value });
            }
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(NodeError::InvalidExtent {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}
