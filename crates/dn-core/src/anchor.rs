//! Connection anchors derived from a node's box.
//!
//! Every node exposes four anchors: top and bottom on the vertical midline
//! at the box's vertical extremes, left and right on the horizontal midline
//! pulled inward by the screw inset. Connector routing reads these points;
//! it never writes them.

use crate::error::NodeError;
use crate::model::ViewBox;
use kurbo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl AnchorSide {
    /// Render order of the anchor marks.
    pub const ALL: [AnchorSide; 4] = [
        AnchorSide::Top,
        AnchorSide::Right,
        AnchorSide::Bottom,
        AnchorSide::Left,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnchorSide::Top => "top",
            AnchorSide::Right => "right",
            AnchorSide::Bottom => "bottom",
            AnchorSide::Left => "left",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            AnchorSide::Top => 0,
            AnchorSide::Right => 1,
            AnchorSide::Bottom => 2,
            AnchorSide::Left => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorSet {
    pub top: Point,
    pub right: Point,
    pub bottom: Point,
    pub left: Point,
}

impl AnchorSet {
    pub fn get(&self, side: AnchorSide) -> Point {
        match side {
            AnchorSide::Top => self.top,
            AnchorSide::Right => self.right,
            AnchorSide::Bottom => self.bottom,
            AnchorSide::Left => self.left,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnchorSide, Point)> + '_ {
        AnchorSide::ALL.into_iter().map(|side| (side, self.get(side)))
    }

    /// The anchor closest to `point`, if it lies within `tolerance`.
    /// Ties resolve in render order.
    pub fn nearest(&self, point: Point, tolerance: f64) -> Option<AnchorSide> {
        let mut best: Option<(AnchorSide, f64)> = None;
        for (side, p) in self.iter() {
            let d = p.distance(point);
            if d <= tolerance && best.is_none_or(|(_, bd)| d < bd) {
                best = Some((side, d));
            }
        }
        best.map(|(side, _)| side)
    }
}

/// Horizontal inset applied to the left and right anchors.
///
/// Half the screw when the screw is positive, otherwise nothing.
pub fn screw_inset(screw: f64) -> f64 {
    if screw > 0.0 { screw / 2.0 } else { 0.0 }
}

/// Compute the four anchors of `view_box`.
///
/// Precondition: `width >= 0` and `height >= 0`. This function does not
/// check; use [`try_compute_anchors`] when the inputs are untrusted.
pub fn compute_anchors(view_box: &ViewBox, screw: f64) -> AnchorSet {
    let inset = screw_inset(screw);
    let (cx, cy) = (view_box.x, view_box.y);
    let half_w = view_box.width / 2.0;
    let half_h = view_box.height / 2.0;

    AnchorSet {
        top: Point::new(cx, cy - half_h),
        right: Point::new(cx + half_w - inset, cy),
        bottom: Point::new(cx, cy + half_h),
        left: Point::new(cx - half_w + inset, cy),
    }
}

/// Checked variant of [`compute_anchors`]: rejects negative extents,
/// non-finite geometry and invalid screws instead of producing garbage.
pub fn try_compute_anchors(view_box: &ViewBox, screw: f64) -> Result<AnchorSet, NodeError> {
    view_box.validate()?;
    if !screw.is_finite() || screw < 0.0 {
        return Err(NodeError::InvalidScrew(screw));
    }
    Ok(compute_anchors(view_box, screw))
}
