//! Shape variants: the one thing that differs between node kinds.
//!
//! A variant draws its outline into the node's group at the origin, sized
//! from the view box. Placement, centering and default styling are applied
//! afterwards by [`Node`](crate::node::Node), the same way for every
//! variant, so an outline never positions itself.

use crate::error::NodeError;
use crate::model::ViewBox;
use crate::surface::{Attributes, ElementId, Primitive, RenderSurface};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use smallvec::smallvec;

pub trait Outline {
    /// Short name used in ids and error messages.
    fn kind(&self) -> &'static str;

    /// Draw the outline into `group` and return the drawn element.
    fn draw_outline(
        &self,
        surface: &mut dyn RenderSurface,
        group: ElementId,
        view_box: &ViewBox,
    ) -> Result<ElementId, NodeError>;

    /// Shape-specific presentation layered over the theme defaults.
    fn style(&self) -> Attributes {
        Attributes::default()
    }
}

/// Built-in node shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum ShapeKind {
    /// Process box.
    Rect,
    RoundedRect { radius: f64 },
    Ellipse,
    /// Decision.
    Diamond,
    /// Start/end pill, corner radius is half the height.
    Terminal,
}

impl Outline for ShapeKind {
    fn kind(&self) -> &'static str {
        match self {
            ShapeKind::Rect => "rect",
            ShapeKind::RoundedRect { .. } => "rounded_rect",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Terminal => "terminal",
        }
    }

    fn draw_outline(
        &self,
        surface: &mut dyn RenderSurface,
        group: ElementId,
        view_box: &ViewBox,
    ) -> Result<ElementId, NodeError> {
        let (w, h) = (view_box.width, view_box.height);
        let primitive = match *self {
            ShapeKind::Rect => Primitive::Rect {
                width: w,
                height: h,
                corner_radius: 0.0,
            },
            ShapeKind::RoundedRect { radius } => Primitive::Rect {
                width: w,
                height: h,
                corner_radius: radius.max(0.0).min(w.min(h) / 2.0),
            },
            ShapeKind::Terminal => Primitive::Rect {
                width: w,
                height: h,
                corner_radius: h / 2.0,
            },
            ShapeKind::Ellipse => Primitive::Ellipse {
                rx: w / 2.0,
                ry: h / 2.0,
            },
            ShapeKind::Diamond => Primitive::Polygon {
                points: smallvec![
                    Point::new(w / 2.0, 0.0),
                    Point::new(w, h / 2.0),
                    Point::new(w / 2.0, h),
                    Point::new(0.0, h / 2.0),
                ],
            },
        };
        Ok(surface.draw(group, primitive)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn kinds_round_trip_through_json() {
        let shapes = vec![
            ShapeKind::Rect,
            ShapeKind::RoundedRect { radius: 6.0 },
            ShapeKind::Diamond,
        ];
        let json = serde_json::to_string(&shapes).unwrap();
        assert_eq!(
            json,
            r#"[{"shape":"rect"},{"shape":"roundedRect","radius":6.0},{"shape":"diamond"}]"#
        );
        let back: Vec<ShapeKind> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shapes);
    }

    #[test]
    fn builtins_have_no_style_override() {
        assert_eq!(ShapeKind::Ellipse.style(), Attributes::default());
        assert_eq!(ShapeKind::Terminal.kind(), "terminal");
    }
}
