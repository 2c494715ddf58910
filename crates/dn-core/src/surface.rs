//! The rendering surface a node draws itself onto.
//!
//! Nodes never talk to SVG or a canvas directly. They ask a
//! [`RenderSurface`] to create groups, draw primitives, position and style
//! them, and toggle visibility. All calls are synchronous; reapplying a call
//! with the same arguments leaves the surface unchanged.

use crate::config::Color;
use crate::error::SurfaceError;
use kurbo::Point;
use smallvec::SmallVec;
use std::fmt;

/// Opaque handle to an element owned by a surface.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el{}", self.0)
    }
}

/// Something a surface can draw. Shapes are drawn at the origin and then
/// placed with [`RenderSurface::move_to`] / [`RenderSurface::center`].
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Group,
    Rect {
        width: f64,
        height: f64,
        corner_radius: f64,
    },
    Ellipse {
        rx: f64,
        ry: f64,
    },
    Circle {
        diameter: f64,
    },
    /// Closed polygon, points relative to the element's top-left.
    Polygon {
        points: SmallVec<[Point; 4]>,
    },
    Text {
        content: String,
    },
}

impl Primitive {
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Group => "group",
            Primitive::Rect { .. } => "rect",
            Primitive::Ellipse { .. } => "ellipse",
            Primitive::Circle { .. } => "circle",
            Primitive::Polygon { .. } => "polygon",
            Primitive::Text { .. } => "text",
        }
    }
}

/// Presentation attributes. `None` leaves the current value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Attributes {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: Option<f64>,
}

impl Attributes {
    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn stroke(mut self, color: Color) -> Self {
        self.stroke = Some(color);
        self
    }

    pub fn stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    /// Overlay `other` onto `self`; set fields in `other` win.
    pub fn merge(&mut self, other: &Attributes) {
        if other.fill.is_some() {
            self.fill = other.fill;
        }
        if other.stroke.is_some() {
            self.stroke = other.stroke;
        }
        if other.stroke_width.is_some() {
            self.stroke_width = other.stroke_width;
        }
    }
}

/// Drawing capability consumed by nodes.
///
/// Every method fails with [`SurfaceError::UnknownElement`] when handed a
/// handle that is not live.
pub trait RenderSurface {
    /// Root container that top-level nodes attach into.
    fn root(&self) -> ElementId;

    /// Create an empty child group of `parent`.
    fn create_group(&mut self, parent: ElementId) -> Result<ElementId, SurfaceError>;

    /// Draw `primitive` as a child of `parent`, at the origin.
    fn draw(&mut self, parent: ElementId, primitive: Primitive) -> Result<ElementId, SurfaceError>;

    /// Place the element's top-left corner at `(x, y)`.
    fn move_to(&mut self, el: ElementId, x: f64, y: f64) -> Result<(), SurfaceError>;

    /// Place the element's center at `(x, y)`.
    fn center(&mut self, el: ElementId, x: f64, y: f64) -> Result<(), SurfaceError>;

    fn set_attributes(&mut self, el: ElementId, attrs: &Attributes) -> Result<(), SurfaceError>;

    fn hide(&mut self, el: ElementId) -> Result<(), SurfaceError>;

    fn show(&mut self, el: ElementId) -> Result<(), SurfaceError>;

    /// Own visibility flag of the element (ancestors not considered).
    fn is_visible(&self, el: ElementId) -> Result<bool, SurfaceError>;

    fn set_cursor(&mut self, el: ElementId, cursor: &str) -> Result<(), SurfaceError>;

    /// Set the element's translation to `(dx, dy)`, replacing any previous
    /// translation.
    fn translate(&mut self, el: ElementId, dx: f64, dy: f64) -> Result<(), SurfaceError>;

    fn translation(&self, el: ElementId) -> Result<(f64, f64), SurfaceError>;

    /// Destroy the element and everything under it.
    fn remove(&mut self, el: ElementId) -> Result<(), SurfaceError>;
}
