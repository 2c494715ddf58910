pub mod anchor;
pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod node;
pub mod shape;
pub mod surface;

#[cfg(test)]
mod testing;

pub use anchor::{AnchorSet, AnchorSide, compute_anchors, screw_inset, try_compute_anchors};
pub use config::{Color, NodeTheme};
pub use error::{ConfigError, NodeError, SurfaceError};
pub use id::NodeId;
pub use model::ViewBox;
pub use node::{
    AnchorGroup, InteractionBinder, InteractiveNode, NoInteraction, Node, NodeState,
};
pub use shape::{Outline, ShapeKind};
pub use surface::{Attributes, ElementId, Primitive, RenderSurface};

// Re-export kurbo's point so downstream crates share one geometry type.
pub use kurbo::Point;
