//! Error types for node attachment, rendering surfaces, and theme loading.
//!
//! Every failure in this crate is a caller error or a missing capability.
//! Nothing here is retryable, so errors are surfaced synchronously to the
//! immediate caller.

use crate::surface::ElementId;
use thiserror::Error;

/// Failures reported by a [`RenderSurface`](crate::surface::RenderSurface).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    /// The handle does not name a live element (never created, or removed).
    #[error("unknown element {0:?}")]
    UnknownElement(ElementId),

    /// The parent handle exists but cannot hold children.
    #[error("element {0:?} is not a container")]
    NotAContainer(ElementId),
}

/// Failures reported while attaching or updating a node.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NodeError {
    #[error("negative extent {width}x{height}: width and height must be >= 0")]
    InvalidExtent { width: f64, height: f64 },

    #[error("non-finite geometry in `{field}` ({value})")]
    NonFiniteGeometry { field: &'static str, value: f64 },

    #[error("screw inset must be finite and >= 0, got {0}")]
    InvalidScrew(f64),

    /// `attach` was called on a node that already owns a rendered group.
    #[error("node {0} is already attached to group {1:?}")]
    AlreadyAttached(String, ElementId),

    #[error("node {0} has not been attached")]
    NotAttached(String),

    /// The shape variant failed to produce its outline.
    #[error("`{kind}` outline failed: {reason}")]
    Outline { kind: &'static str, reason: String },

    #[error("binding `{capability}` failed: {reason}")]
    Bind {
        capability: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Failures while loading a [`NodeTheme`](crate::config::NodeTheme).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid theme JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid color `{value}` for `{field}`")]
    Color { field: &'static str, value: String },

    #[error("`{field}` must be finite and >= 0, got {value}")]
    Negative { field: &'static str, value: f64 },
}
