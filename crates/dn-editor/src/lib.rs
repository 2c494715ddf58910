//! Pointer interaction for diagram nodes: drag to move, drag between
//! anchors to connect.

pub mod connect;
pub mod drag;
pub mod input;
pub mod interactions;
pub mod registry;

pub use connect::{ANCHOR_TOLERANCE, Connectable, Connection, ConnectionDraft, Endpoint};
pub use drag::{Draggable, reconciled_view_box};
pub use input::{InputEvent, Modifiers};
pub use interactions::{InteractionOutcome, Interactions};
pub use registry::NodeRegistry;
