//! Pointer dispatch for bound nodes.
//!
//! `Interactions` is the binder handed to `Node::attach` and the single
//! entry point for pointer events afterwards. Each event is hit-tested
//! against the scene, routed to the node whose group was hit, and turned
//! into zero or more [`InteractionOutcome`]s for the host to act on
//! (redraw a wire, persist a position, add an edge).
//!
//! A press on a visible anchor starts a connection; any other press on a
//! draggable node starts a drag.

use dn_core::{ElementId, InteractionBinder, NodeError, NodeId};
use dn_render::{Scene, hit_owner};
use kurbo::Vec2;

use crate::connect::{Connectable, Connection, Endpoint};
use crate::drag::Draggable;
use crate::input::InputEvent;
use crate::registry::NodeRegistry;

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    HoverChanged { node: Option<NodeId> },
    DragStarted { node: NodeId },
    Dragged { node: NodeId, translation: Vec2 },
    DragEnded { node: NodeId },
    ConnectionStarted { from: Endpoint },
    Connected(Connection),
    ConnectionCancelled,
}

#[derive(Debug, Default)]
pub struct Interactions {
    pub connect: Connectable,
    pub drag: Draggable,
}

/// An element serves one node; rebinding it to another is refused.
fn check_free(
    capability: &'static str,
    element: ElementId,
    node: NodeId,
    owner: Option<NodeId>,
) -> Result<(), NodeError> {
    match owner {
        Some(other) if other != node => Err(NodeError::Bind {
            capability,
            reason: format!("{element:?} is already bound to {other}"),
        }),
        _ => Ok(()),
    }
}

impl InteractionBinder for Interactions {
    fn bind_connectable(&mut self, node: NodeId, element: ElementId) -> Result<(), NodeError> {
        check_free("connect", element, node, self.connect.node_for(element))?;
        self.connect.bind(node, element);
        Ok(())
    }

    fn bind_draggable(&mut self, node: NodeId, element: ElementId) -> Result<(), NodeError> {
        check_free("drag", element, node, self.drag.node_for(element))?;
        self.drag.bind(node, element);
        Ok(())
    }
}

impl Interactions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every binding on `element`, e.g. before destroying a node.
    /// Anchors the node was showing are hidden.
    pub fn unbind(
        &mut self,
        element: ElementId,
        nodes: &mut dyn NodeRegistry,
        scene: &mut Scene,
    ) -> Result<(), NodeError> {
        self.connect.unbind(element, nodes, scene)?;
        self.drag.unbind(element);
        Ok(())
    }

    /// The bound node under the pointer, if any.
    fn target(&self, scene: &Scene, event: &InputEvent) -> Option<(NodeId, ElementId)> {
        let p = event.position();
        let group = hit_owner(scene, p.x, p.y, |el| self.connect.is_bound(el))?;
        self.connect.node_for(group).map(|node| (node, group))
    }

    /// Route one pointer event.
    ///
    /// # Errors
    /// Surface errors from showing, hiding or translating groups.
    pub fn dispatch(
        &mut self,
        event: &InputEvent,
        nodes: &mut dyn NodeRegistry,
        scene: &mut Scene,
    ) -> Result<Vec<InteractionOutcome>, NodeError> {
        let pointer = event.position();
        let target = self.target(scene, event);
        let target_id = target.map(|(id, _)| id);
        let mut out = Vec::new();

        match event {
            InputEvent::PointerDown { .. } => {
                if let Some(from) = self.connect.begin(target_id, pointer, nodes, &*scene)? {
                    out.push(InteractionOutcome::ConnectionStarted { from });
                } else if let Some((id, group)) = target
                    && self.drag.has_handler(group)
                    && let Some(node) = nodes.node_mut(id)
                    && self.drag.start(node, &*scene, pointer)?
                {
                    // anchors stay hidden while the node moves
                    self.connect.hover(None, nodes, scene)?;
                    out.push(InteractionOutcome::DragStarted { node: id });
                }
            }
            InputEvent::PointerMove { modifiers, .. } => {
                if let Some(id) = self.drag.active_node() {
                    if let Some(node) = nodes.node_mut(id)
                        && let Some(translation) =
                            self.drag.drag_to(node, scene, pointer, *modifiers)?
                    {
                        out.push(InteractionOutcome::Dragged {
                            node: id,
                            translation,
                        });
                    }
                } else {
                    self.connect.track(pointer);
                    if self.connect.hover(target_id, nodes, scene)? {
                        out.push(InteractionOutcome::HoverChanged { node: target_id });
                    }
                }
            }
            InputEvent::PointerUp { .. } => {
                if let Some(id) = self.drag.active_node()
                    && let Some(node) = nodes.node_mut(id)
                    && self.drag.end(node)
                {
                    out.push(InteractionOutcome::DragEnded { node: id });
                }
                match self.connect.finish(target_id, pointer, nodes, scene)? {
                    Some(Some(connection)) => out.push(InteractionOutcome::Connected(connection)),
                    Some(None) => out.push(InteractionOutcome::ConnectionCancelled),
                    None => {}
                }
            }
        }
        Ok(out)
    }
}
