//! Drag gestures.
//!
//! `Draggable` owns the drag lifecycle of every element bound to it:
//!
//! - **start**: `dragging = true`, capture the pointer-to-center offset
//! - **move**: translate the group so the grab point stays under the pointer
//! - **end**: `dragging = false`
//!
//! Only the rendered group moves. The node's `ViewBox` and anchors keep
//! their pre-drag values; use [`reconciled_view_box`] to build a view box
//! at the dragged position when the caller wants to persist it.

use dn_core::{ElementId, InteractiveNode, NodeError, NodeId, RenderSurface, ViewBox};
use kurbo::{Point, Vec2};
use std::collections::HashMap;

use crate::input::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveDrag {
    node: NodeId,
    element: ElementId,
    /// Translation of the element when the gesture started.
    start_translation: Vec2,
}

#[derive(Debug, Default)]
pub struct Draggable {
    handlers: HashMap<ElementId, NodeId>,
    active: Option<ActiveDrag>,
}

impl Draggable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a drag-start handler for `element` on behalf of `node`.
    pub fn bind(&mut self, node: NodeId, element: ElementId) {
        log::trace!("drag: bind {node} to {element:?}");
        self.handlers.insert(element, node);
    }

    /// Drop the handler for `element`. An in-flight drag on it is abandoned;
    /// the node's `dragging` flag is left for its owner to clear.
    pub fn unbind(&mut self, element: ElementId) -> bool {
        if self.active.is_some_and(|a| a.element == element) {
            self.active = None;
        }
        self.handlers.remove(&element).is_some()
    }

    pub fn has_handler(&self, element: ElementId) -> bool {
        self.handlers.contains_key(&element)
    }

    pub fn node_for(&self, element: ElementId) -> Option<NodeId> {
        self.handlers.get(&element).copied()
    }

    /// The node being dragged, if a gesture is in progress.
    pub fn active_node(&self) -> Option<NodeId> {
        self.active.map(|a| a.node)
    }

    /// Begin a drag of `node` with the pointer at `pointer`.
    ///
    /// Returns `false` (and changes nothing) when the node's group has no
    /// drag handler or a drag is already running.
    pub fn start(
        &mut self,
        node: &mut dyn InteractiveNode,
        surface: &dyn RenderSurface,
        pointer: Point,
    ) -> Result<bool, NodeError> {
        let Some(element) = node.group().filter(|el| self.has_handler(*el)) else {
            return Ok(false);
        };
        if self.active.is_some() {
            return Ok(false);
        }
        let (tx, ty) = surface.translation(element)?;
        let rendered = node.view_box().center() + Vec2::new(tx, ty);

        let state = node.state_mut();
        state.dragging = true;
        state.offset_x = pointer.x - rendered.x;
        state.offset_y = pointer.y - rendered.y;

        self.active = Some(ActiveDrag {
            node: node.id(),
            element,
            start_translation: Vec2::new(tx, ty),
        });
        log::debug!("drag: start {} at {pointer:?}", node.id());
        Ok(true)
    }

    /// Follow the pointer. Returns the element's new translation, or `None`
    /// when no drag of `node` is in progress.
    ///
    /// Holding Shift locks the motion to the dominant axis, measured from
    /// where the gesture started.
    pub fn drag_to(
        &mut self,
        node: &mut dyn InteractiveNode,
        surface: &mut dyn RenderSurface,
        pointer: Point,
        modifiers: Modifiers,
    ) -> Result<Option<Vec2>, NodeError> {
        let Some(active) = self.active.filter(|a| a.node == node.id()) else {
            return Ok(None);
        };
        if !node.state().dragging {
            return Ok(None);
        }
        let state = node.state();
        let center = pointer - Vec2::new(state.offset_x, state.offset_y);
        let mut translation = center - node.view_box().center();

        if modifiers.shift {
            let delta = translation - active.start_translation;
            if delta.x.abs() > delta.y.abs() {
                translation.y = active.start_translation.y;
            } else {
                translation.x = active.start_translation.x;
            }
        }

        surface.translate(active.element, translation.x, translation.y)?;
        log::trace!("drag: {} -> {translation:?}", node.id());
        Ok(Some(translation))
    }

    /// Finish the drag of `node`. Returns whether a drag was running.
    pub fn end(&mut self, node: &mut dyn InteractiveNode) -> bool {
        match self.active {
            Some(a) if a.node == node.id() => {
                self.active = None;
                node.state_mut().dragging = false;
                log::debug!("drag: end {}", node.id());
                true
            }
            _ => false,
        }
    }
}

/// The node's view box moved to where its group is currently rendered.
pub fn reconciled_view_box(
    node: &dyn InteractiveNode,
    surface: &dyn RenderSurface,
) -> Result<ViewBox, NodeError> {
    let group = node
        .group()
        .ok_or_else(|| NodeError::NotAttached(node.id().to_string()))?;
    let (tx, ty) = surface.translation(group)?;
    let mut vb = node.view_box().clone();
    vb.x += tx;
    vb.y += ty;
    Ok(vb)
}
