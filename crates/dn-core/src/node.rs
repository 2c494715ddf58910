//! Diagram nodes: a shape variant plus the anchor, drag and connect
//! machinery every node kind shares.
//!
//! [`Node::attach`] builds the node's group on a surface:
//!
//! 1. create group `G` under the container,
//! 2. bind connect (always) and drag (when the view box allows it) to `G`,
//! 3. draw the variant's outline, center it on the view box, apply the theme,
//! 4. draw the label, when there is one,
//! 5. draw the four anchor marks into a hidden child group `A`,
//! 6. set the cursor hint on `G`.
//!
//! Anchors follow the view box and screw, not the rendered position. After a
//! drag they stay where they were until the caller hands the node a new view
//! box and calls [`Node::sync_anchor_marks`].

use crate::anchor::{AnchorSet, AnchorSide, compute_anchors, try_compute_anchors};
use crate::config::NodeTheme;
use crate::error::NodeError;
use crate::id::NodeId;
use crate::model::ViewBox;
use crate::shape::Outline;
use crate::surface::{Attributes, ElementId, Primitive, RenderSurface};

// ─── Runtime state ───────────────────────────────────────────────────────

/// The rendered, initially hidden, group of anchor marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorGroup {
    pub group: ElementId,
    /// One mark per side, indexed in [`AnchorSide::ALL`] order.
    pub marks: [ElementId; 4],
}

impl AnchorGroup {
    pub fn mark(&self, side: AnchorSide) -> ElementId {
        self.marks[side.index()]
    }
}

/// Mutable state shared with the interaction subsystem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeState {
    /// True while a drag gesture is in progress on this node.
    pub dragging: bool,
    /// Pointer-to-center offset captured at drag start.
    pub offset_x: f64,
    pub offset_y: f64,
    /// `None` until the node is attached.
    pub anchors: Option<AnchorSet>,
    pub anchor_group: Option<AnchorGroup>,
}

// ─── Interaction contract ────────────────────────────────────────────────

/// The typed view of a node handed to drag and connect capabilities.
///
/// The view box is read-only here: capabilities move the rendered group,
/// never the descriptor.
pub trait InteractiveNode {
    fn id(&self) -> NodeId;
    fn view_box(&self) -> &ViewBox;
    fn state(&self) -> &NodeState;
    fn state_mut(&mut self) -> &mut NodeState;
    /// The node's rendered group, once attached.
    fn group(&self) -> Option<ElementId>;
}

impl<N: InteractiveNode + ?Sized> InteractiveNode for Box<N> {
    fn id(&self) -> NodeId {
        (**self).id()
    }

    fn view_box(&self) -> &ViewBox {
        (**self).view_box()
    }

    fn state(&self) -> &NodeState {
        (**self).state()
    }

    fn state_mut(&mut self) -> &mut NodeState {
        (**self).state_mut()
    }

    fn group(&self) -> Option<ElementId> {
        (**self).group()
    }
}

/// Receives the bindings a node requests during [`Node::attach`].
pub trait InteractionBinder {
    fn bind_connectable(&mut self, node: NodeId, element: ElementId) -> Result<(), NodeError>;
    fn bind_draggable(&mut self, node: NodeId, element: ElementId) -> Result<(), NodeError>;
}

/// Binder for static output: accepts every binding and keeps none.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInteraction;

impl InteractionBinder for NoInteraction {
    fn bind_connectable(&mut self, _node: NodeId, _element: ElementId) -> Result<(), NodeError> {
        Ok(())
    }

    fn bind_draggable(&mut self, _node: NodeId, _element: ElementId) -> Result<(), NodeError> {
        Ok(())
    }
}

// ─── Node ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Node<S: Outline> {
    id: NodeId,
    view_box: ViewBox,
    screw: f64,
    shape: S,
    group: Option<ElementId>,
    pub state: NodeState,
}

impl<S: Outline> Node<S> {
    /// A node with a generated id such as `diamond_3`.
    pub fn new(shape: S, view_box: ViewBox) -> Self {
        let id = NodeId::fresh(shape.kind());
        Self::with_id(id, shape, view_box)
    }

    pub fn with_id(id: NodeId, shape: S, view_box: ViewBox) -> Self {
        Self {
            id,
            view_box,
            screw: 0.0,
            shape,
            group: None,
            state: NodeState::default(),
        }
    }

    /// Builder form of [`Node::set_screw`] for unattached nodes.
    pub fn with_screw(mut self, screw: f64) -> Self {
        self.screw = screw;
        self
    }

    pub fn shape(&self) -> &S {
        &self.shape
    }

    pub fn screw(&self) -> f64 {
        self.screw
    }

    pub fn is_attached(&self) -> bool {
        self.group.is_some()
    }

    pub fn anchors(&self) -> Option<&AnchorSet> {
        self.state.anchors.as_ref()
    }

    /// Attach the node into `container` and return its group.
    ///
    /// Preconditions are checked before anything is drawn. If the outline
    /// or a later drawing step fails, the group built so far stays attached
    /// and the node is considered attached; call [`Node::destroy`] to clean
    /// it up.
    ///
    /// # Errors
    /// [`NodeError::AlreadyAttached`] on a second call, geometry errors for
    /// a bad view box or screw, and any surface, binding or outline error.
    pub fn attach(
        &mut self,
        surface: &mut dyn RenderSurface,
        container: ElementId,
        binder: &mut dyn InteractionBinder,
        theme: &NodeTheme,
    ) -> Result<ElementId, NodeError> {
        if let Some(group) = self.group {
            return Err(NodeError::AlreadyAttached(self.id.to_string(), group));
        }
        let anchors = try_compute_anchors(&self.view_box, self.screw)?;
        let (x, y) = (self.view_box.x, self.view_box.y);

        let group = surface.create_group(container)?;
        self.group = Some(group);
        log::debug!("attach {} as {group:?} under {container:?}", self.id);

        binder.bind_connectable(self.id, group)?;
        if self.view_box.is_draggable {
            binder.bind_draggable(self.id, group)?;
        }

        let outline = self.shape.draw_outline(surface, group, &self.view_box)?;
        surface.move_to(outline, x, y)?;
        surface.center(outline, x, y)?;
        let mut attrs = Attributes::default()
            .fill(theme.outline_fill)
            .stroke(theme.outline_stroke);
        attrs.merge(&self.shape.style());
        surface.set_attributes(outline, &attrs)?;

        if let Some(text) = self.view_box.label() {
            let label = surface.draw(
                group,
                Primitive::Text {
                    content: text.to_string(),
                },
            )?;
            surface.move_to(label, x, y)?;
            surface.center(label, x, y)?;
        }

        let anchor_group = self.render_anchor_marks(surface, group, &anchors, theme)?;
        self.state.anchors = Some(anchors);
        self.state.anchor_group = Some(anchor_group);

        surface.set_cursor(group, &theme.cursor)?;
        Ok(group)
    }

    fn render_anchor_marks(
        &self,
        surface: &mut dyn RenderSurface,
        parent: ElementId,
        anchors: &AnchorSet,
        theme: &NodeTheme,
    ) -> Result<AnchorGroup, NodeError> {
        let group = surface.create_group(parent)?;
        let attrs = Attributes::default()
            .fill(theme.anchor_fill)
            .stroke(theme.anchor_stroke)
            .stroke_width(theme.anchor_stroke_width);

        let mut marks = [group; 4];
        for (side, p) in anchors.iter() {
            let mark = surface.draw(
                group,
                Primitive::Circle {
                    diameter: theme.anchor_diameter,
                },
            )?;
            surface.move_to(mark, p.x, p.y)?;
            surface.center(mark, p.x, p.y)?;
            surface.set_attributes(mark, &attrs)?;
            marks[side.index()] = mark;
        }
        surface.hide(group)?;
        Ok(AnchorGroup { group, marks })
    }

    /// Replace the screw inset. Anchors are recomputed when attached.
    pub fn set_screw(&mut self, screw: f64) -> Result<(), NodeError> {
        if self.group.is_some() {
            self.state.anchors = Some(try_compute_anchors(&self.view_box, screw)?);
        }
        self.screw = screw;
        Ok(())
    }

    /// Replace the view box. Anchors are recomputed when attached; the
    /// rendered outline is left alone, so re-attach a fresh node to redraw.
    pub fn set_view_box(&mut self, view_box: ViewBox) -> Result<(), NodeError> {
        if self.group.is_some() {
            self.state.anchors = Some(try_compute_anchors(&view_box, self.screw)?);
        }
        self.view_box = view_box;
        Ok(())
    }

    /// Re-center the rendered anchor marks on the current anchors.
    pub fn sync_anchor_marks(&self, surface: &mut dyn RenderSurface) -> Result<(), NodeError> {
        let (Some(anchors), Some(ag)) = (self.state.anchors, self.state.anchor_group) else {
            return Err(NodeError::NotAttached(self.id.to_string()));
        };
        for (side, p) in anchors.iter() {
            let mark = ag.mark(side);
            surface.move_to(mark, p.x, p.y)?;
            surface.center(mark, p.x, p.y)?;
        }
        Ok(())
    }

    /// Anchors as they would be for the current inputs, attached or not.
    pub fn preview_anchors(&self) -> AnchorSet {
        compute_anchors(&self.view_box, self.screw)
    }

    /// Remove the node's group (and with it the anchor group) from the
    /// surface. The node can be attached again afterwards. If the surface
    /// refuses, the node stays attached.
    pub fn destroy(&mut self, surface: &mut dyn RenderSurface) -> Result<(), NodeError> {
        let group = self
            .group
            .ok_or_else(|| NodeError::NotAttached(self.id.to_string()))?;
        surface.remove(group)?;
        self.group = None;
        self.state = NodeState::default();
        log::debug!("destroyed {} ({group:?})", self.id);
        Ok(())
    }
}

impl<S: Outline> InteractiveNode for Node<S> {
    fn id(&self) -> NodeId {
        self.id
    }

    fn view_box(&self) -> &ViewBox {
        &self.view_box
    }

    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn group(&self) -> Option<ElementId> {
        self.group
    }
}
