//! Connection gestures between node anchors.
//!
//! Hovering a bound node reveals its anchor group. Pressing near one of its
//! anchors starts a [`ConnectionDraft`]; releasing near an anchor of a
//! different node completes a [`Connection`], releasing anywhere else
//! cancels it. Anchors are read from the node's state and never written,
//! and the view box is never touched.

use dn_core::{
    AnchorSide, ElementId, InteractiveNode, NodeError, NodeId, RenderSurface, SurfaceError,
};
use kurbo::Point;
use std::collections::HashMap;

use crate::registry::NodeRegistry;

/// Pick radius around an anchor, in surface units.
pub const ANCHOR_TOLERANCE: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint {
    pub node: NodeId,
    pub side: AnchorSide,
    pub point: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub from: Endpoint,
    pub to: Endpoint,
}

/// A connection being drawn: fixed start, free end under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionDraft {
    pub from: Endpoint,
    pub cursor: Point,
}

#[derive(Debug, Default)]
pub struct Connectable {
    bound: HashMap<ElementId, NodeId>,
    hovered: Option<NodeId>,
    draft: Option<ConnectionDraft>,
}

impl Connectable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, node: NodeId, element: ElementId) {
        log::trace!("connect: bind {node} to {element:?}");
        self.bound.insert(element, node);
    }

    /// Forget `element`. Hover and draft state that referred to it is
    /// cleared and the node's anchors are hidden again.
    pub fn unbind(
        &mut self,
        element: ElementId,
        nodes: &mut dyn NodeRegistry,
        surface: &mut dyn RenderSurface,
    ) -> Result<bool, NodeError> {
        let Some(node) = self.bound.remove(&element) else {
            return Ok(false);
        };
        let mut shown = false;
        if self.hovered == Some(node) {
            self.hovered = None;
            shown = true;
        }
        if self.draft.is_some_and(|d| d.from.node == node) {
            self.draft = None;
            shown = true;
        }
        if shown {
            hide_anchors(nodes, node, surface)?;
        }
        Ok(true)
    }

    pub fn is_bound(&self, element: ElementId) -> bool {
        self.bound.contains_key(&element)
    }

    pub fn node_for(&self, element: ElementId) -> Option<NodeId> {
        self.bound.get(&element).copied()
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn draft(&self) -> Option<&ConnectionDraft> {
        self.draft.as_ref()
    }

    /// Move hover to `target`, hiding the previous node's anchors and
    /// revealing the new one's. A node being dragged keeps its anchors
    /// hidden. Returns whether the hovered node changed.
    pub fn hover(
        &mut self,
        target: Option<NodeId>,
        nodes: &mut dyn NodeRegistry,
        surface: &mut dyn RenderSurface,
    ) -> Result<bool, NodeError> {
        if self.hovered == target {
            return Ok(false);
        }
        let keep_shown = self.draft.map(|d| d.from.node);
        if let Some(prev) = self.hovered.take()
            && Some(prev) != keep_shown
            && let Some(node) = nodes.node_mut(prev)
        {
            set_anchors_visible(node, surface, false)?;
        }
        if let Some(id) = target
            && let Some(node) = nodes.node_mut(id)
            && !node.state().dragging
        {
            set_anchors_visible(node, surface, true)?;
        }
        log::trace!("connect: hover {target:?}");
        self.hovered = target;
        Ok(true)
    }

    /// Pointer pressed over `target` (or the hovered node). Starts a draft
    /// when the press lands on one of that node's visible anchors.
    pub fn begin(
        &mut self,
        target: Option<NodeId>,
        pointer: Point,
        nodes: &mut dyn NodeRegistry,
        surface: &dyn RenderSurface,
    ) -> Result<Option<Endpoint>, NodeError> {
        if self.draft.is_some() {
            return Ok(None);
        }
        let Some(id) = target.or(self.hovered) else {
            return Ok(None);
        };
        let Some(node) = nodes.node_mut(id) else {
            return Ok(None);
        };
        if node.state().dragging || !anchors_visible(node, surface)? {
            return Ok(None);
        }
        let Some(from) = pick(node, pointer) else {
            return Ok(None);
        };
        log::debug!("connect: start at {} {}", from.node, from.side.as_str());
        self.draft = Some(ConnectionDraft {
            from,
            cursor: pointer,
        });
        Ok(Some(from))
    }

    /// Track the free end of the draft. Returns false when no draft is open.
    pub fn track(&mut self, pointer: Point) -> bool {
        match self.draft.as_mut() {
            Some(d) => {
                d.cursor = pointer;
                true
            }
            None => false,
        }
    }

    /// Pointer released over `target` (or the hovered node).
    ///
    /// `Ok(None)` when there was no draft. `Ok(Some(None))` when the draft
    /// was cancelled: released away from any anchor, or back on its own node.
    /// Either way the source's anchors are hidden unless it is still hovered.
    pub fn finish(
        &mut self,
        target: Option<NodeId>,
        pointer: Point,
        nodes: &mut dyn NodeRegistry,
        surface: &mut dyn RenderSurface,
    ) -> Result<Option<Option<Connection>>, NodeError> {
        let Some(draft) = self.draft.take() else {
            return Ok(None);
        };
        let to = match target.or(self.hovered).filter(|id| *id != draft.from.node) {
            Some(id) => nodes.node_mut(id).and_then(|node| pick(node, pointer)),
            None => None,
        };
        if self.hovered != Some(draft.from.node) {
            hide_anchors(nodes, draft.from.node, surface)?;
        }

        match to {
            Some(to) => {
                log::debug!(
                    "connect: {} {} -> {} {}",
                    draft.from.node,
                    draft.from.side.as_str(),
                    to.node,
                    to.side.as_str()
                );
                Ok(Some(Some(Connection {
                    from: draft.from,
                    to,
                })))
            }
            None => {
                log::debug!("connect: cancelled from {}", draft.from.node);
                Ok(Some(None))
            }
        }
    }
}

fn pick(node: &dyn InteractiveNode, pointer: Point) -> Option<Endpoint> {
    let anchors = node.state().anchors?;
    let side = anchors.nearest(pointer, ANCHOR_TOLERANCE)?;
    Some(Endpoint {
        node: node.id(),
        side,
        point: anchors.get(side),
    })
}

fn anchors_visible(node: &dyn InteractiveNode, surface: &dyn RenderSurface) -> Result<bool, NodeError> {
    match node.state().anchor_group {
        Some(ag) => Ok(surface.is_visible(ag.group)?),
        None => Ok(false),
    }
}

/// Hide `id`'s anchors. A node whose group is already gone from the
/// surface has nothing left to hide.
fn hide_anchors(
    nodes: &mut dyn NodeRegistry,
    id: NodeId,
    surface: &mut dyn RenderSurface,
) -> Result<(), NodeError> {
    let Some(node) = nodes.node_mut(id) else {
        return Ok(());
    };
    match set_anchors_visible(node, surface, false) {
        Err(NodeError::Surface(SurfaceError::UnknownElement(_))) => Ok(()),
        other => other,
    }
}

fn set_anchors_visible(
    node: &dyn InteractiveNode,
    surface: &mut dyn RenderSurface,
    visible: bool,
) -> Result<(), NodeError> {
    if let Some(ag) = node.state().anchor_group {
        if visible {
            surface.show(ag.group)?;
        } else {
            surface.hide(ag.group)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dn_core::{InteractionBinder, Node, NodeTheme, ShapeKind, ViewBox};
    use dn_render::Scene;
    use pretty_assertions::assert_eq;

    struct Bind<'a>(&'a mut Connectable);

    impl InteractionBinder for Bind<'_> {
        fn bind_connectable(&mut self, node: NodeId, element: ElementId) -> Result<(), NodeError> {
            self.0.bind(node, element);
            Ok(())
        }

        fn bind_draggable(&mut self, _: NodeId, _: ElementId) -> Result<(), NodeError> {
            Ok(())
        }
    }

    fn setup() -> (Scene, Vec<Node<ShapeKind>>, Connectable) {
        let mut scene = Scene::new();
        let mut connect = Connectable::new();
        let root = scene.root();
        let mut nodes = vec![
            Node::new(ShapeKind::Rect, ViewBox::new(100.0, 100.0, 40.0, 20.0)),
            Node::new(ShapeKind::Rect, ViewBox::new(200.0, 100.0, 40.0, 20.0)),
        ];
        for node in &mut nodes {
            node.attach(&mut scene, root, &mut Bind(&mut connect), &NodeTheme::default())
                .unwrap();
        }
        (scene, nodes, connect)
    }

    fn anchors_shown(scene: &Scene, node: &Node<ShapeKind>) -> bool {
        scene
            .is_visible(node.state.anchor_group.unwrap().group)
            .unwrap()
    }

    #[test]
    fn hover_reveals_and_hides_anchors() {
        let (mut scene, mut nodes, mut connect) = setup();
        let (a, b) = (nodes[0].id(), nodes[1].id());

        assert!(connect.hover(Some(a), &mut nodes, &mut scene).unwrap());
        assert!(anchors_shown(&scene, &nodes[0]));

        assert!(connect.hover(Some(b), &mut nodes, &mut scene).unwrap());
        assert!(!anchors_shown(&scene, &nodes[0]));
        assert!(anchors_shown(&scene, &nodes[1]));

        assert!(!connect.hover(Some(b), &mut nodes, &mut scene).unwrap());
        connect.hover(None, &mut nodes, &mut scene).unwrap();
        assert!(!anchors_shown(&scene, &nodes[1]));
    }

    #[test]
    fn dragging_node_keeps_anchors_hidden() {
        let (mut scene, mut nodes, mut connect) = setup();
        nodes[0].state.dragging = true;
        let a = nodes[0].id();
        connect.hover(Some(a), &mut nodes, &mut scene).unwrap();
        assert!(!anchors_shown(&scene, &nodes[0]));
    }

    #[test]
    fn connects_right_anchor_to_left_anchor() {
        let (mut scene, mut nodes, mut connect) = setup();
        let (a, b) = (nodes[0].id(), nodes[1].id());

        connect.hover(Some(a), &mut nodes, &mut scene).unwrap();
        let from = connect
            .begin(Some(a), Point::new(121.0, 100.0), &mut nodes, &scene)
            .unwrap()
            .unwrap();
        assert_eq!(from.side, AnchorSide::Right);
        assert_eq!(from.point, Point::new(120.0, 100.0));

        assert!(connect.track(Point::new(150.0, 100.0)));
        assert_eq!(connect.draft().unwrap().cursor, Point::new(150.0, 100.0));

        connect.hover(Some(b), &mut nodes, &mut scene).unwrap();
        // the source keeps its anchors while the draft is open
        assert!(anchors_shown(&scene, &nodes[0]));

        let done = connect
            .finish(Some(b), Point::new(179.0, 101.0), &mut nodes, &mut scene)
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(done.from.node, a);
        assert_eq!(done.to.node, b);
        assert_eq!(done.to.side, AnchorSide::Left);
        assert_eq!(done.to.point, Point::new(180.0, 100.0));
        assert!(connect.draft().is_none());
        assert_eq!(nodes[0].view_box().x, 100.0);
    }

    #[test]
    fn release_on_same_node_or_empty_space_cancels() {
        let (mut scene, mut nodes, mut connect) = setup();
        let a = nodes[0].id();
        connect.hover(Some(a), &mut nodes, &mut scene).unwrap();

        connect
            .begin(Some(a), Point::new(100.0, 90.0), &mut nodes, &scene)
            .unwrap()
            .unwrap();
        let r = connect
            .finish(Some(a), Point::new(100.0, 110.0), &mut nodes, &mut scene)
            .unwrap();
        assert_eq!(r, Some(None));

        connect
            .begin(Some(a), Point::new(100.0, 90.0), &mut nodes, &scene)
            .unwrap()
            .unwrap();
        connect.hover(None, &mut nodes, &mut scene).unwrap();
        let r = connect
            .finish(None, Point::new(400.0, 400.0), &mut nodes, &mut scene)
            .unwrap();
        assert_eq!(r, Some(None));

        assert_eq!(
            connect
                .finish(None, Point::new(0.0, 0.0), &mut nodes, &mut scene)
                .unwrap(),
            None
        );
    }

    #[test]
    fn press_needs_visible_anchors() {
        let (scene, mut nodes, mut connect) = setup();
        let a = nodes[0].id();
        let r = connect
            .begin(Some(a), Point::new(120.0, 100.0), &mut nodes, &scene)
            .unwrap();
        assert_eq!(r, None);
    }

    #[test]
    fn press_away_from_anchors_starts_nothing() {
        let (mut scene, mut nodes, mut connect) = setup();
        let a = nodes[0].id();
        connect.hover(Some(a), &mut nodes, &mut scene).unwrap();
        let r = connect
            .begin(Some(a), Point::new(100.0, 100.0), &mut nodes, &scene)
            .unwrap();
        assert_eq!(r, None);
        assert!(!connect.track(Point::new(0.0, 0.0)));
    }

    #[test]
    fn unbind_clears_hover() {
        let (mut scene, mut nodes, mut connect) = setup();
        let a = nodes[0].id();
        let g = nodes[0].group().unwrap();
        connect.hover(Some(a), &mut nodes, &mut scene).unwrap();
        assert!(connect.unbind(g, &mut nodes, &mut scene).unwrap());
        assert_eq!(connect.hovered(), None);
        assert!(!anchors_shown(&scene, &nodes[0]));
        assert!(!connect.is_bound(g));
        assert!(!connect.unbind(g, &mut nodes, &mut scene).unwrap());
    }

    #[test]
    fn unbinding_draft_source_hides_its_anchors() {
        let (mut scene, mut nodes, mut connect) = setup();
        let a = nodes[0].id();
        let g = nodes[0].group().unwrap();
        connect.hover(Some(a), &mut nodes, &mut scene).unwrap();
        connect
            .begin(Some(a), Point::new(120.0, 100.0), &mut nodes, &scene)
            .unwrap()
            .unwrap();
        connect.hover(None, &mut nodes, &mut scene).unwrap();
        assert!(anchors_shown(&scene, &nodes[0]));

        assert!(connect.unbind(g, &mut nodes, &mut scene).unwrap());
        assert!(connect.draft().is_none());
        assert!(!anchors_shown(&scene, &nodes[0]));
    }

    #[test]
    fn unbinding_after_group_removal_is_quiet() {
        let (mut scene, mut nodes, mut connect) = setup();
        let a = nodes[0].id();
        let g = nodes[0].group().unwrap();
        connect.hover(Some(a), &mut nodes, &mut scene).unwrap();
        scene.remove(g).unwrap();
        assert!(connect.unbind(g, &mut nodes, &mut scene).unwrap());
    }

    #[test]
    fn source_anchors_hide_once_the_draft_ends_elsewhere() {
        let (mut scene, mut nodes, mut connect) = setup();
        let (a, b) = (nodes[0].id(), nodes[1].id());

        // completed on another node
        connect.hover(Some(a), &mut nodes, &mut scene).unwrap();
        connect
            .begin(Some(a), Point::new(120.0, 100.0), &mut nodes, &scene)
            .unwrap()
            .unwrap();
        connect.hover(Some(b), &mut nodes, &mut scene).unwrap();
        let done = connect
            .finish(Some(b), Point::new(180.0, 100.0), &mut nodes, &mut scene)
            .unwrap();
        assert!(matches!(done, Some(Some(_))));
        assert!(!anchors_shown(&scene, &nodes[0]));
        assert!(anchors_shown(&scene, &nodes[1]));

        // cancelled in empty space
        connect.hover(Some(a), &mut nodes, &mut scene).unwrap();
        connect
            .begin(Some(a), Point::new(120.0, 100.0), &mut nodes, &scene)
            .unwrap()
            .unwrap();
        connect.hover(None, &mut nodes, &mut scene).unwrap();
        let r = connect
            .finish(None, Point::new(400.0, 400.0), &mut nodes, &mut scene)
            .unwrap();
        assert_eq!(r, Some(None));
        assert!(!anchors_shown(&scene, &nodes[0]));
    }

    #[test]
    fn source_still_hovered_keeps_its_anchors() {
        let (mut scene, mut nodes, mut connect) = setup();
        let a = nodes[0].id();
        connect.hover(Some(a), &mut nodes, &mut scene).unwrap();
        connect
            .begin(Some(a), Point::new(120.0, 100.0), &mut nodes, &scene)
            .unwrap()
            .unwrap();
        let r = connect
            .finish(Some(a), Point::new(100.0, 100.0), &mut nodes, &mut scene)
            .unwrap();
        assert_eq!(r, Some(None));
        assert!(anchors_shown(&scene, &nodes[0]));
    }
}
