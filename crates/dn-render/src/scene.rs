//! Retained vector scene.
//!
//! The scene is a containment tree stored in a `StableDiGraph`: groups own
//! primitives and other groups, edges point parent → child. Each element
//! keeps its local placement (top-left corner), presentation attributes,
//! visibility, cursor hint, and a translation that composes down the tree.
//! [`Scene`] implements [`RenderSurface`], so nodes draw straight into it.

use dn_core::surface::{Attributes, ElementId, Primitive, RenderSurface};
use dn_core::SurfaceError;
use kurbo::{Point, Rect, Size, Vec2};
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use std::collections::HashMap;

/// Font size assumed when sizing text for bounds and hit testing.
pub const TEXT_FONT_SIZE: f64 = 14.0;
/// Average glyph advance as a fraction of the font size.
const TEXT_ADVANCE: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct SceneElement {
    pub id: ElementId,
    pub primitive: Primitive,
    pub attrs: Attributes,
    pub visible: bool,
    pub cursor: Option<String>,
    /// Top-left corner in the parent's coordinate space.
    pub origin: Point,
    pub translation: Vec2,
    /// Creation order, used for paint order among siblings.
    seq: u64,
}

impl SceneElement {
    fn new(id: ElementId, primitive: Primitive, seq: u64) -> Self {
        Self {
            id,
            primitive,
            attrs: Attributes::default(),
            visible: true,
            cursor: None,
            origin: Point::ZERO,
            translation: Vec2::ZERO,
            seq,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.primitive, Primitive::Group)
    }

    /// Intrinsic size of a primitive. Groups have none of their own.
    pub fn size(&self) -> Size {
        match &self.primitive {
            Primitive::Group => Size::ZERO,
            Primitive::Rect { width, height, .. } => Size::new(*width, *height),
            Primitive::Ellipse { rx, ry } => Size::new(rx * 2.0, ry * 2.0),
            Primitive::Circle { diameter } => Size::new(*diameter, *diameter),
            Primitive::Polygon { points } => points.iter().fold(Size::ZERO, |s, p| {
                Size::new(s.width.max(p.x), s.height.max(p.y))
            }),
            Primitive::Text { content } => Size::new(
                content.chars().count() as f64 * TEXT_FONT_SIZE * TEXT_ADVANCE,
                TEXT_FONT_SIZE,
            ),
        }
    }
}

pub struct Scene {
    pub graph: StableDiGraph<SceneElement, ()>,
    root: NodeIndex,
    /// Handles are never reused, unlike graph indices.
    index: HashMap<ElementId, NodeIndex>,
    next_id: u32,
    next_seq: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// An empty scene holding only the root group.
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root_id = ElementId(0);
        let root = graph.add_node(SceneElement::new(root_id, Primitive::Group, 0));
        let mut index = HashMap::new();
        index.insert(root_id, root);
        Self {
            graph,
            root,
            index,
            next_id: 1,
            next_seq: 1,
        }
    }

    fn idx(&self, el: ElementId) -> Result<NodeIndex, SurfaceError> {
        self.index
            .get(&el)
            .copied()
            .ok_or(SurfaceError::UnknownElement(el))
    }

    fn element_mut(&mut self, el: ElementId) -> Result<&mut SceneElement, SurfaceError> {
        let idx = self.idx(el)?;
        Ok(&mut self.graph[idx])
    }

    pub fn element(&self, el: ElementId) -> Option<&SceneElement> {
        self.index.get(&el).map(|idx| &self.graph[*idx])
    }

    pub fn contains(&self, el: ElementId) -> bool {
        self.index.contains_key(&el)
    }

    /// Number of live elements, root included.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }

    pub fn parent(&self, el: ElementId) -> Option<ElementId> {
        let idx = self.index.get(&el)?;
        self.graph
            .neighbors_directed(*idx, Direction::Incoming)
            .next()
            .map(|p| self.graph[p].id)
    }

    /// Children in paint order.
    pub fn children(&self, el: ElementId) -> Vec<ElementId> {
        let Some(idx) = self.index.get(&el) else {
            return Vec::new();
        };
        let mut children: Vec<&SceneElement> = self
            .graph
            .neighbors_directed(*idx, Direction::Outgoing)
            .map(|c| &self.graph[c])
            .collect();
        children.sort_by_key(|e| e.seq);
        children.into_iter().map(|e| e.id).collect()
    }

    /// All live elements drawn with the given primitive kind, in creation order.
    pub fn elements_of_kind(&self, kind: &str) -> Vec<ElementId> {
        let mut found: Vec<&SceneElement> = self
            .graph
            .node_weights()
            .filter(|e| e.primitive.kind() == kind)
            .collect();
        found.sort_by_key(|e| e.seq);
        found.into_iter().map(|e| e.id).collect()
    }

    pub fn text_of(&self, el: ElementId) -> Option<&str> {
        match &self.element(el)?.primitive {
            Primitive::Text { content } => Some(content),
            _ => None,
        }
    }

    /// Sum of the translations of `el` and all of its ancestors.
    pub fn world_offset(&self, el: ElementId) -> Vec2 {
        let mut offset = Vec2::ZERO;
        let mut cur = Some(el);
        while let Some(e) = cur {
            match self.element(e) {
                Some(elem) => offset += elem.translation,
                None => break,
            }
            cur = self.parent(e);
        }
        offset
    }

    /// World-space bounds. A group's bounds are the union of its
    /// children's; an empty group has none.
    pub fn bounds(&self, el: ElementId) -> Option<Rect> {
        let elem = self.element(el)?;
        if elem.is_group() {
            return self
                .children(el)
                .into_iter()
                .filter_map(|c| self.bounds(c))
                .reduce(|a, b| a.union(b));
        }
        let origin = elem.origin + self.world_offset(el);
        Some(Rect::from_origin_size(origin, elem.size()))
    }

    pub fn world_center(&self, el: ElementId) -> Option<Point> {
        self.bounds(el).map(|b| b.center())
    }

    /// Visible itself and through every ancestor.
    pub fn is_rendered(&self, el: ElementId) -> bool {
        let mut cur = Some(el);
        while let Some(e) = cur {
            match self.element(e) {
                Some(elem) if elem.visible => cur = self.parent(e),
                _ => return false,
            }
        }
        true
    }

    fn insert(&mut self, parent: ElementId, primitive: Primitive) -> Result<ElementId, SurfaceError> {
        let pidx = self.idx(parent)?;
        if !self.graph[pidx].is_group() {
            return Err(SurfaceError::NotAContainer(parent));
        }
        let id = ElementId(self.next_id);
        self.next_id += 1;
        let seq = self.next_seq;
        self.next_seq += 1;

        log::trace!("scene: {} {id:?} under {parent:?}", primitive.kind());
        let idx = self.graph.add_node(SceneElement::new(id, primitive, seq));
        self.graph.add_edge(pidx, idx, ());
        self.index.insert(id, idx);
        Ok(id)
    }

    /// Shift a group so its bounds' reference point lands on `target`.
    fn place_group(&mut self, el: ElementId, target: Point, by_center: bool) -> Result<(), SurfaceError> {
        let Some(b) = self.bounds(el) else {
            return Ok(());
        };
        let current = if by_center { b.center() } else { b.origin() };
        self.element_mut(el)?.translation += target - current;
        Ok(())
    }
}

impl RenderSurface for Scene {
    fn root(&self) -> ElementId {
        self.graph[self.root].id
    }

    fn create_group(&mut self, parent: ElementId) -> Result<ElementId, SurfaceError> {
        self.insert(parent, Primitive::Group)
    }

    fn draw(&mut self, parent: ElementId, primitive: Primitive) -> Result<ElementId, SurfaceError> {
        self.insert(parent, primitive)
    }

    fn move_to(&mut self, el: ElementId, x: f64, y: f64) -> Result<(), SurfaceError> {
        let elem = self.element_mut(el)?;
        if elem.is_group() {
            return self.place_group(el, Point::new(x, y), false);
        }
        elem.origin = Point::new(x, y);
        Ok(())
    }

    fn center(&mut self, el: ElementId, x: f64, y: f64) -> Result<(), SurfaceError> {
        let elem = self.element_mut(el)?;
        if elem.is_group() {
            return self.place_group(el, Point::new(x, y), true);
        }
        let size = elem.size();
        elem.origin = Point::new(x - size.width / 2.0, y - size.height / 2.0);
        Ok(())
    }

    fn set_attributes(&mut self, el: ElementId, attrs: &Attributes) -> Result<(), SurfaceError> {
        self.element_mut(el)?.attrs.merge(attrs);
        Ok(())
    }

    fn hide(&mut self, el: ElementId) -> Result<(), SurfaceError> {
        self.element_mut(el)?.visible = false;
        log::trace!("scene: hide {el:?}");
        Ok(())
    }

    fn show(&mut self, el: ElementId) -> Result<(), SurfaceError> {
        self.element_mut(el)?.visible = true;
        log::trace!("scene: show {el:?}");
        Ok(())
    }

    fn is_visible(&self, el: ElementId) -> Result<bool, SurfaceError> {
        Ok(self.graph[self.idx(el)?].visible)
    }

    fn set_cursor(&mut self, el: ElementId, cursor: &str) -> Result<(), SurfaceError> {
        self.element_mut(el)?.cursor = Some(cursor.to_string());
        Ok(())
    }

    fn translate(&mut self, el: ElementId, dx: f64, dy: f64) -> Result<(), SurfaceError> {
        self.element_mut(el)?.translation = Vec2::new(dx, dy);
        Ok(())
    }

    fn translation(&self, el: ElementId) -> Result<(f64, f64), SurfaceError> {
        let t = self.graph[self.idx(el)?].translation;
        Ok((t.x, t.y))
    }

    /// Removing the root clears the scene but keeps the root itself.
    fn remove(&mut self, el: ElementId) -> Result<(), SurfaceError> {
        let start = self.idx(el)?;
        let mut doomed = Vec::new();
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            stack.extend(self.graph.neighbors_directed(idx, Direction::Outgoing));
            if idx != self.root {
                doomed.push(idx);
            }
        }
        log::debug!("scene: remove {el:?} ({} elements)", doomed.len());
        for idx in doomed {
            if let Some(removed) = self.graph.remove_node(idx) {
                self.index.remove(&removed.id);
            }
        }
        Ok(())
    }
}
