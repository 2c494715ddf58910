//! In-memory surface that records every call, for unit tests.

use crate::error::SurfaceError;
use crate::surface::{Attributes, ElementId, Primitive, RenderSurface};
use kurbo::Point;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Group { parent: ElementId, el: ElementId },
    Draw { parent: ElementId, el: ElementId, primitive: Primitive },
    Move(ElementId, f64, f64),
    Center(ElementId, f64, f64),
    Attrs(ElementId, Attributes),
    Hide(ElementId),
    Show(ElementId),
    Cursor(ElementId, String),
    Translate(ElementId, f64, f64),
    Remove(ElementId),
}

impl Op {
    fn target(&self) -> ElementId {
        match self {
            Op::Group { el, .. } | Op::Draw { el, .. } => *el,
            Op::Move(el, ..)
            | Op::Center(el, ..)
            | Op::Attrs(el, _)
            | Op::Hide(el)
            | Op::Show(el)
            | Op::Cursor(el, _)
            | Op::Translate(el, ..)
            | Op::Remove(el) => *el,
        }
    }
}

#[derive(Debug, Default)]
struct Entry {
    primitive: Option<Primitive>,
    children: Vec<ElementId>,
    visible: bool,
    cursor: Option<String>,
    center: Option<Point>,
    attrs: Attributes,
    translation: (f64, f64),
}

pub struct RecordingSurface {
    root: ElementId,
    next: u32,
    entries: HashMap<ElementId, Entry>,
    pub ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        let root = ElementId(0);
        let mut entries = HashMap::new();
        entries.insert(
            root,
            Entry {
                visible: true,
                ..Entry::default()
            },
        );
        Self {
            root,
            next: 1,
            entries,
            ops: Vec::new(),
        }
    }

    fn entry_mut(&mut self, el: ElementId) -> Result<&mut Entry, SurfaceError> {
        self.entries
            .get_mut(&el)
            .ok_or(SurfaceError::UnknownElement(el))
    }

    fn entry(&self, el: ElementId) -> Result<&Entry, SurfaceError> {
        self.entries.get(&el).ok_or(SurfaceError::UnknownElement(el))
    }

    fn add(&mut self, parent: ElementId, primitive: Option<Primitive>) -> Result<ElementId, SurfaceError> {
        self.entry(parent)?;
        let el = ElementId(self.next);
        self.next += 1;
        self.entries.insert(
            el,
            Entry {
                primitive,
                visible: true,
                ..Entry::default()
            },
        );
        self.entry_mut(parent)?.children.push(el);
        Ok(el)
    }

    pub fn children(&self, el: ElementId) -> Vec<ElementId> {
        self.entries
            .get(&el)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }

    pub fn primitive(&self, el: ElementId) -> Option<&Primitive> {
        self.entries.get(&el).and_then(|e| e.primitive.as_ref())
    }

    pub fn cursor(&self, el: ElementId) -> Option<&str> {
        self.entries.get(&el).and_then(|e| e.cursor.as_deref())
    }

    pub fn center_of(&self, el: ElementId) -> Option<Point> {
        self.entries.get(&el).and_then(|e| e.center)
    }

    pub fn attributes(&self, el: ElementId) -> Option<Attributes> {
        self.entries.get(&el).map(|e| e.attrs)
    }

    pub fn ops_on(&self, el: ElementId) -> impl Iterator<Item = &Op> {
        self.ops.iter().filter(move |op| op.target() == el)
    }
}

impl RenderSurface for RecordingSurface {
    fn root(&self) -> ElementId {
        self.root
    }

    fn create_group(&mut self, parent: ElementId) -> Result<ElementId, SurfaceError> {
        let el = self.add(parent, None)?;
        self.ops.push(Op::Group { parent, el });
        Ok(el)
    }

    fn draw(&mut self, parent: ElementId, primitive: Primitive) -> Result<ElementId, SurfaceError> {
        let el = self.add(parent, Some(primitive.clone()))?;
        self.ops.push(Op::Draw { parent, el, primitive });
        Ok(el)
    }

    fn move_to(&mut self, el: ElementId, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.entry(el)?;
        self.ops.push(Op::Move(el, x, y));
        Ok(())
    }

    fn center(&mut self, el: ElementId, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.entry_mut(el)?.center = Some(Point::new(x, y));
        self.ops.push(Op::Center(el, x, y));
        Ok(())
    }

    fn set_attributes(&mut self, el: ElementId, attrs: &Attributes) -> Result<(), SurfaceError> {
        self.entry_mut(el)?.attrs.merge(attrs);
        self.ops.push(Op::Attrs(el, *attrs));
        Ok(())
    }

    fn hide(&mut self, el: ElementId) -> Result<(), SurfaceError> {
        self.entry_mut(el)?.visible = false;
        self.ops.push(Op::Hide(el));
        Ok(())
    }

    fn show(&mut self, el: ElementId) -> Result<(), SurfaceError> {
        self.entry_mut(el)?.visible = true;
        self.ops.push(Op::Show(el));
        Ok(())
    }

    fn is_visible(&self, el: ElementId) -> Result<bool, SurfaceError> {
        Ok(self.entry(el)?.visible)
    }

    fn set_cursor(&mut self, el: ElementId, cursor: &str) -> Result<(), SurfaceError> {
        self.entry_mut(el)?.cursor = Some(cursor.to_string());
        self.ops.push(Op::Cursor(el, cursor.to_string()));
        Ok(())
    }

    fn translate(&mut self, el: ElementId, dx: f64, dy: f64) -> Result<(), SurfaceError> {
        self.entry_mut(el)?.translation = (dx, dy);
        self.ops.push(Op::Translate(el, dx, dy));
        Ok(())
    }

    fn translation(&self, el: ElementId) -> Result<(f64, f64), SurfaceError> {
        Ok(self.entry(el)?.translation)
    }

    fn remove(&mut self, el: ElementId) -> Result<(), SurfaceError> {
        self.entry(el)?;
        for entry in self.entries.values_mut() {
            entry.children.retain(|c| *c != el);
        }
        let mut stack = vec![el];
        while let Some(next) = stack.pop() {
            if let Some(entry) = self.entries.remove(&next) {
                stack.extend(entry.children);
            }
        }
        self.ops.push(Op::Remove(el));
        Ok(())
    }
}
