//! Hit testing: canvas point → element.
//!
//! Walks the scene in reverse paint order so the topmost element wins.
//! Hidden subtrees are skipped, which keeps hidden anchor marks from
//! swallowing pointer events.

use crate::scene::Scene;
use dn_core::RenderSurface;
use dn_core::surface::{ElementId, Primitive};
use kurbo::{BezPath, Circle, Ellipse, Point, Rect, Shape, Vec2};

/// The topmost rendered primitive under `(px, py)`.
pub fn hit_test(scene: &Scene, px: f64, py: f64) -> Option<ElementId> {
    hit_element(scene, scene.root(), Point::new(px, py))
}

fn hit_element(scene: &Scene, el: ElementId, p: Point) -> Option<ElementId> {
    let elem = scene.element(el)?;
    if !elem.visible {
        return None;
    }
    if elem.is_group() {
        return scene
            .children(el)
            .into_iter()
            .rev()
            .find_map(|child| hit_element(scene, child, p));
    }
    let origin = elem.origin + scene.world_offset(el);
    primitive_contains(&elem.primitive, origin, p).then_some(el)
}

fn primitive_contains(primitive: &Primitive, origin: Point, p: Point) -> bool {
    match primitive {
        Primitive::Group => false,
        Primitive::Rect {
            width,
            height,
            corner_radius,
        } => Rect::from_origin_size(origin, (*width, *height))
            .to_rounded_rect(*corner_radius)
            .contains(p),
        Primitive::Ellipse { rx, ry } => {
            let center = origin + Vec2::new(*rx, *ry);
            Ellipse::new(center, (*rx, *ry), 0.0).contains(p)
        }
        Primitive::Circle { diameter } => {
            let r = diameter / 2.0;
            Circle::new(origin + Vec2::new(r, r), r).contains(p)
        }
        Primitive::Polygon { points } => {
            let mut path = BezPath::new();
            let mut pts = points.iter().map(|q| origin + q.to_vec2());
            if let Some(first) = pts.next() {
                path.move_to(first);
                for q in pts {
                    path.line_to(q);
                }
                path.close_path();
            }
            path.contains(p)
        }
        Primitive::Text { .. } => false,
    }
}

/// Like [`hit_test`], but returns the nearest ancestor-or-self of the hit
/// element accepted by `is_owner` (e.g. a node group with bindings).
pub fn hit_owner(
    scene: &Scene,
    px: f64,
    py: f64,
    is_owner: impl Fn(ElementId) -> bool,
) -> Option<ElementId> {
    let mut cur = hit_test(scene, px, py);
    while let Some(el) = cur {
        if is_owner(el) {
            return Some(el);
        }
        cur = scene.parent(el);
    }
    None
}
