//! Scene → SVG document.

use crate::scene::{Scene, SceneElement};
use dn_core::RenderSurface;
use dn_core::surface::{Attributes, ElementId, Primitive};
use kurbo::Rect;
use std::fmt::Write;

/// Padding around the scene bounds in the emitted `viewBox`.
const PAD: f64 = 16.0;

/// Serialize the whole scene. Hidden groups are kept in the output with
/// `visibility="hidden"` so a host can reveal them without re-rendering.
pub fn render_svg(scene: &Scene) -> String {
    let root = scene.root();
    let b = scene
        .bounds(root)
        .unwrap_or(Rect::new(0.0, 0.0, 800.0, 600.0));
    let (min_x, min_y) = (b.x0 - PAD, b.y0 - PAD);
    let width = b.width() + PAD * 2.0;
    let height = b.height() + PAD * 2.0;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="{min_x} {min_y} {width} {height}">"#
    );
    for child in scene.children(root) {
        write_element(&mut svg, scene, child, 1);
    }
    svg.push_str("</svg>\n");
    svg
}

fn write_element(out: &mut String, scene: &Scene, el: ElementId, depth: usize) {
    let Some(elem) = scene.element(el) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let common = common_attrs(elem);

    match &elem.primitive {
        Primitive::Group => {
            let _ = writeln!(out, r#"{indent}<g id="{}"{common}>"#, id_str(el));
            for child in scene.children(el) {
                write_element(out, scene, child, depth + 1);
            }
            let _ = writeln!(out, "{indent}</g>");
        }
        Primitive::Rect {
            width,
            height,
            corner_radius,
        } => {
            let rx = if *corner_radius > 0.0 {
                format!(r#" rx="{corner_radius}""#)
            } else {
                String::new()
            };
            let _ = writeln!(
                out,
                r#"{indent}<rect id="{}" x="{}" y="{}" width="{width}" height="{height}"{rx}{common}/>"#,
                id_str(el),
                elem.origin.x,
                elem.origin.y,
            );
        }
        Primitive::Ellipse { rx, ry } => {
            let _ = writeln!(
                out,
                r#"{indent}<ellipse id="{}" cx="{}" cy="{}" rx="{rx}" ry="{ry}"{common}/>"#,
                id_str(el),
                elem.origin.x + rx,
                elem.origin.y + ry,
            );
        }
        Primitive::Circle { diameter } => {
            let r = diameter / 2.0;
            let _ = writeln!(
                out,
                r#"{indent}<circle id="{}" cx="{}" cy="{}" r="{r}"{common}/>"#,
                id_str(el),
                elem.origin.x + r,
                elem.origin.y + r,
            );
        }
        Primitive::Polygon { points } => {
            let pts = points
                .iter()
                .map(|p| format!("{},{}", elem.origin.x + p.x, elem.origin.y + p.y))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(
                out,
                r#"{indent}<polygon id="{}" points="{pts}"{common}/>"#,
                id_str(el),
            );
        }
        Primitive::Text { content } => {
            let size = elem.size();
            let _ = writeln!(
                out,
                r#"{indent}<text id="{}" x="{}" y="{}" text-anchor="middle" dominant-baseline="middle"{common}>{}</text>"#,
                id_str(el),
                elem.origin.x + size.width / 2.0,
                elem.origin.y + size.height / 2.0,
                xml_escape(content),
            );
        }
    }
}

fn id_str(el: ElementId) -> String {
    format!("el{}", el.0)
}

fn common_attrs(elem: &SceneElement) -> String {
    let mut s = paint_attrs(&elem.attrs);
    let t = elem.translation;
    if t.x != 0.0 || t.y != 0.0 {
        let _ = write!(s, r#" transform="translate({} {})""#, t.x, t.y);
    }
    if !elem.visible {
        s.push_str(r#" visibility="hidden""#);
    }
    if let Some(cursor) = &elem.cursor {
        let _ = write!(s, r#" style="cursor: {}""#, xml_escape(cursor));
    }
    s
}

fn paint_attrs(attrs: &Attributes) -> String {
    let mut s = String::new();
    if let Some(fill) = attrs.fill {
        let _ = write!(s, r#" fill="{}""#, fill.to_hex());
    }
    if let Some(stroke) = attrs.stroke {
        let _ = write!(s, r#" stroke="{}""#, stroke.to_hex());
    }
    if let Some(w) = attrs.stroke_width {
        let _ = write!(s, r#" stroke-width="{w}""#);
    }
    s
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dn_core::{Color, NoInteraction, Node, NodeTheme, ShapeKind, ViewBox};

    fn attached(vb: ViewBox, shape: ShapeKind) -> (Scene, ElementId) {
        let mut scene = Scene::new();
        let root = scene.root();
        let mut node = Node::new(shape, vb);
        let g = node
            .attach(&mut scene, root, &mut NoInteraction, &NodeTheme::default())
            .unwrap();
        (scene, g)
    }

    #[test]
    fn node_renders_as_nested_groups() {
        let (scene, g) = attached(
            ViewBox::new(100.0, 100.0, 40.0, 20.0).with_text("A"),
            ShapeKind::Rect,
        );
        let svg = render_svg(&scene);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(&format!(r#"<g id="{}""#, id_str(g))));
        assert!(svg.contains(r#"style="cursor: move""#));
        assert!(svg.contains(
            r##"<rect id="el2" x="80" y="90" width="40" height="20" fill="#FFFFFF" stroke="#000000"/>"##
        ));
        assert!(svg.contains(">A</text>"));
        assert_eq!(svg.matches("<circle").count(), 4);
        assert_eq!(svg.matches(r#"visibility="hidden""#).count(), 1);
        assert!(svg.contains(r#"cx="120" cy="100" r="2""#));
    }

    #[test]
    fn diamond_is_a_polygon_around_the_center() {
        let (scene, _) = attached(ViewBox::new(0.0, 0.0, 20.0, 10.0), ShapeKind::Diamond);
        let svg = render_svg(&scene);
        assert!(svg.contains(r#"points="0,-5 10,0 0,5 -10,0""#));
    }

    #[test]
    fn translated_groups_carry_a_transform() {
        let (mut scene, g) = attached(ViewBox::new(0.0, 0.0, 20.0, 10.0), ShapeKind::Ellipse);
        scene.translate(g, 3.0, -2.0).unwrap();
        let svg = render_svg(&scene);
        assert!(svg.contains(r#"transform="translate(3 -2)""#));
    }

    #[test]
    fn label_text_is_escaped() {
        let (scene, _) = attached(
            ViewBox::new(0.0, 0.0, 20.0, 10.0).with_text("a<b & c"),
            ShapeKind::Terminal,
        );
        let svg = render_svg(&scene);
        assert!(svg.contains(">a&lt;b &amp; c</text>"));
        assert!(svg.contains(r#"rx="5""#));
    }

    #[test]
    fn anchor_marks_use_theme_colors() {
        let (scene, _) = attached(ViewBox::new(0.0, 0.0, 20.0, 10.0), ShapeKind::Rect);
        let svg = render_svg(&scene);
        let green = Color::ANCHOR_GREEN.to_hex();
        assert_eq!(
            svg.matches(&format!(r#"stroke="{green}" stroke-width="1""#)).count(),
            4
        );
    }
}
