//! Node presentation defaults.
//!
//! A [`NodeTheme`] carries the colors and sizes `Node::attach` applies to
//! every node: outline fill and stroke, anchor mark size and colors, and the
//! cursor hint. Hosts can override any subset from JSON.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

// ─── Color ───────────────────────────────────────────────────────────────

/// RGBA color, 4 × f32 in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    /// `#0B0`, the anchor mark stroke.
    pub const ANCHOR_GREEN: Color = Color::rgba(0.0, 187.0 / 255.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`; the `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let nibbles = hex.bytes().map(hex_val).collect::<Option<Vec<u8>>>()?;

        let channels: Vec<u8> = match nibbles.len() {
            3 | 4 => nibbles.iter().map(|n| n * 17).collect(),
            6 | 8 => nibbles.chunks(2).map(|p| p[0] << 4 | p[1]).collect(),
            _ => return None,
        };
        let a = channels.get(3).copied().unwrap_or(255);
        Some(Self::rgba(
            channels[0] as f32 / 255.0,
            channels[1] as f32 / 255.0,
            channels[2] as f32 / 255.0,
            a as f32 / 255.0,
        ))
    }

    /// Shortest `#RRGGBB` / `#RRGGBBAA` form.
    pub fn to_hex(&self) -> String {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a));
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color `{s}`")))
    }
}

// ─── Theme ───────────────────────────────────────────────────────────────

/// Theme fields holding colors, as spelled in JSON.
const COLOR_FIELDS: [&str; 4] = ["outlineFill", "outlineStroke", "anchorFill", "anchorStroke"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeTheme {
    pub outline_fill: Color,
    pub outline_stroke: Color,
    /// Diameter of each anchor mark.
    pub anchor_diameter: f64,
    pub anchor_fill: Color,
    pub anchor_stroke: Color,
    pub anchor_stroke_width: f64,
    /// Cursor hint set on every node group.
    pub cursor: String,
}

impl Default for NodeTheme {
    fn default() -> Self {
        Self {
            outline_fill: Color::WHITE,
            outline_stroke: Color::BLACK,
            anchor_diameter: 4.0,
            anchor_fill: Color::WHITE,
            anchor_stroke: Color::ANCHOR_GREEN,
            anchor_stroke_width: 1.0,
            cursor: "move".to_string(),
        }
    }
}

impl NodeTheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a theme from JSON. Fields left out keep their defaults.
    ///
    /// # Errors
    /// [`ConfigError::Json`] for malformed JSON or a mistyped field,
    /// [`ConfigError::Color`] naming the field with an unparsable color,
    /// [`ConfigError::Negative`] for a negative or non-finite size.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(fields) = value.as_object() {
            for field in COLOR_FIELDS {
                if let Some(serde_json::Value::String(s)) = fields.get(field) {
                    Self::parse_color(field, s)?;
                }
            }
        }
        let theme: NodeTheme = serde_json::from_value(value)?;
        theme.check()?;
        log::debug!("loaded node theme: {theme:?}");
        Ok(theme)
    }

    fn check(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("anchorDiameter", self.anchor_diameter),
            ("anchorStrokeWidth", self.anchor_stroke_width),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }

    pub fn with_outline(mut self, fill: Color, stroke: Color) -> Self {
        self.outline_fill = fill;
        self.outline_stroke = stroke;
        self
    }

    pub fn with_anchor_diameter(mut self, diameter: f64) -> Self {
        self.anchor_diameter = diameter;
        self
    }

    pub fn with_anchor_stroke(mut self, stroke: Color) -> Self {
        self.anchor_stroke = stroke;
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = cursor.into();
        self
    }

    fn parse_color(field: &'static str, value: &str) -> Result<Color, ConfigError> {
        Color::from_hex(value).ok_or_else(|| ConfigError::Color {
            field,
            value: value.to_string(),
        })
    }
}
