//! Value types that flow through ports

use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA color value. Treated as a single four-component unit by the port
/// model; readers always observe all four components from the same write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Type tag for port values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortKind {
    Bool,
    Int,
    Float,
    Color,
    String,
}

impl PortKind {
    /// Human-readable name for this kind
    pub fn name(&self) -> &'static str {
        match self {
            PortKind::Bool => "Bool",
            PortKind::Int => "Int",
            PortKind::Float => "Float",
            PortKind::Color => "Color",
            PortKind::String => "String",
        }
    }

    /// The kind's zero value, used as the default for synthesized ports
    pub fn zero(&self) -> PortValue {
        match self {
            PortKind::Bool => PortValue::Bool(false),
            PortKind::Int => PortValue::Int(0),
            PortKind::Float => PortValue::Float(0.0),
            PortKind::Color => PortValue::Color(Color::new(0.0, 0.0, 0.0, 0.0)),
            PortKind::String => PortValue::String(String::new()),
        }
    }
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed value held by a port. Closed sum type: adding a kind is an
/// exhaustive, compile-time-checked change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PortValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Color(Color),
    String(String),
}

impl PortValue {
    pub fn kind(&self) -> PortKind {
        match self {
            PortValue::Bool(_) => PortKind::Bool,
            PortValue::Int(_) => PortKind::Int,
            PortValue::Float(_) => PortKind::Float,
            PortValue::Color(_) => PortKind::Color,
            PortValue::String(_) => PortKind::String,
        }
    }

    /// Numeric view of this value, if it has one
    pub fn as_float(&self) -> Option<f32> {
        match self {
            PortValue::Float(v) => Some(*v),
            PortValue::Int(v) => Some(*v as f32),
            PortValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Textual form for read-only display
    pub fn to_display_string(&self) -> String {
        match self {
            PortValue::Bool(b) => b.to_string(),
            PortValue::Int(i) => i.to_string(),
            PortValue::Float(v) => v.to_string(),
            PortValue::Color(c) => format!("{}, {}, {}, {}", c.r, c.g, c.b, c.a),
            PortValue::String(s) => s.clone(),
        }
    }
}

impl From<bool> for PortValue {
    fn from(value: bool) -> Self {
        PortValue::Bool(value)
    }
}

impl From<i32> for PortValue {
    fn from(value: i32) -> Self {
        PortValue::Int(value)
    }
}

impl From<f32> for PortValue {
    fn from(value: f32) -> Self {
        PortValue::Float(value)
    }
}

impl From<Color> for PortValue {
    fn from(value: Color) -> Self {
        PortValue::Color(value)
    }
}

impl From<&str> for PortValue {
    fn from(value: &str) -> Self {
        PortValue::String(value.to_string())
    }
}

impl From<String> for PortValue {
    fn from(value: String) -> Self {
        PortValue::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(PortValue::Float(1.5).kind(), PortKind::Float);
        assert_eq!(PortValue::Bool(true).kind(), PortKind::Bool);
        assert_eq!(PortValue::Color(Color::BLACK).kind(), PortKind::Color);
        assert_eq!(PortValue::from("hi").kind(), PortKind::String);
    }

    #[test]
    fn test_zero_defaults_match_kind() {
        for kind in [
            PortKind::Bool,
            PortKind::Int,
            PortKind::Float,
            PortKind::Color,
            PortKind::String,
        ] {
            assert_eq!(kind.zero().kind(), kind);
        }
    }

    #[test]
    fn test_as_float_coercions() {
        assert_eq!(PortValue::Float(2.5).as_float(), Some(2.5));
        assert_eq!(PortValue::Int(3).as_float(), Some(3.0));
        assert_eq!(PortValue::Bool(true).as_float(), Some(1.0));
        assert_eq!(PortValue::from("x").as_float(), None);
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(PortValue::Float(2.5).to_display_string(), "2.5");
        assert_eq!(PortValue::Bool(false).to_display_string(), "false");
        assert_eq!(
            PortValue::Color(Color::new(1.0, 0.5, 0.0, 1.0)).to_display_string(),
            "1, 0.5, 0, 1"
        );
        assert_eq!(PortValue::from("text").to_display_string(), "text");
    }
}
