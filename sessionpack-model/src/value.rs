//! Visual and attribute values.
//!
//! Visual values are what a lexicon property holds (a color, a number, a
//! label, a node shape). Attribute values are the typed cells of a node or
//! edge attribute row. Both serialize to plain JSON so the exported
//! documents can be read by the web viewer without any wrapping.

use crate::error::ValueError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic type a visual property declares in the lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Color,
    Number,
    Text,
    Shape,
}

/// An RGB color, always written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB`, `#RRGGBB` or `rgb(r, g, b)`.
    pub fn parse(s: &str) -> Result<Self, ValueError> {
        let trimmed = s.trim();
        let invalid = || ValueError::InvalidColor(s.to_string());

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            return match hex.len() {
                3 => {
                    let mut channels = [0u8; 3];
                    for (slot, c) in channels.iter_mut().zip(hex.chars()) {
                        let digit = c.to_digit(16).ok_or_else(invalid)? as u8;
                        *slot = digit * 17;
                    }
                    Ok(Color::new(channels[0], channels[1], channels[2]))
                }
                6 => {
                    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                    Ok(Color::new(
                        channel(0).map_err(|_| invalid())?,
                        channel(2).map_err(|_| invalid())?,
                        channel(4).map_err(|_| invalid())?,
                    ))
                }
                _ => Err(invalid()),
            };
        }

        let lower = trimmed.to_ascii_lowercase();
        if let Some(body) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(invalid());
            }
            let mut channels = [0u8; 3];
            for (slot, part) in channels.iter_mut().zip(parts) {
                *slot = part.parse().map_err(|_| invalid())?;
            }
            return Ok(Color::new(channels[0], channels[1], channels[2]));
        }

        Err(invalid())
    }

    /// Upper-case `#RRGGBB` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Channel-wise linear blend; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Node shapes understood by the web viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Ellipse,
    Rectangle,
    RoundRectangle,
    Triangle,
    Diamond,
    Hexagon,
    Octagon,
    Rhomboid,
    Vee,
}

impl NodeShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeShape::Ellipse => "ellipse",
            NodeShape::Rectangle => "rectangle",
            NodeShape::RoundRectangle => "roundrectangle",
            NodeShape::Triangle => "triangle",
            NodeShape::Diamond => "diamond",
            NodeShape::Hexagon => "hexagon",
            NodeShape::Octagon => "octagon",
            NodeShape::Rhomboid => "rhomboid",
            NodeShape::Vee => "vee",
        }
    }
}

impl FromStr for NodeShape {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ellipse" => Ok(NodeShape::Ellipse),
            "rectangle" => Ok(NodeShape::Rectangle),
            "roundrectangle" | "round_rectangle" => Ok(NodeShape::RoundRectangle),
            "triangle" => Ok(NodeShape::Triangle),
            "diamond" => Ok(NodeShape::Diamond),
            "hexagon" => Ok(NodeShape::Hexagon),
            "octagon" => Ok(NodeShape::Octagon),
            "rhomboid" | "parallelogram" => Ok(NodeShape::Rhomboid),
            "vee" => Ok(NodeShape::Vee),
            _ => Err(ValueError::InvalidShape(s.to_string())),
        }
    }
}

/// A value a visual property can take.
///
/// Deserialization keeps the raw JSON shape: numbers load as
/// [`VisualValue::Number`], strings as [`VisualValue::Text`].
/// [`VisualValue::coerce`] settles the final type against the lexicon.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VisualValue {
    Number(f64),
    Color(Color),
    Shape(NodeShape),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawVisualValue {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for VisualValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawVisualValue::deserialize(deserializer)? {
            RawVisualValue::Number(n) => VisualValue::Number(n),
            RawVisualValue::Text(s) => VisualValue::Text(s),
        })
    }
}

impl VisualValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            VisualValue::Number(_) => ValueType::Number,
            VisualValue::Color(_) => ValueType::Color,
            VisualValue::Shape(_) => ValueType::Shape,
            VisualValue::Text(_) => ValueType::Text,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            VisualValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Convert this value to the lexicon's declared type.
    pub fn coerce(&self, target: ValueType) -> Result<VisualValue, ValueError> {
        let fail = || ValueError::Coercion {
            value: self.to_string(),
            target,
        };

        match (self, target) {
            (VisualValue::Number(n), ValueType::Number) if n.is_finite() => Ok(self.clone()),
            (VisualValue::Text(s), ValueType::Number) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(VisualValue::Number(n)),
                _ => Err(fail()),
            },
            (VisualValue::Color(_), ValueType::Color) => Ok(self.clone()),
            (VisualValue::Text(s), ValueType::Color) => {
                Color::parse(s).map(VisualValue::Color).map_err(|_| fail())
            }
            (VisualValue::Shape(_), ValueType::Shape) => Ok(self.clone()),
            (VisualValue::Text(s), ValueType::Shape) => {
                s.parse().map(VisualValue::Shape).map_err(|_| fail())
            }
            (VisualValue::Text(_), ValueType::Text) => Ok(self.clone()),
            (_, ValueType::Text) => Ok(VisualValue::Text(self.to_string())),
            _ => Err(fail()),
        }
    }
}

impl fmt::Display for VisualValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisualValue::Number(n) => write!(f, "{}", n),
            VisualValue::Color(c) => write!(f, "{}", c),
            VisualValue::Shape(s) => f.write_str(s.as_str()),
            VisualValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for VisualValue {
    fn from(n: f64) -> Self {
        VisualValue::Number(n)
    }
}

impl From<Color> for VisualValue {
    fn from(c: Color) -> Self {
        VisualValue::Color(c)
    }
}

impl From<NodeShape> for VisualValue {
    fn from(s: NodeShape) -> Self {
        VisualValue::Shape(s)
    }
}

impl From<&str> for VisualValue {
    fn from(s: &str) -> Self {
        VisualValue::Text(s.to_string())
    }
}

/// Typed attribute values for node, edge and network rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<AttributeValue>),
    Null,
}

impl AttributeValue {
    /// Numeric view used by continuous mappings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Integer(n) => Some(*n as f64),
            AttributeValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Raw visual value used by passthrough mappings. `Null` maps to nothing.
    pub fn to_visual(&self) -> Option<VisualValue> {
        match self {
            AttributeValue::Null => None,
            AttributeValue::Integer(n) => Some(VisualValue::Number(*n as f64)),
            AttributeValue::Float(n) => Some(VisualValue::Number(*n)),
            AttributeValue::String(s) => Some(VisualValue::Text(s.clone())),
            other => Some(VisualValue::Text(other.to_string())),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => f.write_str(s),
            AttributeValue::Integer(n) => write!(f, "{}", n),
            AttributeValue::Float(n) => write!(f, "{}", n),
            AttributeValue::Boolean(b) => write!(f, "{}", b),
            AttributeValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            AttributeValue::Null => Ok(()),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<i64> for AttributeValue {
    fn from(n: i64) -> Self {
        AttributeValue::Integer(n)
    }
}

impl From<i32> for AttributeValue {
    fn from(n: i32) -> Self {
        AttributeValue::Integer(n as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        AttributeValue::Float(n)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Boolean(b)
    }
}
