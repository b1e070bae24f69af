//! Visual styles and their mapping rules.
//!
//! A style holds at most one [`Mapping`] per visual property plus optional
//! per-property defaults. The three mapping strategies form a closed enum so
//! every consumer handles each of them explicitly:
//!
//! - **Passthrough**: the attribute value is used as the visual value
//! - **Discrete**: exact-match lookup from attribute value to visual value
//! - **Continuous**: ordered control points with linear interpolation
//!
//! Mappings serialize with a `mappingType` tag, which is also the shape the
//! web viewer reads.

use crate::element::AttributeRow;
use crate::error::StyleError;
use crate::lexicon::{VisualProperty, VisualPropertyId};
use crate::value::{AttributeValue, ValueType, VisualValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Copies an attribute straight into a visual property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassthroughMapping {
    pub attribute: String,
}

/// One row of a discrete lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteEntry {
    #[serde(rename = "in")]
    pub input: AttributeValue,

    #[serde(rename = "out")]
    pub output: VisualValue,
}

/// Exact-match lookup table. Entries keep the order they were declared in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteMapping {
    pub attribute: String,

    #[serde(default)]
    entries: Vec<DiscreteEntry>,
}

impl DiscreteMapping {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            entries: Vec::new(),
        }
    }

    /// Add an entry. An existing key keeps its position and takes the new output.
    pub fn with_entry(mut self, input: impl Into<AttributeValue>, output: impl Into<VisualValue>) -> Self {
        let input = input.into();
        let output = output.into();
        match self.entries.iter_mut().find(|e| same_key(&e.input, &input)) {
            Some(existing) => existing.output = output,
            None => self.entries.push(DiscreteEntry { input, output }),
        }
        self
    }

    pub fn entries(&self) -> &[DiscreteEntry] {
        &self.entries
    }

    pub fn get(&self, input: &AttributeValue) -> Option<&VisualValue> {
        self.entries
            .iter()
            .find(|e| same_key(&e.input, input))
            .map(|e| &e.output)
    }
}

/// Numbers match by value, so `1` and `1.0` are the same key.
fn same_key(a: &AttributeValue, b: &AttributeValue) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// A control point of a continuous mapping.
///
/// `lesser` and `greater` are the outputs just below and just above the
/// point; `equal` is the output exactly at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub value: f64,
    pub lesser: VisualValue,
    pub equal: VisualValue,
    pub greater: VisualValue,
}

impl ControlPoint {
    /// A point whose three outputs are the same.
    pub fn new(value: f64, output: impl Into<VisualValue>) -> Self {
        let output = output.into();
        Self {
            value,
            lesser: output.clone(),
            equal: output.clone(),
            greater: output,
        }
    }

    pub fn with_bounds(
        value: f64,
        lesser: impl Into<VisualValue>,
        equal: impl Into<VisualValue>,
        greater: impl Into<VisualValue>,
    ) -> Self {
        Self {
            value,
            lesser: lesser.into(),
            equal: equal.into(),
            greater: greater.into(),
        }
    }
}

#[derive(Deserialize)]
struct RawContinuousMapping {
    attribute: String,
    points: Vec<ControlPoint>,
}

impl TryFrom<RawContinuousMapping> for ContinuousMapping {
    type Error = StyleError;

    fn try_from(raw: RawContinuousMapping) -> Result<Self, Self::Error> {
        ContinuousMapping::new(raw.attribute, raw.points)
    }
}

/// Interpolated mapping over numeric attribute values.
///
/// Always holds at least one point, sorted ascending by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawContinuousMapping")]
pub struct ContinuousMapping {
    attribute: String,
    points: Vec<ControlPoint>,
}

impl ContinuousMapping {
    pub fn new(attribute: impl Into<String>, mut points: Vec<ControlPoint>) -> Result<Self, StyleError> {
        let attribute = attribute.into();
        if points.is_empty() {
            return Err(StyleError::EmptyContinuous(attribute));
        }
        if let Some(bad) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(StyleError::NonFiniteControlPoint {
                value: bad.value,
                attribute,
            });
        }
        points.sort_by(|a, b| a.value.total_cmp(&b.value));
        Ok(Self { attribute, points })
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Output for an attribute value.
    ///
    /// Below the first point yields its `lesser`, above the last yields its
    /// `greater`, exactly on a point yields its `equal`; anything in between
    /// blends the lower point's `greater` into the upper point's `lesser`.
    pub fn evaluate(&self, value: f64) -> Result<VisualValue, StyleError> {
        if !value.is_finite() {
            return Err(StyleError::NonFiniteInput);
        }
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return Err(StyleError::EmptyContinuous(self.attribute.clone()));
        };

        if value < first.value {
            return Ok(first.lesser.clone());
        }
        if value > last.value {
            return Ok(last.greater.clone());
        }

        for window in self.points.windows(2) {
            let (lower, upper) = (&window[0], &window[1]);
            if value == lower.value {
                return Ok(lower.equal.clone());
            }
            if value < upper.value {
                let t = (value - lower.value) / (upper.value - lower.value);
                return interpolate(&lower.greater, &upper.lesser, t);
            }
        }

        Ok(last.equal.clone())
    }
}

/// Linear blend of two visual values. Only numbers and colors blend.
pub fn interpolate(lower: &VisualValue, upper: &VisualValue, t: f64) -> Result<VisualValue, StyleError> {
    match (lower, upper) {
        (VisualValue::Number(a), VisualValue::Number(b)) => Ok(VisualValue::Number(a + (b - a) * t)),
        (VisualValue::Color(a), VisualValue::Color(b)) => Ok(VisualValue::Color(a.lerp(*b, t))),
        _ => Err(StyleError::NotInterpolable {
            lower: lower.value_type(),
            upper: upper.value_type(),
        }),
    }
}

/// How a style derives one visual property from element attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mappingType", rename_all = "snake_case")]
pub enum Mapping {
    Passthrough(PassthroughMapping),
    Discrete(DiscreteMapping),
    Continuous(ContinuousMapping),
}

impl Mapping {
    pub fn passthrough(attribute: impl Into<String>) -> Self {
        Mapping::Passthrough(PassthroughMapping {
            attribute: attribute.into(),
        })
    }

    /// The attribute column this mapping reads.
    pub fn attribute(&self) -> &str {
        match self {
            Mapping::Passthrough(m) => &m.attribute,
            Mapping::Discrete(m) => &m.attribute,
            Mapping::Continuous(m) => m.attribute(),
        }
    }

    /// Apply the mapping to one attribute row.
    ///
    /// Returns `None` when the row lacks the attribute or the mapping has no
    /// output for its value.
    pub fn apply(&self, row: &AttributeRow) -> Result<Option<VisualValue>, StyleError> {
        let Some(cell) = row.get(self.attribute()) else {
            return Ok(None);
        };
        match self {
            Mapping::Passthrough(_) => Ok(cell.to_visual()),
            Mapping::Discrete(m) => Ok(m.get(cell).cloned()),
            Mapping::Continuous(m) => match cell.as_f64() {
                Some(v) => m.evaluate(v).map(Some),
                None => Ok(None),
            },
        }
    }

    /// A copy whose outputs all have the given type.
    ///
    /// Continuous mappings only produce numbers and colors; any other target
    /// type is rejected rather than guessed at.
    pub fn coerced(&self, target: ValueType) -> Result<Mapping, StyleError> {
        match self {
            Mapping::Passthrough(_) => Ok(self.clone()),
            Mapping::Discrete(m) => {
                let entries = m
                    .entries
                    .iter()
                    .map(|e| -> Result<DiscreteEntry, StyleError> {
                        Ok(DiscreteEntry {
                            input: e.input.clone(),
                            output: e.output.coerce(target)?,
                        })
                    })
                    .collect::<Result<Vec<_>, StyleError>>()?;
                Ok(Mapping::Discrete(DiscreteMapping {
                    attribute: m.attribute.clone(),
                    entries,
                }))
            }
            Mapping::Continuous(m) => {
                if !matches!(target, ValueType::Number | ValueType::Color) {
                    return Err(StyleError::UnsupportedContinuous(target));
                }
                let points = m
                    .points
                    .iter()
                    .map(|p| -> Result<ControlPoint, StyleError> {
                        Ok(ControlPoint {
                            value: p.value,
                            lesser: p.lesser.coerce(target)?,
                            equal: p.equal.coerce(target)?,
                            greater: p.greater.coerce(target)?,
                        })
                    })
                    .collect::<Result<Vec<_>, StyleError>>()?;
                Ok(Mapping::Continuous(ContinuousMapping::new(
                    m.attribute.clone(),
                    points,
                )?))
            }
        }
    }
}

impl From<PassthroughMapping> for Mapping {
    fn from(m: PassthroughMapping) -> Self {
        Mapping::Passthrough(m)
    }
}

impl From<DiscreteMapping> for Mapping {
    fn from(m: DiscreteMapping) -> Self {
        Mapping::Discrete(m)
    }
}

impl From<ContinuousMapping> for Mapping {
    fn from(m: ContinuousMapping) -> Self {
        Mapping::Continuous(m)
    }
}

/// A named set of defaults and mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualStyle {
    name: String,

    #[serde(default)]
    defaults: BTreeMap<VisualPropertyId, VisualValue>,

    #[serde(default)]
    mappings: BTreeMap<VisualPropertyId, Mapping>,
}

impl VisualStyle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            defaults: BTreeMap::new(),
            mappings: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the style-wide default for a property.
    pub fn set_default(&mut self, property: impl Into<VisualPropertyId>, value: impl Into<VisualValue>) {
        self.defaults.insert(property.into(), value.into());
    }

    pub fn default_value(&self, property: &VisualPropertyId) -> Option<&VisualValue> {
        self.defaults.get(property)
    }

    /// Set the mapping for a property, returning the one it replaces.
    pub fn set_mapping(&mut self, property: impl Into<VisualPropertyId>, mapping: impl Into<Mapping>) -> Option<Mapping> {
        self.mappings.insert(property.into(), mapping.into())
    }

    pub fn mapping(&self, property: &VisualPropertyId) -> Option<&Mapping> {
        self.mappings.get(property)
    }

    pub fn remove_mapping(&mut self, property: &VisualPropertyId) -> Option<Mapping> {
        self.mappings.remove(property)
    }

    pub fn mappings(&self) -> impl Iterator<Item = (&VisualPropertyId, &Mapping)> {
        self.mappings.iter()
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    /// Style default if set, otherwise the lexicon default.
    pub fn default_for(&self, property: &VisualProperty) -> VisualValue {
        self.defaults
            .get(&property.id)
            .cloned()
            .unwrap_or_else(|| property.default.clone())
    }

    /// Effective value of a property for one element.
    ///
    /// A bypass wins over the mapping, the mapping over the defaults. The
    /// result is coerced to the property's declared type.
    pub fn resolve(
        &self,
        property: &VisualProperty,
        row: &AttributeRow,
        bypass: Option<&VisualValue>,
    ) -> Result<VisualValue, StyleError> {
        let raw = match bypass {
            Some(value) => value.clone(),
            None => {
                let mapped = match self.mappings.get(&property.id) {
                    Some(mapping @ Mapping::Continuous(_)) => {
                        mapping.coerced(property.value_type)?.apply(row)?
                    }
                    Some(mapping) => mapping.apply(row)?,
                    None => None,
                };
                mapped.unwrap_or_else(|| self.default_for(property))
            }
        };
        Ok(raw.coerce(property.value_type)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::VisualLexicon;
    use crate::value::{Color, NodeShape};
    use pretty_assertions::assert_eq;

    fn size_mapping() -> ContinuousMapping {
        ContinuousMapping::new(
            "degree",
            vec![
                ControlPoint::with_bounds(10.0, 40.0, 50.0, 50.0),
                ControlPoint::with_bounds(0.0, 5.0, 10.0, 10.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_continuous_points_are_sorted() {
        let mapping = size_mapping();
        let values: Vec<f64> = mapping.points().iter().map(|p| p.value).collect();
        assert_eq!(values, vec![0.0, 10.0]);
    }

    #[test]
    fn test_continuous_below_and_above_range() {
        let mapping = size_mapping();
        assert_eq!(mapping.evaluate(-3.0).unwrap(), VisualValue::Number(5.0));
        assert_eq!(mapping.evaluate(42.0).unwrap(), VisualValue::Number(50.0));
    }

    #[test]
    fn test_continuous_exact_at_points() {
        let mapping = size_mapping();
        assert_eq!(mapping.evaluate(0.0).unwrap(), VisualValue::Number(10.0));
        assert_eq!(mapping.evaluate(10.0).unwrap(), VisualValue::Number(50.0));
    }

    #[test]
    fn test_continuous_interpolates_between_points() {
        let mapping = size_mapping();
        // between greater(0)=10 and lesser(10)=40
        assert_eq!(mapping.evaluate(5.0).unwrap(), VisualValue::Number(25.0));
        assert_eq!(mapping.evaluate(2.5).unwrap(), VisualValue::Number(17.5));
    }

    #[test]
    fn test_continuous_color_interpolation() {
        let mapping = ContinuousMapping::new(
            "score",
            vec![
                ControlPoint::new(0.0, Color::BLACK),
                ControlPoint::new(1.0, Color::WHITE),
            ],
        )
        .unwrap();
        assert_eq!(
            mapping.evaluate(0.5).unwrap(),
            VisualValue::Color(Color::new(128, 128, 128))
        );
    }

    #[test]
    fn test_continuous_text_outputs_not_interpolable() {
        let mapping = ContinuousMapping::new(
            "score",
            vec![ControlPoint::new(0.0, "low"), ControlPoint::new(1.0, "high")],
        )
        .unwrap();
        assert_eq!(mapping.evaluate(-1.0).unwrap(), VisualValue::from("low"));
        assert!(matches!(
            mapping.evaluate(0.5),
            Err(StyleError::NotInterpolable { .. })
        ));
    }

    #[test]
    fn test_continuous_validation() {
        assert!(matches!(
            ContinuousMapping::new("x", vec![]),
            Err(StyleError::EmptyContinuous(_))
        ));
        assert!(matches!(
            ContinuousMapping::new("x", vec![ControlPoint::new(f64::NAN, 1.0)]),
            Err(StyleError::NonFiniteControlPoint { .. })
        ));
        assert!(matches!(
            size_mapping().evaluate(f64::NAN),
            Err(StyleError::NonFiniteInput)
        ));
    }

    #[test]
    fn test_single_point_mapping() {
        let mapping =
            ContinuousMapping::new("x", vec![ControlPoint::with_bounds(1.0, 0.0, 1.0, 2.0)]).unwrap();
        assert_eq!(mapping.evaluate(0.0).unwrap(), VisualValue::Number(0.0));
        assert_eq!(mapping.evaluate(1.0).unwrap(), VisualValue::Number(1.0));
        assert_eq!(mapping.evaluate(3.0).unwrap(), VisualValue::Number(2.0));
    }

    #[test]
    fn test_discrete_keeps_declaration_order() {
        let mapping = DiscreteMapping::new("kind")
            .with_entry("protein", NodeShape::Ellipse)
            .with_entry("gene", NodeShape::Diamond)
            .with_entry("protein", NodeShape::Hexagon);

        let inputs: Vec<String> = mapping.entries().iter().map(|e| e.input.to_string()).collect();
        assert_eq!(inputs, vec!["protein", "gene"]);
        assert_eq!(
            mapping.get(&"protein".into()),
            Some(&VisualValue::Shape(NodeShape::Hexagon))
        );
        assert_eq!(mapping.get(&"rna".into()), None);
    }

    #[test]
    fn test_mapping_serializes_with_tag() {
        let json = serde_json::to_value(Mapping::passthrough("name")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"mappingType": "passthrough", "attribute": "name"})
        );

        let discrete: Mapping = DiscreteMapping::new("kind").with_entry("a", 1.0).into();
        let json = serde_json::to_value(&discrete).unwrap();
        assert_eq!(json["mappingType"], "discrete");
        assert_eq!(json["entries"][0]["in"], "a");
        assert_eq!(json["entries"][0]["out"], 1.0);
    }

    #[test]
    fn test_continuous_deserialization_validates() {
        let ok: Mapping = serde_json::from_str(
            r#"{"mappingType": "continuous", "attribute": "w",
                "points": [{"value": 5, "lesser": 1, "equal": 2, "greater": 3},
                           {"value": 1, "lesser": 0, "equal": 0, "greater": 0}]}"#,
        )
        .unwrap();
        let Mapping::Continuous(m) = ok else {
            panic!("expected continuous mapping");
        };
        assert_eq!(m.points()[0].value, 1.0);

        let empty: Result<Mapping, _> =
            serde_json::from_str(r#"{"mappingType": "continuous", "attribute": "w", "points": []}"#);
        assert!(empty.is_err());
    }

    #[test]
    fn test_set_mapping_replaces_previous() {
        let mut style = VisualStyle::new("default");
        assert!(style.set_mapping("NODE_LABEL", Mapping::passthrough("name")).is_none());
        let previous = style.set_mapping("NODE_LABEL", Mapping::passthrough("label"));
        assert_eq!(previous, Some(Mapping::passthrough("name")));
        assert_eq!(style.mapping_count(), 1);
    }

    #[test]
    fn test_coerced_rejects_continuous_shapes() {
        let mapping: Mapping = size_mapping().into();
        assert!(matches!(
            mapping.coerced(ValueType::Shape),
            Err(StyleError::UnsupportedContinuous(ValueType::Shape))
        ));
        assert!(mapping.coerced(ValueType::Number).is_ok());
    }

    #[test]
    fn test_coerced_discrete_outputs() {
        let mapping: Mapping = DiscreteMapping::new("kind").with_entry("a", "#ff0000").into();
        let Mapping::Discrete(coerced) = mapping.coerced(ValueType::Color).unwrap() else {
            panic!("expected discrete mapping");
        };
        assert_eq!(
            coerced.entries()[0].output,
            VisualValue::Color(Color::new(255, 0, 0))
        );
    }

    #[test]
    fn test_resolve_precedence() {
        let lexicon = VisualLexicon::standard();
        let fill = lexicon.get(&"NODE_FILL_COLOR".into()).unwrap();

        let mut style = VisualStyle::new("s");
        let mut row = AttributeRow::new();
        row.insert("kind".into(), "gene".into());

        // lexicon default
        assert_eq!(
            style.resolve(fill, &row, None).unwrap(),
            VisualValue::Color(Color::new(0x89, 0xD0, 0xF5))
        );

        // style default
        style.set_default("NODE_FILL_COLOR", Color::WHITE);
        assert_eq!(
            style.resolve(fill, &row, None).unwrap(),
            VisualValue::Color(Color::WHITE)
        );

        // mapping
        style.set_mapping(
            "NODE_FILL_COLOR",
            DiscreteMapping::new("kind").with_entry("gene", "#00FF00"),
        );
        assert_eq!(
            style.resolve(fill, &row, None).unwrap(),
            VisualValue::Color(Color::new(0, 255, 0))
        );

        // bypass
        let bypass = VisualValue::Color(Color::BLACK);
        assert_eq!(
            style.resolve(fill, &row, Some(&bypass)).unwrap(),
            VisualValue::Color(Color::BLACK)
        );
    }

    #[test]
    fn test_resolve_passthrough_and_continuous() {
        let lexicon = VisualLexicon::standard();
        let label = lexicon.get(&"NODE_LABEL".into()).unwrap();
        let width = lexicon.get(&"NODE_WIDTH".into()).unwrap();

        let mut style = VisualStyle::new("s");
        style.set_mapping("NODE_LABEL", Mapping::passthrough("name"));
        style.set_mapping("NODE_WIDTH", size_mapping());

        let mut row = AttributeRow::new();
        row.insert("name".into(), "YFG1".into());
        row.insert("degree".into(), 5i64.into());

        assert_eq!(style.resolve(label, &row, None).unwrap(), VisualValue::from("YFG1"));
        assert_eq!(style.resolve(width, &row, None).unwrap(), VisualValue::Number(25.0));

        // missing attribute falls back to the default
        let empty = AttributeRow::new();
        assert_eq!(style.resolve(width, &empty, None).unwrap(), VisualValue::Number(75.0));
    }

    #[test]
    fn test_discrete_numeric_keys_match_by_value() {
        let mapping = DiscreteMapping::new("rank")
            .with_entry(AttributeValue::Float(1.0), "first")
            .with_entry(AttributeValue::Integer(2), "second");

        assert_eq!(
            mapping.get(&AttributeValue::Integer(1)),
            Some(&VisualValue::from("first"))
        );
        assert_eq!(
            mapping.get(&AttributeValue::Float(2.0)),
            Some(&VisualValue::from("second"))
        );
        assert_eq!(mapping.get(&AttributeValue::Integer(3)), None);
        assert_eq!(mapping.get(&AttributeValue::from("1")), None);

        let replaced = mapping.with_entry(AttributeValue::Integer(1), "top");
        assert_eq!(replaced.entries().len(), 2);
        assert_eq!(
            replaced.get(&AttributeValue::Float(1.0)),
            Some(&VisualValue::from("top"))
        );
    }

    #[test]
    fn test_discrete_keys_survive_json() {
        let mapping = DiscreteMapping::new("rank").with_entry(AttributeValue::Float(1.0), "first");
        let json = serde_json::to_string(&Mapping::Discrete(mapping)).unwrap();
        let Mapping::Discrete(loaded) = serde_json::from_str::<Mapping>(&json).unwrap() else {
            panic!("expected a discrete mapping");
        };

        assert_eq!(
            loaded.get(&AttributeValue::Integer(1)),
            Some(&VisualValue::from("first"))
        );
    }

    #[test]
    fn test_resolve_continuous_color_loaded_from_json() {
        let lexicon = VisualLexicon::standard();
        let fill = lexicon.get(&"NODE_FILL_COLOR".into()).unwrap();
        let mapping: Mapping = serde_json::from_str(
            r##"{
                "mappingType": "continuous",
                "attribute": "score",
                "points": [
                    {"value": 0.0, "lesser": "#000000", "equal": "#000000", "greater": "#000000"},
                    {"value": 10.0, "lesser": "#ffffff", "equal": "#ffffff", "greater": "#ffffff"}
                ]
            }"##,
        )
        .unwrap();

        let mut style = VisualStyle::new("s");
        style.set_mapping("NODE_FILL_COLOR", mapping);
        let mut row = AttributeRow::new();
        row.insert("score".into(), 5.0f64.into());

        assert_eq!(
            style.resolve(fill, &row, None).unwrap(),
            VisualValue::Color(Color::new(128, 128, 128))
        );
    }
}
