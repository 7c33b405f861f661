//! Coordinate mapping schema types
//!
//! Coordinates are PDF user space: `(0, 0)` is the bottom-left corner of the
//! page, x grows right, y grows up. A4 pages measure 595x842 points. `page`
//! is a 0-based page index and defaults to the first page.

use crate::{Result, TemplateError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single mark position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub page: usize,
}

impl CheckPoint {
    /// Point on the first page.
    pub fn at(x: f64, y: f64) -> Self {
        Self { x, y, page: 0 }
    }

    /// Point on a specific page (0-based).
    pub fn at_page(x: f64, y: f64, page: usize) -> Self {
        Self { x, y, page }
    }
}

/// One scalar text slot on a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Lookup key into the runtime text payload
    pub field: String,
    pub x: f64,
    pub y: f64,
    /// Target page (0-based)
    #[serde(default)]
    pub page: usize,
    #[serde(rename = "fontSize", default = "default_font_size")]
    pub font_size: f64,
    /// Word-wrap width in points; absent or <= 0 means a single unbounded line
    #[serde(rename = "maxWidth", default)]
    pub max_width: Option<f64>,
}

fn default_font_size() -> f64 {
    12.0
}

impl FieldMapping {
    pub fn new(field: &str, x: f64, y: f64) -> Self {
        Self {
            field: field.to_string(),
            x,
            y,
            page: 0,
            font_size: default_font_size(),
            max_width: None,
        }
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn max_width(mut self, width: f64) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }
}

/// A checkbox slot: either a single toggle point or a set of labeled options.
///
/// Serialized mappings carry both shapes as plain JSON objects; a point is
/// recognized by its numeric `x`/`y` members, anything else is an
/// option-label map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckboxSlot {
    /// Binary toggle: the mark is drawn when the runtime value is truthy
    Mark(CheckPoint),
    /// Multi-choice: exactly one option's mark is drawn, selected by the
    /// runtime value
    Options(BTreeMap<String, CheckPoint>),
}

impl CheckboxSlot {
    /// Binary toggle on the first page.
    pub fn mark(x: f64, y: f64) -> Self {
        Self::Mark(CheckPoint::at(x, y))
    }

    /// Option set from `(label, point)` pairs.
    pub fn options<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, CheckPoint)>,
        S: Into<String>,
    {
        Self::Options(
            entries
                .into_iter()
                .map(|(label, point)| (label.into(), point))
                .collect(),
        )
    }

    /// Every mark position this slot can produce.
    pub fn points(&self) -> Vec<(Option<&str>, &CheckPoint)> {
        match self {
            CheckboxSlot::Mark(point) => vec![(None, point)],
            CheckboxSlot::Options(options) => options
                .iter()
                .map(|(label, point)| (Some(label.as_str()), point))
                .collect(),
        }
    }
}

/// One named template's complete field layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateMapping {
    #[serde(default)]
    pub text: Vec<FieldMapping>,
    #[serde(default)]
    pub checkboxes: BTreeMap<String, CheckboxSlot>,
}

impl TemplateMapping {
    /// Parse a stored mapping.
    ///
    /// Accepts the full `{text, checkboxes}` object or a bare array of field
    /// mappings (older records stored text-only layouts that way).
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| TemplateError::MappingParse(e.to_string()))?;

        if value.is_array() {
            let text: Vec<FieldMapping> = serde_json::from_value(value)
                .map_err(|e| TemplateError::MappingParse(e.to_string()))?;
            return Ok(Self {
                text,
                checkboxes: BTreeMap::new(),
            });
        }

        serde_json::from_value(value).map_err(|e| TemplateError::MappingParse(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.checkboxes.is_empty()
    }

    /// Highest page index referenced by any field or checkbox point.
    pub fn max_page(&self) -> usize {
        let text_max = self.text.iter().map(|f| f.page).max().unwrap_or(0);
        let checkbox_max = self
            .checkboxes
            .values()
            .flat_map(|slot| slot.points().into_iter().map(|(_, p)| p.page))
            .max()
            .unwrap_or(0);
        text_max.max(checkbox_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_field_mapping() {
        let json = r#"{
            "field": "nombrePaciente",
            "x": 120,
            "y": 760,
            "fontSize": 10,
            "maxWidth": 250
        }"#;

        let field: FieldMapping = serde_json::from_str(json).unwrap();
        assert_eq!(field.field, "nombrePaciente");
        assert_eq!(field.x, 120.0);
        assert_eq!(field.page, 0);
        assert_eq!(field.font_size, 10.0);
        assert_eq!(field.max_width, Some(250.0));
    }

    #[test]
    fn test_field_mapping_defaults() {
        let json = r#"{ "field": "rut", "x": 400, "y": 760 }"#;
        let field: FieldMapping = serde_json::from_str(json).unwrap();
        assert_eq!(field.font_size, 12.0);
        assert_eq!(field.max_width, None);
        assert_eq!(field.page, 0);
    }

    #[test]
    fn test_checkbox_slot_mark_shape() {
        let json = r#"{ "x": 120, "y": 560 }"#;
        let slot: CheckboxSlot = serde_json::from_str(json).unwrap();
        assert_eq!(slot, CheckboxSlot::mark(120.0, 560.0));
    }

    #[test]
    fn test_checkbox_slot_options_shape() {
        let json = r#"{
            "derecha": { "x": 120, "y": 580 },
            "izquierda": { "x": 200, "y": 580 }
        }"#;
        let slot: CheckboxSlot = serde_json::from_str(json).unwrap();

        match &slot {
            CheckboxSlot::Options(options) => {
                assert_eq!(options.len(), 2);
                assert_eq!(options["izquierda"], CheckPoint::at(200.0, 580.0));
            }
            CheckboxSlot::Mark(_) => panic!("Expected Options"),
        }
    }

    #[test]
    fn test_mapping_from_json_object() {
        let json = r#"{
            "text": [{ "field": "diagnostico", "x": 120, "y": 660, "maxWidth": 400 }],
            "checkboxes": {
                "rayosX": { "si": { "x": 120, "y": 520 }, "no": { "x": 180, "y": 520 } }
            }
        }"#;

        let mapping = TemplateMapping::from_json(json).unwrap();
        assert_eq!(mapping.text.len(), 1);
        assert_eq!(mapping.checkboxes.len(), 1);
    }

    #[test]
    fn test_mapping_from_json_bare_array() {
        let json = r#"[
            { "field": "nombre", "x": 100, "y": 700 },
            { "field": "rut", "x": 100, "y": 680 }
        ]"#;

        let mapping = TemplateMapping::from_json(json).unwrap();
        assert_eq!(mapping.text.len(), 2);
        assert!(mapping.checkboxes.is_empty());
    }

    #[test]
    fn test_mapping_from_json_invalid() {
        assert!(TemplateMapping::from_json("not json").is_err());
        assert!(TemplateMapping::from_json(r#"{"text": 42}"#).is_err());
    }

    #[test]
    fn test_max_page() {
        let mut mapping = TemplateMapping::default();
        assert_eq!(mapping.max_page(), 0);

        mapping.text.push(FieldMapping::new("a", 0.0, 0.0).page(2));
        mapping.checkboxes.insert(
            "b".to_string(),
            CheckboxSlot::Mark(CheckPoint::at_page(10.0, 10.0, 4)),
        );
        assert_eq!(mapping.max_page(), 4);
    }

    #[test]
    fn test_mapping_roundtrip() {
        let mut mapping = TemplateMapping::default();
        mapping
            .text
            .push(FieldMapping::new("nombre", 100.0, 700.0).font_size(10.0));
        mapping.checkboxes.insert(
            "lateralidad".to_string(),
            CheckboxSlot::options([
                ("derecha", CheckPoint::at(120.0, 580.0)),
                ("izquierda", CheckPoint::at(200.0, 580.0)),
            ]),
        );

        let json = serde_json::to_string(&mapping).unwrap();
        let parsed = TemplateMapping::from_json(&json).unwrap();
        assert_eq!(parsed, mapping);
    }
}
