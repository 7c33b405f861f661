//! Coordinate validation
//!
//! Pure bounds checks over a mapping, run at template-authoring time. An
//! out-of-range coordinate is an error; one hugging a page edge is only a
//! warning. Generation itself never rejects coordinates (an off-page draw is
//! clipped, not fatal), so this is where mistakes get caught early.

use crate::schema::TemplateMapping;
use pdf_core::{A4_HEIGHT, A4_WIDTH};

/// Warning distance from each page edge, in points.
const EDGE_MARGIN: f64 = 20.0;

/// Outcome of validating one point or a whole mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl CoordinateReport {
    fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Validate a single coordinate pair against a page size.
pub fn validate_point(x: f64, y: f64, page_width: f64, page_height: f64) -> CoordinateReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    check_axis(&mut errors, &mut warnings, "x", x, page_width, "left", "right");
    check_axis(&mut errors, &mut warnings, "y", y, page_height, "bottom", "top");

    CoordinateReport::from_findings(errors, warnings)
}

fn check_axis(
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
    axis: &str,
    value: f64,
    limit: f64,
    low_edge: &str,
    high_edge: &str,
) {
    if value < 0.0 {
        errors.push(format!("{axis} is negative: {value} (must be >= 0)"));
    } else if value > limit {
        errors.push(format!("{axis} out of range: {value} (must be <= {limit})"));
    } else if value < EDGE_MARGIN {
        warnings.push(format!(
            "{axis} within {EDGE_MARGIN}pt of the {low_edge} edge: {value}"
        ));
    } else if value > limit - EDGE_MARGIN {
        warnings.push(format!(
            "{axis} within {EDGE_MARGIN}pt of the {high_edge} edge: {value}"
        ));
    }
}

/// Validate every coordinate in a mapping.
///
/// Each finding is prefixed with the field (and option label, for
/// multi-option checkboxes) and its index, so it points at the exact
/// offending entry.
pub fn validate_mapping(
    mapping: &TemplateMapping,
    page_width: f64,
    page_height: f64,
) -> CoordinateReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (index, field) in mapping.text.iter().enumerate() {
        let report = validate_point(field.x, field.y, page_width, page_height);
        let prefix = format!("text field [{index}] '{}'", field.field);
        errors.extend(report.errors.iter().map(|e| format!("{prefix}: {e}")));
        warnings.extend(report.warnings.iter().map(|w| format!("{prefix}: {w}")));
    }

    for (field, slot) in &mapping.checkboxes {
        for (option, point) in slot.points() {
            let report = validate_point(point.x, point.y, page_width, page_height);
            let prefix = match option {
                Some(label) => format!("checkbox '{field}' option '{label}'"),
                None => format!("checkbox '{field}'"),
            };
            errors.extend(report.errors.iter().map(|e| format!("{prefix}: {e}")));
            warnings.extend(report.warnings.iter().map(|w| format!("{prefix}: {w}")));
        }
    }

    CoordinateReport::from_findings(errors, warnings)
}

/// Validate a mapping against the default A4 page.
pub fn validate_mapping_a4(mapping: &TemplateMapping) -> CoordinateReport {
    validate_mapping(mapping, A4_WIDTH, A4_HEIGHT)
}

/// Convert a distance measured from the top of the page to a PDF y
/// coordinate.
pub fn from_top(distance: f64, page_height: f64) -> f64 {
    page_height - distance
}

/// Convert a PDF y coordinate to a distance from the top of the page.
pub fn to_top(y: f64, page_height: f64) -> f64 {
    page_height - y
}
