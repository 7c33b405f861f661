//! Checkbox resolution
//!
//! A binary slot draws its mark for the literal truthy forms `true`,
//! `"true"` and `"si"` and nothing else. A multi-option slot resolves the
//! runtime value against the option labels after trimming and lowercasing
//! both sides, so upstream strings like "Banmedica" and " banmedica " select
//! the same option; an unmatched value draws nothing and raises no error.

use crate::diagnostics::Diagnostics;
use crate::payload::{CheckValue, CheckboxData};
use crate::schema::{CheckPoint, CheckboxSlot};
use crate::Result;
use pdf_core::{BuiltinFont, Color, PdfDocument};
use std::collections::BTreeMap;

/// The mark glyph and its fixed size.
const MARK: &str = "X";
const MARK_SIZE: f64 = 12.0;

/// Inject checkbox marks into `doc` according to `slots`.
pub fn inject_checkboxes(
    doc: &mut PdfDocument,
    slots: &BTreeMap<String, CheckboxSlot>,
    data: &CheckboxData,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    for (field, slot) in slots {
        let Some(value) = data.get(field) else {
            continue;
        };
        if matches!(value, CheckValue::Text(text) if text.is_empty()) {
            continue;
        }

        match slot {
            CheckboxSlot::Mark(point) => {
                if is_checked(value) {
                    draw_mark(doc, field, None, point, diagnostics)?;
                }
            }
            CheckboxSlot::Options(options) => {
                let Some(label) = resolve_option(options, value) else {
                    continue;
                };
                let point = options[&label];
                draw_mark(doc, field, Some(&label), &point, diagnostics)?;
            }
        }
    }

    Ok(())
}

/// The exact truthy forms a binary toggle accepts.
fn is_checked(value: &CheckValue) -> bool {
    match value {
        CheckValue::Bool(flag) => *flag,
        CheckValue::Text(text) => text == "true" || text == "si",
    }
}

/// Resolve a runtime value to one of the option labels.
///
/// Booleans map to "si"/"no" with "true"/"false" as the fallback pair;
/// strings match an option whose normalized label equals the normalized
/// value.
fn resolve_option(options: &BTreeMap<String, CheckPoint>, value: &CheckValue) -> Option<String> {
    match value {
        CheckValue::Bool(flag) => {
            let primary = if *flag { "si" } else { "no" };
            if options.contains_key(primary) {
                return Some(primary.to_string());
            }
            let fallback = if *flag { "true" } else { "false" };
            options.contains_key(fallback).then(|| fallback.to_string())
        }
        CheckValue::Text(text) => {
            let wanted = normalize_key(text);
            options
                .keys()
                .find(|label| normalize_key(label) == wanted)
                .cloned()
        }
    }
}

fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

fn draw_mark(
    doc: &mut PdfDocument,
    field: &str,
    option: Option<&str>,
    point: &CheckPoint,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    if point.page >= doc.page_count() {
        let slot = match option {
            Some(label) => format!("checkbox '{field}:{label}'"),
            None => format!("checkbox '{field}'"),
        };
        diagnostics.warn(format!(
            "{slot}: page {} out of range (document has {} pages)",
            point.page,
            doc.page_count()
        ));
        return Ok(());
    }

    doc.draw_text(
        MARK,
        point.page,
        point.x,
        point.y,
        BuiltinFont::HelveticaBold,
        MARK_SIZE,
        Color::black(),
    )?;
    Ok(())
}
