//! Text injection
//!
//! Draws flat string values at their mapped positions. Missing, empty, and
//! whitespace-only values produce no output at all; a field targeting a page
//! the document does not have is skipped with a warning instead of failing
//! the whole document.

use crate::diagnostics::Diagnostics;
use crate::payload::TextData;
use crate::schema::FieldMapping;
use crate::Result;
use pdf_core::{wrap_text, BuiltinFont, Color, PdfDocument};

/// Vertical gap between wrapped lines, added to the font size.
const LINE_GAP: f64 = 2.0;

/// Inject text values into `doc` according to `fields`.
pub fn inject_text(
    doc: &mut PdfDocument,
    fields: &[FieldMapping],
    data: &TextData,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let page_count = doc.page_count();
    let font = BuiltinFont::Helvetica;

    for mapping in fields {
        let Some(value) = data.get(&mapping.field) else {
            continue;
        };
        if value.trim().is_empty() {
            continue;
        }

        if mapping.page >= page_count {
            diagnostics.warn(format!(
                "field '{}': page {} out of range (document has {} pages)",
                mapping.field, mapping.page, page_count
            ));
            continue;
        }

        let size = mapping.font_size;
        match mapping.max_width {
            Some(max_width) if max_width > 0.0 => {
                for (index, line) in wrap_text(value, font, size, max_width).iter().enumerate() {
                    // Wrapped text grows downward from the anchor
                    let y = mapping.y - index as f64 * (size + LINE_GAP);
                    doc.draw_text(line, mapping.page, mapping.x, y, font, size, Color::black())?;
                }
            }
            _ => {
                doc.draw_text(
                    value,
                    mapping.page,
                    mapping.x,
                    mapping.y,
                    font,
                    size,
                    Color::black(),
                )?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_core::{A4_HEIGHT, A4_WIDTH};

    fn one_page_doc() -> PdfDocument {
        PdfDocument::new_blank(A4_WIDTH, A4_HEIGHT)
    }

    fn text_data(pairs: &[(&str, &str)]) -> TextData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_and_blank_values_are_silent() {
        let mut doc = one_page_doc();
        let mut diagnostics = Diagnostics::new();
        let fields = vec![
            FieldMapping::new("ausente", 100.0, 700.0),
            FieldMapping::new("vacio", 100.0, 680.0),
            FieldMapping::new("espacios", 100.0, 660.0),
        ];
        let data = text_data(&[("vacio", ""), ("espacios", "   ")]);

        inject_text(&mut doc, &fields, &data, &mut diagnostics).unwrap();
        assert!(diagnostics.is_clean());
    }

    #[test]
    fn test_out_of_range_page_warns_and_continues() {
        let mut doc = one_page_doc();
        let mut diagnostics = Diagnostics::new();
        let fields = vec![
            FieldMapping::new("lejos", 100.0, 700.0).page(99),
            FieldMapping::new("cerca", 100.0, 650.0),
        ];
        let data = text_data(&[("lejos", "a"), ("cerca", "b")]);

        inject_text(&mut doc, &fields, &data, &mut diagnostics).unwrap();
        assert_eq!(diagnostics.warnings().len(), 1);
        assert!(diagnostics.warnings()[0].contains("lejos"));
        assert!(diagnostics.warnings()[0].contains("99"));
    }

    #[test]
    fn test_zero_max_width_means_single_line() {
        let mut doc = one_page_doc();
        let mut diagnostics = Diagnostics::new();
        let mut field = FieldMapping::new("nota", 50.0, 500.0);
        field.max_width = Some(0.0);
        let data = text_data(&[("nota", "texto largo que no debe envolverse nunca")]);

        inject_text(&mut doc, &[field], &data, &mut diagnostics).unwrap();
        assert!(diagnostics.is_clean());
    }
}
