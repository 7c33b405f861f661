//! Mapping preview and calibration grid
//!
//! Developer-facing diagnostic PDFs for template authoring. Nothing in the
//! production generation path calls into this module.

use crate::schema::TemplateMapping;
use crate::Result;
use pdf_core::{BuiltinFont, Color, PdfDocument, A4_HEIGHT, A4_WIDTH};

/// Render a diagnostic PDF showing every mapped field and checkbox position.
///
/// Each text field gets a blue marker, its name, and its raw coordinates;
/// each checkbox point gets a red box and its `field` or `field:option`
/// label. Pages are allocated up to the highest page index the mapping
/// references, so multi-page layouts are fully visible.
pub fn mapping_preview(mapping: &TemplateMapping) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::new_blank(A4_WIDTH, A4_HEIGHT);
    for _ in 0..mapping.max_page() {
        doc.add_blank_page(A4_WIDTH, A4_HEIGHT)?;
    }

    let regular = BuiltinFont::Helvetica;
    let bold = BuiltinFont::HelveticaBold;

    doc.draw_text(
        "Vista Previa de Mapeo de Campos",
        0,
        50.0,
        A4_HEIGHT - 30.0,
        bold,
        16.0,
        Color::black(),
    )?;

    for field in &mapping.text {
        doc.fill_rect(field.page, field.x - 1.5, field.y - 1.5, 3.0, 3.0, Color::blue())?;
        doc.draw_text(
            &format!("[{}]", field.field),
            field.page,
            field.x,
            field.y,
            regular,
            field.font_size,
            Color::blue(),
        )?;
        doc.draw_text(
            &format!("({},{})", field.x, field.y),
            field.page,
            field.x,
            field.y - 12.0,
            regular,
            8.0,
            Color::gray(0.5),
        )?;
    }

    for (field, slot) in &mapping.checkboxes {
        for (option, point) in slot.points() {
            doc.draw_rect(
                point.page,
                point.x - 2.0,
                point.y - 2.0,
                12.0,
                12.0,
                1.0,
                Color::red(),
            )?;
            let label = match option {
                Some(option) => format!("[{field}:{option}]"),
                None => format!("[{field}]"),
            };
            doc.draw_text(
                &label,
                point.page,
                point.x + 15.0,
                point.y,
                regular,
                8.0,
                Color::red(),
            )?;
        }
    }

    Ok(doc.to_bytes()?)
}

/// Render a coordinate calibration grid.
///
/// Grid lines every `spacing` points with heavier lines and axis labels at
/// every second line, plus origin and corner markers. Used to read off the
/// exact coordinates of fields on a printed template.
pub fn coordinate_grid(page_width: f64, page_height: f64, spacing: f64) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::new_blank(page_width, page_height);
    let regular = BuiltinFont::Helvetica;
    let bold = BuiltinFont::HelveticaBold;
    let grid_color = Color::gray(0.8);
    let label_color = Color::gray(0.5);

    let mut index = 0usize;
    let mut x = 0.0;
    while x <= page_width {
        let major = index % 2 == 0;
        let thickness = if major { 1.0 } else { 0.5 };
        doc.draw_line(0, x, 0.0, x, page_height, thickness, grid_color)?;
        if major {
            doc.draw_text(&format!("{x}"), 0, x + 2.0, 5.0, regular, 8.0, label_color)?;
        }
        x += spacing;
        index += 1;
    }

    index = 0;
    let mut y = 0.0;
    while y <= page_height {
        let major = index % 2 == 0;
        let thickness = if major { 1.0 } else { 0.5 };
        doc.draw_line(0, 0.0, y, page_width, y, thickness, grid_color)?;
        if major {
            doc.draw_text(&format!("{y}"), 0, 5.0, y + 2.0, regular, 8.0, label_color)?;
        }
        y += spacing;
        index += 1;
    }

    doc.draw_text(
        "Cuadrícula de Coordenadas PDF",
        0,
        page_width / 2.0 - 100.0,
        page_height - 30.0,
        bold,
        14.0,
        Color::black(),
    )?;
    doc.draw_text(
        &format!("Tamaño: {page_width} x {page_height} pts"),
        0,
        50.0,
        page_height - 60.0,
        regular,
        10.0,
        Color::black(),
    )?;
    doc.draw_text(
        &format!("Espaciado: {spacing} pts"),
        0,
        50.0,
        page_height - 75.0,
        regular,
        10.0,
        Color::black(),
    )?;
    doc.draw_text(
        "Origen (0,0) = Esquina inferior izquierda",
        0,
        50.0,
        page_height - 90.0,
        regular,
        10.0,
        Color::black(),
    )?;

    // Origin and corner markers
    doc.fill_rect(0, 0.0, 0.0, 6.0, 6.0, Color::red())?;
    doc.draw_text("(0,0)", 0, 5.0, 5.0, bold, 10.0, Color::red())?;
    doc.fill_rect(0, page_width - 6.0, 0.0, 6.0, 6.0, Color::red())?;
    doc.fill_rect(0, 0.0, page_height - 6.0, 6.0, 6.0, Color::red())?;
    doc.fill_rect(0, page_width - 6.0, page_height - 6.0, 6.0, 6.0, Color::red())?;

    Ok(doc.to_bytes()?)
}

/// Calibration grid for the default A4 page at 50pt spacing.
pub fn coordinate_grid_a4() -> Result<Vec<u8>> {
    coordinate_grid(A4_WIDTH, A4_HEIGHT, 50.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CheckPoint, CheckboxSlot, FieldMapping};

    #[test]
    fn test_preview_allocates_referenced_pages() {
        let mut mapping = TemplateMapping::default();
        mapping
            .text
            .push(FieldMapping::new("nombre", 100.0, 700.0));
        mapping
            .text
            .push(FieldMapping::new("rutAutorizacion", 180.0, 360.0).page(2));
        mapping
            .checkboxes
            .insert("rayosX".to_string(), CheckboxSlot::mark(120.0, 520.0));

        let bytes = mapping_preview(&mapping).unwrap();
        let doc = PdfDocument::from_bytes(&bytes).unwrap();
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_empty_mapping_preview_is_single_page() {
        let bytes = mapping_preview(&TemplateMapping::default()).unwrap();
        let doc = PdfDocument::from_bytes(&bytes).unwrap();
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_grid_is_parseable() {
        let bytes = coordinate_grid_a4().unwrap();
        let doc = PdfDocument::from_bytes(&bytes).unwrap();
        assert_eq!(doc.page_count(), 1);
    }
}
