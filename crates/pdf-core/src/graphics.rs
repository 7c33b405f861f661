//! Line and rectangle drawing operators

use crate::document::Color;

/// Generate operators for a stroked line from `(x1, y1)` to `(x2, y2)`.
pub(crate) fn line_operators(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    thickness: f64,
    color: Color,
) -> Vec<u8> {
    format!(
        "q\n{} {} {} RG\n{thickness} w\n{x1} {y1} m\n{x2} {y2} l\nS\nQ\n",
        color.r, color.g, color.b
    )
    .into_bytes()
}

/// Generate operators for a stroked rectangle with bottom-left at `(x, y)`.
pub(crate) fn rect_stroke_operators(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    thickness: f64,
    color: Color,
) -> Vec<u8> {
    format!(
        "q\n{} {} {} RG\n{thickness} w\n{x} {y} {width} {height} re\nS\nQ\n",
        color.r, color.g, color.b
    )
    .into_bytes()
}

/// Generate operators for a filled rectangle with bottom-left at `(x, y)`.
pub(crate) fn rect_fill_operators(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    color: Color,
) -> Vec<u8> {
    format!(
        "q\n{} {} {} rg\n{x} {y} {width} {height} re\nf\nQ\n",
        color.r, color.g, color.b
    )
    .into_bytes()
}
