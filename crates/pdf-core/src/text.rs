//! Text rendering utilities

use crate::document::Color;
use crate::font::BuiltinFont;

/// Encode text as WinAnsi (Latin-1) bytes for a base-14 font.
///
/// Characters outside the Latin-1 range render as `?`; the built-in fonts
/// cannot display them anyway.
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xFF {
                code as u8
            } else {
                b'?'
            }
        })
        .collect()
}

/// Escape bytes for inclusion in a PDF literal string.
fn escape_literal(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        if b == b'(' || b == b')' || b == b'\\' {
            out.push(b'\\');
        }
        out.push(b);
    }
    out
}

/// Generate PDF operators for a single text draw.
///
/// Produces the standard `BT`/`rg`/`Tf`/`Td`/`Tj`/`ET` sequence at `(x, y)`
/// in PDF coordinates (origin bottom-left).
pub(crate) fn text_operators(
    text: &str,
    x: f64,
    y: f64,
    font: BuiltinFont,
    size: f64,
    color: Color,
) -> Vec<u8> {
    let mut ops: Vec<u8> = Vec::new();
    ops.extend_from_slice(b"BT\n");
    ops.extend_from_slice(format!("{} {} {} rg\n", color.r, color.g, color.b).as_bytes());
    ops.extend_from_slice(format!("/{} {} Tf\n", font.resource_name(), size).as_bytes());
    ops.extend_from_slice(format!("{x} {y} Td\n").as_bytes());
    ops.push(b'(');
    ops.extend(escape_literal(&encode_win_ansi(text)));
    ops.extend_from_slice(b") Tj\nET\n");
    ops
}

/// Split text into lines no wider than `max_width` points.
///
/// Greedy word wrap measured against the font's real advance widths: words
/// accumulate into the current line while its rendered width stays within
/// `max_width`; only a strictly greater candidate width flushes the line, so
/// a line that measures exactly `max_width` does not wrap. A single word
/// wider than `max_width` occupies its own line and is never split.
pub fn wrap_text(text: &str, font: BuiltinFont, size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if font.text_width(&candidate, size) > max_width && !current.is_empty() {
            lines.push(current);
            current = word.to_string();
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
