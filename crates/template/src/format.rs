//! Payload formatting helpers
//!
//! Small string formatters used by upstream adapters while building
//! payloads. These only normalize presentation; identifier validation is the
//! caller's concern.

use chrono::NaiveDate;

/// Format a RUT with thousands dots and the check-digit dash:
/// `12345678-9` -> `12.345.678-9`. Inputs too short to carry a check digit
/// pass through unchanged.
pub fn format_rut(rut: &str) -> String {
    let cleaned: Vec<char> = rut.chars().filter(|c| *c != '.' && *c != '-').collect();
    if cleaned.len() < 2 {
        return rut.to_string();
    }

    let (number, dv) = cleaned.split_at(cleaned.len() - 1);

    let mut grouped = String::new();
    for (index, digit) in number.iter().enumerate() {
        if index > 0 && (number.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*digit);
    }

    format!("{grouped}-{}", dv[0])
}

/// Format an ISO date (`YYYY-MM-DD`, optionally with a time suffix) as
/// `DD/MM/YYYY`. Unparseable input passes through unchanged.
pub fn format_date_cl(date: &str) -> String {
    let date_part = date.split('T').next().unwrap_or(date);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%d/%m/%Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Format a Chilean mobile number as `+56 9 1234 5678`.
///
/// Handles numbers with or without the country prefix; anything else passes
/// through unchanged.
pub fn format_phone_cl(phone: &str) -> String {
    let cleaned: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '(' | ')' | '-'))
        .collect();

    let national = if let Some(rest) = cleaned.strip_prefix("+56") {
        Some(rest)
    } else if let Some(rest) = cleaned.strip_prefix("56") {
        Some(rest)
    } else if cleaned.len() == 9 && cleaned.starts_with('9') {
        Some(cleaned.as_str())
    } else {
        None
    };

    match national {
        Some(number) if number.len() == 9 && number.chars().all(|c| c.is_ascii_digit()) => {
            format!("+56 {} {} {}", &number[..1], &number[1..5], &number[5..])
        }
        _ => phone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_rut_plain() {
        assert_eq!(format_rut("123456789"), "12.345.678-9");
        assert_eq!(format_rut("1234567k"), "1.234.567-k");
    }

    #[test]
    fn test_format_rut_already_formatted() {
        assert_eq!(format_rut("12.345.678-9"), "12.345.678-9");
    }

    #[test]
    fn test_format_rut_short_input() {
        assert_eq!(format_rut("9"), "9");
        assert_eq!(format_rut(""), "");
    }

    #[test]
    fn test_format_date_cl() {
        assert_eq!(format_date_cl("2024-03-09"), "09/03/2024");
        assert_eq!(format_date_cl("2024-03-09T14:30:00Z"), "09/03/2024");
    }

    #[test]
    fn test_format_date_cl_passthrough() {
        assert_eq!(format_date_cl("09/03/2024"), "09/03/2024");
        assert_eq!(format_date_cl("pronto"), "pronto");
    }

    #[test]
    fn test_format_phone_cl() {
        assert_eq!(format_phone_cl("+56912345678"), "+56 9 1234 5678");
        assert_eq!(format_phone_cl("56912345678"), "+56 9 1234 5678");
        assert_eq!(format_phone_cl("912345678"), "+56 9 1234 5678");
        assert_eq!(format_phone_cl("+56 9 1234-5678"), "+56 9 1234 5678");
    }

    #[test]
    fn test_format_phone_cl_passthrough() {
        assert_eq!(format_phone_cl("223456789"), "223456789");
        assert_eq!(format_phone_cl("sin telefono"), "sin telefono");
    }
}
