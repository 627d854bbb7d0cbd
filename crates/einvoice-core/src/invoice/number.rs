//! Locale-number parsing for Vietnamese-formatted amounts.
//!
//! The template prints numbers with `.` as the thousands separator and `,`
//! as the decimal separator (e.g. `1.480.000` or `37.000,5`).

use crate::error::NumberError;

/// Parse a Vietnamese-formatted numeric string into an `f64`.
///
/// Fails with [`NumberError::NoDigits`] when the string has no digit
/// characters and [`NumberError::Malformed`] when cleanup leaves no valid
/// number; a bad data-row cell must fail the row rather than silently
/// become zero.
pub fn parse_amount(input: &str) -> Result<f64, NumberError> {
    if !input.chars().any(|c| c.is_ascii_digit()) {
        return Err(NumberError::NoDigits(input.to_string()));
    }

    // Keep digits and separators, drop currency symbols and embedded spaces.
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.' || *c == '-')
        .collect();

    // Dots group thousands; a comma, if present, starts the decimal part.
    let normalized = cleaned.replace('.', "").replace(',', ".");

    normalized
        .parse::<f64>()
        .map_err(|_| NumberError::Malformed(input.to_string()))
}
