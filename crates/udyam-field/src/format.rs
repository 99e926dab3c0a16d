//! Keystroke normalisation for formatted text fields.
//!
//! Every function here takes the *raw* value of the input right after an
//! edit (the previous formatted value with the new keystroke applied) and
//! returns the value the field should hold.

use chrono::Datelike;
use udyam_config::InputFormat;

const DOCUMENT_NUMBER_LEN: usize = 10;
const MIN_YEAR: i32 = 1900;

/// Uppercase, keep `A-Z0-9` only, cut at 10 characters.
pub fn format_document_number(raw: &str) -> String {
  raw
    .to_uppercase()
    .chars()
    .filter(|c| c.is_ascii_alphanumeric())
    .take(DOCUMENT_NUMBER_LEN)
    .collect()
}

/// Segment digits into `DD/MM/YYYY`.
///
/// When the digits typed so far make the day (01-31), the month (01-12) or,
/// once complete, the year (1900-`current_year`) impossible, the edit is
/// dropped: the raw value loses its last character.
pub fn format_date(raw: &str, current_year: i32) -> String {
  let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

  if digits.len() >= 8 {
    let (day, month, year) = (&digits[0..2], &digits[2..4], &digits[4..8]);
    if !in_range(day, 1, 31) || !in_range(month, 1, 12) || !in_range(year, MIN_YEAR, current_year)
    {
      return drop_last(raw);
    }
    format!("{}/{}/{}", day, month, year)
  } else if digits.len() >= 4 {
    let (day, month) = (&digits[0..2], &digits[2..4]);
    if !in_range(day, 1, 31) || !in_range(month, 1, 12) {
      return drop_last(raw);
    }
    format!("{}/{}/{}", day, month, &digits[4..])
  } else if digits.len() >= 2 {
    let day = &digits[0..2];
    if !in_range(day, 1, 31) {
      return drop_last(raw);
    }
    format!("{}/{}", day, &digits[2..])
  } else {
    digits
  }
}

fn in_range(digits: &str, min: i32, max: i32) -> bool {
  digits
    .parse::<i32>()
    .is_ok_and(|n| (min..=max).contains(&n))
}

fn drop_last(raw: &str) -> String {
  let mut value = raw.to_string();
  value.pop();
  value
}

/// Applies a field's [`InputFormat`] to edits.
#[derive(Debug, Clone, Copy)]
pub struct InputFormatter {
  current_year: i32,
}

impl Default for InputFormatter {
  fn default() -> Self {
    Self::new()
  }
}

impl InputFormatter {
  /// A formatter that accepts years up to the current local calendar year.
  pub fn new() -> Self {
    Self {
      current_year: chrono::Local::now().year(),
    }
  }

  /// A formatter with a fixed upper year bound.
  pub fn with_current_year(current_year: i32) -> Self {
    Self { current_year }
  }

  pub fn current_year(&self) -> i32 {
    self.current_year
  }

  /// Normalise a raw value after one edit.
  pub fn apply(&self, format: Option<InputFormat>, raw: &str) -> String {
    match format {
      Some(InputFormat::DocumentNumber) => format_document_number(raw),
      Some(InputFormat::Date) => format_date(raw, self.current_year),
      None => raw.to_string(),
    }
  }

  /// Type `typed` one character at a time after `current`, normalising after
  /// each keystroke.
  pub fn type_str(&self, format: Option<InputFormat>, current: &str, typed: &str) -> String {
    typed.chars().fold(current.to_string(), |value, c| {
      let mut raw = value;
      raw.push(c);
      self.apply(format, &raw)
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date_formatter() -> InputFormatter {
    InputFormatter::with_current_year(2025)
  }

  fn type_date(typed: &str) -> String {
    date_formatter().type_str(Some(InputFormat::Date), "", typed)
  }

  #[test]
  fn test_document_number_cleaned_and_truncated() {
    assert_eq!(format_document_number("abc123xyz456789"), "ABC123XYZ4");
    assert_eq!(format_document_number("ab-cd e1234f"), "ABCDE1234F");
    assert_eq!(format_document_number(""), "");
  }

  #[test]
  fn test_document_number_typed_per_keystroke() {
    let value = date_formatter().type_str(Some(InputFormat::DocumentNumber), "", "abc123xyz456789");
    assert_eq!(value, "ABC123XYZ4");
  }

  #[test]
  fn test_date_segments_as_digits_arrive() {
    assert_eq!(type_date("1"), "1");
    assert_eq!(type_date("15"), "15/");
    assert_eq!(type_date("150"), "15/0");
    assert_eq!(type_date("1508"), "15/08/");
    assert_eq!(type_date("150819"), "15/08/19");
    assert_eq!(type_date("15081990"), "15/08/1990");
  }

  #[test]
  fn test_date_invalid_day_dropped() {
    assert_eq!(type_date("32"), "3");
    assert_eq!(type_date("00"), "0");
  }

  #[test]
  fn test_date_invalid_month_reverts_to_last_valid_state() {
    assert_eq!(type_date("0113"), "01/1");
    // Later digits continue from the reverted state.
    assert_eq!(type_date("01132023"), "01/12/023");
  }

  #[test]
  fn test_date_year_bounds() {
    assert_eq!(type_date("01011899"), "01/01/189");
    assert_eq!(type_date("01012026"), "01/01/202");
    assert_eq!(type_date("01012025"), "01/01/2025");
    assert_eq!(type_date("01011900"), "01/01/1900");
  }

  #[test]
  fn test_date_ignores_non_digits() {
    assert_eq!(type_date("1a5/"), "15/");
    assert_eq!(format_date("15/08/1990", 2025), "15/08/1990");
  }

  #[test]
  fn test_date_extra_digits_ignored() {
    assert_eq!(format_date("15/08/19901", 2025), "15/08/1990");
  }

  #[test]
  fn test_plain_field_untouched() {
    assert_eq!(date_formatter().apply(None, "Asha verma "), "Asha verma ");
  }

  #[test]
  fn test_default_formatter_uses_current_year() {
    let year = chrono::Local::now().year();
    assert_eq!(InputFormatter::new().current_year(), year);
  }
}
