/// Convert a `DD/MM/YYYY` date to the `YYYY-MM-DD` form the service expects.
///
/// Only values made of exactly three numeric `/`-separated groups are
/// converted; day and month are zero-padded to two digits. Anything else is
/// returned unchanged.
pub fn to_wire_date(value: &str) -> String {
  let parts: Vec<&str> = value.split('/').collect();
  let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());

  match parts.as_slice() {
    [day, month, year] if numeric(day) && numeric(month) && numeric(year) => {
      format!("{}-{:0>2}-{:0>2}", year, month, day)
    }
    _ => value.to_string(),
  }
}
