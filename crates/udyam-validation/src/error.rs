use serde::{Deserialize, Serialize};

/// Errors raised while compiling a step's rules.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
  /// A `pattern` rule is not a valid regular expression.
  #[error("invalid pattern for field '{field}': {source}")]
  InvalidPattern {
    field: String,
    #[source]
    source: regex::Error,
  },
}

/// A failed rule for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
  pub field: String,
  pub message: String,
}

/// Per-field validation messages, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a message for a field, replacing any earlier one.
  pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
    let field = field.into();
    let message = message.into();
    match self.0.iter_mut().find(|e| e.field == field) {
      Some(existing) => existing.message = message,
      None => self.0.push(FieldError { field, message }),
    }
  }

  pub fn remove(&mut self, field: &str) {
    self.0.retain(|e| e.field != field);
  }

  /// Message for a field, if it failed.
  pub fn get(&self, field: &str) -> Option<&str> {
    self
      .0
      .iter()
      .find(|e| e.field == field)
      .map(|e| e.message.as_str())
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn clear(&mut self) {
    self.0.clear();
  }

  pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
    self.0.iter()
  }
}

impl std::fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let parts: Vec<String> = self
      .0
      .iter()
      .map(|e| format!("{}: {}", e.field, e.message))
      .collect();
    write!(f, "{}", parts.join("; "))
  }
}
