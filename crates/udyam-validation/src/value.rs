//! Form value types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use udyam_config::{FieldKind, StepDescriptor};

/// The value held by one form field.
///
/// Serializes as plain JSON: `true`, `"text"` or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
  Bool(bool),
  Text(String),
  Null,
}

impl FieldValue {
  pub fn as_text(&self) -> Option<&str> {
    match self {
      FieldValue::Text(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      FieldValue::Bool(b) => Some(*b),
      _ => None,
    }
  }
}

impl From<&str> for FieldValue {
  fn from(value: &str) -> Self {
    FieldValue::Text(value.to_string())
  }
}

impl From<String> for FieldValue {
  fn from(value: String) -> Self {
    FieldValue::Text(value)
  }
}

impl From<bool> for FieldValue {
  fn from(value: bool) -> Self {
    FieldValue::Bool(value)
  }
}

/// A candidate record for one form: field name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, FieldValue>);

impl FormValues {
  pub fn new() -> Self {
    Self::default()
  }

  /// Initial values for a step: each field's declared default, otherwise
  /// `false` for checkboxes, the first option for selects and `""` for the
  /// rest.
  pub fn defaults_for(step: &StepDescriptor) -> Self {
    let mut values = Self::new();
    for field in &step.fields {
      let value = match (&field.default, &field.kind) {
        (Some(default), FieldKind::Checkbox) => FieldValue::Bool(default == "true"),
        (Some(default), _) => FieldValue::Text(default.clone()),
        (None, FieldKind::Checkbox) => FieldValue::Bool(false),
        (None, FieldKind::Select { options }) => FieldValue::Text(
          options
            .first()
            .map(|o| o.value.clone())
            .unwrap_or_default(),
        ),
        (None, _) => FieldValue::Text(String::new()),
      };
      values.set(field.name.clone(), value);
    }
    values
  }

  pub fn get(&self, name: &str) -> Option<&FieldValue> {
    self.0.get(name)
  }

  pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
    self.0.insert(name.into(), value.into());
  }

  /// Text value of a field; empty when missing, null or not text.
  pub fn text(&self, name: &str) -> &str {
    self.0.get(name).and_then(FieldValue::as_text).unwrap_or("")
  }

  /// Boolean value of a field; `false` when missing, null or not a bool.
  pub fn checked(&self, name: &str) -> bool {
    self.0.get(name).and_then(FieldValue::as_bool).unwrap_or(false)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
    self.0.iter()
  }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FormValues {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(
      iter
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use udyam_config::{FormSchema, names};

  use super::*;

  #[test]
  fn test_field_value_json_shapes() {
    let values: FormValues = serde_json::from_str(r#"{ "a": "x", "b": true, "c": null }"#).unwrap();

    assert_eq!(values.get("a"), Some(&FieldValue::Text("x".to_string())));
    assert_eq!(values.get("b"), Some(&FieldValue::Bool(true)));
    assert_eq!(values.get("c"), Some(&FieldValue::Null));
    assert_eq!(values.text("c"), "");
    assert!(!values.checked("a"));
  }

  #[test]
  fn test_defaults_for_pan_step() {
    let schema = FormSchema::udyam();
    let values = FormValues::defaults_for(schema.step_at(1).unwrap());

    assert_eq!(values.text(names::TYPE_OF_ORGANISATION), "1");
    assert_eq!(values.text(names::PAN_NUMBER), "");
    assert_eq!(values.get(names::PAN_CONSENT), Some(&FieldValue::Bool(false)));
    assert_eq!(values.text(names::HAS_GSTIN), "");
  }
}
