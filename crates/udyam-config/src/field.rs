use serde::{Deserialize, Serialize};

/// One selectable option of a `select` or `radio` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
  /// Text shown to the user.
  pub text: String,
  /// Value stored in the form when this option is chosen.
  pub value: String,
}

impl FieldOption {
  pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      value: value.into(),
    }
  }
}

/// Declarative validation rules attached to a field.
///
/// Which rules apply depends on the field kind; rules that make no sense for
/// a kind (e.g. `pattern` on a checkbox) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
  #[serde(default)]
  pub required: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub maxlength: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pattern: Option<String>,
  #[serde(default)]
  pub checked: bool,
}

/// Keystroke normalisation applied to a text field while the user types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
  /// Uppercase, alphanumerics only, at most 10 characters.
  DocumentNumber,
  /// Digits segmented into `DD/MM/YYYY` as they are typed.
  Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
  Text,
  Select {
    #[serde(default)]
    options: Vec<FieldOption>,
  },
  Checkbox,
  Radio {
    #[serde(default)]
    options: Vec<FieldOption>,
  },
  /// Any `type` this version does not know. Validated as an optional
  /// passthrough and rendered without a control.
  #[serde(other)]
  Unknown,
}

impl FieldKind {
  /// Options for `select` and `radio` fields, empty for everything else.
  pub fn options(&self) -> &[FieldOption] {
    match self {
      FieldKind::Select { options } | FieldKind::Radio { options } => options,
      _ => &[],
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
  /// Unique key of the field within its step, also the form value key.
  pub name: String,
  pub label: String,
  #[serde(flatten)]
  pub kind: FieldKind,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub placeholder: Option<String>,
  #[serde(default)]
  pub validation: ValidationRules,
  /// Conditional fields are only shown once their step has been verified.
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub conditional: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub format: Option<InputFormat>,
  /// Initial value of the field when a form is created.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub default: Option<String>,
}

impl FieldDescriptor {
  pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
    Self {
      name: name.into(),
      label: label.into(),
      kind,
      placeholder: None,
      validation: ValidationRules::default(),
      conditional: false,
      format: None,
      default: None,
    }
  }

  pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
    self.placeholder = Some(placeholder.into());
    self
  }

  pub fn with_validation(mut self, validation: ValidationRules) -> Self {
    self.validation = validation;
    self
  }

  pub fn with_format(mut self, format: InputFormat) -> Self {
    self.format = Some(format);
    self
  }

  pub fn with_default(mut self, default: impl Into<String>) -> Self {
    self.default = Some(default.into());
    self
  }

  pub fn conditional(mut self) -> Self {
    self.conditional = true;
    self
  }

  pub fn is_checkbox(&self) -> bool {
    matches!(self.kind, FieldKind::Checkbox)
  }

  pub fn is_radio(&self) -> bool {
    matches!(self.kind, FieldKind::Radio { .. })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_deserialize_text_field() {
    let field: FieldDescriptor = serde_json::from_str(
      r#"{
        "name": "aadhaarNumber",
        "label": "Aadhaar Number",
        "type": "text",
        "placeholder": "Your Aadhaar No",
        "validation": { "required": true, "maxlength": 12, "pattern": "^\\d{12}$" }
      }"#,
    )
    .unwrap();

    assert_eq!(field.kind, FieldKind::Text);
    assert_eq!(field.placeholder.as_deref(), Some("Your Aadhaar No"));
    assert!(field.validation.required);
    assert_eq!(field.validation.maxlength, Some(12));
    assert_eq!(field.validation.pattern.as_deref(), Some("^\\d{12}$"));
    assert!(!field.conditional);
  }

  #[test]
  fn test_deserialize_select_with_options() {
    let field: FieldDescriptor = serde_json::from_str(
      r#"{
        "name": "typeOfOrganisation",
        "label": "Type of Organisation",
        "type": "select",
        "placeholder": null,
        "validation": { "required": true },
        "options": [
          { "text": "Proprietary", "value": "1" },
          { "text": "Partnership", "value": "3" }
        ]
      }"#,
    )
    .unwrap();

    assert_eq!(field.kind.options().len(), 2);
    assert_eq!(field.kind.options()[1].value, "3");
    assert_eq!(field.placeholder, None);
  }

  #[test]
  fn test_deserialize_conditional_radio() {
    let field: FieldDescriptor = serde_json::from_str(
      r#"{
        "name": "hasGSTIN",
        "label": "Do you have GSTIN ?",
        "type": "radio",
        "validation": { "required": false },
        "conditional": true,
        "options": [{ "text": "Yes", "value": "1" }]
      }"#,
    )
    .unwrap();

    assert!(field.is_radio());
    assert!(field.conditional);
  }

  #[test]
  fn test_unknown_type_deserializes_to_unknown() {
    let field: FieldDescriptor = serde_json::from_str(
      r#"{ "name": "upload", "label": "Upload", "type": "file", "validation": {} }"#,
    )
    .unwrap();

    assert_eq!(field.kind, FieldKind::Unknown);
    assert!(field.kind.options().is_empty());
  }

  #[test]
  fn test_format_and_default_round_trip() {
    let field = FieldDescriptor::new("dobOrDoi", "DOB", FieldKind::Text)
      .with_format(InputFormat::Date)
      .with_default("");

    let json = serde_json::to_value(&field).unwrap();
    assert_eq!(json["type"], "text");
    assert_eq!(json["format"], "date");

    let back: FieldDescriptor = serde_json::from_value(json).unwrap();
    assert_eq!(back, field);
  }
}
