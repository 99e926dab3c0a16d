//! Field rendering.

use std::fmt;

use serde::{Deserialize, Serialize};
use udyam_config::{FieldDescriptor, FieldKind, FieldOption};
use udyam_validation::{FieldErrors, FieldValue};

/// Width of the input for formatted fields (`DD/MM/YYYY`, document numbers).
const FORMATTED_MAX_LENGTH: usize = 10;

/// The input control for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
  TextInput {
    value: String,
    placeholder: String,
    max_length: Option<usize>,
  },
  Select {
    options: Vec<FieldOption>,
    selected: String,
  },
  /// The field label is shown beside the box rather than above it.
  Checkbox { checked: bool },
  RadioGroup {
    options: Vec<FieldOption>,
    selected: String,
  },
  /// Unknown field kinds have no control.
  None,
}

/// View model of one rendered field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedField {
  pub name: String,
  pub label: String,
  pub required: bool,
  pub control: Control,
  pub read_only: bool,
  /// Inline error text, already shortened by [`error_text`].
  pub error: Option<String>,
}

/// Inline text for a validation message: anything saying "is required"
/// collapses to `required!`.
pub fn error_text(message: &str) -> String {
  if message.contains("is required") {
    "required!".to_string()
  } else {
    message.to_string()
  }
}

/// Render one field from its descriptor, its current value and the form's
/// errors. Disabled fields keep their value and error but are read-only.
pub fn render_field(
  field: &FieldDescriptor,
  value: Option<&FieldValue>,
  errors: &FieldErrors,
  disabled: bool,
) -> RenderedField {
  let text = value.and_then(FieldValue::as_text).unwrap_or("").to_string();

  let control = match &field.kind {
    FieldKind::Text => Control::TextInput {
      value: text,
      placeholder: field.placeholder.clone().unwrap_or_default(),
      max_length: field.format.map(|_| FORMATTED_MAX_LENGTH),
    },
    FieldKind::Select { options } => Control::Select {
      options: options.clone(),
      selected: text,
    },
    FieldKind::Checkbox => Control::Checkbox {
      checked: value.and_then(FieldValue::as_bool).unwrap_or(false),
    },
    FieldKind::Radio { options } => Control::RadioGroup {
      options: options.clone(),
      selected: text,
    },
    FieldKind::Unknown => Control::None,
  };

  RenderedField {
    name: field.name.clone(),
    label: field.label.clone(),
    required: field.validation.required,
    control,
    read_only: disabled,
    error: errors.get(&field.name).map(error_text),
  }
}

impl fmt::Display for RenderedField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let lock = if self.read_only { " (read-only)" } else { "" };

    match &self.control {
      Control::Checkbox { checked } => {
        let mark = if *checked { "x" } else { " " };
        writeln!(f, "[{}] {}{}", mark, self.label, lock)?;
      }
      control => {
        let marker = if self.required { "* " } else { "" };
        writeln!(f, "{}{}{}", marker, self.label, lock)?;
        match control {
          Control::TextInput {
            value, placeholder, ..
          } => {
            if value.is_empty() {
              writeln!(f, "  [{}]", placeholder)?;
            } else {
              writeln!(f, "  [{}]", value)?;
            }
          }
          Control::Select { options, selected } | Control::RadioGroup { options, selected } => {
            for option in options {
              let mark = if &option.value == selected { "(*)" } else { "( )" };
              writeln!(f, "  {} {} = {}", mark, option.value, option.text)?;
            }
          }
          Control::Checkbox { .. } | Control::None => {}
        }
      }
    }

    if let Some(error) = &self.error {
      writeln!(f, "  ! {}", error)?;
    }

    Ok(())
  }
}
