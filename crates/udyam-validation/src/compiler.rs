//! Schema-to-validator compilation.

use regex::Regex;
use tracing::debug;
use udyam_config::{FieldDescriptor, FieldKind, StepDescriptor};

use crate::error::{FieldErrors, ValidationError};
use crate::value::{FieldValue, FormValues};

/// The executable form of one field's rules.
#[derive(Debug, Clone)]
enum Rule {
  Text {
    required: bool,
    maxlength: Option<usize>,
    pattern: Option<Regex>,
  },
  Select {
    required: bool,
  },
  Checkbox {
    must_be_checked: bool,
  },
  Radio {
    required: bool,
  },
  Passthrough,
}

#[derive(Debug, Clone)]
struct CompiledField {
  name: String,
  label: String,
  rule: Rule,
}

/// Validator for one step, compiled from its field descriptors.
#[derive(Debug, Clone)]
pub struct StepValidator {
  step: u32,
  fields: Vec<CompiledField>,
}

/// Compile a step's declarative rules into a [`StepValidator`].
pub fn compile_step(step: &StepDescriptor) -> Result<StepValidator, ValidationError> {
  let fields = step
    .fields
    .iter()
    .map(compile_field)
    .collect::<Result<Vec<_>, _>>()?;

  debug!(step = step.step, fields = fields.len(), "compiled step validator");

  Ok(StepValidator {
    step: step.step,
    fields,
  })
}

fn compile_field(field: &FieldDescriptor) -> Result<CompiledField, ValidationError> {
  let rules = &field.validation;
  let rule = match &field.kind {
    FieldKind::Text => {
      let pattern = rules
        .pattern
        .as_deref()
        .map(Regex::new)
        .transpose()
        .map_err(|e| ValidationError::InvalidPattern {
          field: field.name.clone(),
          source: e,
        })?;
      Rule::Text {
        required: rules.required,
        maxlength: rules.maxlength,
        pattern,
      }
    }
    FieldKind::Select { .. } => Rule::Select {
      required: rules.required,
    },
    FieldKind::Checkbox => Rule::Checkbox {
      must_be_checked: rules.required && rules.checked,
    },
    FieldKind::Radio { .. } => Rule::Radio {
      required: rules.required,
    },
    FieldKind::Unknown => Rule::Passthrough,
  };

  Ok(CompiledField {
    name: field.name.clone(),
    label: field.label.clone(),
    rule,
  })
}

impl StepValidator {
  /// The step number this validator was compiled from.
  pub fn step(&self) -> u32 {
    self.step
  }

  /// Check every field of the step.
  ///
  /// On success, returns the normalised record: only the step's fields,
  /// with missing or null radio/text/select values as `""` and missing
  /// checkboxes as `false`.
  pub fn validate(&self, values: &FormValues) -> Result<FormValues, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut normalised = FormValues::new();

    for field in &self.fields {
      match field.check(values.get(&field.name)) {
        Ok(Some(value)) => normalised.set(field.name.clone(), value),
        Ok(None) => {}
        Err(message) => errors.insert(field.name.clone(), message),
      }
    }

    if errors.is_empty() {
      Ok(normalised)
    } else {
      debug!(step = self.step, failed = errors.len(), "step validation failed");
      Err(errors)
    }
  }

  /// Check a single field, returning its message if it fails.
  ///
  /// Fields the step does not declare are always valid.
  pub fn validate_field(&self, name: &str, value: Option<&FieldValue>) -> Option<String> {
    self
      .fields
      .iter()
      .find(|f| f.name == name)
      .and_then(|f| f.check(value).err())
  }
}

impl CompiledField {
  fn required_message(&self) -> String {
    format!("{} is required", self.label)
  }

  fn type_message(&self) -> String {
    format!("{} has an invalid value", self.label)
  }

  /// Apply the rule: first failing check wins.
  fn check(&self, value: Option<&FieldValue>) -> Result<Option<FieldValue>, String> {
    match &self.rule {
      Rule::Text {
        required,
        maxlength,
        pattern,
      } => {
        let text = self.text_of(value)?;
        if text.is_empty() {
          if *required {
            return Err(self.required_message());
          }
          return Ok(Some(FieldValue::Text(text)));
        }
        if let Some(max) = maxlength
          && text.chars().count() > *max
        {
          return Err(format!("{} must be at most {} characters", self.label, max));
        }
        if let Some(regex) = pattern
          && !regex.is_match(&text)
        {
          return Err(format!("{} format is invalid", self.label));
        }
        Ok(Some(FieldValue::Text(text)))
      }

      Rule::Select { required } => {
        let text = self.text_of(value)?;
        if *required && (text.is_empty() || text == "0") {
          return Err(self.required_message());
        }
        Ok(Some(FieldValue::Text(text)))
      }

      Rule::Checkbox { must_be_checked } => {
        let checked = match value {
          None | Some(FieldValue::Null) => false,
          Some(FieldValue::Bool(b)) => *b,
          Some(FieldValue::Text(_)) => return Err(self.type_message()),
        };
        if *must_be_checked && !checked {
          return Err(self.required_message());
        }
        Ok(Some(FieldValue::Bool(checked)))
      }

      Rule::Radio { required } => {
        let text = self.text_of(value)?;
        if *required && text.is_empty() {
          return Err(self.required_message());
        }
        Ok(Some(FieldValue::Text(text)))
      }

      Rule::Passthrough => Ok(value.cloned()),
    }
  }

  /// Text content of a value; missing and null read as empty.
  fn text_of(&self, value: Option<&FieldValue>) -> Result<String, String> {
    match value {
      None | Some(FieldValue::Null) => Ok(String::new()),
      Some(FieldValue::Text(s)) => Ok(s.clone()),
      Some(FieldValue::Bool(_)) => Err(self.type_message()),
    }
  }
}
