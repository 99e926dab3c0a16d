//! Form state bound to one step of the schema.

use tracing::debug;
use udyam_config::{FieldDescriptor, FieldKind, StepDescriptor};
use udyam_validation::{
  FieldErrors, FieldValue, FormValues, StepValidator, ValidationError, compile_step,
};

use crate::error::FormError;
use crate::format::InputFormatter;
use crate::render::{RenderedField, render_field};

/// Values and errors of one step's form.
///
/// Like a browser form, errors are first computed on submit; after a
/// submit attempt every edit re-checks the edited field.
#[derive(Debug, Clone)]
pub struct FormState {
  step: StepDescriptor,
  validator: StepValidator,
  formatter: InputFormatter,
  values: FormValues,
  errors: FieldErrors,
  submitted: bool,
}

impl FormState {
  /// Create a form for a step, with each field at its default value.
  pub fn new(step: StepDescriptor) -> Result<Self, ValidationError> {
    let validator = compile_step(&step)?;
    let values = FormValues::defaults_for(&step);
    Ok(Self {
      step,
      validator,
      formatter: InputFormatter::new(),
      values,
      errors: FieldErrors::new(),
      submitted: false,
    })
  }

  /// Replace the formatter (e.g. to pin the current year in tests).
  pub fn with_formatter(mut self, formatter: InputFormatter) -> Self {
    self.formatter = formatter;
    self
  }

  pub fn step(&self) -> &StepDescriptor {
    &self.step
  }

  pub fn values(&self) -> &FormValues {
    &self.values
  }

  pub fn errors(&self) -> &FieldErrors {
    &self.errors
  }

  pub fn field(&self, name: &str) -> Result<&FieldDescriptor, FormError> {
    self
      .step
      .field(name)
      .ok_or_else(|| FormError::UnknownField(name.to_string()))
  }

  /// Replace a text field's raw value, normalised by its input format.
  /// Returns the stored value.
  pub fn edit_text(&mut self, name: &str, raw: &str) -> Result<String, FormError> {
    let field = self.text_field(name)?;
    let value = self.formatter.apply(field.format, raw);
    self.store(name, FieldValue::Text(value.clone()));
    Ok(value)
  }

  /// Type characters at the end of a text field, one keystroke at a time.
  /// Returns the stored value.
  pub fn type_text(&mut self, name: &str, typed: &str) -> Result<String, FormError> {
    let field = self.text_field(name)?;
    let current = self.values.text(name);
    let value = self.formatter.type_str(field.format, current, typed);
    self.store(name, FieldValue::Text(value.clone()));
    Ok(value)
  }

  /// Tick or clear a checkbox.
  pub fn set_checked(&mut self, name: &str, checked: bool) -> Result<(), FormError> {
    let field = self.field(name)?;
    if !field.is_checkbox() {
      return Err(FormError::WrongKind {
        field: name.to_string(),
        expected: "checkbox",
      });
    }
    self.store(name, FieldValue::Bool(checked));
    Ok(())
  }

  /// Choose an option of a select or radio field.
  pub fn choose(&mut self, name: &str, value: &str) -> Result<(), FormError> {
    let field = self.field(name)?;
    match &field.kind {
      FieldKind::Select { options } | FieldKind::Radio { options } => {
        if !options.iter().any(|o| o.value == value) {
          return Err(FormError::UnknownOption {
            field: name.to_string(),
            value: value.to_string(),
          });
        }
      }
      _ => {
        return Err(FormError::WrongKind {
          field: name.to_string(),
          expected: "select or radio",
        });
      }
    }
    self.store(name, FieldValue::Text(value.to_string()));
    Ok(())
  }

  /// Validate the whole form as a submit attempt.
  ///
  /// Errors are replaced by the outcome: cleared on success, set per
  /// failing field otherwise.
  pub fn submit(&mut self) -> Result<FormValues, FieldErrors> {
    self.submitted = true;
    match self.validator.validate(&self.values) {
      Ok(normalised) => {
        self.errors.clear();
        Ok(normalised)
      }
      Err(errors) => {
        debug!(step = self.step.step, errors = %errors, "form submit rejected");
        self.errors = errors.clone();
        Err(errors)
      }
    }
  }

  /// Render one field.
  pub fn render(&self, name: &str, disabled: bool) -> Result<RenderedField, FormError> {
    let field = self.field(name)?;
    Ok(render_field(field, self.values.get(name), &self.errors, disabled))
  }

  /// Render every field matching `include`, in schema order, with
  /// `disabled` deciding which are read-only.
  pub fn render_fields(
    &self,
    include: impl Fn(&FieldDescriptor) -> bool,
    disabled: impl Fn(&FieldDescriptor) -> bool,
  ) -> Vec<RenderedField> {
    self
      .step
      .fields
      .iter()
      .filter(|f| include(f))
      .map(|f| render_field(f, self.values.get(&f.name), &self.errors, disabled(f)))
      .collect()
  }

  fn text_field(&self, name: &str) -> Result<&FieldDescriptor, FormError> {
    let field = self.field(name)?;
    if field.kind != FieldKind::Text {
      return Err(FormError::WrongKind {
        field: name.to_string(),
        expected: "text",
      });
    }
    Ok(field)
  }

  fn store(&mut self, name: &str, value: FieldValue) {
    if self.submitted {
      match self.validator.validate_field(name, Some(&value)) {
        Some(message) => self.errors.insert(name, message),
        None => self.errors.remove(name),
      }
    }
    self.values.set(name, value);
  }
}

#[cfg(test)]
mod tests {
  use udyam_config::{FormSchema, names};

  use super::*;

  fn pan_form() -> FormState {
    FormState::new(FormSchema::udyam().step_at(1).unwrap().clone())
      .unwrap()
      .with_formatter(InputFormatter::with_current_year(2025))
  }

  #[test]
  fn test_new_form_has_defaults() {
    let form = pan_form();
    assert_eq!(form.values().text(names::TYPE_OF_ORGANISATION), "1");
    assert!(form.errors().is_empty());
  }

  #[test]
  fn test_typing_applies_field_format() {
    let mut form = pan_form();

    assert_eq!(form.type_text(names::PAN_NUMBER, "abcde1234f").unwrap(), "ABCDE1234F");
    assert_eq!(form.type_text(names::DOB_OR_DOI, "32").unwrap(), "3");
    assert_eq!(form.type_text(names::DOB_OR_DOI, "1").unwrap(), "31/");
    assert_eq!(form.type_text(names::PAN_HOLDER_NAME, "asha").unwrap(), "asha");
  }

  #[test]
  fn test_edit_text_replaces_value() {
    let mut form = pan_form();
    form.type_text(names::PAN_NUMBER, "zzz").unwrap();

    assert_eq!(form.edit_text(names::PAN_NUMBER, "abc-de").unwrap(), "ABCDE");
    assert_eq!(form.values().text(names::PAN_NUMBER), "ABCDE");
  }

  #[test]
  fn test_wrong_kind_edits_rejected() {
    let mut form = pan_form();

    assert!(matches!(
      form.type_text(names::PAN_CONSENT, "x"),
      Err(FormError::WrongKind { .. })
    ));
    assert!(matches!(
      form.set_checked(names::PAN_NUMBER, true),
      Err(FormError::WrongKind { .. })
    ));
    assert!(matches!(
      form.choose(names::PAN_NUMBER, "1"),
      Err(FormError::WrongKind { .. })
    ));
    assert!(matches!(form.type_text("nope", "x"), Err(FormError::UnknownField(_))));
  }

  #[test]
  fn test_choose_checks_options() {
    let mut form = pan_form();

    form.choose(names::HAS_GSTIN, "3").unwrap();
    assert_eq!(form.values().text(names::HAS_GSTIN), "3");
    assert!(matches!(
      form.choose(names::TYPE_OF_ORGANISATION, "12"),
      Err(FormError::UnknownOption { .. })
    ));
  }

  #[test]
  fn test_submit_sets_errors_and_edits_recheck() {
    let mut form = pan_form();

    let errors = form.submit().unwrap_err();
    assert!(errors.get(names::PAN_NUMBER).is_some());
    assert!(errors.get(names::PAN_HOLDER_NAME).is_some());

    form.type_text(names::PAN_NUMBER, "ABCDE1234F").unwrap();
    assert!(form.errors().get(names::PAN_NUMBER).is_none());
    assert!(form.errors().get(names::PAN_HOLDER_NAME).is_some());

    form.type_text(names::PAN_HOLDER_NAME, "Asha").unwrap();
    form.type_text(names::DOB_OR_DOI, "15081990").unwrap();
    let normalised = form.submit().unwrap();
    assert_eq!(normalised.text(names::DOB_OR_DOI), "15/08/1990");
    assert!(form.errors().is_empty());
  }

  #[test]
  fn test_edits_before_submit_do_not_show_errors() {
    let mut form = pan_form();
    form.type_text(names::PAN_NUMBER, "AB").unwrap();
    assert!(form.errors().is_empty());
  }

  #[test]
  fn test_render_fields_filters_and_disables() {
    let mut form = pan_form();
    form.type_text(names::PAN_NUMBER, "ABCDE1234F").unwrap();

    let rendered = form.render_fields(
      |f| !f.is_checkbox() && !f.is_radio(),
      |f| f.name != names::TYPE_OF_ORGANISATION,
    );

    let names_and_locks: Vec<(&str, bool)> = rendered
      .iter()
      .map(|r| (r.name.as_str(), r.read_only))
      .collect();
    assert_eq!(
      names_and_locks,
      vec![
        (names::TYPE_OF_ORGANISATION, false),
        (names::PAN_NUMBER, true),
        (names::PAN_HOLDER_NAME, true),
        (names::DOB_OR_DOI, true),
      ]
    );
  }
}
