/// Errors raised when editing a form.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
  /// The step declares no such field.
  #[error("unknown field '{0}'")]
  UnknownField(String),

  /// The edit does not fit the field's kind (e.g. ticking a text field).
  #[error("field '{field}' is not a {expected} field")]
  WrongKind {
    field: String,
    expected: &'static str,
  },

  /// The value is not one of the field's options.
  #[error("'{value}' is not an option of field '{field}'")]
  UnknownOption { field: String, value: String },
}
