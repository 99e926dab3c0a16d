//! Udyam Validation
//!
//! Compiles the declarative validation rules of a [`StepDescriptor`] into a
//! [`StepValidator`] that checks a candidate [`FormValues`] record and
//! reports at most one message per field.
//!
//! # Rules
//!
//! | kind     | rule                                                        |
//! |----------|-------------------------------------------------------------|
//! | text     | required, then maxlength, then pattern (first failure wins) |
//! | select   | required: not empty and not the `"0"` placeholder           |
//! | checkbox | required + checked: must be `true`                          |
//! | radio    | required: non-empty; otherwise null becomes `""`            |
//! | unknown  | optional passthrough                                        |
//!
//! [`StepDescriptor`]: udyam_config::StepDescriptor

mod compiler;
mod error;
mod value;

pub use compiler::{StepValidator, compile_step};
pub use error::{FieldError, FieldErrors, ValidationError};
pub use value::{FieldValue, FormValues};
