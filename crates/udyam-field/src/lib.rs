//! Udyam Field
//!
//! Renders one [`FieldDescriptor`] at a time into a [`RenderedField`] view
//! model and keeps a step's values bound in a [`FormState`].
//!
//! Two kinds of text field are normalised on every edit:
//! - document numbers are uppercased, stripped to alphanumerics and cut at
//!   10 characters
//! - dates are segmented into `DD/MM/YYYY` as digits arrive, and an edit
//!   that makes the day, month or year impossible is dropped
//!
//! [`FieldDescriptor`]: udyam_config::FieldDescriptor

mod error;
mod form;
mod format;
mod render;

pub use error::FormError;
pub use form::FormState;
pub use format::{InputFormatter, format_date, format_document_number};
pub use render::{Control, RenderedField, error_text, render_field};
