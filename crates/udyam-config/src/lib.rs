//! Udyam Config
//!
//! This crate contains the serializable configuration types for the Udyam
//! registration workflow:
//! - the declarative form schema (steps, fields, validation rules, options)
//! - the client settings (API base URL, schema override)
//!
//! These types are pure data. The validator compiler, the field renderer and
//! the workflow controller read them but never mutate them.
//!
//! A schema can be loaded from:
//! - the built-in Udyam schema ([`FormSchema::udyam`])
//! - a JSON file (via CLI with `--schema=schema.json`)

mod builtin;
mod error;
mod field;
mod schema;
mod settings;

pub use builtin::names;
pub use error::ConfigError;
pub use field::{FieldDescriptor, FieldKind, FieldOption, InputFormat, ValidationRules};
pub use schema::{FormSchema, StepDescriptor};
pub use settings::Settings;
