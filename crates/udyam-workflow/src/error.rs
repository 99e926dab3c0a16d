use std::fmt;

use serde::{Deserialize, Serialize};
use udyam_field::FormError;
use udyam_validation::ValidationError;

use crate::state::Step;

/// The four workflow transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
  SubmitIdentity,
  SubmitOtp,
  SubmitDocument,
  Continue,
}

impl fmt::Display for Transition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Transition::SubmitIdentity => "submit_identity",
      Transition::SubmitOtp => "submit_otp",
      Transition::SubmitDocument => "submit_document",
      Transition::Continue => "continue",
    };
    f.write_str(name)
  }
}

/// The two editable sections of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
  Identity,
  Document,
}

impl fmt::Display for Section {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Section::Identity => f.write_str("identity"),
      Section::Document => f.write_str("document"),
    }
  }
}

/// Errors raised by a workflow session.
///
/// Remote failures and rejections are not errors: they are reported as a
/// [`SubmitOutcome`](crate::SubmitOutcome) and the session stays usable.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
  #[error("schema has no step at index {index}")]
  MissingStep { index: usize },

  #[error("cannot {transition} at step {step}: {reason}")]
  InvalidTransition {
    transition: Transition,
    step: Step,
    reason: &'static str,
  },

  #[error("field '{field}' is read-only")]
  FieldLocked { field: String },

  #[error("{section} section is not shown yet")]
  SectionHidden { section: Section },

  #[error("field '{field}' is not shown yet")]
  FieldHidden { field: String },

  #[error(transparent)]
  Form(#[from] FormError),

  #[error(transparent)]
  Validation(#[from] ValidationError),
}
