use std::fmt;

use serde::{Deserialize, Serialize};
use udyam_client::SubmissionReceipt;
use udyam_validation::FormValues;

/// Workflow steps, in the only order they can be reached.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Step {
  #[default]
  Identity,
  Otp,
  Document,
  Success,
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Step::Identity => "identity",
      Step::Otp => "otp",
      Step::Document => "document",
      Step::Success => "success",
    };
    f.write_str(name)
  }
}

/// State of one registration session.
///
/// While the OTP is pending `current_step` stays at [`Step::Identity`] with
/// `otp_visible` set: the identity form and the OTP input are shown
/// together. [`WorkflowState::phase`] folds the two into [`Step::Otp`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
  pub current_step: Step,
  pub identity_verified: bool,
  pub document_verified: bool,
  /// Masked identity number the OTP was sent for.
  pub pending_otp_target: String,
  pub otp_visible: bool,
  pub error_message: Option<String>,
  pub success_message: Option<String>,
  pub application_id: String,
  pub transaction_id: String,
  /// Identity form values as sent with the OTP request.
  pub captured_identity: Option<FormValues>,
  pub receipt: Option<SubmissionReceipt>,
}

impl WorkflowState {
  /// The step the user is working on.
  pub fn phase(&self) -> Step {
    if self.current_step == Step::Identity && self.otp_visible {
      Step::Otp
    } else {
      self.current_step
    }
  }

  pub fn is_complete(&self) -> bool {
    self.current_step == Step::Success
  }
}

/// `******` followed by the last four characters of the identity number.
pub(crate) fn mask_identity_number(number: &str) -> String {
  let chars: Vec<char> = number.chars().collect();
  let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
  format!("******{}", tail)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_new_state_is_blank() {
    let state = WorkflowState::default();
    assert_eq!(state.current_step, Step::Identity);
    assert!(!state.identity_verified);
    assert!(!state.document_verified);
    assert!(!state.otp_visible);
    assert_eq!(state.application_id, "");
    assert_eq!(state.error_message, None);
  }

  #[test]
  fn test_phase_reports_pending_otp() {
    let mut state = WorkflowState::default();
    assert_eq!(state.phase(), Step::Identity);

    state.otp_visible = true;
    assert_eq!(state.phase(), Step::Otp);

    state.otp_visible = false;
    state.current_step = Step::Document;
    assert_eq!(state.phase(), Step::Document);
  }

  #[test]
  fn test_steps_are_ordered() {
    assert!(Step::Identity < Step::Otp);
    assert!(Step::Otp < Step::Document);
    assert!(Step::Document < Step::Success);
  }

  #[test]
  fn test_mask_identity_number() {
    assert_eq!(mask_identity_number("123456789012"), "******9012");
    assert_eq!(mask_identity_number("12"), "******12");
  }
}
