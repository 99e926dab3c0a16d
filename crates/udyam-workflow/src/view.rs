//! View model of a session, and its plain-text rendering.

use std::fmt;

use serde::{Deserialize, Serialize};
use udyam_client::SubmissionReceipt;
use udyam_field::RenderedField;

use crate::progress::ProgressView;
use crate::state::Step;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySection {
  pub fields: Vec<RenderedField>,
  pub consents: Vec<RenderedField>,
  /// "Validate & Generate OTP" is offered until an OTP is requested.
  pub submit_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpPanel {
  pub value: String,
  /// Masked identity number.
  pub sent_to: String,
  pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSection {
  pub fields: Vec<RenderedField>,
  pub consents: Vec<RenderedField>,
  /// `field: message` for every failing field.
  pub error_summary: Vec<String>,
  pub submit_visible: bool,
  /// Conditional questions, shown once the document is verified.
  pub follow_up: Vec<RenderedField>,
  pub continue_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
  pub receipt: SubmissionReceipt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
  pub phase: Step,
  pub identity: IdentitySection,
  pub otp: Option<OtpPanel>,
  pub document: Option<DocumentSection>,
  pub success_banner: Option<String>,
  pub error_banner: Option<String>,
  pub completion: Option<Completion>,
  pub progress: ProgressView,
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[RenderedField]) -> fmt::Result {
  fields.iter().try_for_each(|field| write!(f, "{}", field))
}

impl fmt::Display for SessionView {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "== Aadhaar Verification With OTP ==")?;
    write_fields(f, &self.identity.fields)?;
    write_fields(f, &self.identity.consents)?;
    if self.identity.submit_visible {
      writeln!(f, "[Validate & Generate OTP]")?;
    }

    if let Some(otp) = &self.otp {
      writeln!(f, "* Enter One Time Password(OTP) Code")?;
      if otp.value.is_empty() {
        writeln!(f, "  [OTP code]")?;
      } else {
        writeln!(f, "  [{}]", otp.value)?;
      }
      writeln!(f, "  OTP has been sent to {}", otp.sent_to)?;
      if let Some(error) = &otp.error {
        writeln!(f, "  ! {}", error)?;
      }
      writeln!(f, "[Validate]")?;
    }

    if let Some(document) = &self.document {
      writeln!(f, "== PAN Verification ==")?;
      if !document.error_summary.is_empty() {
        writeln!(f, "Form Validation Errors:")?;
        for line in &document.error_summary {
          writeln!(f, "  - {}", line)?;
        }
      }
      write_fields(f, &document.fields)?;
      write_fields(f, &document.consents)?;
      if document.submit_visible {
        writeln!(f, "[PAN Validate]")?;
      }
      write_fields(f, &document.follow_up)?;
      if document.continue_visible {
        writeln!(f, "[Continue]")?;
      }
    }

    if let Some(message) = &self.success_banner {
      writeln!(f, "OK: {}", message)?;
    }
    if let Some(message) = &self.error_banner {
      writeln!(f, "ERROR: {}", message)?;
    }

    if let Some(completion) = &self.completion {
      writeln!(f, "== Registration Successful! ==")?;
      writeln!(
        f,
        "Your Udyam Registration form has been submitted successfully."
      )?;
      if let Some(id) = &completion.receipt.registration_id {
        writeln!(f, "Registration ID: {}", id)?;
      }
      if let Some(status) = &completion.receipt.status {
        writeln!(f, "Status: {}", status)?;
      }
    }

    write!(f, "{}", self.progress)
  }
}
