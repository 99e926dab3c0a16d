//! The registration session: state machine over the identity, OTP and
//! document forms.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};
use udyam_client::{
  DocumentVerification, OtpConfirmation, OtpRequest, RegistrationSubmission, ServiceError,
  VerificationService,
};
use udyam_config::{FieldDescriptor, FieldKind, FormSchema, StepDescriptor, names};
use udyam_field::{FormState, InputFormatter, error_text};
use udyam_validation::FieldErrors;
use uuid::Uuid;

use crate::error::{Section, Transition, WorkflowError};
use crate::events::{NoopNotifier, WorkflowEvent, WorkflowNotifier};
use crate::progress::ProgressView;
use crate::state::{Step, WorkflowState, mask_identity_number};
use crate::view::{Completion, DocumentSection, IdentitySection, OtpPanel, SessionView};

const IDENTITY_STEP: usize = 0;
const DOCUMENT_STEP: usize = 1;
const OTP_FIELD: &str = "otp";
const OTP_LENGTH: usize = 6;

const OTP_REJECTED: &str = "Invalid OTP. Please try again.";
const DOCUMENT_REJECTED: &str = "PAN verification failed.";
const IDENTITY_VERIFIED: &str = "Your Aadhaar has been successfully verified.";
const DOCUMENT_VERIFIED: &str = "Your PAN has been successfully verified.";

/// Result of a transition that was allowed to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
  /// The remote call succeeded and the state moved on.
  Accepted,
  /// Local validation failed; nothing was sent.
  Invalid(FieldErrors),
  /// The service answered `verified: false`.
  Rejected { message: String },
  /// The remote call failed; `message` is what the user is shown.
  Failed { message: String },
}

impl SubmitOutcome {
  pub fn is_accepted(&self) -> bool {
    matches!(self, SubmitOutcome::Accepted)
  }
}

/// One registration session.
///
/// Transitions take `&mut self`, so a session never has two remote calls
/// in flight.
pub struct WorkflowSession<S> {
  session_id: Uuid,
  service: S,
  notifier: Arc<dyn WorkflowNotifier>,
  identity: FormState,
  document: FormState,
  otp: String,
  otp_errors: FieldErrors,
  state: WorkflowState,
}

fn schema_step(schema: &FormSchema, index: usize) -> Result<StepDescriptor, WorkflowError> {
  schema
    .step_at(index)
    .cloned()
    .ok_or(WorkflowError::MissingStep { index })
}

impl<S: VerificationService> WorkflowSession<S> {
  /// Start a session over the first two steps of `schema`.
  pub fn new(schema: &FormSchema, service: S) -> Result<Self, WorkflowError> {
    Self::with_notifier(schema, service, Arc::new(NoopNotifier))
  }

  /// Start a session that reports its events to `notifier`.
  pub fn with_notifier(
    schema: &FormSchema,
    service: S,
    notifier: Arc<dyn WorkflowNotifier>,
  ) -> Result<Self, WorkflowError> {
    let identity = FormState::new(schema_step(schema, IDENTITY_STEP)?)?;
    let document = FormState::new(schema_step(schema, DOCUMENT_STEP)?)?;
    let session_id = Uuid::new_v4();

    info!(session_id = %session_id, "registration session started");
    notifier.notify(WorkflowEvent::SessionStarted { session_id });

    Ok(Self {
      session_id,
      service,
      notifier,
      identity,
      document,
      otp: String::new(),
      otp_errors: FieldErrors::new(),
      state: WorkflowState::default(),
    })
  }

  /// Replace the keystroke formatter of both forms.
  pub fn with_formatter(mut self, formatter: InputFormatter) -> Self {
    self.identity = self.identity.with_formatter(formatter);
    self.document = self.document.with_formatter(formatter);
    self
  }

  pub fn session_id(&self) -> Uuid {
    self.session_id
  }

  pub fn state(&self) -> &WorkflowState {
    &self.state
  }

  pub fn identity_form(&self) -> &FormState {
    &self.identity
  }

  pub fn document_form(&self) -> &FormState {
    &self.document
  }

  pub fn otp(&self) -> &str {
    &self.otp
  }

  pub fn progress(&self) -> ProgressView {
    ProgressView::from_state(&self.state)
  }

  /// Whether the document section is shown.
  pub fn document_visible(&self) -> bool {
    self.state.current_step == Step::Document || self.state.document_verified
  }

  /// Whether a field of `section` is shown and editable right now.
  pub fn is_editable(&self, section: Section, name: &str) -> bool {
    self.check_editable(section, name).is_ok()
  }

  /// Type characters at the end of a text field.
  pub fn type_text(
    &mut self,
    section: Section,
    name: &str,
    typed: &str,
  ) -> Result<String, WorkflowError> {
    Ok(self.editable(section, name)?.type_text(name, typed)?)
  }

  /// Replace a text field's value. Formatting still applies.
  pub fn edit_text(
    &mut self,
    section: Section,
    name: &str,
    raw: &str,
  ) -> Result<String, WorkflowError> {
    Ok(self.editable(section, name)?.edit_text(name, raw)?)
  }

  pub fn set_checked(
    &mut self,
    section: Section,
    name: &str,
    checked: bool,
  ) -> Result<(), WorkflowError> {
    Ok(self.editable(section, name)?.set_checked(name, checked)?)
  }

  /// Choose an option of a select or radio field.
  pub fn choose(&mut self, section: Section, name: &str, value: &str) -> Result<(), WorkflowError> {
    Ok(self.editable(section, name)?.choose(name, value)?)
  }

  /// Set the OTP input. Input beyond six characters is cut off.
  pub fn enter_otp(&mut self, raw: &str) -> Result<&str, WorkflowError> {
    if !self.state.otp_visible {
      return Err(WorkflowError::FieldHidden {
        field: OTP_FIELD.to_string(),
      });
    }
    self.otp = raw.chars().take(OTP_LENGTH).collect();
    if !self.otp.is_empty() {
      self.otp_errors.remove(OTP_FIELD);
    }
    Ok(&self.otp)
  }

  fn check_editable(&self, section: Section, name: &str) -> Result<(), WorkflowError> {
    match section {
      Section::Identity => {
        self.identity.field(name)?;
        if self.state.identity_verified {
          return Err(WorkflowError::FieldLocked {
            field: name.to_string(),
          });
        }
      }
      Section::Document => {
        if !self.document_visible() {
          return Err(WorkflowError::SectionHidden { section });
        }
        let field = self.document.field(name)?;
        if field.conditional && !self.state.document_verified {
          return Err(WorkflowError::FieldHidden {
            field: name.to_string(),
          });
        }
        if self.document_field_locked(field) {
          return Err(WorkflowError::FieldLocked {
            field: name.to_string(),
          });
        }
      }
    }
    Ok(())
  }

  fn editable(&mut self, section: Section, name: &str) -> Result<&mut FormState, WorkflowError> {
    self.check_editable(section, name)?;
    Ok(match section {
      Section::Identity => &mut self.identity,
      Section::Document => &mut self.document,
    })
  }

  /// Once the document is verified its fields are frozen, except the
  /// organisation type and the conditional follow-up questions.
  fn document_field_locked(&self, field: &FieldDescriptor) -> bool {
    if !self.state.document_verified || field.conditional {
      return false;
    }
    match field.kind {
      FieldKind::Checkbox => true,
      _ => field.name != names::TYPE_OF_ORGANISATION,
    }
  }

  fn require(
    &self,
    transition: Transition,
    ok: bool,
    reason: &'static str,
  ) -> Result<(), WorkflowError> {
    if ok {
      return Ok(());
    }
    warn!(session_id = %self.session_id, %transition, reason, "transition not allowed");
    Err(WorkflowError::InvalidTransition {
      transition,
      step: self.state.phase(),
      reason,
    })
  }

  fn begin(&mut self, transition: Transition) {
    self.state.error_message = None;
    self.notifier.notify(WorkflowEvent::TransitionStarted {
      session_id: self.session_id,
      transition,
    });
  }

  fn invalid(&self, transition: Transition, errors: FieldErrors) -> SubmitOutcome {
    info!(session_id = %self.session_id, %transition, errors = %errors, "form has validation errors");
    self.notifier.notify(WorkflowEvent::ValidationFailed {
      session_id: self.session_id,
      transition,
      errors: errors.clone(),
    });
    SubmitOutcome::Invalid(errors)
  }

  fn accepted(&self, transition: Transition) -> SubmitOutcome {
    info!(session_id = %self.session_id, %transition, step = %self.state.phase(), "transition completed");
    self.notifier.notify(WorkflowEvent::TransitionSucceeded {
      session_id: self.session_id,
      transition,
      step: self.state.phase(),
    });
    SubmitOutcome::Accepted
  }

  fn rejected(&mut self, transition: Transition, message: &str) -> SubmitOutcome {
    warn!(session_id = %self.session_id, %transition, reason = message, "verification rejected");
    self.state.error_message = Some(message.to_string());
    self.notifier.notify(WorkflowEvent::VerificationRejected {
      session_id: self.session_id,
      transition,
      message: message.to_string(),
    });
    SubmitOutcome::Rejected {
      message: message.to_string(),
    }
  }

  fn failed(&mut self, transition: Transition, err: ServiceError) -> SubmitOutcome {
    error!(session_id = %self.session_id, %transition, error = %err, "remote call failed");
    let message = err.user_message();
    self.state.error_message = Some(message.clone());
    self.notifier.notify(WorkflowEvent::TransitionFailed {
      session_id: self.session_id,
      transition,
      error: err.to_string(),
    });
    SubmitOutcome::Failed { message }
  }

  /// Validate the identity form and request an OTP.
  #[instrument(name = "submit_identity", skip(self), fields(session_id = %self.session_id))]
  pub async fn submit_identity(&mut self) -> Result<SubmitOutcome, WorkflowError> {
    let transition = Transition::SubmitIdentity;
    self.require(
      transition,
      !self.state.identity_verified && !self.state.otp_visible,
      "an OTP has already been requested",
    )?;

    let values = match self.identity.submit() {
      Ok(values) => values,
      Err(errors) => return Ok(self.invalid(transition, errors)),
    };

    self.begin(transition);
    let request = OtpRequest {
      aadhaar_number: values.text(names::AADHAAR_NUMBER).to_string(),
      entrepreneur_name: values.text(names::ENTREPRENEUR_NAME).to_string(),
      consent: values.checked(names::AADHAAR_CONSENT),
    };

    match self.service.request_otp(&request).await {
      Ok(ticket) => {
        info!(
          session_id = %self.session_id,
          app_id = %ticket.app_id,
          otp_sent_to = ?ticket.otp_sent_to,
          "otp sent"
        );
        self.state.application_id = ticket.app_id;
        self.state.transaction_id = ticket.transaction_id;
        self.state.pending_otp_target = mask_identity_number(&request.aadhaar_number);
        self.state.otp_visible = true;
        self.state.captured_identity = Some(values);
        Ok(self.accepted(transition))
      }
      Err(err) => Ok(self.failed(transition, err)),
    }
  }

  /// Confirm the OTP entered with [`WorkflowSession::enter_otp`].
  #[instrument(name = "submit_otp", skip(self), fields(session_id = %self.session_id))]
  pub async fn submit_otp(&mut self) -> Result<SubmitOutcome, WorkflowError> {
    let transition = Transition::SubmitOtp;
    self.require(
      transition,
      self.state.otp_visible && !self.state.identity_verified,
      "no OTP is pending",
    )?;

    if self.otp.is_empty() {
      self.otp_errors.insert(OTP_FIELD, "OTP is required");
      return Ok(self.invalid(transition, self.otp_errors.clone()));
    }

    self.begin(transition);
    let request = OtpConfirmation {
      app_id: self.state.application_id.clone(),
      transaction_id: self.state.transaction_id.clone(),
      otp: self.otp.clone(),
    };

    match self.service.confirm_otp(&request).await {
      Ok(verification) if verification.verified => {
        self.state.identity_verified = true;
        self.state.otp_visible = false;
        self.state.current_step = Step::Document;
        self.state.success_message = Some(IDENTITY_VERIFIED.to_string());
        Ok(self.accepted(transition))
      }
      Ok(_) => Ok(self.rejected(transition, OTP_REJECTED)),
      Err(err) => Ok(self.failed(transition, err)),
    }
  }

  /// Validate the document form and verify the document.
  #[instrument(name = "submit_document", skip(self), fields(session_id = %self.session_id))]
  pub async fn submit_document(&mut self) -> Result<SubmitOutcome, WorkflowError> {
    let transition = Transition::SubmitDocument;
    self.require(
      transition,
      self.state.identity_verified,
      "identity is not verified",
    )?;
    self.require(
      transition,
      !self.state.document_verified,
      "document is already verified",
    )?;

    let values = match self.document.submit() {
      Ok(values) => values,
      Err(errors) => return Ok(self.invalid(transition, errors)),
    };

    self.begin(transition);
    let request = DocumentVerification {
      app_id: self.state.application_id.clone(),
      pan_number: values.text(names::PAN_NUMBER).to_string(),
      pan_holder_name: values.text(names::PAN_HOLDER_NAME).to_string(),
      dob_or_doi: values.text(names::DOB_OR_DOI).to_string(),
      consent: values.checked(names::PAN_CONSENT),
    };

    match self.service.verify_document(&request).await {
      Ok(verification) if verification.verified => {
        self.state.document_verified = true;
        self.state.success_message = Some(DOCUMENT_VERIFIED.to_string());
        Ok(self.accepted(transition))
      }
      Ok(_) => {
        self.state.document_verified = false;
        Ok(self.rejected(transition, DOCUMENT_REJECTED))
      }
      Err(err) => Ok(self.failed(transition, err)),
    }
  }

  /// Submit the registration with the captured identity name and the
  /// document form's current values.
  #[instrument(name = "continue_registration", skip(self), fields(session_id = %self.session_id))]
  pub async fn continue_registration(&mut self) -> Result<SubmitOutcome, WorkflowError> {
    let transition = Transition::Continue;
    self.require(
      transition,
      self.state.document_verified,
      "document is not verified",
    )?;
    self.require(
      transition,
      !self.state.is_complete(),
      "registration is already submitted",
    )?;

    self.begin(transition);
    let entrepreneur_name = self
      .state
      .captured_identity
      .as_ref()
      .map(|identity| identity.text(names::ENTREPRENEUR_NAME).to_string())
      .unwrap_or_default();
    let values = self.document.values();
    let submission = RegistrationSubmission {
      entrepreneur_name,
      type_of_organisation: values.text(names::TYPE_OF_ORGANISATION).to_string(),
      dob_or_doi: values.text(names::DOB_OR_DOI).to_string(),
      previous_year_itr: values.text(names::PREVIOUS_YEAR_ITR).to_string(),
      has_gstin: values.text(names::HAS_GSTIN).to_string(),
    };

    match self
      .service
      .submit_registration(&self.state.application_id, &submission)
      .await
    {
      Ok(receipt) => {
        self.state.current_step = Step::Success;
        self.state.receipt = Some(receipt);
        Ok(self.accepted(transition))
      }
      Err(err) => Ok(self.failed(transition, err)),
    }
  }

  /// Everything a front end shows for the current state.
  pub fn view(&self) -> SessionView {
    let identity_locked = self.state.identity_verified;
    let identity = IdentitySection {
      fields: self
        .identity
        .render_fields(|f| !f.is_checkbox(), |_| identity_locked),
      consents: self
        .identity
        .render_fields(FieldDescriptor::is_checkbox, |_| identity_locked),
      submit_visible: !self.state.identity_verified && !self.state.otp_visible,
    };

    let otp = self.state.otp_visible.then(|| OtpPanel {
      value: self.otp.clone(),
      sent_to: self.state.pending_otp_target.clone(),
      error: self.otp_errors.get(OTP_FIELD).map(error_text),
    });

    let document = self.document_visible().then(|| {
      let verified = self.state.document_verified;
      DocumentSection {
        fields: self.document.render_fields(
          |f| !f.is_checkbox() && !f.is_radio(),
          |f| self.document_field_locked(f),
        ),
        consents: self
          .document
          .render_fields(FieldDescriptor::is_checkbox, |f| self.document_field_locked(f)),
        error_summary: self
          .document
          .errors()
          .iter()
          .map(|e| format!("{}: {}", e.field, e.message))
          .collect(),
        submit_visible: !verified,
        follow_up: if verified {
          self
            .document
            .render_fields(|f| f.is_radio() && f.conditional, |_| false)
        } else {
          Vec::new()
        },
        continue_visible: verified && !self.state.is_complete(),
      }
    });

    SessionView {
      phase: self.state.phase(),
      identity,
      otp,
      document,
      success_banner: self
        .state
        .identity_verified
        .then(|| self.state.success_message.clone())
        .flatten(),
      error_banner: self.state.error_message.clone(),
      completion: self.state.is_complete().then(|| Completion {
        receipt: self.state.receipt.clone().unwrap_or_default(),
      }),
      progress: self.progress(),
    }
  }
}
