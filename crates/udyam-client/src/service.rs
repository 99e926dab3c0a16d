use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::types::{
  DocumentVerification, OtpConfirmation, OtpRequest, OtpTicket, RegistrationSubmission,
  SubmissionReceipt, Verification,
};

/// The remote verification and submission service.
///
/// A `verified: false` answer is a normal result, not an error. Errors are
/// reserved for transport failures and server error responses.
#[async_trait]
pub trait VerificationService: Send + Sync {
  /// Send an OTP to the channel registered for an Aadhaar number.
  async fn request_otp(&self, request: &OtpRequest) -> Result<OtpTicket, ServiceError>;

  /// Check the OTP the user received.
  async fn confirm_otp(&self, request: &OtpConfirmation) -> Result<Verification, ServiceError>;

  /// Verify a PAN against the holder name and date of birth/incorporation.
  async fn verify_document(
    &self,
    request: &DocumentVerification,
  ) -> Result<Verification, ServiceError>;

  /// Submit the final registration for an application.
  async fn submit_registration(
    &self,
    app_id: &str,
    submission: &RegistrationSubmission,
  ) -> Result<SubmissionReceipt, ServiceError>;
}

#[async_trait]
impl<T: VerificationService + ?Sized> VerificationService for Arc<T> {
  async fn request_otp(&self, request: &OtpRequest) -> Result<OtpTicket, ServiceError> {
    (**self).request_otp(request).await
  }

  async fn confirm_otp(&self, request: &OtpConfirmation) -> Result<Verification, ServiceError> {
    (**self).confirm_otp(request).await
  }

  async fn verify_document(
    &self,
    request: &DocumentVerification,
  ) -> Result<Verification, ServiceError> {
    (**self).verify_document(request).await
  }

  async fn submit_registration(
    &self,
    app_id: &str,
    submission: &RegistrationSubmission,
  ) -> Result<SubmissionReceipt, ServiceError> {
    (**self).submit_registration(app_id, submission).await
  }
}
