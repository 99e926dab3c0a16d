use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, instrument, warn};
use url::Url;

use crate::date::to_wire_date;
use crate::error::{Operation, ServiceError};
use crate::service::VerificationService;
use crate::types::{
  DocumentVerification, OtpConfirmation, OtpRequest, OtpTicket, RegistrationSubmission,
  SubmissionReceipt, Verification,
};

/// [`VerificationService`] over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpVerificationClient {
  client: Client,
  base: Url,
}

impl HttpVerificationClient {
  /// Create a client for the service rooted at `base_url`
  /// (e.g. `http://localhost:8000/api/v1`).
  pub fn new(base_url: &str) -> Result<Self, ServiceError> {
    Self::with_client(Client::new(), base_url)
  }

  /// Create a client reusing an existing `reqwest` client.
  pub fn with_client(client: Client, base_url: &str) -> Result<Self, ServiceError> {
    let base = Url::parse(base_url).map_err(|e| ServiceError::InvalidBaseUrl {
      url: base_url.to_string(),
      message: e.to_string(),
    })?;
    if base.cannot_be_a_base() {
      return Err(ServiceError::InvalidBaseUrl {
        url: base_url.to_string(),
        message: "url cannot have path segments".to_string(),
      });
    }
    Ok(Self { client, base })
  }

  pub fn base_url(&self) -> &Url {
    &self.base
  }

  /// Endpoint URL under the base path. Segments are percent-encoded.
  fn endpoint(&self, segments: &[&str]) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  async fn post<B, R>(&self, operation: Operation, url: Url, body: &B) -> Result<R, ServiceError>
  where
    B: Serialize + Sync,
    R: DeserializeOwned,
  {
    let response = self
      .client
      .post(url)
      .json(body)
      .send()
      .await
      .map_err(|source| ServiceError::Transport { operation, source })?;

    let status = response.status();
    let text = response
      .text()
      .await
      .map_err(|source| ServiceError::Transport { operation, source })?;

    if !status.is_success() {
      let message = server_message(&text);
      warn!(%operation, status = status.as_u16(), server_message = ?message, "service returned an error");
      return Err(ServiceError::Server {
        operation,
        status: status.as_u16(),
        message,
      });
    }

    serde_json::from_str(&text).map_err(|e| ServiceError::invalid_response(operation, e.to_string()))
  }
}

/// The human-readable message in an error body: `message`, else a string
/// `detail`.
fn server_message(body: &str) -> Option<String> {
  let value: serde_json::Value = serde_json::from_str(body).ok()?;
  ["message", "detail"].iter().find_map(|key| {
    value
      .get(key)
      .and_then(serde_json::Value::as_str)
      .filter(|s| !s.is_empty())
      .map(str::to_string)
  })
}

#[async_trait]
impl VerificationService for HttpVerificationClient {
  #[instrument(name = "request_otp", skip(self, request))]
  async fn request_otp(&self, request: &OtpRequest) -> Result<OtpTicket, ServiceError> {
    let url = self.endpoint(&["aadhaar", "send-otp"]);
    let ticket: OtpTicket = self.post(Operation::RequestOtp, url, request).await?;
    info!(app_id = %ticket.app_id, "otp requested");
    Ok(ticket)
  }

  #[instrument(name = "confirm_otp", skip(self, request), fields(app_id = %request.app_id))]
  async fn confirm_otp(&self, request: &OtpConfirmation) -> Result<Verification, ServiceError> {
    let url = self.endpoint(&["aadhaar", "verify-otp"]);
    let verification: Verification = self.post(Operation::ConfirmOtp, url, request).await?;
    info!(verified = verification.verified, "otp checked");
    Ok(verification)
  }

  #[instrument(name = "verify_document", skip(self, request), fields(app_id = %request.app_id))]
  async fn verify_document(
    &self,
    request: &DocumentVerification,
  ) -> Result<Verification, ServiceError> {
    let url = self.endpoint(&["pan", "verify"]);
    let body = DocumentVerification {
      dob_or_doi: to_wire_date(&request.dob_or_doi),
      ..request.clone()
    };
    let verification: Verification = self.post(Operation::VerifyDocument, url, &body).await?;
    info!(verified = verification.verified, "document checked");
    Ok(verification)
  }

  #[instrument(name = "submit_registration", skip(self, submission))]
  async fn submit_registration(
    &self,
    app_id: &str,
    submission: &RegistrationSubmission,
  ) -> Result<SubmissionReceipt, ServiceError> {
    let url = self.endpoint(&["udyam", app_id, "submit"]);
    let body = RegistrationSubmission {
      dob_or_doi: to_wire_date(&submission.dob_or_doi),
      ..submission.clone()
    };
    let receipt: SubmissionReceipt = self
      .post(Operation::SubmitRegistration, url, &body)
      .await?;
    info!(registration_id = ?receipt.registration_id, "registration submitted");
    Ok(receipt)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_endpoint_joins_under_base_path() {
    let client = HttpVerificationClient::new("http://localhost:8000/api/v1").unwrap();
    assert_eq!(
      client.endpoint(&["aadhaar", "send-otp"]).as_str(),
      "http://localhost:8000/api/v1/aadhaar/send-otp"
    );

    let client = HttpVerificationClient::new("http://localhost:8000/api/v1/").unwrap();
    assert_eq!(
      client.endpoint(&["pan", "verify"]).as_str(),
      "http://localhost:8000/api/v1/pan/verify"
    );

    let client = HttpVerificationClient::new("http://localhost:8000").unwrap();
    assert_eq!(
      client.endpoint(&["udyam", "a b", "submit"]).as_str(),
      "http://localhost:8000/udyam/a%20b/submit"
    );
  }

  #[test]
  fn test_invalid_base_url_rejected() {
    assert!(matches!(
      HttpVerificationClient::new("not a url"),
      Err(ServiceError::InvalidBaseUrl { .. })
    ));
    assert!(matches!(
      HttpVerificationClient::new("mailto:someone@example.com"),
      Err(ServiceError::InvalidBaseUrl { .. })
    ));
  }

  #[test]
  fn test_server_message_extraction() {
    assert_eq!(
      server_message(r#"{"message": "Invalid OTP"}"#).as_deref(),
      Some("Invalid OTP")
    );
    assert_eq!(
      server_message(r#"{"detail": "Application not found"}"#).as_deref(),
      Some("Application not found")
    );
    assert_eq!(server_message(r#"{"detail": [{"loc": ["body"]}]}"#), None);
    assert_eq!(server_message(r#"{"message": ""}"#), None);
    assert_eq!(server_message("<html>502</html>"), None);
  }
}
