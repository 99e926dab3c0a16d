//! Request and response bodies, in the service's field naming.

use serde::{Deserialize, Serialize};

/// Body of `POST /aadhaar/send-otp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequest {
  pub aadhaar_number: String,
  pub entrepreneur_name: String,
  pub consent: bool,
}

/// Answer to an OTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpTicket {
  pub app_id: String,
  pub transaction_id: String,
  /// Where the OTP was sent, when the service says so.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub otp_sent_to: Option<String>,
}

/// Body of `POST /aadhaar/verify-otp`. This endpoint takes snake_case keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpConfirmation {
  pub app_id: String,
  pub transaction_id: String,
  pub otp: String,
}

/// Verdict of an OTP or document check. `verified: false` is a rejection,
/// not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
  pub verified: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub app_id: Option<String>,
}

impl Verification {
  pub fn verified() -> Self {
    Self {
      verified: true,
      app_id: None,
    }
  }

  pub fn rejected() -> Self {
    Self {
      verified: false,
      app_id: None,
    }
  }
}

/// Body of `POST /pan/verify`. `dob_or_doi` is held as entered
/// (`DD/MM/YYYY`) and converted when sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVerification {
  pub app_id: String,
  pub pan_number: String,
  pub pan_holder_name: String,
  pub dob_or_doi: String,
  pub consent: bool,
}

/// Body of `POST /udyam/{appId}/submit`. `dob_or_doi` is converted when
/// sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSubmission {
  pub entrepreneur_name: String,
  pub type_of_organisation: String,
  pub dob_or_doi: String,
  #[serde(rename = "previousYearITR")]
  pub previous_year_itr: String,
  #[serde(rename = "hasGSTIN")]
  pub has_gstin: String,
}

/// Confirmation of a registration submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub registration_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_otp_request_wire_names() {
    let body = serde_json::to_value(OtpRequest {
      aadhaar_number: "123456789012".to_string(),
      entrepreneur_name: "Asha".to_string(),
      consent: true,
    })
    .unwrap();
    assert_eq!(
      body,
      json!({"aadhaarNumber": "123456789012", "entrepreneurName": "Asha", "consent": true})
    );
  }

  #[test]
  fn test_otp_confirmation_uses_snake_case() {
    let body = serde_json::to_value(OtpConfirmation {
      app_id: "app-1".to_string(),
      transaction_id: "tx-1".to_string(),
      otp: "000000".to_string(),
    })
    .unwrap();
    assert_eq!(
      body,
      json!({"app_id": "app-1", "transaction_id": "tx-1", "otp": "000000"})
    );
  }

  #[test]
  fn test_submission_wire_names() {
    let body = serde_json::to_value(RegistrationSubmission {
      entrepreneur_name: "Asha".to_string(),
      type_of_organisation: "1".to_string(),
      dob_or_doi: "1990-08-15".to_string(),
      previous_year_itr: "1".to_string(),
      has_gstin: "2".to_string(),
    })
    .unwrap();
    assert_eq!(
      body,
      json!({
        "entrepreneurName": "Asha",
        "typeOfOrganisation": "1",
        "dobOrDoi": "1990-08-15",
        "previousYearITR": "1",
        "hasGSTIN": "2"
      })
    );
  }

  #[test]
  fn test_responses_tolerate_missing_optionals() {
    let ticket: OtpTicket =
      serde_json::from_value(json!({"appId": "a", "transactionId": "t"})).unwrap();
    assert_eq!(ticket.otp_sent_to, None);

    let verification: Verification = serde_json::from_value(json!({"verified": false})).unwrap();
    assert_eq!(verification, Verification::rejected());

    let receipt: SubmissionReceipt = serde_json::from_value(json!({})).unwrap();
    assert_eq!(receipt, SubmissionReceipt::default());
  }
}
