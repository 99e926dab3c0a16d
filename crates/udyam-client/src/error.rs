use std::fmt;

use serde::{Deserialize, Serialize};

/// The four remote operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
  RequestOtp,
  ConfirmOtp,
  VerifyDocument,
  SubmitRegistration,
}

impl Operation {
  /// Message shown when the service gives no usable message of its own.
  pub fn fallback_message(self) -> &'static str {
    match self {
      Operation::RequestOtp => "Failed to send OTP.",
      Operation::ConfirmOtp => "OTP verification failed.",
      Operation::VerifyDocument => "PAN verification failed.",
      Operation::SubmitRegistration => "Submission failed.",
    }
  }
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Operation::RequestOtp => "request_otp",
      Operation::ConfirmOtp => "confirm_otp",
      Operation::VerifyDocument => "verify_document",
      Operation::SubmitRegistration => "submit_registration",
    };
    f.write_str(name)
  }
}

/// Errors from the verification service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
  /// The base URL cannot be used to build endpoint URLs.
  #[error("invalid service base url '{url}': {message}")]
  InvalidBaseUrl { url: String, message: String },

  /// The request never produced a response.
  #[error("{operation} request failed: {source}")]
  Transport {
    operation: Operation,
    #[source]
    source: reqwest::Error,
  },

  /// The service answered with an error status.
  #[error("{operation} failed with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
  Server {
    operation: Operation,
    status: u16,
    message: Option<String>,
  },

  /// The service answered successfully but the body could not be read.
  #[error("{operation} returned an invalid response: {message}")]
  InvalidResponse {
    operation: Operation,
    message: String,
  },

  /// Failure raised by a non-HTTP implementation.
  #[error("{operation} failed: {}", .message.as_deref().unwrap_or("no message"))]
  Rejected {
    operation: Operation,
    message: Option<String>,
  },
}

impl ServiceError {
  /// Create a failure carrying an optional service message.
  pub fn rejected(operation: Operation, message: Option<impl Into<String>>) -> Self {
    Self::Rejected {
      operation,
      message: message.map(Into::into),
    }
  }

  /// Create an invalid response error.
  pub fn invalid_response(operation: Operation, message: impl Into<String>) -> Self {
    Self::InvalidResponse {
      operation,
      message: message.into(),
    }
  }

  /// The operation that failed, if the error came from one.
  pub fn operation(&self) -> Option<Operation> {
    match self {
      ServiceError::InvalidBaseUrl { .. } => None,
      ServiceError::Transport { operation, .. }
      | ServiceError::Server { operation, .. }
      | ServiceError::InvalidResponse { operation, .. }
      | ServiceError::Rejected { operation, .. } => Some(*operation),
    }
  }

  /// The message supplied by the service, if any.
  pub fn server_message(&self) -> Option<&str> {
    match self {
      ServiceError::Server { message, .. } | ServiceError::Rejected { message, .. } => {
        message.as_deref()
      }
      _ => None,
    }
  }

  /// Text for the user: the service's own message, or the operation's
  /// fixed fallback.
  pub fn user_message(&self) -> String {
    match (self.server_message(), self.operation()) {
      (Some(message), _) => message.to_string(),
      (None, Some(operation)) => operation.fallback_message().to_string(),
      (None, None) => self.to_string(),
    }
  }
}
