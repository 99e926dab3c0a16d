//! Udyam Client
//!
//! The verification service boundary. Four operations, each a single POST
//! with no retry:
//!
//! | operation             | endpoint                         |
//! |-----------------------|----------------------------------|
//! | `request_otp`         | `POST {base}/aadhaar/send-otp`   |
//! | `confirm_otp`         | `POST {base}/aadhaar/verify-otp` |
//! | `verify_document`     | `POST {base}/pan/verify`         |
//! | `submit_registration` | `POST {base}/udyam/{appId}/submit` |
//!
//! [`VerificationService`] is the seam the workflow talks to;
//! [`HttpVerificationClient`] is the HTTP implementation.

mod date;
mod error;
mod http;
mod service;
mod types;

pub use date::to_wire_date;
pub use error::{Operation, ServiceError};
pub use http::HttpVerificationClient;
pub use service::VerificationService;
pub use types::{
  DocumentVerification, OtpConfirmation, OtpRequest, OtpTicket, RegistrationSubmission,
  SubmissionReceipt, Verification,
};
