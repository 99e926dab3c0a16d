//! Udyam Workflow
//!
//! The registration state machine. A [`WorkflowSession`] owns the identity
//! form, the OTP input and the document form, and moves through
//!
//! ```text
//! identity ──submit_identity──▶ identity + OTP pending
//!                                      │
//!                                 submit_otp
//!                                      ▼
//!                                  document ──submit_document──▶ verified
//!                                                                   │
//!                                                      continue_registration
//!                                                                   ▼
//!                                                                success
//! ```
//!
//! Every step gates on the previous one. A failed or rejected remote call
//! leaves the session where it was with an error banner set; the step can be
//! retried.

mod error;
mod events;
mod progress;
mod session;
mod state;
mod view;

pub use error::{Section, Transition, WorkflowError};
pub use events::{ChannelNotifier, NoopNotifier, WorkflowEvent, WorkflowNotifier};
pub use progress::{ProgressStep, ProgressView, StepStatus};
pub use session::{SubmitOutcome, WorkflowSession};
pub use state::{Step, WorkflowState};
pub use view::{Completion, DocumentSection, IdentitySection, OtpPanel, SessionView};
