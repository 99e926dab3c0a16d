//! Session events for observers.
//!
//! Every transition emits events to the session's [`WorkflowNotifier`], so
//! front ends and audit sinks can follow a session without polling it.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use udyam_validation::FieldErrors;
use uuid::Uuid;

use crate::error::Transition;
use crate::state::Step;

/// Events emitted by a workflow session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkflowEvent {
  /// A session was created.
  SessionStarted { session_id: Uuid },

  /// Local validation passed and the remote call is about to be made.
  TransitionStarted {
    session_id: Uuid,
    transition: Transition,
  },

  /// Local validation failed; no remote call was made.
  ValidationFailed {
    session_id: Uuid,
    transition: Transition,
    errors: FieldErrors,
  },

  /// The remote call succeeded. `step` is the step the session is now at.
  TransitionSucceeded {
    session_id: Uuid,
    transition: Transition,
    step: Step,
  },

  /// The service answered `verified: false`.
  VerificationRejected {
    session_id: Uuid,
    transition: Transition,
    message: String,
  },

  /// The remote call failed.
  TransitionFailed {
    session_id: Uuid,
    transition: Transition,
    error: String,
  },
}

/// Receives session events.
pub trait WorkflowNotifier: Send + Sync {
  fn notify(&self, event: WorkflowEvent);
}

/// Discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl WorkflowNotifier for NoopNotifier {
  fn notify(&self, _event: WorkflowEvent) {}
}

/// Sends events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<WorkflowEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<WorkflowEvent>) -> Self {
    Self { sender }
  }
}

impl WorkflowNotifier for ChannelNotifier {
  fn notify(&self, event: WorkflowEvent) {
    // The receiver may have been dropped.
    let _ = self.sender.send(event);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_channel_notifier_forwards_events() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let notifier = ChannelNotifier::new(tx);
    let session_id = Uuid::new_v4();

    notifier.notify(WorkflowEvent::SessionStarted { session_id });

    assert_eq!(rx.try_recv().unwrap(), WorkflowEvent::SessionStarted { session_id });
  }

  #[test]
  fn test_channel_notifier_ignores_closed_receiver() {
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    ChannelNotifier::new(tx).notify(WorkflowEvent::SessionStarted {
      session_id: Uuid::new_v4(),
    });
  }

  #[test]
  fn test_event_serializes() {
    let event = WorkflowEvent::TransitionSucceeded {
      session_id: Uuid::nil(),
      transition: Transition::SubmitOtp,
      step: Step::Document,
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["TransitionSucceeded"]["transition"], "submit_otp");
    assert_eq!(value["TransitionSucceeded"]["step"], "document");
  }
}
