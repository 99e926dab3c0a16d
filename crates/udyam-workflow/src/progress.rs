//! Registration progress, derived from the workflow state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::{Step, WorkflowState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
  Completed,
  InProgress,
  Pending,
}

impl StepStatus {
  fn from_flags(completed: bool, active: bool) -> Self {
    if completed {
      StepStatus::Completed
    } else if active {
      StepStatus::InProgress
    } else {
      StepStatus::Pending
    }
  }
}

impl fmt::Display for StepStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      StepStatus::Completed => "Completed",
      StepStatus::InProgress => "In Progress",
      StepStatus::Pending => "Pending",
    };
    f.write_str(label)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStep {
  pub title: String,
  pub subtitle: String,
  pub status: StepStatus,
}

/// The two tracked steps and the overall percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressView {
  pub steps: Vec<ProgressStep>,
  pub percent: u8,
}

impl ProgressView {
  pub fn from_state(state: &WorkflowState) -> Self {
    let at = |steps: &[Step]| steps.contains(&state.current_step);

    let steps = vec![
      ProgressStep {
        title: "Step 1".to_string(),
        subtitle: "Aadhaar Verification".to_string(),
        status: StepStatus::from_flags(state.identity_verified, at(&[Step::Identity, Step::Otp])),
      },
      ProgressStep {
        title: "Step 2".to_string(),
        subtitle: "PAN Verification".to_string(),
        status: StepStatus::from_flags(
          state.document_verified,
          at(&[Step::Document, Step::Success]),
        ),
      },
    ];

    let percent = match (state.identity_verified, state.document_verified) {
      (true, true) => 100,
      (true, false) => 50,
      _ => 0,
    };

    Self { steps, percent }
  }
}

impl fmt::Display for ProgressView {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Registration Progress")?;
    for step in &self.steps {
      writeln!(f, "  {} {}: {}", step.title, step.subtitle, step.status)?;
    }
    writeln!(f, "  Overall Progress {}%", self.percent)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn statuses(view: &ProgressView) -> Vec<StepStatus> {
    view.steps.iter().map(|s| s.status).collect()
  }

  #[test]
  fn test_initial_progress() {
    let view = ProgressView::from_state(&WorkflowState::default());
    assert_eq!(statuses(&view), vec![StepStatus::InProgress, StepStatus::Pending]);
    assert_eq!(view.percent, 0);
  }

  #[test]
  fn test_identity_verified_progress() {
    let state = WorkflowState {
      current_step: Step::Document,
      identity_verified: true,
      ..Default::default()
    };
    let view = ProgressView::from_state(&state);
    assert_eq!(statuses(&view), vec![StepStatus::Completed, StepStatus::InProgress]);
    assert_eq!(view.percent, 50);
  }

  #[test]
  fn test_complete_progress() {
    let state = WorkflowState {
      current_step: Step::Success,
      identity_verified: true,
      document_verified: true,
      ..Default::default()
    };
    let view = ProgressView::from_state(&state);
    assert_eq!(statuses(&view), vec![StepStatus::Completed, StepStatus::Completed]);
    assert_eq!(view.percent, 100);
  }

  #[test]
  fn test_display() {
    let view = ProgressView::from_state(&WorkflowState::default());
    assert_eq!(
      view.to_string(),
      "Registration Progress\n  Step 1 Aadhaar Verification: In Progress\n  Step 2 PAN Verification: Pending\n  Overall Progress 0%\n"
    );
  }
}
