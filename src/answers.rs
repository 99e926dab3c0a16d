//! Where the CLI gets field values from: an answers file or the terminal.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use udyam_config::{FieldDescriptor, FieldKind};
use udyam_field::RenderedField;
use udyam_validation::{FieldValue, FormValues};
use udyam_workflow::Section;

/// Supplies values for the fields of a session.
pub trait AnswerSource {
  /// Value for one field. `None` keeps the current value.
  fn value(
    &mut self,
    section: Section,
    field: &FieldDescriptor,
    current: &RenderedField,
  ) -> Result<Option<FieldValue>>;

  /// The OTP received for the masked identity number `sent_to`.
  fn otp(&mut self, sent_to: &str) -> Result<String>;

  /// Whether a failed step may be attempted again with new answers.
  fn can_retry(&self) -> bool;
}

/// Answers read from a JSON file.
///
/// ```json
/// {
///   "identity": { "aadhaarNumber": "123456789012", "entrepreneurName": "Asha", "consent": true },
///   "otp": "000000",
///   "document": { "panNumber": "ABCDE1234F", "dobOrDoi": "15/08/1990", "hasGSTIN": "2" }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileAnswers {
  #[serde(default)]
  identity: FormValues,
  #[serde(default)]
  otp: String,
  #[serde(default)]
  document: FormValues,
}

impl FileAnswers {
  pub fn load(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    serde_json::from_str(&content)
      .with_context(|| format!("failed to parse answers file: {}", path.display()))
  }
}

impl AnswerSource for FileAnswers {
  fn value(
    &mut self,
    section: Section,
    field: &FieldDescriptor,
    _current: &RenderedField,
  ) -> Result<Option<FieldValue>> {
    let values = match section {
      Section::Identity => &self.identity,
      Section::Document => &self.document,
    };
    Ok(values.get(&field.name).cloned())
  }

  fn otp(&mut self, _sent_to: &str) -> Result<String> {
    if self.otp.is_empty() {
      bail!("answers file has no otp");
    }
    Ok(self.otp.clone())
  }

  fn can_retry(&self) -> bool {
    false
  }
}

/// Line-per-field prompts on stderr, answers on stdin.
pub struct PromptAnswers<R> {
  input: R,
}

impl PromptAnswers<io::StdinLock<'static>> {
  pub fn stdin() -> Self {
    Self {
      input: io::stdin().lock(),
    }
  }
}

impl<R: BufRead> PromptAnswers<R> {
  pub fn new(input: R) -> Self {
    Self { input }
  }

  fn read_line(&mut self, prompt: &str) -> Result<String> {
    eprint!("{}", prompt);
    io::stderr().flush().context("failed to write prompt")?;

    let mut line = String::new();
    let read = self
      .input
      .read_line(&mut line)
      .context("failed to read answer from stdin")?;
    if read == 0 {
      bail!("stdin closed before the registration finished");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
  }
}

fn parse_bool(answer: &str) -> Option<bool> {
  match answer.trim().to_ascii_lowercase().as_str() {
    "y" | "yes" | "true" | "1" | "x" => Some(true),
    "n" | "no" | "false" | "0" => Some(false),
    _ => None,
  }
}

impl<R: BufRead> AnswerSource for PromptAnswers<R> {
  fn value(
    &mut self,
    _section: Section,
    field: &FieldDescriptor,
    current: &RenderedField,
  ) -> Result<Option<FieldValue>> {
    if field.kind == FieldKind::Unknown {
      return Ok(None);
    }

    eprint!("\n{}", current);
    let prompt = match field.kind {
      FieldKind::Checkbox => "> agree? [y/n, enter keeps] ",
      FieldKind::Select { .. } | FieldKind::Radio { .. } => "> option value [enter keeps] ",
      _ => "> ",
    };

    loop {
      let answer = self.read_line(prompt)?;
      if answer.trim().is_empty() {
        return Ok(None);
      }
      if field.kind != FieldKind::Checkbox {
        return Ok(Some(FieldValue::Text(answer)));
      }
      match parse_bool(&answer) {
        Some(checked) => return Ok(Some(FieldValue::Bool(checked))),
        None => eprintln!("please answer y or n"),
      }
    }
  }

  fn otp(&mut self, sent_to: &str) -> Result<String> {
    eprintln!("\nOTP has been sent to {}", sent_to);
    self.read_line("> Enter One Time Password(OTP) Code: ")
  }

  fn can_retry(&self) -> bool {
    true
  }
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;

  use udyam_config::{FormSchema, names};
  use udyam_field::render_field;
  use udyam_validation::FieldErrors;

  use super::*;

  fn field(step: usize, name: &str) -> FieldDescriptor {
    FormSchema::udyam()
      .step_at(step)
      .unwrap()
      .field(name)
      .unwrap()
      .clone()
  }

  fn ask(source: &mut impl AnswerSource, section: Section, field: &FieldDescriptor) -> Option<FieldValue> {
    let current = render_field(field, None, &FieldErrors::new(), false);
    source.value(section, field, &current).unwrap()
  }

  #[test]
  fn test_file_answers_by_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("answers.json");
    std::fs::write(
      &path,
      r#"{
        "identity": {"aadhaarNumber": "123456789012", "consent": true},
        "otp": "000000",
        "document": {"hasGSTIN": "2"}
      }"#,
    )
    .unwrap();

    let mut answers = FileAnswers::load(&path).unwrap();

    assert_eq!(
      ask(&mut answers, Section::Identity, &field(0, names::AADHAAR_NUMBER)),
      Some(FieldValue::from("123456789012"))
    );
    assert_eq!(
      ask(&mut answers, Section::Identity, &field(0, names::AADHAAR_CONSENT)),
      Some(FieldValue::Bool(true))
    );
    assert_eq!(
      ask(&mut answers, Section::Identity, &field(0, names::ENTREPRENEUR_NAME)),
      None
    );
    assert_eq!(
      ask(&mut answers, Section::Document, &field(1, names::HAS_GSTIN)),
      Some(FieldValue::from("2"))
    );
    assert_eq!(answers.otp("******9012").unwrap(), "000000");
    assert!(!answers.can_retry());
  }

  #[test]
  fn test_file_answers_without_otp() {
    let mut answers = FileAnswers::default();
    assert!(answers.otp("******9012").is_err());
  }

  #[test]
  fn test_prompt_answers() {
    let input = Cursor::new("Asha Verma\n\nmaybe\nyes\n123456\n");
    let mut prompt = PromptAnswers::new(input);

    assert_eq!(
      ask(&mut prompt, Section::Identity, &field(0, names::ENTREPRENEUR_NAME)),
      Some(FieldValue::from("Asha Verma"))
    );
    assert_eq!(
      ask(&mut prompt, Section::Document, &field(1, names::TYPE_OF_ORGANISATION)),
      None
    );
    assert_eq!(
      ask(&mut prompt, Section::Identity, &field(0, names::AADHAAR_CONSENT)),
      Some(FieldValue::Bool(true))
    );
    assert_eq!(prompt.otp("******9012").unwrap(), "123456");
    assert!(prompt.otp("******9012").is_err());
  }
}
