use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use udyam_client::{HttpVerificationClient, VerificationService};
use udyam_config::{FieldDescriptor, FieldKind, FormSchema, Settings};
use udyam_validation::FieldValue;
use udyam_workflow::{Section, SubmitOutcome, WorkflowSession};

mod answers;

use answers::{AnswerSource, FileAnswers, PromptAnswers};

/// Udyam - Aadhaar and PAN verification for Udyam registration
#[derive(Parser)]
#[command(name = "udyam")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Base URL of the verification service (e.g. http://localhost:8000/api/v1)
  #[arg(long, global = true, env = "UDYAM_API_BASE")]
  api_base: Option<String>,

  /// Form schema file (default: the built-in Udyam schema)
  #[arg(long, global = true)]
  schema: Option<PathBuf>,

  /// Settings file (default: ~/.udyam/config.json)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the effective form schema as JSON
  Schema,

  /// Run one registration session against the verification service
  Register {
    /// JSON answers file; prompts on the terminal when omitted
    #[arg(long)]
    answers: Option<PathBuf>,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let settings = load_settings(&cli)?;

  match cli.command {
    Some(Commands::Schema) => {
      let schema = load_schema(&settings)?;
      println!("{}", serde_json::to_string_pretty(&schema)?);
    }
    Some(Commands::Register { answers }) => {
      run_register(settings, answers)?;
    }
    None => {
      println!("udyam - use --help to see available commands");
    }
  }

  Ok(())
}

/// Settings file values, overridden by flags and environment.
fn load_settings(cli: &Cli) -> Result<Settings> {
  let path = match &cli.config {
    Some(path) => path.clone(),
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".udyam")
      .join("config.json"),
  };

  let file = Settings::load(&path)
    .with_context(|| format!("failed to load settings: {}", path.display()))?;

  Ok(file.merge(Settings {
    api_base: cli.api_base.clone(),
    schema_path: cli.schema.clone(),
  }))
}

fn load_schema(settings: &Settings) -> Result<FormSchema> {
  match &settings.schema_path {
    Some(path) => FormSchema::from_json_file(path)
      .with_context(|| format!("failed to load schema: {}", path.display())),
    None => Ok(FormSchema::udyam()),
  }
}

fn run_register(settings: Settings, answers: Option<PathBuf>) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_register_async(settings, answers).await })
}

async fn run_register_async(settings: Settings, answers: Option<PathBuf>) -> Result<()> {
  let schema = load_schema(&settings)?;
  let api_base = settings
    .api_base
    .as_deref()
    .context("no API base configured: pass --api-base or set UDYAM_API_BASE")?;
  let client = HttpVerificationClient::new(api_base).context("failed to create service client")?;

  let mut session =
    WorkflowSession::new(&schema, client).context("failed to start registration session")?;
  info!(session_id = %session.session_id(), %api_base, "running registration");

  let mut source: Box<dyn AnswerSource> = match answers {
    Some(path) => Box::new(FileAnswers::load(&path)?),
    None => Box::new(PromptAnswers::stdin()),
  };

  // Aadhaar and OTP request
  loop {
    fill_section(&mut session, source.as_mut(), Section::Identity, |_| true)?;
    let outcome = session.submit_identity().await?;
    if settle(&session, source.as_ref(), "OTP request", outcome)? {
      break;
    }
  }

  // OTP confirmation
  loop {
    let otp = source.otp(&session.state().pending_otp_target)?;
    session.enter_otp(&otp)?;
    let outcome = session.submit_otp().await?;
    if settle(&session, source.as_ref(), "OTP verification", outcome)? {
      break;
    }
  }

  // PAN verification
  loop {
    fill_section(&mut session, source.as_mut(), Section::Document, |f| {
      !f.conditional
    })?;
    let outcome = session.submit_document().await?;
    if settle(&session, source.as_ref(), "PAN verification", outcome)? {
      break;
    }
  }

  // Follow-up questions and final submission
  loop {
    fill_section(&mut session, source.as_mut(), Section::Document, |f| {
      f.conditional
    })?;
    let outcome = session.continue_registration().await?;
    if settle(&session, source.as_ref(), "Submission", outcome)? {
      break;
    }
  }

  eprint!("\n{}", session.view());
  let receipt = session.state().receipt.clone().unwrap_or_default();
  println!("{}", serde_json::to_string_pretty(&receipt)?);

  Ok(())
}

/// Ask `source` for every editable field of `section` matching `include`.
fn fill_section<S: VerificationService>(
  session: &mut WorkflowSession<S>,
  source: &mut dyn AnswerSource,
  section: Section,
  include: impl Fn(&FieldDescriptor) -> bool,
) -> Result<()> {
  let form = match section {
    Section::Identity => session.identity_form(),
    Section::Document => session.document_form(),
  };
  let fields: Vec<FieldDescriptor> = form
    .step()
    .fields
    .iter()
    .filter(|f| include(*f))
    .cloned()
    .collect();

  for field in fields {
    if !session.is_editable(section, &field.name) {
      continue;
    }
    let form = match section {
      Section::Identity => session.identity_form(),
      Section::Document => session.document_form(),
    };
    let current = form.render(&field.name, false)?;
    let Some(value) = source.value(section, &field, &current)? else {
      continue;
    };

    let applied = match (&field.kind, value) {
      (FieldKind::Checkbox, FieldValue::Bool(checked)) => {
        session.set_checked(section, &field.name, checked)
      }
      (FieldKind::Text, FieldValue::Text(text)) => {
        // Typed from scratch so each character passes the field's formatter.
        session
          .edit_text(section, &field.name, "")
          .and_then(|_| session.type_text(section, &field.name, &text))
          .map(|_| ())
      }
      (FieldKind::Select { .. } | FieldKind::Radio { .. }, FieldValue::Text(choice)) => {
        session.choose(section, &field.name, &choice)
      }
      (_, value) => {
        warn!(field = %field.name, ?value, "ignoring answer that does not fit the field");
        Ok(())
      }
    };

    if let Err(e) = applied {
      if !source.can_retry() {
        return Err(e).with_context(|| format!("failed to set '{}'", field.name));
      }
      warn!(field = %field.name, error = %e, "answer not applied");
    }
  }

  Ok(())
}

/// Report a transition outcome. Returns whether the workflow moved on; bails
/// when it did not and the answers cannot change.
fn settle<S: VerificationService>(
  session: &WorkflowSession<S>,
  source: &dyn AnswerSource,
  what: &str,
  outcome: SubmitOutcome,
) -> Result<bool> {
  let problem = match outcome {
    SubmitOutcome::Accepted => {
      if let Some(message) = &session.state().success_message {
        eprintln!("{}", message);
      }
      return Ok(true);
    }
    SubmitOutcome::Invalid(errors) => {
      eprint!("\n{}", session.view());
      format!("{} not sent, invalid fields: {}", what, errors)
    }
    SubmitOutcome::Rejected { message } | SubmitOutcome::Failed { message } => {
      format!("{} failed: {}", what, message)
    }
  };

  if !source.can_retry() {
    bail!(problem);
  }
  warn!(step = what, "{}; please try again", problem);
  Ok(false)
}
