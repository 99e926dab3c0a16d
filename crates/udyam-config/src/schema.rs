use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::field::FieldDescriptor;

/// One step of the registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDescriptor {
  pub step: u32,
  pub name: String,
  pub fields: Vec<FieldDescriptor>,
}

impl StepDescriptor {
  /// Get a field by name.
  pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
    self.fields.iter().find(|f| f.name == name)
  }
}

/// The full, ordered form definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
  pub steps: Vec<StepDescriptor>,
}

impl FormSchema {
  /// Parse and check a schema from a JSON string.
  pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
    let schema: FormSchema = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
      origin: "schema".to_string(),
      source: e,
    })?;
    schema.check()?;
    Ok(schema)
  }

  /// Read, parse and check a schema file.
  pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
      path: path.to_path_buf(),
      source: e,
    })?;
    let schema: FormSchema = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
      origin: path.display().to_string(),
      source: e,
    })?;
    schema.check()?;
    Ok(schema)
  }

  /// Get a step by its position in the schema (0-based).
  pub fn step_at(&self, index: usize) -> Option<&StepDescriptor> {
    self.steps.get(index)
  }

  /// Ensure the schema has steps and field names are unique per step.
  fn check(&self) -> Result<(), ConfigError> {
    if self.steps.is_empty() {
      return Err(ConfigError::EmptySchema);
    }

    for step in &self.steps {
      let mut seen = HashSet::new();
      for field in &step.fields {
        if !seen.insert(field.name.as_str()) {
          return Err(ConfigError::DuplicateField {
            step: step.step,
            name: field.name.clone(),
          });
        }
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_minimal_schema() {
    let schema = FormSchema::from_json_str(
      r#"{
        "steps": [{
          "step": 1,
          "name": "Identity",
          "fields": [
            { "name": "id", "label": "ID", "type": "text", "validation": { "required": true } }
          ]
        }]
      }"#,
    )
    .unwrap();

    assert_eq!(schema.steps.len(), 1);
    assert!(schema.step_at(0).unwrap().field("id").is_some());
    assert!(schema.step_at(1).is_none());
  }

  #[test]
  fn test_empty_schema_rejected() {
    let result = FormSchema::from_json_str(r#"{ "steps": [] }"#);
    assert!(matches!(result, Err(ConfigError::EmptySchema)));
  }

  #[test]
  fn test_duplicate_field_rejected() {
    let result = FormSchema::from_json_str(
      r#"{
        "steps": [{
          "step": 2,
          "name": "Dupes",
          "fields": [
            { "name": "x", "label": "X", "type": "text" },
            { "name": "x", "label": "X again", "type": "checkbox" }
          ]
        }]
      }"#,
    );

    match result {
      Err(ConfigError::DuplicateField { step, name }) => {
        assert_eq!(step, 2);
        assert_eq!(name, "x");
      }
      other => panic!("expected duplicate field error, got {:?}", other),
    }
  }

  #[test]
  fn test_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.json");
    let json = serde_json::to_string(&FormSchema::udyam()).unwrap();
    std::fs::write(&path, json).unwrap();

    let schema = FormSchema::from_json_file(&path).unwrap();
    assert_eq!(schema, FormSchema::udyam());
  }

  #[test]
  fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = FormSchema::from_json_file(&dir.path().join("nope.json"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
  }
}
