use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Client settings.
///
/// Settings are layered: values read from the settings file are overridden
/// by anything given on the command line or in the environment.
///
/// ```json
/// {
///   "api_base": "https://udyam.example.gov.in/api/v1",
///   "schema_path": "/etc/udyam/schema.json"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
  /// Base URL of the verification service.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub api_base: Option<String>,

  /// Optional schema file replacing the built-in Udyam schema.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub schema_path: Option<PathBuf>,
}

impl Settings {
  /// Load settings from a JSON file. A missing file yields defaults.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = match std::fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
      Err(e) => {
        return Err(ConfigError::Io {
          path: path.to_path_buf(),
          source: e,
        });
      }
    };

    serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
      origin: path.display().to_string(),
      source: e,
    })
  }

  /// Overlay `overrides` on top of `self`. Values set in `overrides` win.
  pub fn merge(self, overrides: Settings) -> Self {
    Self {
      api_base: overrides.api_base.or(self.api_base),
      schema_path: overrides.schema_path.or(self.schema_path),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("config.json")).unwrap();
    assert_eq!(settings, Settings::default());
  }

  #[test]
  fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "api_base": "http://localhost:8000/api/v1" }"#).unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.api_base.as_deref(), Some("http://localhost:8000/api/v1"));
    assert_eq!(settings.schema_path, None);
  }

  #[test]
  fn test_invalid_json_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(Settings::load(&path), Err(ConfigError::Parse { .. })));
  }

  #[test]
  fn test_merge_prefers_overrides() {
    let file = Settings {
      api_base: Some("http://file".to_string()),
      schema_path: Some(PathBuf::from("/file/schema.json")),
    };
    let cli = Settings {
      api_base: Some("http://cli".to_string()),
      schema_path: None,
    };

    let merged = file.merge(cli);
    assert_eq!(merged.api_base.as_deref(), Some("http://cli"));
    assert_eq!(merged.schema_path, Some(PathBuf::from("/file/schema.json")));
  }
}
