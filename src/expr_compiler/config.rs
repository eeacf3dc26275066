// Translator configuration
//
// Loaded from TOML; every key is optional.
//
//     string_temp_prefix = "tmp_string"
//     array_temp_prefix = "tmp_array"
//     format_entry_points = ["console.log"]

use crate::expr_compiler::error::CompilerError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslatorConfig {
    /// Prefix for temporaries holding concatenated strings
    pub string_temp_prefix: String,
    /// Prefix for temporaries holding materialized array literals
    pub array_temp_prefix: String,
    /// Callee texts handed to the formatted-output collaborator
    pub format_entry_points: Vec<String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig {
            string_temp_prefix: "tmp_string".to_string(),
            array_temp_prefix: "tmp_array".to_string(),
            format_entry_points: vec!["console.log".to_string()],
        }
    }
}

impl TranslatorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, CompilerError> {
        let config: TranslatorConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CompilerError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        log::debug!("loading translator config from {}", path.display());
        Self::from_toml_str(&source)
    }

    pub fn is_format_entry_point(&self, callee: &str) -> bool {
        self.format_entry_points.iter().any(|entry| entry == callee)
    }

    fn validate(&self) -> Result<(), CompilerError> {
        for (key, prefix) in [
            ("string_temp_prefix", &self.string_temp_prefix),
            ("array_temp_prefix", &self.array_temp_prefix),
        ] {
            if !is_c_identifier(prefix) {
                return Err(CompilerError::ConfigError(format!(
                    "{} must be a C identifier, got '{}'",
                    key, prefix
                )));
            }
        }
        Ok(())
    }
}

/// `[_A-Za-z][_A-Za-z0-9]*`
pub fn is_c_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}
