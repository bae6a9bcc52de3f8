use std::path::PathBuf;
use thiserror::Error;

/// Raised when a setting cannot convert text into its value type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value for {kind}: {text:?}{}", format_reason(.reason))]
pub struct InvalidType {
    pub kind: &'static str,
    pub text: String,
    pub reason: Option<String>,
}

fn format_reason(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!(" ({})", reason),
        None => String::new(),
    }
}

impl InvalidType {
    pub fn new(kind: &'static str, text: &str) -> Self {
        InvalidType {
            kind,
            text: text.to_string(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Errors reading or writing the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to determine config directory")]
    NoConfigDir,

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
}
