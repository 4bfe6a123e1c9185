//! Error types for lexnorm
//!
//! This module defines the error type shared by every pipeline stage and by
//! resource loading. Malformed text is never an error: the tokenizer
//! degrades gracefully instead of rejecting input.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, NormalizeError>;

/// Main error type for lexnorm
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// No resource of the kind `stage` needs is registered for the language.
    /// Fatal to the requested invocation, not to the process.
    #[error("Unsupported language '{language}' (stage: {stage})")]
    UnsupportedLanguage { language: String, stage: String },

    /// A linguistic resource could not be read or parsed at startup.
    #[error("Failed to load {resource}: {message}")]
    ResourceLoadFailure { resource: String, message: String },

    /// Configuration validation failed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Internal error (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl NormalizeError {
    /// Create an unsupported language error raised by `stage`
    pub fn unsupported_language(language: impl Into<String>, stage: impl Into<String>) -> Self {
        Self::UnsupportedLanguage {
            language: language.into(),
            stage: stage.into(),
        }
    }

    /// Create a resource load failure
    pub fn resource_load(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ResourceLoadFailure {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this error is an unsupported language failure
    pub fn is_unsupported_language(&self) -> bool {
        matches!(self, Self::UnsupportedLanguage { .. })
    }

    /// The stage that raised an [`UnsupportedLanguage`](Self::UnsupportedLanguage) error
    pub fn stage(&self) -> Option<&str> {
        match self {
            Self::UnsupportedLanguage { stage, .. } => Some(stage.as_str()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for NormalizeError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
