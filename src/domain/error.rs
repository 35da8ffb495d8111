// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Ollama command failed: {0}")]
    ExternalTool(String),
    #[error("{0}")]
    MalformedOutput(String),
    #[error("{0}")]
    Unexpected(String),
}

impl DomainError {
    pub fn no_json_array() -> Self {
        Self::MalformedOutput("Could not find a JSON array in the output.".to_string())
    }
}
