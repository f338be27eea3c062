//! Error types for the infrastructure tool.

use thiserror::Error;

/// Result type for infrastructure operations.
pub type Result<T> = std::result::Result<T, InfraError>;

/// Everything that can abort a run.
#[derive(Debug, Error)]
pub enum InfraError {
    /// A required local tool is not installed or not executable.
    #[error("required tool '{tool}' is not available: {reason}")]
    MissingTool { tool: String, reason: String },

    /// The provider rejected the caller identity.
    #[error("cloud credentials are missing or invalid: {0}")]
    MissingCredentials(String),

    /// A provider command exited non-zero.
    #[error("command '{command}' failed with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// Bucket name does not satisfy S3 naming rules.
    #[error("invalid bucket name '{0}'")]
    InvalidBucketName(String),

    /// A freshly created bucket never became visible.
    #[error("bucket '{bucket}' not visible after {attempts} attempts")]
    BucketNotReady { bucket: String, attempts: u32 },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InfraError {
    pub fn command_failed(
        command: impl Into<String>,
        status: impl ToString,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            status: status.to_string(),
            stderr: stderr.into(),
        }
    }
}
