//! Error types for script assembly and execution.

use thiserror::Error;

/// Errors raised while preparing or running a code block.
///
/// Interpreter failures (non-zero exit, text on stderr) are not errors: their
/// captured output is the result. These variants cover the cases where no
/// output could be produced at all.
#[derive(Debug, Error)]
pub enum Error {
    /// The TypeScript grammar could not be loaded into the parser.
    #[error("failed to load TypeScript grammar: {0}")]
    Grammar(String),

    /// The parser returned no syntax tree.
    #[error("failed to parse snippet")]
    Parse,

    /// A parameter in the bag had an unusable value.
    #[error("invalid parameter `{key}`: {message}")]
    InvalidParam { key: &'static str, message: String },

    /// Persistent sessions were requested.
    #[error("sessions are not supported (got session `{0}`)")]
    SessionUnsupported(String),

    /// The interpreter process could not be started.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The interpreter ran past the configured timeout.
    #[error("interpreter timed out after {0}s")]
    Timeout(u64),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidParam {
            key,
            message: message.into(),
        }
    }
}
