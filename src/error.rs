use thiserror::Error;

/// Result type for jmmc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the jmmc compiler back end.
///
/// User mistakes found by semantic analysis are *not* errors; they are
/// collected as [`crate::review::Diagnostic`]s. The variants here terminate
/// processing of a unit.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Lexical error: {message}")]
    Lexical { message: String },

    #[error("{count} semantic error(s) reported; bytecode not generated")]
    Semantic { count: usize },

    #[error("Unsupported feature: {feature}")]
    Unsupported { feature: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal compiler error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create a parse error with location information
    pub fn parse_error(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a lexical error
    pub fn lexical_error(message: impl Into<String>) -> Self {
        Self::Lexical { message: message.into() }
    }

    /// An AST or IR shape this core does not cover. Always a compiler defect.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    pub fn unsupported(feature: impl Into<String>) -> Self {
        Self::Unsupported { feature: feature.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Whether this error points at a defect in the compiler rather than the input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}
