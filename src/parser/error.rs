use crate::ast::Location;
use crate::error::Error;
use thiserror::Error as ThisError;

/// Failure while turning Java-- text into an AST
#[derive(Debug, Clone, ThisError)]
pub enum ParseError {
    #[error("{location}: expected {expected}, found '{found}'")]
    UnexpectedToken { expected: String, found: String, location: Location },

    #[error("{location}: unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput { expected: String, location: Location },

    #[error("{location}: {message}")]
    InvalidSyntax { message: String, location: Location },

    #[error("{location}: {message}")]
    LexicalError { message: String, location: Location },
}

impl ParseError {
    pub fn unexpected_token(expected: &str, found: &str, location: Location) -> Self {
        ParseError::UnexpectedToken { expected: expected.into(), found: found.into(), location }
    }

    pub fn unexpected_end_of_input(expected: &str, location: Location) -> Self {
        ParseError::UnexpectedEndOfInput { expected: expected.into(), location }
    }

    pub fn invalid_syntax(message: &str, location: Location) -> Self {
        ParseError::InvalidSyntax { message: message.into(), location }
    }

    pub fn lexical_error(message: &str, location: Location) -> Self {
        ParseError::LexicalError { message: message.into(), location }
    }

    pub fn location(&self) -> Location {
        match self {
            ParseError::UnexpectedToken { location, .. }
            | ParseError::UnexpectedEndOfInput { location, .. }
            | ParseError::InvalidSyntax { location, .. }
            | ParseError::LexicalError { location, .. } => *location,
        }
    }
}

// Lexical failures keep their own variant; everything else is a parse error
// located at the offending token.
impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        let location = err.location();
        match err {
            ParseError::LexicalError { message, .. } => Error::Lexical { message: format!("{}: {}", location, message) },
            ParseError::UnexpectedToken { expected, found, .. } => Error::Parse {
                line: location.line,
                column: location.column,
                message: format!("expected {}, found '{}'", expected, found),
            },
            ParseError::UnexpectedEndOfInput { expected, .. } => Error::Parse {
                line: location.line,
                column: location.column,
                message: format!("unexpected end of input, expected {}", expected),
            },
            ParseError::InvalidSyntax { message, .. } => {
                Error::Parse { line: location.line, column: location.column, message }
            }
        }
    }
}
