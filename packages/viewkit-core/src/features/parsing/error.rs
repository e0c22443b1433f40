//! Error types for XML reading/writing

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum XmlError {
    #[error("XML Syntax Error: {message}, line {line}")]
    Syntax { message: String, line: u32 },

    #[error("XML Syntax Error: {0}")]
    Malformed(String),

    #[error("XML write error: {0}")]
    Write(String),
}

impl XmlError {
    pub fn syntax(message: impl Into<String>, line: u32) -> Self {
        XmlError::Syntax {
            message: message.into(),
            line,
        }
    }

    /// Line the error was detected on, when known
    pub fn line(&self) -> Option<u32> {
        match self {
            XmlError::Syntax { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type XmlResult<T> = Result<T, XmlError>;
