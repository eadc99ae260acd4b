//! Structured error type for the Storyscript facade.
//!
//! Matches this crate's existing `ImplementationError`/`ParseError` idiom: a plain struct with
//! a hand-written `Display`, no `thiserror`/`anyhow`.

use crate::ParseError;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Internal,
}

/// A Storyscript compile failure. `classifier` is one of `variables-backslash`, `variables-dash`,
/// `generic` for [`ErrorKind::Syntax`], or a short dispatch-failure tag for [`ErrorKind::Internal`].
#[derive(Debug, Clone)]
pub struct StoryError {
    pub kind: ErrorKind,
    pub classifier: &'static str,
    pub line: Option<usize>,
    pub token: Option<String>,
}

impl StoryError {
    pub fn syntax(classifier: &'static str, line: usize, token: Option<String>) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            classifier,
            line: Some(line),
            token,
        }
    }

    pub fn internal(classifier: &'static str) -> Self {
        Self {
            kind: ErrorKind::Internal,
            classifier,
            line: None,
            token: None,
        }
    }
}

impl From<ParseError> for StoryError {
    fn from(err: ParseError) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            classifier: "generic",
            line: None,
            token: Some(err.message),
        }
    }
}

impl Display for StoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::Syntax => {
                write!(f, "SyntaxError[{}]", self.classifier)?;
                if let Some(line) = self.line {
                    write!(f, " at line {}", line)?;
                }
                if let Some(token) = &self.token {
                    write!(f, " ({})", token)?;
                }
                Ok(())
            }
            ErrorKind::Internal => write!(f, "InternalError[{}]", self.classifier),
        }
    }
}
