use std::fmt::{self, Display, Formatter};

use crate::Span;

pub type Result<'src, T> = std::result::Result<T, Error<'src>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Error<'src> {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span<'src>,
}

impl<'src> Error<'src> {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span<'src>) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }
}

impl Display for Error<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_report(f, &self.kind.to_string(), &self.message, self.span)
    }
}

impl std::error::Error for Error<'_> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A character which does not start any token
    IllegalCharacter,
    /// A token which cannot start the expected construct
    IllegalSyntax,
    /// A construct which is missing an expected token
    InvalidSyntax,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::IllegalCharacter => "Illegal character",
                Self::IllegalSyntax => "Illegal syntax",
                Self::InvalidSyntax => "Invalid syntax",
            }
        )
    }
}

/// Writes the common diagnostic layout shared by all error kinds:
/// file and 1-based line, error name, details, and the source excerpt of `span`.
pub fn write_report(f: &mut Formatter<'_>, name: &str, details: &str, span: Span) -> fmt::Result {
    write!(
        f,
        "File '{}', line {}\n\nError name: {name}\nDetails: {details}\n\n{}",
        span.path(),
        span.start.line + 1,
        span.excerpt(),
    )
}
