//! Structured diagnostics
//!
//! Recoverable anomalies (enumeration code evaluation problems, tolerated
//! parse irregularities) are collected as [`Diagnostic`] values and handed
//! back to the caller instead of being printed or thrown. Hard syntax
//! errors use [`crate::frontend::core::parser::SyntaxError`] instead.

use crate::util::span::Span;
use std::fmt;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational note
    Note,
    /// Something was tolerated but is probably wrong
    Warning,
    /// Analysis could not produce a full result
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single collected diagnostic
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Span of the offending token(s), dummy if not localizable
    pub span: Span,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity,
            message: message.into(),
            span,
        }
    }

    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Error, message, span)
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Warning, message, span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.is_dummy() {
            write!(f, "{}: {}", self.severity, self.message)
        } else {
            write!(f, "{}: {} (at {})", self.severity, self.message, self.span.start)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let d = Diagnostic::error("bad code", Span::dummy());
        assert_eq!(d.to_string(), "error: bad code");
        let d = Diagnostic::warning("odd", Span::of_range(3, 4));
        assert!(d.to_string().contains("at 1:4"));
    }
}
