//! Core diagnostic types.
//!
//! Defines [`Diagnostic`], [`DiagnosticArg`], [`Severity`] and [`Subject`].

use std::fmt;

use jolt_ir::{Span, Symbol, SymbolTable};
use smallvec::SmallVec;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One message argument.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum DiagnosticArg {
    Symbol(Symbol),
    Text(&'static str),
}

impl From<Symbol> for DiagnosticArg {
    fn from(sym: Symbol) -> Self {
        DiagnosticArg::Symbol(sym)
    }
}

impl From<&'static str> for DiagnosticArg {
    fn from(text: &'static str) -> Self {
        DiagnosticArg::Text(text)
    }
}

/// The entity a diagnostic is blamed on.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Subject {
    /// A compilation unit, by file name.
    File(Symbol),
    /// A class, by fully qualified name.
    Class(Symbol),
    /// A field or method of a class.
    Member { class: Symbol, member: Symbol },
}

/// A semantic diagnostic.
///
/// Arguments are positional and interpreted by the message key; no key uses
/// more than three.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub span: Span,
    pub args: SmallVec<[DiagnosticArg; 3]>,
    pub subject: Option<Subject>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            span: Span::DUMMY,
            args: SmallVec::new(),
            subject: None,
        }
    }

    /// Create a new error diagnostic.
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    /// Create a new warning diagnostic.
    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<DiagnosticArg>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn with_args(mut self, args: &[DiagnosticArg]) -> Self {
        self.args.extend(args.iter().cloned());
        self
    }

    #[must_use]
    pub fn with_subject(mut self, subject: Option<Subject>) -> Self {
        self.subject = subject;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Render as `E1001 class.not.found: a.B` using the session's names.
    pub fn render(&self, symbols: &SymbolTable) -> String {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| match arg {
                DiagnosticArg::Symbol(sym) => symbols.display_name(*sym),
                DiagnosticArg::Text(text) => (*text).to_owned(),
            })
            .collect();
        if args.is_empty() {
            format!("{} {}", self.code, self.code.key())
        } else {
            format!("{} {}: {}", self.code, self.code.key(), args.join(", "))
        }
    }
}
