//! Diagnostic system for semantic errors.
//!
//! A diagnostic is a position, a message key, up to three arguments and the
//! entity it blames (a file, a class, or a member). Rendering to text is left
//! to the caller; the queue only collects, filters and orders.

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, DiagnosticArg, Severity, Subject};
pub use error_code::ErrorCode;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
