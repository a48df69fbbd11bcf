//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Features:
//! - Error limits to keep a broken compilation unit from flooding output,
//!   announced once by a "too many errors" report
//! - Deduplication of identical reports at the same position

use jolt_ir::Span;
use rustc_hash::FxHashSet;

use crate::{Diagnostic, DiagnosticArg, ErrorCode};

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before further errors are dropped (0 = unlimited).
    pub error_limit: usize,
    /// Drop a diagnostic identical to one already reported at the same position.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 100,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Identity of a report for deduplication.
type ReportKey = (u32, ErrorCode, Vec<DiagnosticArg>);

/// Queue for collecting diagnostics.
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.add(diagnostic);
/// // ... add more diagnostics
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    /// Count of errors (not warnings).
    error_count: usize,
    /// The "too many errors" report has been queued.
    overflowed: bool,
    seen: FxHashSet<ReportKey>,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            overflowed: false,
            seen: FxHashSet::default(),
            config,
        }
    }

    /// Add a diagnostic to the queue.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        let is_error = diag.is_error();

        if is_error && self.limit_reached() {
            if !self.overflowed {
                self.overflowed = true;
                self.diagnostics.push(too_many_errors(diag.span));
            }
            return false;
        }

        if self.config.deduplicate {
            let key = (diag.span.start, diag.code, diag.args.to_vec());
            if !self.seen.insert(key) {
                return false;
            }
        }

        self.diagnostics.push(diag);
        if is_error {
            self.error_count += 1;
        }
        true
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Get the number of errors collected.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Sort diagnostics by position and return them.
    ///
    /// Clears the queue after flushing. Reports at the same position keep
    /// their arrival order.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut result = std::mem::take(&mut self.diagnostics);
        result.sort_by_key(|d| d.span.start);

        self.error_count = 0;
        self.overflowed = false;
        self.seen.clear();

        result
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Does any queued diagnostic carry this code?
    pub fn contains(&self, code: ErrorCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }
}

/// Marks where further errors started being dropped; not counted itself.
#[cold]
fn too_many_errors(span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002).with_span(span)
}
