//! Session configuration.

use jolt_diagnostic::DiagnosticConfig;

/// Knobs for one compilation session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub diagnostics: DiagnosticConfig,
    /// Run the basic inheritance check when a definition is first handed out.
    pub inheritance_checks: bool,
    /// Packages an on-demand import may name without existing.
    pub exempt_packages: Vec<String>,
    /// On-demand imports every compilation unit starts with.
    pub implicit_imports: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            diagnostics: DiagnosticConfig::default(),
            inheritance_checks: true,
            exempt_packages: vec!["java.lang".to_owned()],
            implicit_imports: vec!["java.lang".to_owned()],
        }
    }
}

impl SessionConfig {
    /// Configuration for tests: every diagnostic is kept.
    pub fn unlimited() -> Self {
        SessionConfig {
            diagnostics: DiagnosticConfig::unlimited(),
            ..Self::default()
        }
    }
}
