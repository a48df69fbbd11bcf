//! Semantic core of the Jolt front end.
//!
//! Turns names into classes, decides when one type may stand in for another,
//! and decides when one method may legally override or meet another.
//!
//! # Architecture
//!
//! ```text
//! Session ──owns──> ClassRegistry ──> ClassDeclaration ──(loader)──> ClassDefinition
//!    │                                       ▲
//!    └──> Environment ──parent──> Environment│
//!             │ subject, imports             │
//!             └──── resolve / cast / check ──┘
//! ```
//!
//! Declarations are created on first mention and advanced by the
//! [`ClassLoader`] on demand. Environments are cheap `Rc` links: each adds a
//! diagnostic subject or an import table and defers everything else to its
//! parent.

use std::sync::Once;

mod config;
mod declaration;
mod definition;
mod env;
mod error;
mod imports;
mod loader;
mod overrides;
mod session;

#[cfg(test)]
mod test_support;

pub use config::SessionConfig;
pub use declaration::{ClassDeclaration, ClassRegistry, ClassStatus, DeclId};
pub use definition::{
    ClassDefinition, ClassInfo, MemberDefinition, MemberInfo, MemberKind, Origin,
};
pub use env::Environment;
pub use error::{ClassError, CompilerError, Resolution};
pub use imports::Imports;
pub use loader::{ClassLoader, MemoryLoader};
pub use session::{Session, WellKnown};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber for debug output.
///
/// Call this early in main() to enable `RUST_LOG` environment variable support.
/// Example: `RUST_LOG=jolt_resolve=debug jolt check Foo.java`
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
