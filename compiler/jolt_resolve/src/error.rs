//! Error types for resolution.
//!
//! Two failure families: [`ClassError`] for what the user wrote (a class that
//! is missing or ambiguous), and [`CompilerError`] for broken invariants of
//! an earlier phase. The second aborts the compilation unit; the first is
//! reported and worked around.

use jolt_ir::Symbol;
use jolt_types::SignatureError;
use thiserror::Error;

use crate::ClassStatus;

/// A violated internal invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompilerError {
    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("class {0:?} requested while it is being loaded")]
    ReentrantLoad(Symbol),

    #[error("loader returned without advancing class {0:?}")]
    LoaderStalled(Symbol),

    #[error("definition of {found:?} stored under declaration {expected:?}")]
    NameMismatch { expected: Symbol, found: Symbol },

    #[error("class {0:?} defined twice")]
    DuplicateDefinition(Symbol),

    #[error("class {name:?} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        name: Symbol,
        from: ClassStatus,
        to: ClassStatus,
    },

    #[error("member {0:?} is not a method")]
    NotAMethod(Symbol),

    #[error("methods {0:?} and {1:?} do not share a signature")]
    SignatureMismatch(Symbol, Symbol),

    #[error("meet of two concrete methods named {0:?}")]
    MeetWithoutAbstract(Symbol),

    #[error("class {0:?} is not an interface")]
    NotAnInterface(Symbol),

    #[error("inner class {0:?} has no member in its outer class")]
    MissingInnerClassMember(Symbol),

    #[error("local class {0:?} reached from a top-level context")]
    TopLevelLocal(Symbol),

    #[error("import table modified after it was checked")]
    ImportsFrozen,
}

/// Failure to turn a name into a class.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ClassError {
    #[error("class {0:?} not found")]
    NotFound(Symbol),

    #[error("{0:?} is ambiguous with {1:?}")]
    Ambiguous(Symbol, Symbol),

    #[error(transparent)]
    Internal(#[from] CompilerError),
}

/// Outcome of looking a short name up in an import table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Found(Symbol),
    /// The first two distinct candidates.
    Ambiguous(Symbol, Symbol),
    NotFound(Symbol),
}

impl Resolution {
    pub fn into_result(self) -> Result<Symbol, ClassError> {
        match self {
            Resolution::Found(name) => Ok(name),
            Resolution::Ambiguous(first, second) => Err(ClassError::Ambiguous(first, second)),
            Resolution::NotFound(name) => Err(ClassError::NotFound(name)),
        }
    }
}
