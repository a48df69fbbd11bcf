//! Jolt IR - shared leaf types for the Jolt compiler front end.
//!
//! This crate contains the pieces every later phase agrees on:
//! - Spans for source positions
//! - Symbols for interned, possibly qualified, possibly inner-class names
//! - The `SymbolTable` that canonicalizes them
//! - Declaration modifiers and access levels
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: names become `Symbol(u32)`, so equality is a
//!   single integer comparison.
//! - **Inject, don't ambient**: the table is an explicit value shared through
//!   `SharedSymbolTable`, so tests get isolated tables.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-copied handles.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod modifiers;
mod span;
mod symbol;
mod symbol_table;

pub use modifiers::{AccessLevel, Modifiers};
pub use span::Span;
pub use symbol::Symbol;
pub use symbol_table::{
    SharedSymbolTable, SymbolTable, AMBIGUOUS_PREFIX, INNER_MARKER, MANGLED_SEPARATOR,
};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Span, Symbol};
    crate::static_assert_size!(Symbol, 4);
    crate::static_assert_size!(Span, 8);
}
