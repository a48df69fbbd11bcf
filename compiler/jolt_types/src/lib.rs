//! Type lattice for the Jolt compiler.
//!
//! Every type is interned in a [`TypePool`] keyed by its classfile
//! signature, so two types are equal exactly when their [`TypeId`]s are.
//!
//! # Type shapes
//!
//! | shape     | signature            |
//! |-----------|----------------------|
//! | primitive | `I`, `J`, `Z`, ...   |
//! | array     | `[` + element        |
//! | class     | `Lpkg/Outer$Inner;`  |
//! | method    | `(` + args + `)` + return |
//!
//! Class types are the one place where identity and name come apart: an
//! inner class first seen under its classfile spelling is renamed to its
//! source spelling when that form turns up, and every holder of the
//! `TypeId` observes the new name through the pool.

mod data;
mod pool;
mod type_id;

pub use data::{ClassSlot, TypeCode, TypeData, TypeMask};
pub use pool::{SharedTypePool, SignatureError, TypePool};
pub use type_id::TypeId;

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::TypeId;
    jolt_ir::static_assert_size!(TypeId, 4);
}
