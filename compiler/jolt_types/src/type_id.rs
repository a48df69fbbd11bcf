//! Type index handle.
//!
//! Fixed types are pre-interned at pool creation with the indices below,
//! so they can be named without a pool in hand.

use std::fmt;

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    // === Fixed Types (indices 0-11) ===

    pub const BOOLEAN: Self = Self(0);
    pub const BYTE: Self = Self(1);
    pub const CHAR: Self = Self(2);
    pub const SHORT: Self = Self(3);
    pub const INT: Self = Self(4);
    pub const LONG: Self = Self(5);
    pub const FLOAT: Self = Self(6);
    pub const DOUBLE: Self = Self(7);
    pub const VOID: Self = Self(8);
    /// The type of the `null` literal; converts to every reference type.
    pub const NULL: Self = Self(9);
    /// Placeholder for a type that failed to resolve.
    pub const ERROR: Self = Self(10);
    /// Pseudo-type of an expression that names a package.
    pub const PACKAGE: Self = Self(11);

    /// First index for dynamically interned types.
    pub const FIRST_DYNAMIC: u32 = 12;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the pre-interned fixed types.
    #[inline]
    pub const fn is_fixed(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }

    /// Source keyword of a fixed type, or `None` for dynamic types.
    #[inline]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("boolean"),
            1 => Some("byte"),
            2 => Some("char"),
            3 => Some("short"),
            4 => Some("int"),
            5 => Some("long"),
            6 => Some("float"),
            7 => Some("double"),
            8 => Some("void"),
            9 => Some("null"),
            10 => Some("<error>"),
            11 => Some("<package>"),
            _ => None,
        }
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "TypeId({name})"),
            None => write!(f, "TypeId({})", self.0),
        }
    }
}
