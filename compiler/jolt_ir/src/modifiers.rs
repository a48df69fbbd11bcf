//! Declaration modifiers.
//!
//! Bit positions follow the classfile access flags for the low bits so that
//! binary stubs can be read without translation.

use bitflags::bitflags;

bitflags! {
    /// Modifier set of a class or member declaration.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Modifiers: u32 {
        // === Access (classfile bits) ===
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;

        // === Member properties ===
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const SYNCHRONIZED = 1 << 5;
        const VOLATILE = 1 << 6;
        const TRANSIENT = 1 << 7;
        const NATIVE = 1 << 8;
        const INTERFACE = 1 << 9;
        const ABSTRACT = 1 << 10;
        const STRICT = 1 << 11;

        // === Compiler-internal (bits 16+) ===

        /// Generated by the compiler; never participates in override checks.
        const SYNTHETIC = 1 << 16;
        const DEPRECATED = 1 << 17;
        const ANONYMOUS = 1 << 18;
        /// Class declared inside a block.
        const LOCAL = 1 << 19;

        const ACCESS = Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
    }
}

impl Modifiers {
    #[inline]
    pub fn is_public(self) -> bool {
        self.contains(Modifiers::PUBLIC)
    }

    #[inline]
    pub fn is_private(self) -> bool {
        self.contains(Modifiers::PRIVATE)
    }

    #[inline]
    pub fn is_protected(self) -> bool {
        self.contains(Modifiers::PROTECTED)
    }

    #[inline]
    pub fn is_static(self) -> bool {
        self.contains(Modifiers::STATIC)
    }

    #[inline]
    pub fn is_final(self) -> bool {
        self.contains(Modifiers::FINAL)
    }

    #[inline]
    pub fn is_abstract(self) -> bool {
        self.contains(Modifiers::ABSTRACT)
    }

    #[inline]
    pub fn is_interface(self) -> bool {
        self.contains(Modifiers::INTERFACE)
    }

    #[inline]
    pub fn is_synthetic(self) -> bool {
        self.contains(Modifiers::SYNTHETIC)
    }

    #[inline]
    pub fn is_local(self) -> bool {
        self.contains(Modifiers::LOCAL)
    }

    /// Access level implied by the access bits; no bit means package access.
    pub fn access_level(self) -> AccessLevel {
        if self.is_public() {
            AccessLevel::Public
        } else if self.is_protected() {
            AccessLevel::Protected
        } else if self.is_private() {
            AccessLevel::Private
        } else {
            AccessLevel::Package
        }
    }
}

/// Visibility ordered from most to least restrictive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessLevel {
    Private,
    Package,
    Protected,
    Public,
}

impl AccessLevel {
    pub fn keyword(self) -> &'static str {
        match self {
            AccessLevel::Private => "private",
            AccessLevel::Package => "package-private",
            AccessLevel::Protected => "protected",
            AccessLevel::Public => "public",
        }
    }
}

#[cfg(test)]
mod tests;
