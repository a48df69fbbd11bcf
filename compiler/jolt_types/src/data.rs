//! Type representation stored in the pool.

use bitflags::bitflags;

use crate::TypeId;

/// Index of a class type's name slot in the pool.
///
/// The slot, not the `TypeData`, holds the class name so that renaming an
/// inner class updates every holder at once.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClassSlot(pub(crate) u32);

/// Type representation stored in the pool.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
    Null,
    Error,
    Package,
    Array(TypeId),
    Class(ClassSlot),
    Method { ret: TypeId, args: Box<[TypeId]> },
}

impl TypeData {
    pub fn code(&self) -> TypeCode {
        match self {
            TypeData::Boolean => TypeCode::Boolean,
            TypeData::Byte => TypeCode::Byte,
            TypeData::Char => TypeCode::Char,
            TypeData::Short => TypeCode::Short,
            TypeData::Int => TypeCode::Int,
            TypeData::Long => TypeCode::Long,
            TypeData::Float => TypeCode::Float,
            TypeData::Double => TypeCode::Double,
            TypeData::Void => TypeCode::Void,
            TypeData::Null => TypeCode::Null,
            TypeData::Error => TypeCode::Error,
            TypeData::Package => TypeCode::Package,
            TypeData::Array(_) => TypeCode::Array,
            TypeData::Class(_) => TypeCode::Class,
            TypeData::Method { .. } => TypeCode::Method,
        }
    }
}

/// Kind of a type, ordered so that the primitive widening chain
/// `byte < short < int < long < float < double` is a code comparison.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(u8)]
pub enum TypeCode {
    Boolean = 0,
    Byte = 1,
    Char = 2,
    Short = 3,
    Int = 4,
    Long = 5,
    Float = 6,
    Double = 7,
    Null = 8,
    Void = 9,
    Array = 10,
    Class = 11,
    Method = 12,
    Error = 13,
    Package = 14,
}

bitflags! {
    /// Set of type codes, for one-test membership queries.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeMask: u32 {
        const BOOLEAN = 1 << TypeCode::Boolean as u32;
        const BYTE = 1 << TypeCode::Byte as u32;
        const CHAR = 1 << TypeCode::Char as u32;
        const SHORT = 1 << TypeCode::Short as u32;
        const INT = 1 << TypeCode::Int as u32;
        const LONG = 1 << TypeCode::Long as u32;
        const FLOAT = 1 << TypeCode::Float as u32;
        const DOUBLE = 1 << TypeCode::Double as u32;
        const NULL = 1 << TypeCode::Null as u32;
        const VOID = 1 << TypeCode::Void as u32;
        const ARRAY = 1 << TypeCode::Array as u32;
        const CLASS = 1 << TypeCode::Class as u32;
        const METHOD = 1 << TypeCode::Method as u32;
        const ERROR = 1 << TypeCode::Error as u32;
        const PACKAGE = 1 << TypeCode::Package as u32;

        // === Masks ===

        const INTEGRAL = Self::BYTE.bits() | Self::CHAR.bits() | Self::SHORT.bits()
            | Self::INT.bits() | Self::LONG.bits();
        const NUMBER = Self::INTEGRAL.bits() | Self::FLOAT.bits() | Self::DOUBLE.bits();
        const REFERENCE = Self::ARRAY.bits() | Self::CLASS.bits() | Self::NULL.bits();
        /// Types that take part in subclass-based array covariance.
        const CLASS_LIKE = Self::ARRAY.bits() | Self::CLASS.bits();
    }
}

impl TypeCode {
    #[inline]
    pub fn mask(self) -> TypeMask {
        TypeMask::from_bits_retain(1 << self as u32)
    }

    #[inline]
    pub fn in_mask(self, mask: TypeMask) -> bool {
        mask.intersects(self.mask())
    }

    #[inline]
    pub fn is_number(self) -> bool {
        self.in_mask(TypeMask::NUMBER)
    }

    #[inline]
    pub fn is_integral(self) -> bool {
        self.in_mask(TypeMask::INTEGRAL)
    }

    #[inline]
    pub fn is_reference(self) -> bool {
        self.in_mask(TypeMask::REFERENCE)
    }

    #[inline]
    pub fn is_class_like(self) -> bool {
        self.in_mask(TypeMask::CLASS_LIKE)
    }
}
