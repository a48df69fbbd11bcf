//! Assignment and cast conversions between types.

use jolt_types::{TypeCode, TypeId};

use super::Environment;
use crate::{ClassError, MemberDefinition};

/// Primitive widening: `byte < short < int < long < float < double`, with
/// `char` entering the chain at `int`.
fn widens(from: TypeCode, to: TypeCode) -> bool {
    use TypeCode::{Byte, Char, Double, Float, Int, Long, Short};
    match from {
        Byte => matches!(to, Short | Int | Long | Float | Double),
        Short | Char => matches!(to, Int | Long | Float | Double),
        Int => matches!(to, Long | Float | Double),
        Long => matches!(to, Float | Double),
        Float => to == Double,
        _ => false,
    }
}

impl Environment {
    fn is_array_supertype(&self, ty: TypeId) -> bool {
        let known = self.well_known();
        ty == known.object_type || ty == known.cloneable_type || ty == known.serializable_type
    }

    /// Strip array dimensions present on both sides.
    fn strip_common_dimensions(&self, mut from: TypeId, mut to: TypeId) -> (TypeId, TypeId) {
        let types = self.types();
        while let (Some(f), Some(t)) = (types.element_type(from), types.element_type(to)) {
            from = f;
            to = t;
        }
        (from, to)
    }

    /// May a value of type `from` be assigned to `to` without a cast?
    pub fn implicit_cast(&self, from: TypeId, to: TypeId) -> Result<bool, ClassError> {
        if from == to {
            return Ok(true);
        }
        let types = self.types();
        let to_code = types.code(to);
        match types.code(from) {
            TypeCode::Null => Ok(to_code.is_reference()),
            TypeCode::Array => {
                if to_code != TypeCode::Array {
                    return Ok(self.is_array_supertype(to));
                }
                let (from, to) = self.strip_common_dimensions(from, to);
                let (from_code, to_code) = (types.code(from), types.code(to));
                if from_code.is_class_like() && to_code.is_class_like() {
                    self.implicit_cast(from, to)
                } else {
                    Ok(from_code == to_code)
                }
            }
            TypeCode::Class => {
                if to_code != TypeCode::Class {
                    return Ok(false);
                }
                let from_definition = self.type_definition(from)?;
                let to_definition = self.type_definition(to)?;
                to_definition.implemented_by(self, from_definition.decl())
            }
            from_code => Ok(widens(from_code, to_code)),
        }
    }

    /// May a value of type `from` be cast to `to`?
    pub fn explicit_cast(&self, from: TypeId, to: TypeId) -> Result<bool, ClassError> {
        if self.implicit_cast(from, to)? {
            return Ok(true);
        }
        let types = self.types();
        let (from_code, to_code) = (types.code(from), types.code(to));
        if from_code.is_number() {
            return Ok(to_code.is_number());
        }

        if from_code == TypeCode::Class && to_code == TypeCode::Class {
            let from_class = self.type_definition(from)?;
            let to_class = self.type_definition(to)?;
            if to_class.is_final() {
                return from_class.implemented_by(self, to_class.decl());
            }
            if from_class.is_final() {
                return to_class.implemented_by(self, from_class.decl());
            }
            if to_class.is_interface() && from_class.is_interface() {
                return to_class.could_implement(self, &from_class);
            }
            return Ok(to_class.is_interface()
                || from_class.is_interface()
                || from_class.super_class_of(self, to_class.decl())?);
        }

        if to_code == TypeCode::Array {
            if from_code == TypeCode::Array {
                let (from, to) = self.strip_common_dimensions(from, to);
                if types.code(from).is_class_like() && types.code(to).is_class_like() {
                    return self.explicit_cast(from, to);
                }
            } else if self.is_array_supertype(from) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Is `from` at least as specific as `to`?
    pub fn is_more_specific(&self, from: TypeId, to: TypeId) -> Result<bool, ClassError> {
        self.implicit_cast(from, to)
    }

    /// Is method `best` at least as specific as `other`: declared in a
    /// subtype, and applicable to `other`'s argument types?
    pub fn is_more_specific_member(
        &self,
        best: &MemberDefinition,
        other: &MemberDefinition,
    ) -> Result<bool, ClassError> {
        let best_owner = self.declaration(best.owner()).ty();
        let other_owner = self.declaration(other.owner()).ty();
        if !self.implicit_cast(best_owner, other_owner)? {
            return Ok(false);
        }
        match self.types().argument_types(best.ty()) {
            Some(args) => self.is_applicable(other, &args),
            None => Ok(false),
        }
    }

    /// Can `method` be called with arguments of these types?
    pub fn is_applicable(
        &self,
        method: &MemberDefinition,
        args: &[TypeId],
    ) -> Result<bool, ClassError> {
        let Some(params) = self.types().argument_types(method.ty()) else {
            return Ok(false);
        };
        if params.len() != args.len() {
            return Ok(false);
        }
        for (&arg, &param) in args.iter().zip(params.iter()) {
            if !self.is_more_specific(arg, param)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
