//! Override and meet rules between methods of the same signature.
//!
//! Violations are reported as they are found and every rule is checked, so
//! one override can produce several diagnostics; the result is `false` if
//! any rule failed. Handing in something that is not a pair of methods with
//! one signature is a caller bug and fails with a [`CompilerError`].

use jolt_diagnostic::{DiagnosticArg, ErrorCode};
use crate::{ClassDefinition, ClassError, CompilerError, Environment, MemberDefinition};

impl MemberDefinition {
    fn require_method(&self) -> Result<(), CompilerError> {
        if self.is_method() {
            Ok(())
        } else {
            Err(CompilerError::NotAMethod(self.name()))
        }
    }

    fn require_same_signature(
        &self,
        env: &Environment,
        other: &MemberDefinition,
    ) -> Result<(), CompilerError> {
        self.require_method()?;
        other.require_method()?;
        if self.name() != other.name() || !env.types().equal_arguments(self.ty(), other.ty()) {
            return Err(CompilerError::SignatureMismatch(self.name(), other.name()));
        }
        Ok(())
    }

    fn same_return_type(&self, env: &Environment, other: &MemberDefinition) -> bool {
        let types = env.types();
        types.return_type(self.ty()) == types.return_type(other.ty())
    }

    fn violation_args(&self, env: &Environment, other: &MemberDefinition) -> [DiagnosticArg; 3] {
        [
            self.name().into(),
            env.declaration(self.owner()).name().into(),
            env.declaration(other.owner()).name().into(),
        ]
    }

    /// May this method override `sup`?
    pub fn check_override(
        &self,
        env: &Environment,
        sup: &MemberDefinition,
    ) -> Result<bool, CompilerError> {
        self.check_override_in(env, sup, None)
    }

    /// Override check; violations are reported at `class` when the pair is
    /// inherited by it rather than declared there.
    pub(crate) fn check_override_in(
        &self,
        env: &Environment,
        sup: &MemberDefinition,
        class: Option<&ClassDefinition>,
    ) -> Result<bool, CompilerError> {
        if self.is_synthetic() || sup.is_synthetic() {
            return Ok(true);
        }
        self.require_same_signature(env, sup)?;

        let span = class.map_or(self.span(), ClassDefinition::span);
        let args = self.violation_args(env, sup);
        let mut ok = true;
        let mut violation = |code: ErrorCode| {
            env.error(span, code, &args);
            ok = false;
        };

        if sup.is_static() && !self.is_static() {
            violation(ErrorCode::E3001);
        }
        if !sup.is_static() && self.is_static() {
            violation(ErrorCode::E3002);
        }
        if sup.is_final() {
            violation(ErrorCode::E3003);
        }
        if self.access_level() < sup.access_level() {
            violation(ErrorCode::E3004);
        }
        if !self.same_return_type(env, sup) {
            violation(ErrorCode::E3005);
        }
        if !self.exceptions_fit(env, sup, true)? {
            violation(ErrorCode::E3006);
        }
        Ok(ok)
    }

    /// Does every exception this method declares fall under one `other`
    /// declares, or under the unchecked roots?
    ///
    /// An exception class that cannot be found counts as fitting; with
    /// `report` set it is diagnosed at this method.
    pub fn exceptions_fit(
        &self,
        env: &Environment,
        other: &MemberDefinition,
        report: bool,
    ) -> Result<bool, CompilerError> {
        let known = env.well_known();
        let unchecked = [
            env.class_declaration(known.error).id(),
            env.class_declaration(known.runtime_exception).id(),
        ];

        'exceptions: for &exception in self.exceptions() {
            let thrown = match env.definition(exception) {
                Ok(thrown) => thrown,
                Err(ClassError::NotFound(missing)) => {
                    if report {
                        let owner = env.declaration(other.owner()).name();
                        env.error(self.span(), ErrorCode::E1001, &[missing.into(), owner.into()]);
                    }
                    continue;
                }
                Err(ClassError::Ambiguous(..)) => continue,
                Err(ClassError::Internal(e)) => return Err(e),
            };
            for &allowed in other.exceptions().iter().chain(unchecked.iter()) {
                match thrown.sub_class_of(env, allowed) {
                    Ok(true) => continue 'exceptions,
                    Ok(false) | Err(ClassError::NotFound(_) | ClassError::Ambiguous(..)) => {}
                    Err(ClassError::Internal(e)) => return Err(e),
                }
            }
            return Ok(false);
        }
        Ok(true)
    }

    /// Can this method and `other`, both inherited by `owner` from unrelated
    /// supertypes, coexist? At least one must be abstract.
    pub fn check_meet(
        &self,
        env: &Environment,
        other: &MemberDefinition,
        owner: &ClassDefinition,
    ) -> Result<bool, CompilerError> {
        self.require_method()?;
        other.require_method()?;
        match (self.is_abstract(), other.is_abstract()) {
            (false, false) => Err(CompilerError::MeetWithoutAbstract(self.name())),
            (false, true) => self.check_override_in(env, other, Some(owner)),
            (true, false) => other.check_override_in(env, self, Some(owner)),
            (true, true) => {
                self.require_same_signature(env, other)?;
                if self.same_return_type(env, other) {
                    return Ok(true);
                }
                env.error(owner.span(), ErrorCode::E3007, &self.violation_args(env, other));
                Ok(false)
            }
        }
    }

    /// Could this inherited method stand in for the abstract `other`?
    /// Nothing is reported.
    pub fn could_override(
        &self,
        env: &Environment,
        other: &MemberDefinition,
    ) -> Result<bool, CompilerError> {
        if !other.is_abstract() {
            return Ok(false);
        }
        if self.access_level() < other.access_level() {
            return Ok(false);
        }
        self.exceptions_fit(env, other, false)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
