//! Class declarations and the registry that owns them.
//!
//! A declaration is the staged record behind one class type. It starts
//! `Undefined`, is advanced by the loader until a definition is available
//! (or the class is known not to exist), and is then advanced by checking.
//!
//! ```text
//! Undefined ──┬──> Undecided ──> Source ──> Parsed ─┐
//!             ├──> Source ─────────┘                ├──> Checked ──> Compiled
//!             ├──> Binary ──────────────────────────┘
//!             └──> NotFound
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use jolt_ir::Symbol;
use jolt_types::{SharedTypePool, TypeId};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::{ClassDefinition, ClassError, CompilerError, Environment};

/// Index of a declaration in its session's registry.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct DeclId(u32);

impl DeclId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Loading stage of a class declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ClassStatus {
    /// Name known, nothing loaded.
    Undefined,
    /// Both a binary and a source form exist; not yet decided which to use.
    Undecided,
    /// The source form will be used but has not been parsed.
    Source,
    /// Definition read from a binary form.
    Binary,
    /// Definition built from a source form.
    Parsed,
    Checked,
    Compiled,
    NotFound,
}

impl ClassStatus {
    /// A definition is available.
    pub fn is_settled(self) -> bool {
        matches!(
            self,
            ClassStatus::Binary | ClassStatus::Parsed | ClassStatus::Checked | ClassStatus::Compiled
        )
    }

    /// The loader still has work to do.
    pub fn needs_load(self) -> bool {
        matches!(
            self,
            ClassStatus::Undefined | ClassStatus::Undecided | ClassStatus::Source
        )
    }
}

/// Demand-loaded record for one class.
pub struct ClassDeclaration {
    id: DeclId,
    ty: TypeId,
    types: SharedTypePool,
    status: Cell<ClassStatus>,
    definition: RefCell<Option<Rc<ClassDefinition>>>,
    /// Set once a definition has been handed out; later calls skip the state machine.
    found: Cell<bool>,
    loading: Cell<bool>,
}

impl ClassDeclaration {
    fn new(id: DeclId, ty: TypeId, types: SharedTypePool) -> Self {
        ClassDeclaration {
            id,
            ty,
            types,
            status: Cell::new(ClassStatus::Undefined),
            definition: RefCell::new(None),
            found: Cell::new(false),
            loading: Cell::new(false),
        }
    }

    pub fn id(&self) -> DeclId {
        self.id
    }

    /// The class type this declaration stands for.
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    /// Current name of the class; follows inner-class renames of the type.
    pub fn name(&self) -> Symbol {
        self.types.class_name(self.ty).unwrap_or(Symbol::EMPTY)
    }

    pub fn status(&self) -> ClassStatus {
        self.status.get()
    }

    /// The stored definition, without loading.
    pub fn peek_definition(&self) -> Option<Rc<ClassDefinition>> {
        self.definition.borrow().clone()
    }

    fn transition(&self, to: ClassStatus) {
        debug!(
            class = self.types.symbols().lookup(self.name()),
            from = ?self.status.get(),
            ?to,
            "class status"
        );
        self.status.set(to);
    }

    fn invalid(&self, to: ClassStatus) -> CompilerError {
        CompilerError::InvalidTransition {
            name: self.name(),
            from: self.status.get(),
            to,
        }
    }

    /// Move to a stage that carries no definition: `Undecided`, `Source` or
    /// `NotFound`.
    pub fn set_status(&self, to: ClassStatus) -> Result<(), CompilerError> {
        if to.is_settled() || self.status.get().is_settled() {
            return Err(self.invalid(to));
        }
        self.transition(to);
        Ok(())
    }

    pub fn set_not_found(&self) -> Result<(), CompilerError> {
        self.set_status(ClassStatus::NotFound)
    }

    /// Store the loaded definition and move to `status`.
    pub fn set_definition(
        &self,
        definition: Rc<ClassDefinition>,
        status: ClassStatus,
    ) -> Result<(), CompilerError> {
        if !status.is_settled() {
            return Err(self.invalid(status));
        }
        if definition.ty() != self.ty {
            return Err(CompilerError::NameMismatch {
                expected: self.name(),
                found: definition.name(),
            });
        }
        if self.definition.borrow().is_some() {
            return Err(CompilerError::DuplicateDefinition(self.name()));
        }
        *self.definition.borrow_mut() = Some(definition);
        self.transition(status);
        Ok(())
    }

    /// Record that checking finished. Checking a class twice is tolerated.
    pub fn mark_checked(&self) -> Result<(), CompilerError> {
        match self.status.get() {
            ClassStatus::Binary | ClassStatus::Parsed | ClassStatus::Checked => {
                self.transition(ClassStatus::Checked);
                Ok(())
            }
            ClassStatus::Compiled => Ok(()),
            _ => Err(self.invalid(ClassStatus::Checked)),
        }
    }

    pub fn mark_compiled(&self) -> Result<(), CompilerError> {
        match self.status.get() {
            ClassStatus::Checked | ClassStatus::Compiled => {
                self.transition(ClassStatus::Compiled);
                Ok(())
            }
            _ => Err(self.invalid(ClassStatus::Compiled)),
        }
    }

    /// Run the loader once and require progress.
    fn load(&self, env: &Environment) -> Result<(), CompilerError> {
        if self.loading.replace(true) {
            return Err(CompilerError::ReentrantLoad(self.name()));
        }
        let before = self.status.get();
        let result = env.load_definition(self);
        self.loading.set(false);
        result?;

        if self.status.get() == before {
            return Err(CompilerError::LoaderStalled(self.name()));
        }
        Ok(())
    }

    fn settled_definition(&self) -> Result<Rc<ClassDefinition>, CompilerError> {
        self.peek_definition()
            .ok_or_else(|| self.invalid(self.status.get()))
    }

    /// The class definition, loading and basic-checking it on first use.
    #[tracing::instrument(level = "debug", skip_all, fields(class = ?self.id))]
    pub fn get_definition(&self, env: &Environment) -> Result<Rc<ClassDefinition>, ClassError> {
        if self.found.get() {
            if let Some(definition) = self.peek_definition() {
                trace!("definition cached");
                return Ok(definition);
            }
        }

        loop {
            match self.status.get() {
                ClassStatus::Undefined | ClassStatus::Undecided | ClassStatus::Source => {
                    self.load(env)?;
                }
                ClassStatus::Binary | ClassStatus::Parsed => {
                    let definition = self.settled_definition()?;
                    if env.config().inheritance_checks && !definition.is_inside_local(env)? {
                        definition.basic_check(env)?;
                    }
                    self.found.set(true);
                    return Ok(definition);
                }
                ClassStatus::Checked | ClassStatus::Compiled => {
                    let definition = self.settled_definition()?;
                    self.found.set(true);
                    return Ok(definition);
                }
                ClassStatus::NotFound => return Err(ClassError::NotFound(self.name())),
            }
        }
    }

    /// The class definition, loading it if needed but never checking it.
    pub fn get_definition_no_check(
        &self,
        env: &Environment,
    ) -> Result<Rc<ClassDefinition>, ClassError> {
        loop {
            match self.status.get() {
                status if status.needs_load() => self.load(env)?,
                ClassStatus::NotFound => return Err(ClassError::NotFound(self.name())),
                _ => return Ok(self.settled_definition()?),
            }
        }
    }
}

/// All declarations of a session, keyed by class type.
///
/// Keying by type rather than by name makes the classfile and source
/// spellings of an inner class share one declaration.
#[derive(Default)]
pub struct ClassRegistry {
    decls: RefCell<Vec<Rc<ClassDeclaration>>>,
    by_type: RefCell<FxHashMap<TypeId, DeclId>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The declaration for a class type, created on first request.
    pub fn declare(&self, types: &SharedTypePool, ty: TypeId) -> Rc<ClassDeclaration> {
        if let Some(&id) = self.by_type.borrow().get(&ty) {
            return self.get(id);
        }
        let mut decls = self.decls.borrow_mut();
        #[allow(clippy::cast_possible_truncation)]
        let id = DeclId(decls.len() as u32);
        let decl = Rc::new(ClassDeclaration::new(id, ty, types.clone()));
        decls.push(Rc::clone(&decl));
        self.by_type.borrow_mut().insert(ty, id);
        trace!(?id, ?ty, "new class declaration");
        decl
    }

    pub fn get(&self, id: DeclId) -> Rc<ClassDeclaration> {
        Rc::clone(&self.decls.borrow()[id.index()])
    }

    pub fn find(&self, ty: TypeId) -> Option<Rc<ClassDeclaration>> {
        let id = *self.by_type.borrow().get(&ty)?;
        Some(self.get(id))
    }

    pub fn len(&self) -> usize {
        self.decls.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
