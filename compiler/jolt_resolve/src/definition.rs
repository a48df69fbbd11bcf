//! Class and member definitions.
//!
//! A definition is the loaded body of a class: its modifiers, supertypes,
//! enclosing class and members. Other classes are referenced by `DeclId`
//! and looked up through the environment, which may load them on demand.
//! Every walk over the class graph keeps a visited set, so a cyclic
//! hierarchy (reported by the basic check) never loops.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use jolt_diagnostic::{DiagnosticArg, ErrorCode};
use jolt_ir::{AccessLevel, Modifiers, Span, Symbol};
use jolt_types::{SharedTypePool, TypeId};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::{ClassError, CompilerError, DeclId, Environment};

mod info;

pub use info::{ClassInfo, MemberInfo};

/// Where a definition was read from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Origin {
    Binary,
    Source,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum MemberKind {
    Field,
    Method { exceptions: Vec<DeclId> },
    /// The member through which an inner class is nested.
    InnerClass(DeclId),
}

/// A field, method or inner-class member.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MemberDefinition {
    pub(crate) owner: DeclId,
    pub(crate) name: Symbol,
    pub(crate) span: Span,
    pub(crate) modifiers: Modifiers,
    pub(crate) ty: TypeId,
    pub(crate) kind: MemberKind,
}

impl MemberDefinition {
    /// Declaration of the class declaring this member.
    pub fn owner(&self) -> DeclId {
        self.owner
    }

    pub fn name(&self) -> Symbol {
        self.name
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn kind(&self) -> &MemberKind {
        &self.kind
    }

    pub fn is_method(&self) -> bool {
        matches!(self.kind, MemberKind::Method { .. })
    }

    pub fn is_field(&self) -> bool {
        matches!(self.kind, MemberKind::Field)
    }

    pub fn inner_class(&self) -> Option<DeclId> {
        match self.kind {
            MemberKind::InnerClass(decl) => Some(decl),
            _ => None,
        }
    }

    /// Declared exceptions; empty for anything but a method.
    pub fn exceptions(&self) -> &[DeclId] {
        match &self.kind {
            MemberKind::Method { exceptions } => exceptions,
            _ => &[],
        }
    }

    pub fn is_public(&self) -> bool {
        self.modifiers.is_public()
    }

    pub fn is_protected(&self) -> bool {
        self.modifiers.is_protected()
    }

    pub fn is_private(&self) -> bool {
        self.modifiers.is_private()
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    pub fn is_final(&self) -> bool {
        self.modifiers.is_final()
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.is_abstract()
    }

    pub fn is_synthetic(&self) -> bool {
        self.modifiers.is_synthetic()
    }

    pub fn access_level(&self) -> AccessLevel {
        self.modifiers.access_level()
    }
}

pub(crate) struct Header {
    pub(crate) span: Span,
    pub(crate) source: Option<Symbol>,
    pub(crate) modifiers: Modifiers,
    pub(crate) super_class: Option<DeclId>,
    pub(crate) interfaces: Vec<DeclId>,
    pub(crate) outer: Option<DeclId>,
}

/// The loaded body of a class.
pub struct ClassDefinition {
    ty: TypeId,
    decl: DeclId,
    types: SharedTypePool,
    origin: Origin,
    header: Header,
    members: Vec<MemberDefinition>,
    /// Classes declared in blocks of this class, by discriminator.
    local_classes: FxHashMap<Symbol, DeclId>,
    basic_checked: Cell<bool>,
    has_error: Cell<bool>,
    methods: RefCell<Option<Rc<MethodTable>>>,
    collecting: Cell<bool>,
}

/// Methods a class declares or inherits.
struct MethodTable {
    /// One method per signature; own declarations come first.
    all: Rc<[MemberDefinition]>,
    permanently_abstract: Rc<[MemberDefinition]>,
}

impl ClassDefinition {
    pub(crate) fn new(
        ty: TypeId,
        decl: DeclId,
        types: SharedTypePool,
        origin: Origin,
        header: Header,
        members: Vec<MemberDefinition>,
        local_classes: FxHashMap<Symbol, DeclId>,
    ) -> Self {
        ClassDefinition {
            ty,
            decl,
            types,
            origin,
            header,
            members,
            local_classes,
            basic_checked: Cell::new(false),
            has_error: Cell::new(false),
            methods: RefCell::new(None),
            collecting: Cell::new(false),
        }
    }

    // === Accessors ===

    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn decl(&self) -> DeclId {
        self.decl
    }

    /// Current name; follows inner-class renames of the type.
    pub fn name(&self) -> Symbol {
        self.types.class_name(self.ty).unwrap_or(Symbol::EMPTY)
    }

    /// Package of the class; for an inner class, the package of its top class.
    pub fn package(&self) -> Symbol {
        self.types.symbols().qualifier(self.name())
    }

    pub fn span(&self) -> Span {
        self.header.span
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// The file the class was read from, if known.
    pub fn source(&self) -> Option<Symbol> {
        self.header.source
    }

    pub fn modifiers(&self) -> Modifiers {
        self.header.modifiers
    }

    pub fn super_class(&self) -> Option<DeclId> {
        self.header.super_class
    }

    pub fn interfaces(&self) -> &[DeclId] {
        &self.header.interfaces
    }

    pub fn outer_class(&self) -> Option<DeclId> {
        self.header.outer
    }

    pub fn members(&self) -> &[MemberDefinition] {
        &self.members
    }

    /// Own members named `name`, in declaration order.
    pub fn members_named(&self, name: Symbol) -> impl Iterator<Item = &MemberDefinition> {
        self.members.iter().filter(move |m| m.name == name)
    }

    /// First own method named `name`.
    pub fn method(&self, name: Symbol) -> Option<&MemberDefinition> {
        self.members_named(name).find(|m| m.is_method())
    }

    pub fn local_class(&self, discriminator: Symbol) -> Option<DeclId> {
        self.local_classes.get(&discriminator).copied()
    }

    pub fn is_public(&self) -> bool {
        self.header.modifiers.is_public()
    }

    pub fn is_private(&self) -> bool {
        self.header.modifiers.is_private()
    }

    pub fn is_final(&self) -> bool {
        self.header.modifiers.is_final()
    }

    pub fn is_abstract(&self) -> bool {
        self.header.modifiers.is_abstract()
    }

    pub fn is_interface(&self) -> bool {
        self.header.modifiers.is_interface()
    }

    /// Declared in a block.
    pub fn is_local(&self) -> bool {
        self.header.modifiers.is_local()
    }

    /// Nested in another class, locally or as a member.
    pub fn is_inner(&self) -> bool {
        self.header.outer.is_some()
    }

    /// Did the basic check find a broken hierarchy?
    pub fn has_error(&self) -> bool {
        self.has_error.get()
    }

    // === Hierarchy ===

    /// Is this class `other` or one of its superclasses?
    pub fn super_class_of(&self, env: &Environment, other: DeclId) -> Result<bool, ClassError> {
        let mut visited = FxHashSet::default();
        let mut current = Some(other);
        while let Some(id) = current {
            if id == self.decl {
                return Ok(true);
            }
            if !visited.insert(id) {
                break;
            }
            current = env.definition(id)?.super_class();
        }
        Ok(false)
    }

    /// Is this class `other` or one of its subclasses?
    pub fn sub_class_of(&self, env: &Environment, other: DeclId) -> Result<bool, ClassError> {
        if self.decl == other {
            return Ok(true);
        }
        let mut visited = FxHashSet::default();
        visited.insert(self.decl);
        let mut current = self.super_class();
        while let Some(id) = current {
            if id == other {
                return Ok(true);
            }
            if !visited.insert(id) {
                break;
            }
            current = env.definition(id)?.super_class();
        }
        Ok(false)
    }

    /// Is this class or interface a supertype of `class` (or `class` itself)?
    pub fn implemented_by(&self, env: &Environment, class: DeclId) -> Result<bool, ClassError> {
        let mut visited = FxHashSet::default();
        let mut stack = vec![class];
        while let Some(id) = stack.pop() {
            if id == self.decl {
                return Ok(true);
            }
            if !visited.insert(id) {
                continue;
            }
            let definition = env.definition(id)?;
            // Interfaces are searched before moving up the superclass chain
            stack.extend(definition.super_class());
            stack.extend(definition.interfaces().iter().rev().copied());
        }
        Ok(false)
    }

    /// Is this class one of the classes `other` is nested in?
    pub fn enclosing_class_of(
        &self,
        env: &Environment,
        other: &ClassDefinition,
    ) -> Result<bool, ClassError> {
        let mut visited = FxHashSet::default();
        let mut current = other.outer_class();
        while let Some(id) = current {
            if id == self.decl {
                return Ok(true);
            }
            if !visited.insert(id) {
                break;
            }
            current = env.definition_no_check(id)?.outer_class();
        }
        Ok(false)
    }

    /// The outermost class enclosing this one (itself if top-level).
    pub fn top_class(&self, env: &Environment) -> Result<DeclId, ClassError> {
        let mut visited = FxHashSet::default();
        let mut top = self.decl;
        let mut current = self.outer_class();
        while let Some(id) = current {
            if !visited.insert(id) {
                break;
            }
            top = id;
            current = env.definition_no_check(id)?.outer_class();
        }
        Ok(top)
    }

    /// Declared in a block, or nested in a class that is.
    pub fn is_inside_local(&self, env: &Environment) -> Result<bool, ClassError> {
        if self.is_local() {
            return Ok(true);
        }
        let mut visited = FxHashSet::default();
        let mut current = self.outer_class();
        while let Some(id) = current {
            if !visited.insert(id) {
                break;
            }
            let outer = env.definition_no_check(id)?;
            if outer.is_local() {
                return Ok(true);
            }
            current = outer.outer_class();
        }
        Ok(false)
    }

    /// Own methods followed by inherited ones, one per signature. The first
    /// call collects the table, reporting bad overrides and meets against
    /// this class.
    pub fn method_table(&self, env: &Environment) -> Result<Rc<[MemberDefinition]>, ClassError> {
        Ok(Rc::clone(&self.collected_methods(env)?.all))
    }

    /// Abstract package-private methods of superclasses in other packages.
    /// They cannot be overridden here, so the class can never be concrete.
    pub fn permanently_abstract_methods(
        &self,
        env: &Environment,
    ) -> Result<Rc<[MemberDefinition]>, ClassError> {
        Ok(Rc::clone(&self.collected_methods(env)?.permanently_abstract))
    }

    fn collected_methods(&self, env: &Environment) -> Result<Rc<MethodTable>, CompilerError> {
        if let Some(table) = self.methods.borrow().as_ref() {
            return Ok(Rc::clone(table));
        }
        if self.collecting.replace(true) {
            // Reached again while collecting, as through a cyclic
            // hierarchy: hand out the own methods without caching them.
            return Ok(Rc::new(MethodTable {
                all: self.own_methods(env).into(),
                permanently_abstract: Rc::from([]),
            }));
        }
        let collected = self.collect_methods(env);
        self.collecting.set(false);

        let table = Rc::new(collected?);
        *self.methods.borrow_mut() = Some(Rc::clone(&table));
        Ok(table)
    }

    fn own_methods(&self, env: &Environment) -> Vec<MemberDefinition> {
        let initializer = env.well_known().initializer;
        let mut own: Vec<MemberDefinition> = Vec::new();
        for member in self.members.iter().filter(|m| m.is_method() && m.name != initializer) {
            if self.find_signature(&own, member).is_none() {
                own.push(member.clone());
            }
        }
        own
    }

    fn find_signature(
        &self,
        methods: &[MemberDefinition],
        method: &MemberDefinition,
    ) -> Option<usize> {
        methods
            .iter()
            .position(|m| m.name == method.name && self.types.equal_arguments(m.ty, method.ty))
    }

    fn collect_methods(&self, env: &Environment) -> Result<MethodTable, CompilerError> {
        debug!(class = env.symbols().lookup(self.name()), "collecting methods");
        let own = self.own_methods(env);
        let mut all = own.clone();
        let mut permanently_abstract = Vec::new();

        if let Some(super_class) = self.super_class() {
            let parent =
                self.inherit_from(env, super_class, &own, &mut all, &mut permanently_abstract)?;
            if let Some(parent) = parent {
                let inherited = parent.collected_methods(env)?;
                permanently_abstract.extend(inherited.permanently_abstract.iter().cloned());
            }
        }
        for &interface in self.interfaces() {
            self.inherit_from(env, interface, &own, &mut all, &mut permanently_abstract)?;
        }

        Ok(MethodTable {
            all: all.into(),
            permanently_abstract: permanently_abstract.into(),
        })
    }

    /// Merge the methods of one direct supertype into `all`. Returns the
    /// supertype if it could be loaded.
    fn inherit_from(
        &self,
        env: &Environment,
        parent: DeclId,
        own: &[MemberDefinition],
        all: &mut Vec<MemberDefinition>,
        permanently_abstract: &mut Vec<MemberDefinition>,
    ) -> Result<Option<Rc<ClassDefinition>>, CompilerError> {
        let loaded = env.definition(parent).and_then(|p| Ok((p.method_table(env)?, p)));
        let (inherited, parent) = match loaded {
            Ok(loaded) => loaded,
            Err(ClassError::NotFound(missing)) => {
                // A broken direct supertype was reported by the basic check
                if !self.has_error() {
                    env.error(
                        self.span(),
                        ErrorCode::E1001,
                        &[DiagnosticArg::Symbol(missing), DiagnosticArg::Symbol(self.name())],
                    );
                }
                return Ok(None);
            }
            Err(ClassError::Ambiguous(..)) => return Ok(None),
            Err(ClassError::Internal(e)) => return Err(e),
        };

        let constructor = env.well_known().constructor;
        for method in inherited.iter() {
            if method.is_private()
                || method.name == constructor
                || (parent.is_interface() && !method.is_abstract())
            {
                continue;
            }
            let local = self.find_signature(own, method).map(|i| &own[i]);

            if method.access_level() == AccessLevel::Package
                && env.package_of(method.owner) != self.package()
            {
                if let Some(local) = local.filter(|_| self.origin == Origin::Source) {
                    env.warning(
                        local.span,
                        ErrorCode::E3009,
                        &[
                            local.name.into(),
                            env.declaration(local.owner).name().into(),
                            env.declaration(method.owner).name().into(),
                        ],
                    );
                }
                if method.is_abstract() {
                    permanently_abstract.push(method.clone());
                }
                continue;
            }

            if let Some(local) = local {
                local.check_override(env, method)?;
                continue;
            }
            let Some(index) = self.find_signature(all, method) else {
                all.push(method.clone());
                continue;
            };
            let former = &all[index];
            if self.is_interface() && !former.is_abstract() && method.is_abstract() {
                all[index] = method.clone();
            } else if !former.check_meet(env, method, self)?
                || former.could_override(env, method)?
            {
                continue;
            } else if method.could_override(env, former)? {
                all[index] = method.clone();
            } else {
                env.error(
                    self.span(),
                    ErrorCode::E3008,
                    &[
                        method.name.into(),
                        env.declaration(former.owner).name().into(),
                        env.declaration(method.owner).name().into(),
                    ],
                );
            }
        }
        Ok(Some(parent))
    }

    /// Could one class implement both interfaces? Only a method signature
    /// shared with different return types rules it out.
    pub fn could_implement(
        &self,
        env: &Environment,
        other: &ClassDefinition,
    ) -> Result<bool, ClassError> {
        for interface in [self, other] {
            if !interface.is_interface() {
                return Err(CompilerError::NotAnInterface(interface.name()).into());
            }
        }
        let mine = self.method_table(env)?;
        let theirs = other.method_table(env)?;
        for theirs in theirs.iter() {
            for mine in mine.iter() {
                if mine.name == theirs.name
                    && self.types.equal_arguments(mine.ty, theirs.ty)
                    && self.types.return_type(mine.ty) != self.types.return_type(theirs.ty)
                {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    // === Access ===

    /// The member of the outer class through which this class is nested.
    pub fn inner_class_member(&self, env: &Environment) -> Result<MemberDefinition, ClassError> {
        let missing = || CompilerError::MissingInnerClassMember(self.name());
        let outer = self.outer_class().ok_or_else(missing)?;
        let outer = env.definition_no_check(outer)?;
        let member = outer
            .members
            .iter()
            .find(|m| m.inner_class() == Some(self.decl))
            .cloned();
        member.ok_or_else(|| missing().into())
    }

    /// Can code in this class name `class`?
    pub fn can_access_class(&self, env: &Environment, class: DeclId) -> Result<bool, ClassError> {
        let target = env.definition(class)?;
        if target.is_local() {
            return Ok(true);
        }
        if target.is_inner() {
            let member = target.inner_class_member(env)?;
            return self.can_access_member(env, &member);
        }
        if target.is_public() {
            return Ok(true);
        }
        Ok(self.package() == target.package())
    }

    /// Can code in this class use `member`?
    pub fn can_access_member(
        &self,
        env: &Environment,
        member: &MemberDefinition,
    ) -> Result<bool, ClassError> {
        if member.is_public() {
            return Ok(true);
        }
        if member.is_protected() && self.sub_class_of(env, member.owner)? {
            return Ok(true);
        }
        if member.is_private() {
            let owner_top = env.definition_no_check(member.owner)?.top_class(env)?;
            return Ok(self.top_class(env)? == owner_top);
        }
        Ok(self.package() == env.package_of(member.owner))
    }

    /// Can this class name `class` in its own `extends` or `implements`
    /// clause? Protected inner classes get no subclass allowance here, since
    /// the subclass relation is not established yet.
    pub fn extends_can_access(
        &self,
        env: &Environment,
        class: DeclId,
    ) -> Result<bool, ClassError> {
        if let Some(outer) = self.outer_class() {
            return env.definition(outer)?.can_access_class(env, class);
        }
        let target = env.definition(class)?;
        if target.is_local() {
            return Err(CompilerError::TopLevelLocal(target.name()).into());
        }
        if target.is_inner() {
            let member = target.inner_class_member(env)?;
            if member.is_public() {
                return Ok(true);
            }
            if member.is_private() {
                let owner_top = env.definition_no_check(member.owner)?.top_class(env)?;
                return Ok(self.decl == owner_top);
            }
            return Ok(self.package() == env.package_of(member.owner));
        }
        if target.is_public() {
            return Ok(true);
        }
        Ok(self.package() == target.package())
    }

    // === Inner classes ===

    fn own_inner_class(&self, name: Symbol) -> Option<&MemberDefinition> {
        self.members_named(name)
            .find(|m| m.inner_class().is_some() && !m.modifiers.is_local())
    }

    /// The member inner class `name`, declared here or inherited.
    pub fn get_inner_class(
        &self,
        env: &Environment,
        name: Symbol,
    ) -> Result<Option<MemberDefinition>, ClassError> {
        if let Some(member) = self.own_inner_class(name) {
            return Ok(Some(member.clone()));
        }
        let mut visited = FxHashSet::default();
        visited.insert(self.decl);
        let mut current = self.super_class();
        while let Some(id) = current {
            if !visited.insert(id) {
                break;
            }
            let definition = env.definition(id)?;
            if let Some(member) = definition.own_inner_class(name) {
                return Ok(Some(member.clone()));
            }
            current = definition.super_class();
        }
        Ok(None)
    }

    /// Full name of the inner class `name` (`A` or `A.B`) as seen from this
    /// class. A name that cannot be resolved is qualified onto this class.
    pub fn resolve_inner_class(
        &self,
        env: &Environment,
        name: Symbol,
    ) -> Result<Symbol, CompilerError> {
        let symbols = env.symbols();
        if symbols.is_qualified(name) {
            let head = self.resolve_inner_class(env, symbols.head(name))?;
            let tail = symbols.tail(name);
            return match env.class_definition(head) {
                Ok(definition) => definition.resolve_inner_class(env, tail),
                Err(ClassError::Internal(e)) => Err(e),
                Err(_) => Ok(symbols.qualify_inner(head, tail)),
            };
        }
        match self.get_inner_class(env, name) {
            Ok(Some(member)) => match member.inner_class() {
                Some(inner) => Ok(env.declaration(inner).name()),
                None => Ok(symbols.qualify_inner(self.name(), name)),
            },
            Ok(None) | Err(ClassError::NotFound(_) | ClassError::Ambiguous(..)) => {
                Ok(symbols.qualify_inner(self.name(), name))
            }
            Err(ClassError::Internal(e)) => Err(e),
        }
    }

    /// Does this class literally declare the inner class `name` (`A` or
    /// `A.B`)? Inherited members do not count.
    pub fn inner_class_exists(&self, env: &Environment, name: Symbol) -> Result<bool, ClassError> {
        let symbols = env.symbols();
        let head = symbols.head(name);
        for member in self.members_named(head) {
            let Some(inner) = member.inner_class() else {
                continue;
            };
            let inner = env.definition_no_check(inner)?;
            if inner.is_local() {
                continue;
            }
            return if symbols.is_qualified(name) {
                inner.inner_class_exists(env, symbols.tail(name))
            } else {
                Ok(true)
            };
        }
        Ok(false)
    }

    /// Resolve a type name written inside this class: member classes of this
    /// class and its enclosing classes come before imports.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn resolve_name(&self, env: &Environment, name: Symbol) -> Result<Symbol, CompilerError> {
        let symbols = env.symbols();
        if symbols.is_qualified(name) {
            let head = self.resolve_name(env, symbols.head(name))?;
            return env.resolve_with_head(head, name);
        }

        if let Some(found) = Self::inner_class_name(env, self.get_inner_class(env, name))? {
            return Ok(found);
        }
        let mut visited = FxHashSet::default();
        visited.insert(self.decl);
        let mut current = self.outer_class();
        while let Some(id) = current {
            if !visited.insert(id) {
                break;
            }
            let outer = match env.definition(id) {
                Ok(outer) => outer,
                Err(ClassError::Internal(e)) => return Err(e),
                Err(_) => break,
            };
            if let Some(found) = Self::inner_class_name(env, outer.get_inner_class(env, name))? {
                return Ok(found);
            }
            current = outer.outer_class();
        }
        env.resolve_name(name)
    }

    fn inner_class_name(
        env: &Environment,
        lookup: Result<Option<MemberDefinition>, ClassError>,
    ) -> Result<Option<Symbol>, CompilerError> {
        match lookup {
            Ok(member) => Ok(member
                .and_then(|m| m.inner_class())
                .map(|inner| env.declaration(inner).name())),
            Err(ClassError::Internal(e)) => Err(e),
            Err(_) => Ok(None),
        }
    }

    // === Basic check ===

    /// Validate the hierarchy once: every supertype exists and the class
    /// does not inherit from itself. Collects the method table on success.
    pub fn basic_check(&self, env: &Environment) -> Result<(), CompilerError> {
        if self.basic_checked.replace(true) {
            return Ok(());
        }
        let name = self.name();
        debug!(class = env.symbols().lookup(name), "basic check");

        let supertypes: Vec<DeclId> = self
            .super_class()
            .into_iter()
            .chain(self.interfaces().iter().copied())
            .collect();
        for id in supertypes {
            match env.definition_no_check(id) {
                Ok(_) => {}
                Err(ClassError::NotFound(missing)) => {
                    env.error(
                        self.span(),
                        ErrorCode::E1001,
                        &[DiagnosticArg::Symbol(missing), DiagnosticArg::Symbol(name)],
                    );
                    self.has_error.set(true);
                }
                Err(ClassError::Ambiguous(first, second)) => {
                    env.error(
                        self.span(),
                        ErrorCode::E1002,
                        &[DiagnosticArg::Symbol(first), DiagnosticArg::Symbol(second)],
                    );
                    self.has_error.set(true);
                }
                Err(ClassError::Internal(e)) => return Err(e),
            }
        }

        if self.inherits_from_self(env)? {
            env.error(
                self.span(),
                ErrorCode::E2001,
                &[DiagnosticArg::Symbol(name)],
            );
            self.has_error.set(true);
        }

        if !self.has_error.get() {
            self.collected_methods(env)?;
        }
        Ok(())
    }

    fn inherits_from_self(&self, env: &Environment) -> Result<bool, CompilerError> {
        let mut visited = FxHashSet::default();
        let mut stack: Vec<DeclId> = self
            .super_class()
            .into_iter()
            .chain(self.interfaces().iter().copied())
            .collect();
        while let Some(id) = stack.pop() {
            if id == self.decl {
                return Ok(true);
            }
            if !visited.insert(id) {
                continue;
            }
            match env.definition_no_check(id) {
                Ok(definition) => {
                    stack.extend(definition.super_class());
                    stack.extend(definition.interfaces().iter().copied());
                }
                Err(ClassError::Internal(e)) => return Err(e),
                Err(_) => {}
            }
        }
        Ok(false)
    }
}

impl std::fmt::Debug for ClassDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassDefinition")
            .field("decl", &self.decl)
            .field("ty", &self.ty)
            .field("origin", &self.origin)
            .field("modifiers", &self.header.modifiers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
