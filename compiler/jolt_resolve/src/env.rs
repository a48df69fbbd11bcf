//! Resolution environment.
//!
//! An environment is a chain of `Rc` links. The root belongs to the session;
//! each child adds a diagnostic subject (the file, class or member being
//! checked) or the import table of a compilation unit, and defers every
//! other query to the session.

use std::rc::Rc;

use jolt_diagnostic::{Diagnostic, DiagnosticArg, ErrorCode, Subject};
use jolt_ir::{SharedSymbolTable, Span, Symbol};
use jolt_types::{SharedTypePool, TypeData, TypeId};
use tracing::{debug, trace};

use crate::{
    ClassDeclaration, ClassDefinition, ClassError, ClassStatus, CompilerError, DeclId, Imports,
    MemberDefinition, Session, SessionConfig, WellKnown,
};

mod conversion;

struct EnvLink {
    session: Rc<Session>,
    parent: Option<Environment>,
    subject: Option<Subject>,
    imports: Option<Rc<Imports>>,
}

/// Resolution context.
///
/// Cloning is O(1); creating a child link does not copy the chain.
#[derive(Clone)]
pub struct Environment(Rc<EnvLink>);

impl Environment {
    pub(crate) fn root(session: Rc<Session>) -> Self {
        Environment(Rc::new(EnvLink {
            session,
            parent: None,
            subject: None,
            imports: None,
        }))
    }

    fn child(&self, subject: Option<Subject>, imports: Option<Rc<Imports>>) -> Self {
        Environment(Rc::new(EnvLink {
            session: Rc::clone(&self.0.session),
            parent: Some(self.clone()),
            subject,
            imports,
        }))
    }

    /// A child that blames diagnostics on `subject`.
    #[must_use]
    pub fn with_subject(&self, subject: Subject) -> Self {
        self.child(Some(subject), None)
    }

    /// A child that resolves short names through `imports`.
    #[must_use]
    pub fn with_imports(&self, imports: Rc<Imports>) -> Self {
        self.child(None, Some(imports))
    }

    pub fn parent(&self) -> Option<&Environment> {
        self.0.parent.as_ref()
    }

    // === Session access ===

    pub fn session(&self) -> &Rc<Session> {
        &self.0.session
    }

    pub fn symbols(&self) -> &SharedSymbolTable {
        self.0.session.symbols()
    }

    pub fn types(&self) -> &SharedTypePool {
        self.0.session.types()
    }

    pub fn config(&self) -> &SessionConfig {
        self.0.session.config()
    }

    pub fn well_known(&self) -> &WellKnown {
        self.0.session.well_known()
    }

    /// The nearest subject on the chain.
    pub fn subject(&self) -> Option<Subject> {
        let mut link = Some(self);
        while let Some(env) = link {
            if let Some(subject) = env.0.subject {
                return Some(subject);
            }
            link = env.parent();
        }
        None
    }

    /// The nearest import table on the chain.
    pub fn imports(&self) -> Option<&Rc<Imports>> {
        let mut link = Some(self);
        while let Some(env) = link {
            if let Some(imports) = &env.0.imports {
                return Some(imports);
            }
            link = env.parent();
        }
        None
    }

    /// Report an error blamed on the nearest subject.
    pub fn error(&self, span: Span, code: ErrorCode, args: &[DiagnosticArg]) {
        self.report(Diagnostic::error(code), span, args);
    }

    /// Report a warning; warnings do not count against the error limit.
    pub fn warning(&self, span: Span, code: ErrorCode, args: &[DiagnosticArg]) {
        self.report(Diagnostic::warning(code), span, args);
    }

    fn report(&self, diagnostic: Diagnostic, span: Span, args: &[DiagnosticArg]) {
        let diagnostic = diagnostic
            .with_span(span)
            .with_args(args)
            .with_subject(self.subject());
        debug!(code = %diagnostic.code, ?span, "diagnostic");
        self.0.session.report(diagnostic);
    }

    // === Declarations ===

    /// The declaration of the class `name`, created on first mention.
    pub fn class_declaration(&self, name: Symbol) -> Rc<ClassDeclaration> {
        let types = self.types();
        self.0.session.registry().declare(types, types.class_type(name))
    }

    pub fn declaration(&self, id: DeclId) -> Rc<ClassDeclaration> {
        self.0.session.registry().get(id)
    }

    pub(crate) fn type_declaration(&self, ty: TypeId) -> Rc<ClassDeclaration> {
        self.0.session.registry().declare(self.types(), ty)
    }

    /// Package of a declared class, without loading it.
    pub(crate) fn package_of(&self, id: DeclId) -> Symbol {
        self.symbols().qualifier(self.declaration(id).name())
    }

    pub(crate) fn load_definition(&self, decl: &ClassDeclaration) -> Result<(), CompilerError> {
        self.0.session.loader().load_definition(self, decl)
    }

    /// Does a class of this name exist? For an inner name, asks about its
    /// top-level class. Does not load anything.
    pub fn class_exists(&self, name: Symbol) -> bool {
        let symbols = self.symbols();
        let name = symbols.top_name(name);
        let decl = self.class_declaration(name);
        let status = decl.status();
        if status.is_settled() {
            return true;
        }
        if status == ClassStatus::NotFound {
            return false;
        }
        self.0.session.loader().class_exists(symbols.flatten(name))
    }

    pub fn package_exists(&self, package: Symbol) -> bool {
        self.0.session.loader().package_exists(package)
    }

    /// May an on-demand import name this package without it existing?
    pub fn is_exempt_package(&self, package: Symbol) -> bool {
        let text = self.symbols().lookup(package);
        self.config().exempt_packages.iter().any(|p| p == text)
    }

    // === Definitions ===

    pub fn class_definition(&self, name: Symbol) -> Result<Rc<ClassDefinition>, ClassError> {
        self.class_declaration(name).get_definition(self)
    }

    pub fn definition(&self, id: DeclId) -> Result<Rc<ClassDefinition>, ClassError> {
        self.declaration(id).get_definition(self)
    }

    /// Load without running the basic check.
    pub fn definition_no_check(&self, id: DeclId) -> Result<Rc<ClassDefinition>, ClassError> {
        self.declaration(id).get_definition_no_check(self)
    }

    pub(crate) fn type_definition(&self, ty: TypeId) -> Result<Rc<ClassDefinition>, ClassError> {
        self.type_declaration(ty).get_definition(self)
    }

    // === Names ===

    /// Resolve a short name through the nearest import table.
    pub fn resolve(&self, name: Symbol) -> Result<Symbol, ClassError> {
        if let Some(imports) = self.imports() {
            return imports.resolve(self, name);
        }
        if self.symbols().is_qualified(name) || self.class_exists(name) {
            Ok(name)
        } else {
            Err(ClassError::NotFound(name))
        }
    }

    /// Resolve a name without reporting. Ambiguity is folded into the result
    /// with the ambiguous prefix; an unknown short name falls back to the
    /// current package.
    #[tracing::instrument(level = "debug", skip_all, fields(name = self.symbols().lookup(name)))]
    pub fn resolve_name(&self, name: Symbol) -> Result<Symbol, CompilerError> {
        let symbols = self.symbols();
        if symbols.is_qualified(name) {
            let head = self.resolve_name(symbols.head(name))?;
            return self.resolve_with_head(head, name);
        }

        match self.resolve(name) {
            Ok(resolved) => Ok(resolved),
            Err(ClassError::Ambiguous(..)) => Ok(symbols.add_ambiguous_prefix(name)),
            Err(ClassError::NotFound(_)) => Ok(match self.imports() {
                Some(imports) => imports.force_resolve(name),
                None => name,
            }),
            Err(ClassError::Internal(e)) => Err(e),
        }
    }

    /// Finish resolving qualified `name` whose head resolved to `head`.
    /// Class names take precedence over packages.
    pub(crate) fn resolve_with_head(
        &self,
        head: Symbol,
        name: Symbol,
    ) -> Result<Symbol, CompilerError> {
        let symbols = self.symbols();
        if symbols.has_ambiguous_prefix(head) {
            return Ok(head);
        }
        if !self.class_exists(head) {
            return Ok(self.resolve_package_qualified_name(name));
        }
        let tail = symbols.tail(name);
        match self.class_definition(head) {
            Ok(definition) => definition.resolve_inner_class(self, tail),
            Err(ClassError::Internal(e)) => Err(e),
            Err(_) => Ok(symbols.qualify_inner(head, tail)),
        }
    }

    /// Split `name` at the longest prefix naming an existing class; the rest
    /// becomes inner-class components. With no such prefix the name is
    /// returned as written.
    pub fn resolve_package_qualified_name(&self, name: Symbol) -> Symbol {
        let symbols = self.symbols();
        let join = |q: Symbol, n: Symbol| if n.is_empty() { q } else { symbols.qualify(q, n) };

        let mut name = name;
        let mut tail = Symbol::EMPTY;
        while !self.class_exists(name) {
            if !symbols.is_qualified(name) {
                name = join(name, tail);
                tail = Symbol::EMPTY;
                break;
            }
            tail = join(symbols.name(name), tail);
            name = symbols.qualifier(name);
        }
        if tail.is_empty() {
            name
        } else {
            symbols.qualify_inner(name, tail)
        }
    }

    /// The definition named by a resolved, possibly inner, name.
    ///
    /// Each inner hop is checked for access from `context`; `is_extends`
    /// selects the rules for an `extends` or `implements` clause.
    pub fn resolve_qualified_name(
        &self,
        span: Span,
        name: Symbol,
        context: Option<&ClassDefinition>,
        is_extends: bool,
    ) -> Result<Rc<ClassDefinition>, ClassError> {
        let symbols = self.symbols();
        if !symbols.is_inner(name) {
            return self.class_definition(name);
        }

        let mut definition = self.class_definition(symbols.top_name(name))?;
        let mut rest = symbols.tail(symbols.flat_name(name));
        while !rest.is_empty() {
            let component = symbols.head(rest);
            rest = symbols.tail(rest);

            if symbols.lookup(component).starts_with(|c: char| c.is_ascii_digit()) {
                if let Some(local) = definition.local_class(component) {
                    definition = self.definition(local)?;
                    continue;
                }
            } else if let Some(inner) = Self::member_class(&definition, component) {
                let outer_name = definition.name();
                let next = self.definition(inner)?;
                if let Some(ctx) = context {
                    let accessible = if is_extends {
                        ctx.extends_can_access(self, inner)?
                    } else {
                        ctx.can_access_class(self, inner)?
                    };
                    if !accessible {
                        self.error(
                            span,
                            ErrorCode::E1006,
                            &[component.into(), outer_name.into(), ctx.name().into()],
                        );
                    }
                }
                definition = next;
                continue;
            }
            trace!(component = symbols.lookup(component), "inner class not found");
            return Err(ClassError::NotFound(
                symbols.qualify_inner(definition.name(), component),
            ));
        }
        Ok(definition)
    }

    fn member_class(definition: &ClassDefinition, name: Symbol) -> Option<DeclId> {
        definition.members_named(name).find_map(MemberDefinition::inner_class)
    }

    /// Check that every class named in `ty` exists and is accessible from
    /// `context`, reporting what is wrong. Returns `false` when some class
    /// could not be resolved.
    pub fn resolve_type(
        &self,
        span: Span,
        context: &ClassDefinition,
        ty: TypeId,
    ) -> Result<bool, CompilerError> {
        match self.types().data(ty) {
            TypeData::Class(_) => self.resolve_class_type(span, context, ty),
            TypeData::Array(element) => self.resolve_type(span, context, element),
            TypeData::Method { ret, args } => {
                let mut ok = self.resolve_type(span, context, ret)?;
                for &arg in args.iter() {
                    ok &= self.resolve_type(span, context, arg)?;
                }
                Ok(ok)
            }
            _ => Ok(true),
        }
    }

    fn resolve_class_type(
        &self,
        span: Span,
        context: &ClassDefinition,
        ty: TypeId,
    ) -> Result<bool, CompilerError> {
        let symbols = self.symbols();
        let name = self.type_declaration(ty).name();
        let lookup = || -> Result<Rc<ClassDefinition>, ClassError> {
            if !symbols.is_qualified(name) && !symbols.is_inner(name) && !self.class_exists(name) {
                // Surfaces ambiguity between imports
                self.resolve(name)?;
            }
            self.resolve_qualified_name(span, name, Some(context), false)
        };

        match lookup() {
            Ok(definition) => {
                match context.can_access_class(self, definition.decl()) {
                    Ok(false) => self.error(span, ErrorCode::E1003, &[definition.name().into()]),
                    Err(ClassError::Internal(e)) => return Err(e),
                    Ok(true) | Err(_) => {}
                }
                Ok(true)
            }
            Err(ClassError::Ambiguous(first, second)) => {
                self.error(span, ErrorCode::E1002, &[first.into(), second.into()]);
                Ok(false)
            }
            Err(ClassError::NotFound(missing)) => {
                if symbols.is_inner(missing) {
                    let top = symbols.top_name(missing);
                    if self.package_exists(top) {
                        self.error(span, ErrorCode::E1004, &[top.into()]);
                    }
                }
                self.error(
                    span,
                    ErrorCode::E1001,
                    &[missing.into(), DiagnosticArg::Text("type declaration")],
                );
                Ok(false)
            }
            Err(ClassError::Internal(e)) => Err(e),
        }
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("subject", &self.0.subject)
            .field("has_imports", &self.0.imports.is_some())
            .field("depth", &std::iter::successors(Some(self), |e| e.parent()).count())
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
