//! Import table of one compilation unit.
//!
//! Imports are collected while the unit is parsed and checked lazily, on the
//! first short-name lookup or an explicit [`Imports::resolve_imports`]. After
//! the check the table is frozen.

use std::cell::{Cell, RefCell};

use jolt_diagnostic::{DiagnosticArg, ErrorCode};
use jolt_ir::{SharedSymbolTable, Span, Symbol};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::{ClassError, CompilerError, Environment, Resolution};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum CheckState {
    Unchecked,
    InProgress,
    Checked,
}

#[derive(Copy, Clone, Debug)]
struct ImportSpec {
    name: Symbol,
    span: Span,
}

struct ImportState {
    checked: CheckState,
    /// On-demand imports; after checking, packages or bare-marker class names.
    packages: Vec<ImportSpec>,
    singles: Vec<ImportSpec>,
    /// Short name to full name, from single imports and earlier lookups.
    classes: FxHashMap<Symbol, Symbol>,
}

pub struct Imports {
    symbols: SharedSymbolTable,
    current_package: Cell<Symbol>,
    current_package_span: Cell<Span>,
    state: RefCell<ImportState>,
}

impl Imports {
    /// An empty table holding the configured implicit imports.
    pub fn new(env: &Environment) -> Self {
        let symbols = env.symbols().clone();
        let packages = env
            .config()
            .implicit_imports
            .iter()
            .map(|package| ImportSpec {
                name: symbols.intern(package),
                span: Span::DUMMY,
            })
            .collect();
        Imports {
            symbols,
            current_package: Cell::new(Symbol::EMPTY),
            current_package_span: Cell::new(Span::DUMMY),
            state: RefCell::new(ImportState {
                checked: CheckState::Unchecked,
                packages,
                singles: Vec::new(),
                classes: FxHashMap::default(),
            }),
        }
    }

    fn ensure_open(&self) -> Result<(), CompilerError> {
        if self.state.borrow().checked == CheckState::Unchecked {
            Ok(())
        } else {
            Err(CompilerError::ImportsFrozen)
        }
    }

    pub fn set_current_package(&self, package: Symbol, span: Span) -> Result<(), CompilerError> {
        self.ensure_open()?;
        self.current_package.set(package);
        self.current_package_span.set(span);
        Ok(())
    }

    /// Add `import package.*`. Repeats and the current package are ignored.
    pub fn add_package(&self, package: Symbol, span: Span) -> Result<(), CompilerError> {
        self.ensure_open()?;
        if package == self.current_package.get() {
            return Ok(());
        }
        let mut state = self.state.borrow_mut();
        if state.packages.iter().any(|p| p.name == package) {
            return Ok(());
        }
        state.packages.push(ImportSpec { name: package, span });
        Ok(())
    }

    /// Add `import name;`.
    pub fn add_class(&self, name: Symbol, span: Span) -> Result<(), CompilerError> {
        self.ensure_open()?;
        self.state.borrow_mut().singles.push(ImportSpec { name, span });
        Ok(())
    }

    pub fn current_package(&self) -> Symbol {
        self.current_package.get()
    }

    pub fn current_package_span(&self) -> Span {
        self.current_package_span.get()
    }

    pub fn imported_packages(&self) -> Vec<Symbol> {
        self.state.borrow().packages.iter().map(|p| p.name).collect()
    }

    /// Single-type imports, as written.
    pub fn imported_classes(&self) -> Vec<Symbol> {
        self.state.borrow().singles.iter().map(|p| p.name).collect()
    }

    pub fn is_checked(&self) -> bool {
        self.state.borrow().checked == CheckState::Checked
    }

    /// Does `name` denote an existing class? For an inner name, the nest
    /// must be declared literally in its top-level class.
    pub fn importable(env: &Environment, name: Symbol) -> Result<bool, CompilerError> {
        let symbols = env.symbols();
        if !symbols.is_inner(name) {
            return Ok(env.class_exists(name));
        }
        let top = symbols.top_name(name);
        if !env.class_exists(top) {
            return Ok(false);
        }
        let nest = symbols.tail(symbols.flat_name(name));
        let exists = env
            .class_declaration(top)
            .get_definition_no_check(env)
            .and_then(|definition| definition.inner_class_exists(env, nest));
        match exists {
            Ok(exists) => Ok(exists),
            Err(ClassError::Internal(e)) => Err(e),
            Err(_) => Ok(false),
        }
    }

    /// Check every import once, normalizing on-demand imports of classes and
    /// filling the short-name table from single imports.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn resolve_imports(&self, env: &Environment) -> Result<(), CompilerError> {
        {
            let mut state = self.state.borrow_mut();
            if state.checked != CheckState::Unchecked {
                return Ok(());
            }
            state.checked = CheckState::InProgress;
        }

        let packages = self.state.borrow().packages.clone();
        let mut resolved = Vec::with_capacity(packages.len());
        for spec in packages {
            resolved.push(ImportSpec {
                name: self.resolve_package_import(env, spec)?,
                span: spec.span,
            });
        }
        self.state.borrow_mut().packages = resolved;

        let singles = self.state.borrow().singles.clone();
        for spec in singles {
            self.resolve_single_import(env, spec)?;
        }

        self.state.borrow_mut().checked = CheckState::Checked;
        debug!("imports checked");
        Ok(())
    }

    fn resolve_package_import(
        &self,
        env: &Environment,
        spec: ImportSpec,
    ) -> Result<Symbol, CompilerError> {
        let symbols = env.symbols();
        let name = spec.name;
        if env.is_exempt_package(name) {
            return Ok(name);
        }

        let resolved = env.resolve_package_qualified_name(name);
        if Self::importable(env, resolved)? {
            let top = symbols.top_name(resolved);
            if env.package_exists(top) {
                env.error(spec.span, ErrorCode::E1004, &[top.into()]);
            }
            // Members of a class are imported through the bare marker form
            if symbols.is_inner(resolved) {
                return Ok(resolved);
            }
            return Ok(symbols.qualify_inner(resolved, Symbol::EMPTY));
        }

        if !env.package_exists(name) {
            env.error(
                spec.span,
                ErrorCode::E1005,
                &[name.into(), DiagnosticArg::Text("import")],
            );
        } else if symbols.is_inner(resolved) {
            env.error(spec.span, ErrorCode::E1004, &[symbols.top_name(resolved).into()]);
        }
        Ok(name)
    }

    fn resolve_single_import(
        &self,
        env: &Environment,
        spec: ImportSpec,
    ) -> Result<(), CompilerError> {
        let symbols = env.symbols();
        let name = env.resolve_package_qualified_name(spec.name);
        let exists = env.class_exists(symbols.top_name(name));
        if !exists {
            env.error(
                spec.span,
                ErrorCode::E1001,
                &[name.into(), DiagnosticArg::Text("import")],
            );
        }

        let short = symbols.name(symbols.flat_name(name));
        let canonical = |n: Symbol| symbols.qualify(symbols.qualifier(n), symbols.flat_name(n));
        let previous = self.state.borrow_mut().classes.insert(short, name);
        if let Some(previous) = previous {
            if canonical(previous) != canonical(name) {
                env.error(spec.span, ErrorCode::E1002, &[name.into(), previous.into()]);
            }
        }
        if !exists {
            return Ok(());
        }

        // Every class on the way to an inner import must be visible here
        let definition = match env.class_declaration(name).get_definition_no_check(env) {
            Ok(definition) => definition,
            Err(ClassError::NotFound(missing)) => {
                env.error(
                    spec.span,
                    ErrorCode::E1001,
                    &[missing.into(), DiagnosticArg::Text("import")],
                );
                return Ok(());
            }
            Err(ClassError::Ambiguous(first, second)) => {
                env.error(spec.span, ErrorCode::E1002, &[first.into(), second.into()]);
                return Ok(());
            }
            Err(ClassError::Internal(e)) => return Err(e),
        };
        let imported_package = definition.package();
        let mut current = Some(definition);
        while let Some(definition) = current {
            if definition.is_private()
                || !(definition.is_public() || imported_package == self.current_package.get())
            {
                env.error(spec.span, ErrorCode::E1003, &[definition.name().into()]);
                break;
            }
            current = match definition.outer_class() {
                Some(outer) => match env.definition_no_check(outer) {
                    Ok(outer) => Some(outer),
                    Err(ClassError::Internal(e)) => return Err(e),
                    Err(_) => None,
                },
                None => None,
            };
        }
        Ok(())
    }

    /// Look a name up: the current package first, then on-demand imports.
    #[tracing::instrument(level = "debug", skip_all, fields(name = env.symbols().lookup(name)))]
    pub fn lookup(&self, env: &Environment, name: Symbol) -> Result<Resolution, CompilerError> {
        let symbols = env.symbols();
        let name = symbols.remove_ambiguous_prefix(name);
        if symbols.is_qualified(name) {
            return Ok(Resolution::Found(name));
        }

        if self.state.borrow().checked == CheckState::Unchecked {
            self.resolve_imports(env)?;
        }
        if let Some(&found) = self.state.borrow().classes.get(&name) {
            trace!("import memo hit");
            return Ok(Resolution::Found(found));
        }

        let mut found = None;
        let local = symbols.qualify(self.current_package.get(), name);
        if Self::importable(env, local)? {
            found = Some(local);
        } else {
            let packages = self.state.borrow().packages.clone();
            for spec in packages {
                let candidate = symbols.qualify(spec.name, name);
                if !Self::importable(env, candidate)? {
                    continue;
                }
                match found {
                    None => found = Some(candidate),
                    Some(first) if first != candidate => {
                        return Ok(Resolution::Ambiguous(first, candidate));
                    }
                    Some(_) => {}
                }
            }
        }

        match found {
            Some(found) => {
                self.state.borrow_mut().classes.insert(name, found);
                Ok(Resolution::Found(found))
            }
            None => Ok(Resolution::NotFound(name)),
        }
    }

    pub fn resolve(&self, env: &Environment, name: Symbol) -> Result<Symbol, ClassError> {
        self.lookup(env, name)?.into_result()
    }

    /// Resolve a short name that is known to fail, without failing: the
    /// name is taken to be in the current package, and remembered so.
    pub fn force_resolve(&self, name: Symbol) -> Symbol {
        if self.symbols.is_qualified(name) {
            return name;
        }
        let mut state = self.state.borrow_mut();
        if let Some(&found) = state.classes.get(&name) {
            return found;
        }
        let found = self.symbols.qualify(self.current_package.get(), name);
        state.classes.insert(name, found);
        found
    }
}

impl std::fmt::Debug for Imports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Imports")
            .field("current_package", &self.current_package.get())
            .field("checked", &state.checked)
            .field("packages", &state.packages.len())
            .field("singles", &state.singles.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
