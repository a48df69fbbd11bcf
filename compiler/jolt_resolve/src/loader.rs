//! The seam between resolution and whatever reads classes.
//!
//! A [`ClassLoader`] decides, one step per call, whether a declaration is
//! backed by a binary form, a source form, or nothing. The declaration
//! re-examines its status after every call, so a loader may take several
//! steps (`Undefined -> Undecided -> Source -> Parsed`).

use std::rc::Rc;

use jolt_ir::{Modifiers, SharedSymbolTable, Symbol};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::{
    ClassDeclaration, ClassDefinition, ClassInfo, ClassStatus, CompilerError, Environment, Origin,
};

/// Source of class definitions.
pub trait ClassLoader {
    /// Advance `decl` by at least one status step.
    fn load_definition(
        &self,
        env: &Environment,
        decl: &ClassDeclaration,
    ) -> Result<(), CompilerError>;

    /// Is there any form of the top-level class `name`, loaded or not?
    fn class_exists(&self, name: Symbol) -> bool;

    fn package_exists(&self, package: Symbol) -> bool;
}

#[derive(Default)]
struct Entry {
    binary: Option<ClassInfo>,
    source: Option<ClassInfo>,
}

/// Loader over class stubs held in memory.
///
/// Stubs are keyed by their classfile spelling, so `p.Outer. Inner` and
/// `p.Outer$Inner` find the same entry. When both forms of a class exist the
/// source form wins.
pub struct MemoryLoader {
    symbols: SharedSymbolTable,
    classes: FxHashMap<Symbol, Entry>,
    packages: FxHashSet<Symbol>,
}

impl MemoryLoader {
    pub fn new(symbols: SharedSymbolTable) -> Self {
        MemoryLoader {
            symbols,
            classes: FxHashMap::default(),
            packages: FxHashSet::default(),
        }
    }

    fn entry(&mut self, name: Symbol) -> &mut Entry {
        let mut package = self.symbols.qualifier(name);
        while !package.is_empty() {
            self.packages.insert(package);
            package = self.symbols.qualifier(package);
        }
        let key = self.symbols.flatten(name);
        self.classes.entry(key).or_default()
    }

    /// Register a compiled form.
    pub fn add_binary(&mut self, info: ClassInfo) -> &mut Self {
        let name = info.name();
        self.entry(name).binary = Some(info);
        self
    }

    /// Register a source form.
    pub fn add_source(&mut self, info: ClassInfo) -> &mut Self {
        let name = info.name();
        self.entry(name).source = Some(info);
        self
    }

    /// Register an empty package, one holding no classes yet.
    pub fn add_package(&mut self, package: Symbol) -> &mut Self {
        let mut package = package;
        while !package.is_empty() {
            self.packages.insert(package);
            package = self.symbols.qualifier(package);
        }
        self
    }

    /// Register binary forms of the classes every hierarchy bottoms out in.
    pub fn add_bootstrap_classes(&mut self) -> &mut Self {
        let s = self.symbols.clone();
        let object = s.intern("java.lang.Object");
        let throwable = s.intern("java.lang.Throwable");
        let exception = s.intern("java.lang.Exception");
        let serializable = s.intern("java.io.Serializable");
        let public = Modifiers::PUBLIC;
        let interface = Modifiers::PUBLIC | Modifiers::INTERFACE | Modifiers::ABSTRACT;

        self.add_binary(ClassInfo::new(object).with_modifiers(public))
            .add_binary(ClassInfo::new(s.intern("java.lang.Cloneable")).with_modifiers(interface))
            .add_binary(ClassInfo::new(serializable).with_modifiers(interface))
            .add_binary(
                ClassInfo::new(s.intern("java.lang.String"))
                    .with_modifiers(public | Modifiers::FINAL)
                    .extends(object)
                    .implements(serializable),
            )
            .add_binary(
                ClassInfo::new(throwable)
                    .with_modifiers(public)
                    .extends(object)
                    .implements(serializable),
            )
            .add_binary(
                ClassInfo::new(exception)
                    .with_modifiers(public)
                    .extends(throwable),
            )
            .add_binary(
                ClassInfo::new(s.intern("java.lang.Error"))
                    .with_modifiers(public)
                    .extends(throwable),
            )
            .add_binary(
                ClassInfo::new(s.intern("java.lang.RuntimeException"))
                    .with_modifiers(public)
                    .extends(exception),
            )
    }

    fn define(
        env: &Environment,
        decl: &ClassDeclaration,
        info: &ClassInfo,
        origin: Origin,
    ) -> Result<(), CompilerError> {
        let definition = ClassDefinition::from_info(env, info, origin);
        let status = match origin {
            Origin::Binary => ClassStatus::Binary,
            Origin::Source => ClassStatus::Parsed,
        };
        decl.set_definition(Rc::new(definition), status)
    }
}

impl ClassLoader for MemoryLoader {
    fn load_definition(
        &self,
        env: &Environment,
        decl: &ClassDeclaration,
    ) -> Result<(), CompilerError> {
        let key = self.symbols.flatten(decl.name());
        let entry = self.classes.get(&key);
        debug!(
            class = self.symbols.lookup(key),
            status = ?decl.status(),
            found = entry.is_some(),
            "load definition"
        );

        match (decl.status(), entry) {
            (ClassStatus::Undefined, Some(Entry { binary: Some(_), source: Some(_) })) => {
                decl.set_status(ClassStatus::Undecided)
            }
            (ClassStatus::Undefined, Some(Entry { binary: Some(info), source: None })) => {
                Self::define(env, decl, info, Origin::Binary)
            }
            (ClassStatus::Undefined, Some(Entry { binary: None, source: Some(_) }))
            | (ClassStatus::Undecided, _) => decl.set_status(ClassStatus::Source),
            (ClassStatus::Source, Some(Entry { source: Some(info), .. })) => {
                Self::define(env, decl, info, Origin::Source)
            }
            (ClassStatus::Undefined | ClassStatus::Source, _) => decl.set_not_found(),
            // Settled or not found; the declaration reports the stall.
            _ => Ok(()),
        }
    }

    fn class_exists(&self, name: Symbol) -> bool {
        self.classes.contains_key(&self.symbols.flatten(name))
    }

    fn package_exists(&self, package: Symbol) -> bool {
        self.packages.contains(&package)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
