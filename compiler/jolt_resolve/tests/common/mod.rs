//! Shared setup for the integration tests: a session over in-memory stubs.

#![allow(dead_code, reason = "not every test file uses every helper")]

use std::rc::Rc;

use jolt_diagnostic::ErrorCode;
use jolt_ir::{Modifiers, SharedSymbolTable, Symbol};
use jolt_resolve::{ClassInfo, Environment, Imports, MemoryLoader, Session, SessionConfig};
use jolt_types::{SharedTypePool, TypeId};

pub struct World {
    pub symbols: SharedSymbolTable,
    pub types: SharedTypePool,
    pub loader: MemoryLoader,
}

impl World {
    pub fn new() -> Self {
        jolt_resolve::init_tracing();
        let symbols = SharedSymbolTable::new();
        let types = SharedTypePool::new(symbols.clone());
        let mut loader = MemoryLoader::new(symbols.clone());
        loader.add_bootstrap_classes();
        World {
            symbols,
            types,
            loader,
        }
    }

    pub fn sym(&self, text: &str) -> Symbol {
        self.symbols.intern(text)
    }

    pub fn class_type(&self, name: &str) -> TypeId {
        self.types.class_type(self.sym(name))
    }

    pub fn method_type(&self, ret: TypeId, args: &[TypeId]) -> TypeId {
        self.types.method(ret, args)
    }

    /// A public class extending `java.lang.Object`.
    pub fn class(&self, name: &str) -> ClassInfo {
        ClassInfo::new(self.sym(name))
            .with_modifiers(Modifiers::PUBLIC)
            .extends(self.sym("java.lang.Object"))
    }

    pub fn interface(&self, name: &str) -> ClassInfo {
        ClassInfo::new(self.sym(name))
            .with_modifiers(Modifiers::PUBLIC | Modifiers::INTERFACE | Modifiers::ABSTRACT)
    }

    pub fn binary(&mut self, info: ClassInfo) -> &mut Self {
        self.loader.add_binary(info);
        self
    }

    pub fn source(&mut self, info: ClassInfo) -> &mut Self {
        self.loader.add_source(info);
        self
    }

    pub fn start(self) -> (Rc<Session>, Environment) {
        let session = Session::new(SessionConfig::unlimited(), self.types, self.loader);
        let env = session.env();
        (session, env)
    }
}

/// An environment for a compilation unit in `package` with the given
/// on-demand imports.
pub fn unit(env: &Environment, package: &str, on_demand: &[&str]) -> Environment {
    let symbols = env.symbols();
    let imports = Imports::new(env);
    imports
        .set_current_package(symbols.intern(package), jolt_ir::Span::DUMMY)
        .unwrap();
    for name in on_demand {
        imports
            .add_package(symbols.intern(name), jolt_ir::Span::DUMMY)
            .unwrap();
    }
    env.with_imports(Rc::new(imports))
}

/// Codes of the diagnostics reported so far, in source order.
pub fn codes(session: &Session) -> Vec<ErrorCode> {
    session.take_diagnostics().iter().map(|d| d.code).collect()
}
