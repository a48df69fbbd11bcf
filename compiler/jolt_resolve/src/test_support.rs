//! Fixtures shared by the unit tests.

use std::cell::Cell;
use std::rc::Rc;

use jolt_ir::{Modifiers, SharedSymbolTable, Symbol};
use jolt_types::{SharedTypePool, TypeId};

use crate::{
    ClassDeclaration, ClassInfo, ClassLoader, CompilerError, Environment, MemoryLoader, Session,
    SessionConfig,
};

/// Builds a session over in-memory class stubs, bootstrap classes included.
pub(crate) struct Fixture {
    pub symbols: SharedSymbolTable,
    pub types: SharedTypePool,
    pub loader: MemoryLoader,
    pub config: SessionConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let symbols = SharedSymbolTable::new();
        let types = SharedTypePool::new(symbols.clone());
        let mut loader = MemoryLoader::new(symbols.clone());
        loader.add_bootstrap_classes();
        Fixture {
            symbols,
            types,
            loader,
            config: SessionConfig::unlimited(),
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
    pub fn info(&self, name: &str) -> ClassInfo {
        ClassInfo::new(self.sym(name))
            .with_modifiers(Modifiers::PUBLIC)
            .extends(self.sym("java.lang.Object"))
    }

    /// A public interface.
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

    pub fn build(self) -> (Rc<Session>, Environment) {
        let session = Session::new(self.config, self.types, self.loader);
        let env = session.env();
        (session, env)
    }

    /// Build with a loader that counts its calls.
    pub fn build_counting(self) -> (Rc<Session>, Environment, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let loader = CountingLoader {
            inner: self.loader,
            calls: Rc::clone(&calls),
        };
        let session = Session::new(self.config, self.types, loader);
        let env = session.env();
        (session, env, calls)
    }
}

struct CountingLoader {
    inner: MemoryLoader,
    calls: Rc<Cell<usize>>,
}

impl ClassLoader for CountingLoader {
    fn load_definition(
        &self,
        env: &Environment,
        decl: &ClassDeclaration,
    ) -> Result<(), CompilerError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.load_definition(env, decl)
    }

    fn class_exists(&self, name: Symbol) -> bool {
        self.inner.class_exists(name)
    }

    fn package_exists(&self, package: Symbol) -> bool {
        self.inner.package_exists(package)
    }
}
