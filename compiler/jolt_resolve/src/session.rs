//! A compilation session: the shared tables, the class registry, the
//! loader and the diagnostic sink.

use std::cell::RefCell;
use std::rc::Rc;

use jolt_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use jolt_ir::{SharedSymbolTable, Symbol};
use jolt_types::{SharedTypePool, TypeId};

use crate::{ClassLoader, ClassRegistry, Environment, SessionConfig};

/// Names and types the rules refer to directly.
#[derive(Clone, Debug)]
pub struct WellKnown {
    pub java_lang: Symbol,
    pub object: Symbol,
    pub cloneable: Symbol,
    pub serializable: Symbol,
    pub throwable: Symbol,
    pub error: Symbol,
    pub runtime_exception: Symbol,
    /// Name of constructors.
    pub constructor: Symbol,
    /// Name of static initializers.
    pub initializer: Symbol,
    pub object_type: TypeId,
    pub cloneable_type: TypeId,
    pub serializable_type: TypeId,
}

impl WellKnown {
    fn new(types: &SharedTypePool) -> Self {
        let symbols = types.symbols();
        let object = symbols.intern("java.lang.Object");
        let cloneable = symbols.intern("java.lang.Cloneable");
        let serializable = symbols.intern("java.io.Serializable");
        WellKnown {
            java_lang: symbols.intern("java.lang"),
            object,
            cloneable,
            serializable,
            throwable: symbols.intern("java.lang.Throwable"),
            error: symbols.intern("java.lang.Error"),
            runtime_exception: symbols.intern("java.lang.RuntimeException"),
            constructor: symbols.intern("<init>"),
            initializer: symbols.intern("<clinit>"),
            object_type: types.class_type(object),
            cloneable_type: types.class_type(cloneable),
            serializable_type: types.class_type(serializable),
        }
    }
}

pub struct Session {
    symbols: SharedSymbolTable,
    types: SharedTypePool,
    registry: ClassRegistry,
    loader: Box<dyn ClassLoader>,
    diagnostics: RefCell<DiagnosticQueue>,
    config: SessionConfig,
    well_known: WellKnown,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        types: SharedTypePool,
        loader: impl ClassLoader + 'static,
    ) -> Rc<Self> {
        Rc::new(Session {
            symbols: types.symbols().clone(),
            well_known: WellKnown::new(&types),
            diagnostics: RefCell::new(DiagnosticQueue::with_config(config.diagnostics.clone())),
            registry: ClassRegistry::new(),
            loader: Box::new(loader),
            types,
            config,
        })
    }

    /// The outermost environment, with no subject and no imports.
    pub fn env(self: &Rc<Self>) -> Environment {
        Environment::root(Rc::clone(self))
    }

    pub fn symbols(&self) -> &SharedSymbolTable {
        &self.symbols
    }

    pub fn types(&self) -> &SharedTypePool {
        &self.types
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub(crate) fn loader(&self) -> &dyn ClassLoader {
        self.loader.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn well_known(&self) -> &WellKnown {
        &self.well_known
    }

    pub(crate) fn report(&self, diagnostic: Diagnostic) -> bool {
        self.diagnostics.borrow_mut().add(diagnostic)
    }

    /// Drain collected diagnostics, ordered by position.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow_mut().flush()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.borrow().has_errors()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.borrow().error_count()
    }

    /// Has a diagnostic with `code` been reported and not yet taken?
    pub fn reported(&self, code: ErrorCode) -> bool {
        self.diagnostics.borrow().contains(code)
    }
}
