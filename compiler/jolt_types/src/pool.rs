//! Type pool.
//!
//! Interns types by signature behind a single `RwLock`. Lookups take the
//! read lock; a miss re-checks under the write lock before inserting, so a
//! type is never published half-built.

use std::sync::Arc;

use jolt_ir::{SharedSymbolTable, Symbol};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::data::ClassSlot;
use crate::{TypeCode, TypeData, TypeId};

mod format;
mod signature;

pub use signature::SignatureError;

struct Item {
    data: TypeData,
    signature: Arc<str>,
}

struct PoolInner {
    items: Vec<Item>,
    by_signature: FxHashMap<Arc<str>, TypeId>,
    /// Current name of each class type, indexed by `ClassSlot`.
    class_names: Vec<Symbol>,
    /// Every name a class type has been requested under.
    by_class: FxHashMap<Symbol, TypeId>,
}

impl PoolInner {
    fn with_fixed() -> Self {
        let mut inner = PoolInner {
            items: Vec::with_capacity(256),
            by_signature: FxHashMap::default(),
            class_names: Vec::new(),
            by_class: FxHashMap::default(),
        };

        // Order matches the TypeId constants
        let fixed = [
            (TypeData::Boolean, "Z"),
            (TypeData::Byte, "B"),
            (TypeData::Char, "C"),
            (TypeData::Short, "S"),
            (TypeData::Int, "I"),
            (TypeData::Long, "J"),
            (TypeData::Float, "F"),
            (TypeData::Double, "D"),
            (TypeData::Void, "V"),
            (TypeData::Null, "*"),
            (TypeData::Error, "?"),
            (TypeData::Package, "."),
        ];
        for (data, signature) in fixed {
            inner.push(data, Arc::from(signature));
        }
        debug_assert_eq!(inner.items.len(), TypeId::FIRST_DYNAMIC as usize);

        inner
    }

    fn push(&mut self, data: TypeData, signature: Arc<str>) -> TypeId {
        #[allow(clippy::cast_possible_truncation)]
        let id = TypeId::from_raw(self.items.len() as u32);
        self.by_signature.insert(Arc::clone(&signature), id);
        self.items.push(Item { data, signature });
        id
    }

    fn new_class(&mut self, name: Symbol, signature: Arc<str>) -> TypeId {
        #[allow(clippy::cast_possible_truncation)]
        let slot = ClassSlot(self.class_names.len() as u32);
        self.class_names.push(name);
        self.push(TypeData::Class(slot), signature)
    }
}

/// Thread-safe interned type lattice.
pub struct TypePool {
    inner: RwLock<PoolInner>,
    symbols: SharedSymbolTable,
}

impl TypePool {
    /// Create a pool with the fixed types pre-interned.
    pub fn new(symbols: SharedSymbolTable) -> Self {
        TypePool {
            inner: RwLock::new(PoolInner::with_fixed()),
            symbols,
        }
    }

    pub fn symbols(&self) -> &SharedSymbolTable {
        &self.symbols
    }

    /// Number of interned types, fixed types included.
    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Intern under `signature`, building the data only on a miss.
    fn intern_with(&self, signature: String, data: impl FnOnce() -> TypeData) -> TypeId {
        if let Some(&id) = self.inner.read().by_signature.get(signature.as_str()) {
            return id;
        }
        let mut inner = self.inner.write();
        if let Some(&id) = inner.by_signature.get(signature.as_str()) {
            return id;
        }
        inner.push(data(), Arc::from(signature))
    }

    // === Construction ===

    pub fn array(&self, element: TypeId) -> TypeId {
        let signature = format!("[{}", self.signature(element));
        self.intern_with(signature, || TypeData::Array(element))
    }

    pub fn method(&self, ret: TypeId, args: &[TypeId]) -> TypeId {
        let mut signature = String::from("(");
        for &arg in args {
            signature.push_str(&self.signature(arg));
        }
        signature.push(')');
        signature.push_str(&self.signature(ret));
        self.intern_with(signature, || TypeData::Method {
            ret,
            args: args.into(),
        })
    }

    /// The class type named `name`.
    ///
    /// An inner-class name is looked up through its classfile spelling; if
    /// that type is currently known under another name, it is renamed to
    /// `name`.
    pub fn class_type(&self, name: Symbol) -> TypeId {
        if self.symbols.is_inner(name) {
            let ty = self.class_type(self.symbols.flatten(name));
            self.rename_class(ty, name);
            return ty;
        }

        if let Some(&id) = self.inner.read().by_class.get(&name) {
            return id;
        }

        let signature: Arc<str> = Arc::from(signature::class_signature(self.symbols.lookup(name)));
        let mut inner = self.inner.write();
        if let Some(&id) = inner.by_class.get(&name) {
            return id;
        }
        let id = match inner.by_signature.get(&signature) {
            Some(&id) => id,
            None => inner.new_class(name, signature),
        };
        inner.by_class.insert(name, id);
        id
    }

    fn rename_class(&self, ty: TypeId, name: Symbol) {
        {
            let inner = self.inner.read();
            if let TypeData::Class(slot) = inner.items[ty.index()].data {
                if inner.class_names[slot.0 as usize] == name
                    && inner.by_class.get(&name) == Some(&ty)
                {
                    trace!(?ty, "class type already under source name");
                    return;
                }
            }
        }

        let mut inner = self.inner.write();
        if let TypeData::Class(slot) = inner.items[ty.index()].data {
            let old = std::mem::replace(&mut inner.class_names[slot.0 as usize], name);
            if old != name {
                debug!(
                    old = self.symbols.lookup(old),
                    new = self.symbols.lookup(name),
                    "renaming class type"
                );
            }
            inner.by_class.insert(name, ty);
        }
    }

    // === Queries ===

    /// Snapshot of a type's representation.
    pub fn data(&self, id: TypeId) -> TypeData {
        self.inner.read().items[id.index()].data.clone()
    }

    pub fn code(&self, id: TypeId) -> TypeCode {
        self.inner.read().items[id.index()].data.code()
    }

    /// Canonical classfile signature.
    pub fn signature(&self, id: TypeId) -> Arc<str> {
        Arc::clone(&self.inner.read().items[id.index()].signature)
    }

    /// Current name of a class type; `None` for every other type.
    pub fn class_name(&self, id: TypeId) -> Option<Symbol> {
        let inner = self.inner.read();
        match inner.items[id.index()].data {
            TypeData::Class(slot) => Some(inner.class_names[slot.0 as usize]),
            _ => None,
        }
    }

    pub fn element_type(&self, id: TypeId) -> Option<TypeId> {
        match self.inner.read().items[id.index()].data {
            TypeData::Array(element) => Some(element),
            _ => None,
        }
    }

    pub fn return_type(&self, id: TypeId) -> Option<TypeId> {
        match self.inner.read().items[id.index()].data {
            TypeData::Method { ret, .. } => Some(ret),
            _ => None,
        }
    }

    pub fn argument_types(&self, id: TypeId) -> Option<Box<[TypeId]>> {
        match &self.inner.read().items[id.index()].data {
            TypeData::Method { args, .. } => Some(args.clone()),
            _ => None,
        }
    }

    /// Do two method types take the same arguments? Return types are ignored.
    pub fn equal_arguments(&self, a: TypeId, b: TypeId) -> bool {
        let inner = self.inner.read();
        match (&inner.items[a.index()].data, &inner.items[b.index()].data) {
            (TypeData::Method { args: lhs, .. }, TypeData::Method { args: rhs, .. }) => {
                a == b || lhs == rhs
            }
            _ => false,
        }
    }

    /// Operand stack slots: 0 for void, 2 for long and double, the argument
    /// total for methods, 1 otherwise.
    pub fn stack_size(&self, id: TypeId) -> u32 {
        match self.data(id) {
            TypeData::Void | TypeData::Error | TypeData::Package => 0,
            TypeData::Long | TypeData::Double => 2,
            TypeData::Method { args, .. } => args.iter().map(|&arg| self.stack_size(arg)).sum(),
            _ => 1,
        }
    }

    /// Offset selecting the typed variant of an instruction family:
    /// 0 int-like, 1 long, 2 float, 3 double, 4 reference.
    pub fn type_code_offset(&self, id: TypeId) -> Option<u8> {
        match self.code(id) {
            TypeCode::Boolean
            | TypeCode::Byte
            | TypeCode::Char
            | TypeCode::Short
            | TypeCode::Int => Some(0),
            TypeCode::Long => Some(1),
            TypeCode::Float => Some(2),
            TypeCode::Double => Some(3),
            TypeCode::Null | TypeCode::Array | TypeCode::Class => Some(4),
            TypeCode::Void | TypeCode::Method | TypeCode::Error | TypeCode::Package => None,
        }
    }
}

/// Shared type pool handle.
#[derive(Clone)]
pub struct SharedTypePool(Arc<TypePool>);

impl SharedTypePool {
    pub fn new(symbols: SharedSymbolTable) -> Self {
        SharedTypePool(Arc::new(TypePool::new(symbols)))
    }
}

impl std::ops::Deref for SharedTypePool {
    type Target = TypePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
