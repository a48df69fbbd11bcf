//! Sharded symbol table.
//!
//! Canonicalizes every name so that equal text yields an identical `Symbol`,
//! and answers structural questions about qualified and inner-class names.
//!
//! # Name shapes
//!
//! ```text
//! java.util.Map          package-qualified class
//! java.util.Map. Entry   inner class: the marker (a space) opens the class nest
//! java.util.Map. Entry.X deeper nesting: the marker is never repeated
//! java.util.Map$Entry    classfile (mangled) spelling of the same class
//! <Entry                 "resolving this name was ambiguous"
//! ```
//!
//! The qualifier of an inner name is its package, not its enclosing class:
//! `qualifier("p.Outer. Inner") == "p"` and `name(..) == "Outer. Inner"`.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHasher};

use crate::Symbol;

/// Separator that opens the class nest of an inner-class name.
pub const INNER_MARKER: char = ' ';

/// Prefix tagging a name whose resolution was found ambiguous.
pub const AMBIGUOUS_PREFIX: char = '<';

/// Separator used by the classfile spelling of nested classes.
pub const MANGLED_SEPARATOR: char = '$';

/// Qualifier cache value meaning "not computed yet".
const QUALIFIER_UNKNOWN: u32 = u32::MAX;

/// Error when interning a name fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Shard exceeded capacity.
    ShardOverflow { shard_idx: usize, count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::ShardOverflow { shard_idx, count } => write!(
                f,
                "symbol table shard {} exceeded capacity: {} names, max is {}",
                shard_idx,
                count,
                Symbol::MAX_LOCAL
            ),
        }
    }
}

impl std::error::Error for InternError {}

struct SymbolEntry {
    text: &'static str,
    /// Raw qualifier symbol; equal to the entry's own raw value when the name
    /// is unqualified.
    qualifier: AtomicU32,
}

struct SymbolShard {
    map: FxHashMap<&'static str, u32>,
    entries: Vec<SymbolEntry>,
}

impl SymbolShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            entries: Vec::with_capacity(256),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        let empty: &'static str = "";
        shard.map.insert(empty, 0);
        shard.entries.push(SymbolEntry {
            text: empty,
            qualifier: AtomicU32::new(Symbol::EMPTY.raw()),
        });
        shard
    }
}

/// Thread-safe symbol table.
///
/// Interning is a single critical section per shard: a caller never observes
/// a half-inserted entry. Structural queries (`qualifier`, `flat_name`, ...)
/// intern their results, so every answer is itself a canonical `Symbol`.
pub struct SymbolTable {
    shards: [RwLock<SymbolShard>; Symbol::NUM_SHARDS],
    total_count: AtomicUsize,
}

impl SymbolTable {
    /// Create a new table with the names every session needs pre-interned.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(SymbolShard::with_empty())
            } else {
                RwLock::new(SymbolShard::new())
            }
        });

        let table = Self {
            shards,
            total_count: AtomicUsize::new(1),
        };
        table.pre_intern_well_known();
        table
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        #[allow(clippy::cast_possible_truncation)]
        let hash = hasher.finish() as usize;
        hash % Symbol::NUM_SHARDS
    }

    /// Try to intern a name, returning its Symbol or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Symbol, InternError> {
        if s.is_empty() {
            return Ok(Symbol::EMPTY);
        }
        let shard_idx = Self::shard_for(s);
        #[allow(clippy::cast_possible_truncation)]
        let shard_idx_u32 = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        // Fast path: already interned
        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(s) {
                return Ok(Symbol::new(shard_idx_u32, local));
            }
        }

        let mut guard = shard.write();

        // Double-check after acquiring write lock
        if let Some(&local) = guard.map.get(s) {
            return Ok(Symbol::new(shard_idx_u32, local));
        }

        let local = u32::try_from(guard.entries.len())
            .ok()
            .filter(|&local| local <= Symbol::MAX_LOCAL)
            .ok_or(InternError::ShardOverflow {
                shard_idx,
                count: guard.entries.len(),
            })?;

        // Names live for the whole process; leaking gives them a 'static lifetime.
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        guard.entries.push(SymbolEntry {
            text: leaked,
            qualifier: AtomicU32::new(QUALIFIER_UNKNOWN),
        });
        guard.map.insert(leaked, local);

        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(Symbol::new(shard_idx_u32, local))
    }

    /// Intern a name.
    ///
    /// # Panics
    /// Panics if a shard exceeds capacity (over 268 million names).
    #[inline]
    pub fn intern(&self, s: &str) -> Symbol {
        self.try_intern(s).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Look up the text of a symbol.
    pub fn lookup(&self, sym: Symbol) -> &'static str {
        let guard = self.shards[sym.shard()].read();
        guard.entries[sym.local()].text
    }

    /// Number of interned names (O(1)).
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Check if the table only holds the empty name.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    fn pre_intern_well_known(&self) {
        const WELL_KNOWN: &[&str] = &[
            "java",
            "java.lang",
            "java.io",
            "java.lang.Object",
            "java.lang.String",
            "java.lang.Cloneable",
            "java.io.Serializable",
            "java.lang.Throwable",
            "java.lang.Exception",
            "java.lang.Error",
            "java.lang.RuntimeException",
            "<init>",
            "<clinit>",
        ];

        for name in WELL_KNOWN {
            self.intern(name);
        }
    }

    // === Qualification ===

    fn cached_qualifier(&self, sym: Symbol) -> Option<u32> {
        let guard = self.shards[sym.shard()].read();
        let raw = guard.entries[sym.local()].qualifier.load(Ordering::Relaxed);
        (raw != QUALIFIER_UNKNOWN).then_some(raw)
    }

    fn cache_qualifier(&self, sym: Symbol, qualifier: Symbol) {
        let guard = self.shards[sym.shard()].read();
        guard.entries[sym.local()]
            .qualifier
            .store(qualifier.raw(), Ordering::Relaxed);
    }

    /// Byte length of the qualifier prefix, if the name has one.
    ///
    /// Dots after the inner marker separate nested classes, not packages, so
    /// the search stops before the dot that precedes the marker.
    fn qualifier_len(text: &str) -> Option<usize> {
        let limit = match text.find(INNER_MARKER) {
            Some(ipos) if ipos > 0 => {
                if text[..ipos].ends_with('.') {
                    ipos - 1
                } else {
                    ipos
                }
            }
            _ => text.len(),
        };
        text[..limit].rfind('.')
    }

    /// The prefix before the last package separator, or `Symbol::EMPTY`.
    pub fn qualifier(&self, sym: Symbol) -> Symbol {
        if let Some(raw) = self.cached_qualifier(sym) {
            return if raw == sym.raw() {
                Symbol::EMPTY
            } else {
                Symbol::from_raw(raw)
            };
        }

        let text = self.lookup(sym);
        let (qualifier, cached) = match Self::qualifier_len(text) {
            Some(len) => {
                let q = self.intern(&text[..len]);
                (q, q)
            }
            None => (Symbol::EMPTY, sym),
        };
        self.cache_qualifier(sym, cached);
        qualifier
    }

    pub fn is_qualified(&self, sym: Symbol) -> bool {
        Self::qualifier_len(self.lookup(sym)).is_some()
    }

    /// The unqualified part of a name: `name("a.b.C") == "C"`,
    /// `name("p.Outer. Inner") == "Outer. Inner"`.
    pub fn name(&self, sym: Symbol) -> Symbol {
        let text = self.lookup(sym);
        match Self::qualifier_len(text) {
            Some(len) => self.intern(&text[len + 1..]),
            None => sym,
        }
    }

    /// The first component: `head("a.b.C") == "a"`.
    pub fn head(&self, sym: Symbol) -> Symbol {
        let mut id = sym;
        while self.is_qualified(id) {
            id = self.qualifier(id);
        }
        id
    }

    /// Everything after the first component, or `Symbol::EMPTY`.
    pub fn tail(&self, sym: Symbol) -> Symbol {
        let head = self.head(sym);
        if head == sym {
            return Symbol::EMPTY;
        }
        let head_len = self.lookup(head).len();
        self.intern(&self.lookup(sym)[head_len + 1..])
    }

    /// Build `q.n`, or just `n` when `q` is empty.
    ///
    /// A qualifier that ends in the bare inner marker (an on-demand import of
    /// a class) is extended without a dot: `"p.Outer. " + "X" == "p.Outer. X"`.
    pub fn qualify(&self, q: Symbol, n: Symbol) -> Symbol {
        if q.is_empty() {
            return n;
        }
        let q_text = self.lookup(q);
        let n_text = self.lookup(n);
        if q_text.ends_with(INNER_MARKER) {
            return self.intern(&format!("{q_text}{n_text}"));
        }
        let id = self.intern(&format!("{q_text}.{n_text}"));
        if !self.is_qualified(n) && !self.is_inner(q) {
            self.cache_qualifier(id, q);
        }
        id
    }

    // === Inner classes ===

    /// Does the name contain the inner-class marker?
    pub fn is_inner(&self, sym: Symbol) -> bool {
        matches!(self.lookup(sym).find(INNER_MARKER), Some(ipos) if ipos > 0)
    }

    /// Build the inner-class name of `inner` nested in `outer`.
    ///
    /// The marker appears once per name: nesting inside a name that is
    /// already inner continues the class nest with a plain dot.
    pub fn qualify_inner(&self, outer: Symbol, inner: Symbol) -> Symbol {
        if outer.is_empty() {
            return inner;
        }
        let id = if self.is_inner(outer) {
            let outer_text = self.lookup(outer);
            if outer_text.ends_with(INNER_MARKER) {
                self.intern(&format!("{outer_text}{}", self.lookup(inner)))
            } else {
                self.qualify(outer, inner)
            }
        } else {
            self.intern(&format!(
                "{}.{INNER_MARKER}{}",
                self.lookup(outer),
                self.lookup(inner)
            ))
        };
        let package = self.qualifier(outer);
        self.cache_qualifier(id, if package.is_empty() { id } else { package });
        id
    }

    /// The class-nest part of a name with the marker removed:
    /// `flat_name("p.Outer. Inner.Deep") == "Outer.Inner.Deep"`.
    pub fn flat_name(&self, sym: Symbol) -> Symbol {
        let unqualified = self.name(sym);
        let text = self.lookup(unqualified);
        match text.find(INNER_MARKER) {
            Some(ipos) if ipos > 0 && text[..ipos].ends_with('.') => {
                if ipos + 1 == text.len() {
                    self.intern(&text[..ipos - 1])
                } else {
                    self.intern(&format!("{}{}", &text[..ipos], &text[ipos + 1..]))
                }
            }
            _ => unqualified,
        }
    }

    /// The top-level class enclosing an inner name; other names map to themselves.
    pub fn top_name(&self, sym: Symbol) -> Symbol {
        if !self.is_inner(sym) {
            return sym;
        }
        let top = self.head(self.flat_name(sym));
        self.qualify(self.qualifier(sym), top)
    }

    /// Map an inner name to its classfile spelling: `p.Outer. Inner` becomes
    /// `p.Outer$Inner`. Non-inner names are returned unchanged.
    pub fn flatten(&self, sym: Symbol) -> Symbol {
        if !self.is_inner(sym) {
            return sym;
        }
        let mangled = self
            .lookup(self.flat_name(sym))
            .replace('.', &MANGLED_SEPARATOR.to_string());
        self.qualify(self.qualifier(sym), self.intern(&mangled))
    }

    /// Source spelling with the inner marker removed, for display only.
    pub fn display_name(&self, sym: Symbol) -> String {
        let text = self.lookup(sym);
        let marker = format!(".{INNER_MARKER}");
        text.replace(&marker, ".").trim_end_matches('.').to_owned()
    }

    // === Ambiguity tagging ===

    pub fn has_ambiguous_prefix(&self, sym: Symbol) -> bool {
        self.lookup(sym).starts_with(AMBIGUOUS_PREFIX)
    }

    pub fn add_ambiguous_prefix(&self, sym: Symbol) -> Symbol {
        if self.has_ambiguous_prefix(sym) {
            return sym;
        }
        self.intern(&format!("{AMBIGUOUS_PREFIX}{}", self.lookup(sym)))
    }

    pub fn remove_ambiguous_prefix(&self, sym: Symbol) -> Symbol {
        let text = self.lookup(sym);
        match text.strip_prefix(AMBIGUOUS_PREFIX) {
            Some(rest) => self.intern(rest),
            None => sym,
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared symbol table handle.
///
/// One table per compilation session; every crate that interns names holds a
/// clone of this handle rather than reaching for global state.
#[derive(Clone)]
pub struct SharedSymbolTable(Arc<SymbolTable>);

impl SharedSymbolTable {
    pub fn new() -> Self {
        SharedSymbolTable(Arc::new(SymbolTable::new()))
    }
}

impl Default for SharedSymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedSymbolTable {
    type Target = SymbolTable;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests;
