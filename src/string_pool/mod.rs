//! String pool interface and in-memory pool
//!
//! String-typed columns hold a [`StringId`] instead of character data.
//! The engine only consumes the pool: schema resolution looks table
//! names up and turns column-name ids back into text.

use crate::types::{NULL_STRING_ID, StringId};
use parking_lot::RwLock;
use std::collections::HashMap;

/// String interning collaborator
pub trait StringPool: Send + Sync {
    /// Intern a string, returning its id; the same text always yields the same id
    fn intern(&self, text: &str) -> StringId;

    /// Text of an id, `None` if the id was never handed out
    fn resolve(&self, id: StringId) -> Option<String>;

    /// Id of already interned text, `None` if it was never interned
    fn lookup(&self, text: &str) -> Option<StringId>;
}

struct PoolInner {
    /// Text by id; slot 0 is the null string
    strings: Vec<String>,
    /// Id by text
    ids: HashMap<String, StringId>,
}

/// Thread-safe in-memory string pool
///
/// # Examples
///
/// ```
/// use msitable::string_pool::{MemStringPool, StringPool};
///
/// let pool = MemStringPool::new();
/// let id = pool.intern("Property");
///
/// assert_eq!(pool.lookup("Property"), Some(id));
/// assert_eq!(pool.resolve(id).as_deref(), Some("Property"));
/// ```
pub struct MemStringPool {
    inner: RwLock<PoolInner>,
}

impl MemStringPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(PoolInner {
                strings: vec![String::new()],
                ids: HashMap::new(),
            }),
        }
    }

    /// Create a pool holding the given strings, interned in order
    pub fn with_strings<'a>(strings: impl IntoIterator<Item = &'a str>) -> Self {
        let pool = Self::new();
        for s in strings {
            pool.intern(s);
        }
        pool
    }

    /// Number of interned strings, the null string excluded
    pub fn len(&self) -> usize {
        self.inner.read().strings.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemStringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StringPool for MemStringPool {
    fn intern(&self, text: &str) -> StringId {
        if let Some(id) = self.inner.read().ids.get(text) {
            return *id;
        }

        let mut inner = self.inner.write();
        // another writer may have won the race
        if let Some(id) = inner.ids.get(text) {
            return *id;
        }
        let id = inner.strings.len() as StringId;
        inner.strings.push(text.to_string());
        inner.ids.insert(text.to_string(), id);
        id
    }

    fn resolve(&self, id: StringId) -> Option<String> {
        if id == NULL_STRING_ID {
            return None;
        }
        self.inner.read().strings.get(id as usize).cloned()
    }

    fn lookup(&self, text: &str) -> Option<StringId> {
        self.inner.read().ids.get(text).copied()
    }
}
