//! Reference-counted table cache
//!
//! Loads a table's stream on first use and shares the loaded buffer with
//! every later holder of the same name:
//! - Get: Return the cached table or load it, taking one reference
//! - Release: Drop one reference, evicting the table at zero
//! - Purge: Evict everything at database close, reporting leaks

use crate::error::{TableError, TableResult};
use crate::infrastructure::stream_name::encode_name;
use crate::storage::StorageContainer;
use crate::table::Table;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
struct CacheEntry {
    table: Arc<Table>,
    ref_count: usize,
}

/// Cache of loaded tables keyed by table name
///
/// All lookups, inserts and releases run under one mutex, including the
/// stream load on a miss, so two concurrent misses on the same name load
/// the stream once. Loaded buffers are read-only; holders need no lock to
/// read them.
///
/// # Examples
///
/// ```
/// use msitable::storage::MemStorage;
/// use msitable::table::TableCache;
/// use std::sync::Arc;
///
/// let cache = TableCache::new(Arc::new(MemStorage::new()));
/// let table = cache.get_table("Property").unwrap();
/// assert_eq!(table.size(), 0);
/// assert_eq!(cache.ref_count("Property"), Some(1));
///
/// cache.release_table(&table).unwrap();
/// assert!(cache.is_empty());
/// ```
pub struct TableCache {
    storage: Arc<dyn StorageContainer>,
    tables: Mutex<HashMap<String, CacheEntry>>,
}

impl TableCache {
    /// Create an empty cache reading from `storage`
    pub fn new(storage: Arc<dyn StorageContainer>) -> Self {
        Self {
            storage,
            tables: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire a table, loading its stream on a miss
    ///
    /// A missing stream yields an empty table. Any other container failure
    /// is returned as `TableError::Storage` and nothing is cached.
    pub fn get_table(&self, name: &str) -> TableResult<Arc<Table>> {
        let mut tables = self.tables.lock();

        if let Some(entry) = tables.get_mut(name) {
            entry.ref_count += 1;
            tracing::debug!(table = name, ref_count = entry.ref_count, "table cache hit");
            return Ok(Arc::clone(&entry.table));
        }

        let table = Arc::new(self.load_table(name)?);
        tables.insert(
            name.to_string(),
            CacheEntry {
                table: Arc::clone(&table),
                ref_count: 1,
            },
        );

        Ok(table)
    }

    /// Read a table's stream from the container
    fn load_table(&self, name: &str) -> TableResult<Table> {
        let stream = encode_name(true, name)?;

        match self.storage.read_stream(&stream) {
            Ok(raw) => {
                tracing::debug!(table = name, size = raw.len(), "table loaded");
                Ok(Table::new(name, raw))
            }
            Err(err) if err.is_not_found() => {
                tracing::warn!(table = name, "table stream missing, using empty table");
                Ok(Table::empty(name))
            }
            Err(err) => Err(TableError::storage(name, err)),
        }
    }

    /// Release one reference taken by [`get_table`](Self::get_table)
    ///
    /// At zero references the table leaves the cache. Releasing a table
    /// that holds no reference (a double release, or a handle from an
    /// evicted generation) is logged and reported as `InvalidParameter`;
    /// the cache itself stays consistent.
    pub fn release_table(&self, table: &Arc<Table>) -> TableResult<()> {
        let mut tables = self.tables.lock();

        let entry = match tables.get_mut(table.name()) {
            Some(entry) if Arc::ptr_eq(&entry.table, table) => entry,
            _ => {
                tracing::error!(table = table.name(), "release of a table holding no reference");
                return Err(TableError::InvalidParameter(format!(
                    "table {} released more times than acquired",
                    table.name()
                )));
            }
        };

        entry.ref_count -= 1;
        if entry.ref_count == 0 {
            tables.remove(table.name());
            tracing::debug!(table = table.name(), "table evicted");
        }

        Ok(())
    }

    /// Acquire a table, run `f`, and release the table whatever `f` returns
    pub fn with_table<T>(
        &self,
        name: &str,
        f: impl FnOnce(&Table) -> TableResult<T>,
    ) -> TableResult<T> {
        let table = self.get_table(name)?;
        let result = f(&table);
        let released = self.release_table(&table);
        let value = result?;
        released?;
        Ok(value)
    }

    /// Current reference count of a cached table
    pub fn ref_count(&self, name: &str) -> Option<usize> {
        self.tables.lock().get(name).map(|e| e.ref_count)
    }

    /// Check if a table is cached
    pub fn contains(&self, name: &str) -> bool {
        self.tables.lock().contains_key(name)
    }

    /// Number of cached tables
    pub fn size(&self) -> usize {
        self.tables.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.lock().is_empty()
    }

    /// Evict every table, returning the names still referenced
    ///
    /// By close time every holder should have released its reference; each
    /// table still referenced is logged as a leak and freed anyway.
    pub fn purge_all(&self) -> Vec<String> {
        let drained: Vec<(String, CacheEntry)> = self.tables.lock().drain().collect();

        let mut leaked = Vec::new();
        for (name, entry) in drained {
            if entry.ref_count != 0 {
                tracing::warn!(
                    table = %name,
                    ref_count = entry.ref_count,
                    "table still referenced at purge"
                );
                leaked.push(name);
            }
        }
        leaked.sort();
        leaked
    }
}

impl Drop for TableCache {
    fn drop(&mut self) {
        if !self.tables.get_mut().is_empty() {
            self.purge_all();
        }
    }
}
