//! Database session context
//!
//! Owns the storage container, the string pool, the table cache and the
//! schema memo. Views borrow the database, so every view opened on one
//! database shares the same cached buffers.

use crate::catalog::{SchemaCatalog, TableSchema, builtin};
use crate::config::DatabaseConfig;
use crate::error::{TableError, TableResult};
use crate::storage::{DirStorage, StorageContainer};
use crate::string_pool::StringPool;
use crate::table::{TableCache, TableView};
use crate::types::TABLES_TABLE;
use std::sync::Arc;

pub struct Database {
    config: DatabaseConfig,
    strings: Arc<dyn StringPool>,
    cache: TableCache,
    schemas: SchemaCatalog,
}

impl Database {
    /// Database over an arbitrary container
    pub fn with_storage(
        storage: Arc<dyn StorageContainer>,
        strings: Arc<dyn StringPool>,
        config: DatabaseConfig,
    ) -> Self {
        Self {
            schemas: SchemaCatalog::new(config.cache_schemas),
            cache: TableCache::new(storage),
            strings,
            config,
        }
    }

    /// Database over the container directory named by the config
    pub fn open(config: DatabaseConfig, strings: Arc<dyn StringPool>) -> TableResult<Self> {
        config
            .validate()
            .map_err(|e| TableError::InvalidParameter(e.to_string()))?;

        let storage = DirStorage::new(&config.data_dir, config.read_chunk_size)
            .map_err(|e| TableError::storage(&config.data_dir.display().to_string(), e))?;

        tracing::debug!(data_dir = %config.data_dir.display(), "database opened");
        Ok(Self::with_storage(Arc::new(storage), strings, config))
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn cache(&self) -> &TableCache {
        &self.cache
    }

    pub fn strings(&self) -> &dyn StringPool {
        self.strings.as_ref()
    }

    pub fn schemas(&self) -> &SchemaCatalog {
        &self.schemas
    }

    /// Resolve a table's ordered columns
    pub fn resolve_columns(&self, table_name: &str) -> TableResult<Arc<TableSchema>> {
        self.schemas
            .resolve(table_name, &self.cache, self.strings.as_ref())
    }

    /// Open a view on a table
    pub fn open_view(&self, table_name: &str) -> TableResult<TableView<'_>> {
        TableView::open(self, table_name)
    }

    /// Names listed in `_Tables`, in stored order
    pub fn table_names(&self) -> TableResult<Vec<String>> {
        let view = self.open_view(TABLES_TABLE)?;
        let rows = view.row_count()?;

        let mut names = Vec::with_capacity(rows);
        for row in 0..rows {
            if let Some(name) = view.fetch_string(row, 1)? {
                names.push(name);
            }
        }

        view.delete()?;
        Ok(names)
    }

    /// Check if a table is a bootstrap table or listed in `_Tables`
    pub fn table_exists(&self, table_name: &str) -> TableResult<bool> {
        if builtin::is_builtin(table_name) {
            return Ok(true);
        }
        Ok(self.table_names()?.iter().any(|n| n == table_name))
    }

    /// Close the database, evicting every cached table
    ///
    /// Returns the names of tables a caller never released.
    pub fn close(self) -> Vec<String> {
        self.schemas.clear();
        self.cache.purge_all()
    }
}
