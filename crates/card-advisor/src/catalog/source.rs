use super::{CatalogLoad, CatalogLoader};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;
use tracing::debug;

/// Provides a catalog snapshot per request.
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> Arc<CatalogLoad>;
}

/// Re-reads the CSV file on every call.
#[derive(Debug, Clone)]
pub struct CsvCatalogSource {
    path: PathBuf,
}

impl CsvCatalogSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .ok()
    }
}

impl CatalogSource for CsvCatalogSource {
    fn load(&self) -> Arc<CatalogLoad> {
        Arc::new(CatalogLoader::from_path(&self.path))
    }
}

/// Fixed in-memory catalog.
#[derive(Debug, Clone)]
pub struct StaticCatalogSource {
    load: Arc<CatalogLoad>,
}

impl StaticCatalogSource {
    pub fn new(load: CatalogLoad) -> Self {
        Self {
            load: Arc::new(load),
        }
    }
}

impl CatalogSource for StaticCatalogSource {
    fn load(&self) -> Arc<CatalogLoad> {
        Arc::clone(&self.load)
    }
}

struct CachedSnapshot {
    modified: Option<SystemTime>,
    load: Arc<CatalogLoad>,
}

/// Keeps the last parsed catalog and reloads when the file's modification time
/// changes. A reload builds a new snapshot and swaps the `Arc`, so readers holding
/// the previous snapshot keep a consistent view.
pub struct CachedCatalogSource {
    inner: CsvCatalogSource,
    snapshot: RwLock<Option<CachedSnapshot>>,
}

impl CachedCatalogSource {
    pub fn new(inner: CsvCatalogSource) -> Self {
        Self {
            inner,
            snapshot: RwLock::new(None),
        }
    }

    fn cached(&self, modified: Option<SystemTime>) -> Option<Arc<CatalogLoad>> {
        let guard = match self.snapshot.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard
            .as_ref()
            .filter(|snapshot| modified.is_some() && snapshot.modified == modified)
            .map(|snapshot| Arc::clone(&snapshot.load))
    }
}

impl CatalogSource for CachedCatalogSource {
    fn load(&self) -> Arc<CatalogLoad> {
        let modified = self.inner.modified();
        if let Some(load) = self.cached(modified) {
            return load;
        }

        debug!(path = %self.inner.path().display(), "reloading card catalog");
        let load = self.inner.load();

        let mut guard = match self.snapshot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(CachedSnapshot {
            modified,
            load: Arc::clone(&load),
        });
        load
    }
}
