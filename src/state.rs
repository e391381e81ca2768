use std::sync::{Arc, RwLock};

use crate::dataset::Dataset;
use crate::error::QueryError;

/// Holder of the currently ingested dataset.
///
/// Readers take an `Arc` snapshot and run their query without holding the
/// lock. A new upload is fully built before [`DatasetStore::replace`] swaps
/// the pointer, so a reader sees either the previous dataset or the new
/// one, never a mix.
#[derive(Debug, Default)]
pub struct DatasetStore {
    current: RwLock<Option<Arc<Dataset>>>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current dataset, or [`QueryError::NoData`] before the first upload.
    pub fn snapshot(&self) -> Result<Arc<Dataset>, QueryError> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        guard.clone().ok_or(QueryError::NoData)
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_ok()
    }

    /// Publish a new dataset, dropping whatever was there before.
    pub fn replace(&self, dataset: Dataset) {
        let dataset = Arc::new(dataset);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(dataset);
    }

    /// Run a query against the current snapshot.
    pub fn query<T, F>(&self, f: F) -> Result<T, QueryError>
    where
        F: FnOnce(&Dataset) -> Result<T, QueryError>,
    {
        let dataset = self.snapshot()?;
        f(&dataset)
    }
}
