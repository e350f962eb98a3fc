use parking_lot::RwLock;
use std::{collections::HashMap, fmt::Debug};

use crate::model::WeatherRecord;

/// Identifier-keyed storage for created records.
///
/// Implementations must make each `write`/`read` atomic with respect to
/// the others; requests may be served concurrently.
pub trait RecordStore: Send + Sync + Debug {
    /// Insert unconditionally. An existing record under `id` is replaced.
    fn write(&self, id: String, record: WeatherRecord);

    fn read(&self, id: &str) -> Option<WeatherRecord>;
}

/// Process-lifetime store backed by a `HashMap` behind a read/write lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<String, WeatherRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryStore {
    fn write(&self, id: String, record: WeatherRecord) {
        self.records.write().insert(id, record);
    }

    fn read(&self, id: &str) -> Option<WeatherRecord> {
        self.records.read().get(id).cloned()
    }
}
