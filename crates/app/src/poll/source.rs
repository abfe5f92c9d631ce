use chrono::{DateTime, Utc};
use gauge_core::QuotaSnapshot;
use gauge_scan::QuotaScanner;
use gauge_store::{ExtractionError, StateStore};

/// Produces one quota snapshot per tick.
pub trait SnapshotSource {
    fn snapshot(&self, now: DateTime<Utc>) -> Result<QuotaSnapshot, ExtractionError>;

    /// Label shown in the dashboard footer.
    fn descriptor(&self) -> String;
}

/// Reads the state store and scans the decoded blob.
#[derive(Debug, Clone)]
pub struct StoreProbe {
    store: StateStore,
    scanner: QuotaScanner,
}

impl StoreProbe {
    pub fn new(store: StateStore, scanner: QuotaScanner) -> Self {
        Self { store, scanner }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }
}

impl SnapshotSource for StoreProbe {
    fn snapshot(&self, now: DateTime<Utc>) -> Result<QuotaSnapshot, ExtractionError> {
        let blob = self.store.read()?;
        let records = self.scanner.scan(blob.as_bytes());
        tracing::debug!(
            models = records.len(),
            bytes = blob.len(),
            "scanned user status blob"
        );
        Ok(QuotaSnapshot {
            timestamp: now,
            records,
            source: self.store.descriptor(),
        })
    }

    fn descriptor(&self) -> String {
        self.store.descriptor()
    }
}
