use blackjack::{GatewayError, HistoryRecord, Ledger, MemoryLedger, Stats};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Ledger persisted as a single JSON document, rewritten after every change.
pub struct FileLedger {
    path: PathBuf,
    data: MemoryLedger,
}

impl FileLedger {
    /// Load the ledger at `path`. A missing file is an empty ledger.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, GatewayError> {
        let path = path.into();
        let data = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| GatewayError::Serialization(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No ledger at {}, starting fresh", path.display());
                MemoryLedger::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), GatewayError> {
        let bytes = serde_json::to_vec_pretty(&self.data)
            .map_err(|e| GatewayError::Serialization(e.to_string()))?;

        // Write then rename so a crash never leaves half a document behind
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Ledger for FileLedger {
    fn chip_balance(&self) -> Result<Option<u64>, GatewayError> {
        self.data.chip_balance()
    }

    fn set_chip_balance(&mut self, chips: u64) -> Result<(), GatewayError> {
        self.data.set_chip_balance(chips)?;
        self.save()
    }

    fn append_history(&mut self, record: HistoryRecord) -> Result<(), GatewayError> {
        self.data.append_history(record)?;
        self.save()
    }

    fn history(&self, limit: usize) -> Result<Vec<HistoryRecord>, GatewayError> {
        self.data.history(limit)
    }

    fn aggregate_stats(&self) -> Result<Stats, GatewayError> {
        self.data.aggregate_stats()
    }
}
