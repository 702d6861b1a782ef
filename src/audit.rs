use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use geostore::{BuildingId, StreetId};
use serde::{Deserialize, Serialize};

use crate::parse::ParsedAddress;
use crate::result::{Position, ResolutionPayload, ResolutionResult, Status};

/// One persisted resolution, successful or not.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub raw: String,
    pub parsed: ParsedAddress,
    pub status: Status,
    pub payload: ResolutionPayload,
    pub street_id: Option<StreetId>,
    pub building_id: Option<BuildingId>,
    pub point: Option<Position>,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
}

impl AuditEntry {
    pub fn new(result: &ResolutionResult) -> Self {
        Self {
            raw: result.input.raw.clone(),
            parsed: result.input.parsed.clone(),
            status: result.status,
            payload: result.payload.clone(),
            street_id: result.street_id(),
            building_id: result.building_id(),
            point: result.point(),
            timestamp: SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs()),
        }
    }
}

/// Destination for audit entries.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &AuditEntry) -> Result<()>;
}

/// Appends one JSON object per line to a file.
pub struct JsonLinesAudit {
    file: Mutex<File>,
}

impl JsonLinesAudit {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)
            .with_context(|| format!("Failed to open audit log {}", path.display()))?;
        Ok(Self { file: Mutex::new(file) })
    }
}

impl AuditSink for JsonLinesAudit {
    fn record(&self, entry: &AuditEntry) -> Result<()> {
        let mut line = serde_json::to_vec(entry).context("Failed to serialize audit entry")?;
        line.push(b'\n');
        let mut file = self.file.lock().map_err(|_| anyhow!("audit log lock poisoned"))?;
        file.write_all(&line).context("Failed to write audit entry")?;
        Ok(())
    }
}

/// Keeps entries in memory.
#[derive(Default)]
pub struct MemoryAudit {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAudit {
    pub fn new() -> Self { Self::default() }

    pub fn entries(&self) -> Vec<AuditEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, entry: &AuditEntry) -> Result<()> {
        self.entries.lock().map_err(|_| anyhow!("audit buffer lock poisoned"))?.push(entry.clone());
        Ok(())
    }
}
