use std::fmt::Display;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::error::ScholarResult;

/// Single-slot JSON snapshot of the most recent fetch. Every save overwrites
/// the previous file; concurrent writers are not coordinated.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn save<T: Serialize>(&self, value: &T) -> ScholarResult<()> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut serializer)?;

        info!("Writing snapshot to {} ({} bytes)", self.path.display(), buf.len());
        tokio::fs::write(&self.path, buf).await?;
        Ok(())
    }
}

/// Append-only text log of failed requests, one timestamped line each.
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn record(&self, url: &str, error: &(dyn Display + Sync)) -> ScholarResult<()> {
        let now = OffsetDateTime::now_utc();
        let stamp = now
            .format(&Rfc3339)
            .unwrap_or_else(|_| now.unix_timestamp().to_string());
        let line = format!("{} {}: {}\n", stamp, url, error);

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Like `record`, but a broken log never masks the original failure.
    pub async fn record_quietly(&self, url: &str, error: &(dyn Display + Sync)) {
        if let Err(e) = self.record(url, error).await {
            warn!("Could not append to failure log {}: {}", self.path.display(), e);
        }
    }
}
