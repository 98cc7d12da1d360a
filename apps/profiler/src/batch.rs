//! Sequential batch driver shared by the job and evaluation commands.
//!
//! Each id is awaited to completion before the next starts. A failed item is
//! recorded in the tally and never aborts the run.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;

use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::{AppError, FailureKind};

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub id: Uuid,
    #[serde(serialize_with = "serialize_kind")]
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchTally {
    pub total: usize,
    pub succeeded: Vec<Uuid>,
    pub failed: Vec<BatchFailure>,
}

impl BatchTally {
    /// Percentage of items that succeeded. An empty batch is 0%.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.succeeded.len() as f64 / self.total as f64 * 100.0
    }

    pub fn failures_by_kind(&self) -> BTreeMap<FailureKind, usize> {
        let mut counts = BTreeMap::new();
        for failure in &self.failed {
            *counts.entry(failure.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs `process` for every id in order and tallies the results.
pub async fn run_batch<T, F, Fut>(ids: &[Uuid], mut process: F) -> BatchTally
where
    F: FnMut(Uuid) -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut tally = BatchTally {
        total: ids.len(),
        ..BatchTally::default()
    };

    for (idx, id) in ids.iter().copied().enumerate() {
        info!("[{}/{}] Processing {id}", idx + 1, ids.len());
        match process(id).await {
            Ok(_) => tally.succeeded.push(id),
            Err(e) => {
                error!("[{}/{}] {id} failed ({}): {e}", idx + 1, ids.len(), e.kind());
                tally.failed.push(BatchFailure {
                    id,
                    kind: e.kind(),
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        "Batch completed: {}/{} succeeded ({:.1}% success rate)",
        tally.succeeded.len(),
        tally.total,
        tally.success_rate()
    );
    tally
}

/// Reads ids from a batch file: one per line, blank lines and `#` comments skipped.
pub async fn read_id_file(path: &Path) -> Result<Vec<Uuid>, AppError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::NotFound(format!("Batch file {}: {e}", path.display())))?;
    parse_ids(&text).map_err(|msg| AppError::Config(format!("{}: {msg}", path.display())))
}

fn parse_ids(text: &str) -> Result<Vec<Uuid>, String> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            Uuid::parse_str(line).map_err(|e| format!("line {line_no}: invalid id '{line}': {e}"))
        })
        .collect()
}

fn serialize_kind<S: serde::Serializer>(kind: &FailureKind, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(kind)
}
