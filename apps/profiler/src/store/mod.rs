//! Persistent store seam.
//!
//! Pipelines talk to the `Store` trait; `PgStore` is the PostgreSQL
//! implementation and `testing::MemoryStore` the in-memory one.

pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{InterviewSessionRow, JobTemplateRow};

pub use postgres::PgStore;

/// JSON columns the pipelines write results into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnTarget {
    /// `job_templates.initial_json_schema`
    InitialJsonSchema,
    /// `interview_sessions."Interview_report"`
    InterviewReport,
}

impl ColumnTarget {
    pub fn table(self) -> &'static str {
        match self {
            ColumnTarget::InitialJsonSchema => "job_templates",
            ColumnTarget::InterviewReport => "interview_sessions",
        }
    }

    /// Quoted column identifier, ready to splice into SQL.
    pub fn column(self) -> &'static str {
        match self {
            ColumnTarget::InitialJsonSchema => "initial_json_schema",
            ColumnTarget::InterviewReport => "\"Interview_report\"",
        }
    }

    pub fn key_column(self) -> &'static str {
        match self {
            ColumnTarget::InitialJsonSchema => "template_id",
            ColumnTarget::InterviewReport => "session_id",
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn job_template(&self, template_id: Uuid) -> Result<Option<JobTemplateRow>, AppError>;

    /// Active templates without a profile yet, newest first.
    async fn pending_job_templates(&self, limit: Option<i64>)
        -> Result<Vec<JobTemplateRow>, AppError>;

    async fn interview_session(
        &self,
        session_id: Uuid,
    ) -> Result<Option<InterviewSessionRow>, AppError>;

    /// Writes `value` into the target column. Returns the number of rows affected.
    async fn write_column(
        &self,
        target: ColumnTarget,
        id: Uuid,
        value: &Value,
    ) -> Result<u64, AppError>;

    /// Reads the target column back. `None` when the row is missing or the column is NULL.
    async fn read_column(&self, target: ColumnTarget, id: Uuid) -> Result<Option<Value>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

/// Writes a JSON result and reads it back.
///
/// Zero affected rows, or a read-back that is still NULL, is a persistence
/// failure even though the UPDATE itself raised no error.
pub async fn write_verified(
    store: &dyn Store,
    target: ColumnTarget,
    id: Uuid,
    value: &Value,
) -> Result<(), AppError> {
    let affected = store.write_column(target, id, value).await?;
    if affected == 0 {
        return Err(AppError::Persistence(format!(
            "No {} row with {} = {id}",
            target.table(),
            target.key_column()
        )));
    }

    match store.read_column(target, id).await? {
        Some(_) => {
            info!("Saved {}.{} for {id}", target.table(), target.column());
            Ok(())
        }
        None => {
            warn!(
                "Write to {}.{} for {id} reported success but reads back NULL",
                target.table(),
                target.column()
            );
            Err(AppError::Persistence(format!(
                "{}.{} is still NULL after update for {id}",
                target.table(),
                target.column()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::errors::FailureKind;
    use crate::testing::MemoryStore;

    #[tokio::test]
    async fn test_write_verified_round_trip() {
        let store = MemoryStore::new();
        let id = store.add_job_template("Rust engineer");

        write_verified(&store, ColumnTarget::InitialJsonSchema, id, &json!({"ok": true}))
            .await
            .unwrap();

        assert_eq!(
            store.column(ColumnTarget::InitialJsonSchema, id),
            Some(json!({"ok": true}))
        );
    }

    #[tokio::test]
    async fn test_missing_row_is_persistence_failure() {
        let store = MemoryStore::new();
        let err = write_verified(&store, ColumnTarget::InterviewReport, Uuid::new_v4(), &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Persistence);
    }

    #[tokio::test]
    async fn test_null_read_back_is_persistence_failure() {
        let store = MemoryStore::new().dropping_writes();
        let id = store.add_job_template("Rust engineer");

        let err = write_verified(&store, ColumnTarget::InitialJsonSchema, id, &json!({"a": 1}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Persistence(msg) if msg.contains("still NULL")));
    }

    #[test]
    fn test_report_column_is_quoted() {
        assert_eq!(ColumnTarget::InterviewReport.column(), "\"Interview_report\"");
        assert_eq!(ColumnTarget::InitialJsonSchema.key_column(), "template_id");
    }
}
