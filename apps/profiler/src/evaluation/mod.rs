// Evaluation pipeline: reconstructs an interview transcript, has the model
// score it against the job description and stores the report.

pub mod builder;
pub mod conversation;
pub mod prompts;
pub mod report;

pub use builder::EvaluationReportBuilder;
pub use conversation::reconstruct;
pub use report::EvaluationReport;

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::output::write_backup;
use crate::store::{write_verified, ColumnTarget, Store};

#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub session_id: Uuid,
    pub report: EvaluationReport,
    pub backup: Option<PathBuf>,
}

/// Evaluates one stored interview session and saves the report.
pub async fn evaluate_session(
    store: &dyn Store,
    builder: &EvaluationReportBuilder<'_>,
    session_id: Uuid,
    backup_dir: Option<&Path>,
) -> Result<EvaluationOutcome, AppError> {
    let session = store
        .interview_session(session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview session {session_id} not found")))?;

    let information = session.session_information.as_ref().ok_or_else(|| {
        AppError::NotFound(format!("Session {session_id} has no session_information"))
    })?;
    let template_id = session.template_id.ok_or_else(|| {
        AppError::NotFound(format!("Session {session_id} has no template_id"))
    })?;

    let template = store.job_template(template_id).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "Job template {template_id} for session {session_id} not found"
        ))
    })?;
    let job_description = template.description().ok_or_else(|| {
        AppError::Extraction(format!("Job template {template_id} has no job description"))
    })?;

    let conversation = reconstruct(information);
    if conversation.is_empty() {
        return Err(AppError::Extraction(format!(
            "No conversation found in session {session_id}"
        )));
    }
    info!(
        "Evaluating session {session_id}: {} exchanges, template {template_id}",
        conversation.len()
    );

    let report = builder.build(&conversation, job_description).await?;
    let value = serde_json::to_value(&report)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize report: {e}")))?;

    write_verified(store, ColumnTarget::InterviewReport, session_id, &value).await?;

    let backup = match backup_dir {
        Some(dir) => match write_backup(dir, &session_id.to_string(), "evaluation", &value).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Report for {session_id} saved, but local copy failed: {e}");
                None
            }
        },
        None => None,
    };

    Ok(EvaluationOutcome {
        session_id,
        report,
        backup,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::errors::FailureKind;
    use crate::testing::{MemoryStore, ScriptedCompletion};

    const REPLY: &str = r#"{"evaluation_summary": {"overall_score": 7, "recommendation": "Hire"}, "detailed_scores": {"technical_competency": {"overall_score": 7}}}"#;

    fn qa_session() -> serde_json::Value {
        json!({"questions": ["What is a lifetime?"], "answers": ["A scope for a borrow."]})
    }

    #[tokio::test]
    async fn test_evaluate_session_persists_report() {
        let store = MemoryStore::new();
        let template_id = store.add_job_template("Rust engineer, async services.");
        let session_id = store.add_session(Some(template_id), Some(qa_session()));
        let llm = ScriptedCompletion::always(REPLY);
        let builder = EvaluationReportBuilder::new(&llm);
        let dir = tempfile::tempdir().unwrap();

        let outcome = evaluate_session(&store, &builder, session_id, Some(dir.path()))
            .await
            .unwrap();

        assert_eq!(outcome.report.evaluation_summary.recommendation, "Hire");
        assert_eq!(
            outcome.backup,
            Some(dir.path().join(format!("{session_id}_evaluation.json")))
        );
        let saved = store.column(ColumnTarget::InterviewReport, session_id).unwrap();
        assert_eq!(saved["evaluation_summary"]["overall_score"], json!(7.0));
        assert_eq!(saved["evaluation_metadata"]["evaluation_version"], "1.0");
        assert!(llm.prompts()[0].contains("Rust engineer, async services."));
    }

    #[tokio::test]
    async fn test_missing_session_is_not_found() {
        let store = MemoryStore::new();
        let llm = ScriptedCompletion::always(REPLY);
        let builder = EvaluationReportBuilder::new(&llm);

        let err = evaluate_session(&store, &builder, Uuid::new_v4(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_session_without_template_is_input_failure() {
        let store = MemoryStore::new();
        let session_id = store.add_session(None, Some(qa_session()));
        let llm = ScriptedCompletion::always(REPLY);
        let builder = EvaluationReportBuilder::new(&llm);

        let err = evaluate_session(&store, &builder, session_id, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Input);
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_unrecognized_conversation_is_extraction_failure() {
        let store = MemoryStore::new();
        let template_id = store.add_job_template("QA analyst");
        let session_id = store.add_session(Some(template_id), Some(json!({"notes": "n/a"})));
        let llm = ScriptedCompletion::always(REPLY);
        let builder = EvaluationReportBuilder::new(&llm);

        let err = evaluate_session(&store, &builder, session_id, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Extraction);
        assert!(store.column(ColumnTarget::InterviewReport, session_id).is_none());
    }

    #[tokio::test]
    async fn test_blank_job_description_is_extraction_failure() {
        let store = MemoryStore::new();
        let template_id = store.add_job_template("  ");
        let session_id = store.add_session(Some(template_id), Some(qa_session()));
        let llm = ScriptedCompletion::always(REPLY);
        let builder = EvaluationReportBuilder::new(&llm);

        let err = evaluate_session(&store, &builder, session_id, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Extraction);
    }

    #[tokio::test]
    async fn test_null_read_back_is_persistence_failure() {
        let store = MemoryStore::new().dropping_writes();
        let template_id = store.add_job_template("SRE");
        let session_id = store.add_session(Some(template_id), Some(qa_session()));
        let llm = ScriptedCompletion::always(REPLY);
        let builder = EvaluationReportBuilder::new(&llm);

        let err = evaluate_session(&store, &builder, session_id, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Persistence);
    }
}
