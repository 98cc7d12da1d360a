//! Evaluation Report Builder: one completion call per interview.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::evaluation::conversation::ConversationExchange;
use crate::evaluation::prompts::{evaluation_prompt, PromptMetadata};
use crate::evaluation::report::{missing_sections, EvaluationReport};
use crate::extraction::parse_json_reply;
use crate::llm_client::{Completion, CompletionOptions};

pub const DEFAULT_EVALUATOR: &str = "Ollama Llama3 AI Assistant";
pub const EVALUATION_VERSION: &str = "1.0";

pub struct EvaluationReportBuilder<'a> {
    llm: &'a dyn Completion,
    evaluator: String,
}

impl<'a> EvaluationReportBuilder<'a> {
    pub fn new(llm: &'a dyn Completion) -> Self {
        Self {
            llm,
            evaluator: DEFAULT_EVALUATOR.to_string(),
        }
    }

    /// Label written to `evaluation_metadata.evaluated_by`.
    pub fn with_evaluator(mut self, evaluator: impl Into<String>) -> Self {
        self.evaluator = evaluator.into();
        self
    }

    /// Builds a report for one transcript. No retry: a missing or unusable
    /// reply fails the interview.
    ///
    /// Any JSON object in the reply is accepted. Missing sections and
    /// out-of-range scores are passed through as the model gave them and only
    /// logged.
    pub async fn build(
        &self,
        conversation: &[ConversationExchange],
        job_description: &str,
    ) -> Result<EvaluationReport, AppError> {
        if conversation.is_empty() {
            return Err(AppError::Extraction(
                "conversation has no exchanges to evaluate".to_string(),
            ));
        }

        let evaluation_date = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let prompt = evaluation_prompt(
            conversation,
            job_description,
            &PromptMetadata {
                evaluated_by: &self.evaluator,
                evaluation_date: &evaluation_date,
                evaluation_version: EVALUATION_VERSION,
            },
        );

        let reply = self
            .llm
            .complete(&prompt, &CompletionOptions::EVALUATION)
            .await
            .ok_or_else(|| AppError::Llm("no reply to the evaluation prompt".to_string()))?;

        let value: Value = parse_json_reply(&reply)?;
        let missing = missing_sections(&value);
        if !missing.is_empty() {
            warn!("Evaluation reply has no usable {missing:?}; defaulting them");
        }
        let mut report: EvaluationReport =
            serde_json::from_value(value).map_err(|e| AppError::parse(e.to_string(), &reply))?;

        let metadata = &mut report.evaluation_metadata;
        if metadata.evaluated_by.trim().is_empty() {
            metadata.evaluated_by = self.evaluator.clone();
        }
        if metadata.evaluation_date.trim().is_empty() {
            metadata.evaluation_date = evaluation_date;
        }
        if metadata.evaluation_version.trim().is_empty() {
            metadata.evaluation_version = EVALUATION_VERSION.to_string();
        }

        let out_of_range = report.out_of_range_scores();
        if !out_of_range.is_empty() {
            warn!("Evaluation has {} scores outside 1-10: {out_of_range:?}", out_of_range.len());
        }

        info!(
            "Evaluation built: overall {:?}, weighted {:?}, recommendation '{}'",
            report.evaluation_summary.overall_score,
            report.weighted_score(),
            report.evaluation_summary.recommendation
        );
        Ok(report)
    }
}
