//! Job transformer: turns a free-text job description into a filled profile.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::extraction::extract_field_block;
use crate::job::prompts::{block_prompt, field_prompt};
use crate::llm_client::{Completion, CompletionOptions};
use crate::schema::fields::{
    JOB_FIELDS, JOB_ID_PATH, LAST_UPDATED_PATH, SCHEMA_VERSION, SCHEMA_VERSION_PATH, SOURCE_LABEL,
    SOURCE_PATH,
};
use crate::schema::{fill, ExtractedFieldMap, FieldSpec, FilledProfile, Template, OPEN};

/// How field values are requested from the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExtractionMode {
    /// One prompt per field.
    #[default]
    PerField,
    /// One prompt answered with `KEY: value` lines.
    Block,
}

pub struct JobTransformer<'a> {
    llm: &'a dyn Completion,
    template: &'a Template,
    mode: ExtractionMode,
    fields: &'static [FieldSpec],
}

impl<'a> JobTransformer<'a> {
    pub fn new(llm: &'a dyn Completion, template: &'a Template, mode: ExtractionMode) -> Self {
        Self {
            llm,
            template,
            mode,
            fields: JOB_FIELDS,
        }
    }

    /// Asks the model for every field and returns the cleaned raw values.
    ///
    /// Fails only when the endpoint gave no reply at all. Fields without a
    /// reply (or missing from a block reply) are `OPEN`.
    pub async fn extract_fields(&self, job_description: &str) -> Result<ExtractedFieldMap, AppError> {
        match self.mode {
            ExtractionMode::PerField => self.extract_per_field(job_description).await,
            ExtractionMode::Block => self.extract_block(job_description).await,
        }
    }

    /// Extracts, fills and stamps a profile for one job description.
    pub async fn transform(
        &self,
        job_description: &str,
        job_id: &str,
    ) -> Result<FilledProfile, AppError> {
        let extracted = self.extract_fields(job_description).await?;
        let known = extracted.values().filter(|v| v.as_str() != OPEN).count();
        info!(
            "Extracted {known}/{} fields for job {job_id} ({:?} mode)",
            extracted.len(),
            self.mode
        );

        let mut profile = fill(self.template, &extracted, self.fields);
        stamp(&mut profile, job_id, Utc::now());
        Ok(profile)
    }

    async fn extract_per_field(&self, job_description: &str) -> Result<ExtractedFieldMap, AppError> {
        let mut extracted = ExtractedFieldMap::new();
        let mut answered = 0usize;
        let mut asked = 0usize;

        for spec in self.fields.iter().filter(|s| s.is_extracted()) {
            asked += 1;
            debug!("Extracting {}", spec.path);

            let prompt = field_prompt(spec, job_description);
            let value = match self.llm.complete(&prompt, &CompletionOptions::EXTRACTION).await {
                Some(reply) => {
                    answered += 1;
                    spec.clean(&reply)
                }
                None => OPEN.to_string(),
            };
            debug!("  {} = {}", spec.key, value);
            extracted.insert(spec.key.to_string(), value);
        }

        if answered == 0 {
            return Err(AppError::Llm(format!(
                "no reply to any of {asked} field prompts"
            )));
        }
        if answered < asked {
            warn!("{} of {asked} field prompts got no reply", asked - answered);
        }
        Ok(extracted)
    }

    async fn extract_block(&self, job_description: &str) -> Result<ExtractedFieldMap, AppError> {
        let prompt = block_prompt(self.fields, job_description);
        let reply = self
            .llm
            .complete(&prompt, &CompletionOptions::EXTRACTION)
            .await
            .ok_or_else(|| AppError::Llm("no reply to the field block prompt".to_string()))?;

        let block = extract_field_block(&reply);
        debug!("Field block reply carried {} keys", block.len());

        Ok(self
            .fields
            .iter()
            .filter(|s| s.is_extracted())
            .map(|spec| {
                let value = block
                    .get(spec.key)
                    .map(|raw| spec.clean(raw))
                    .unwrap_or_else(|| OPEN.to_string());
                (spec.key.to_string(), value)
            })
            .collect())
    }
}

/// Writes the job id and extraction metadata into a filled profile.
/// Paths missing from the template are left out.
pub fn stamp(profile: &mut FilledProfile, job_id: &str, now: DateTime<Utc>) {
    let stamps = [
        (JOB_ID_PATH, job_id.to_string()),
        (LAST_UPDATED_PATH, now.timestamp().to_string()),
        (SOURCE_PATH, SOURCE_LABEL.to_string()),
        (SCHEMA_VERSION_PATH, SCHEMA_VERSION.to_string()),
    ];
    for (path, value) in stamps {
        if !profile.set_leaf(path, Value::String(value)) {
            debug!("Template has no {path}; not stamped");
        }
    }
}
