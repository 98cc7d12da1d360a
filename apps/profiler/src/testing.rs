//! In-memory fakes for the completion endpoint and the store (testing only).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{Completion, CompletionOptions};
use crate::models::{InterviewSessionRow, JobTemplateRow};
use crate::schema::Template;
use crate::store::{ColumnTarget, Store};

/// The template bundled with the repository.
pub fn sample_template() -> Template {
    Template::from_json(include_str!("../../../JSON_Template/json_template.json"))
        .expect("bundled template is valid")
}

// ---------------------------------------------------------------------------
// ScriptedCompletion
// ---------------------------------------------------------------------------

/// Completion fake. A prompt is answered by the first rule whose needle it
/// contains, otherwise by the fallback.
#[derive(Debug, Default)]
pub struct ScriptedCompletion {
    rules: Vec<(String, Option<String>)>,
    fallback: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    /// Never answers, like an endpoint that always times out.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn always(reply: &str) -> Self {
        Self {
            fallback: Some(reply.to_string()),
            ..Self::default()
        }
    }

    pub fn when(mut self, needle: &str, reply: Option<&str>) -> Self {
        self.rules
            .push((needle.to_string(), reply.map(str::to_string)));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completion for ScriptedCompletion {
    async fn complete(&self, prompt: &str, _options: &CompletionOptions) -> Option<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some((_, reply)) = self.rules.iter().find(|(needle, _)| prompt.contains(needle)) {
            return reply.clone();
        }
        self.fallback.clone()
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Tables {
    templates: Vec<JobTemplateRow>,
    sessions: HashMap<Uuid, InterviewSessionRow>,
    columns: HashMap<(ColumnTarget, Uuid), Value>,
}

/// In-memory store. `dropping_writes` makes every UPDATE report one affected
/// row while leaving the column NULL.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    drop_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dropping_writes(mut self) -> Self {
        self.drop_writes = true;
        self
    }

    /// Adds an active, unprocessed template. Later additions are newer.
    pub fn add_job_template(&self, description: &str) -> Uuid {
        let mut tables = self.tables.lock().unwrap();
        let template_id = Uuid::new_v4();
        let offset = Duration::seconds(tables.templates.len() as i64);
        tables.templates.push(JobTemplateRow {
            template_id,
            user_job_description: Some(description.to_string()),
            template_name: Some("Test template".to_string()),
            job_role: None,
            created_at: Some(Utc::now() + offset),
        });
        template_id
    }

    pub fn add_session(&self, template_id: Option<Uuid>, session_information: Option<Value>) -> Uuid {
        let session_id = Uuid::new_v4();
        self.tables.lock().unwrap().sessions.insert(
            session_id,
            InterviewSessionRow {
                session_id,
                template_id,
                session_information,
            },
        );
        session_id
    }

    pub fn column(&self, target: ColumnTarget, id: Uuid) -> Option<Value> {
        self.tables
            .lock()
            .unwrap()
            .columns
            .get(&(target, id))
            .cloned()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn job_template(&self, template_id: Uuid) -> Result<Option<JobTemplateRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .templates
            .iter()
            .find(|row| row.template_id == template_id)
            .cloned())
    }

    async fn pending_job_templates(
        &self,
        limit: Option<i64>,
    ) -> Result<Vec<JobTemplateRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut pending: Vec<JobTemplateRow> = tables
            .templates
            .iter()
            .filter(|row| {
                !tables
                    .columns
                    .contains_key(&(ColumnTarget::InitialJsonSchema, row.template_id))
            })
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            pending.truncate(limit.max(0) as usize);
        }
        Ok(pending)
    }

    async fn interview_session(
        &self,
        session_id: Uuid,
    ) -> Result<Option<InterviewSessionRow>, AppError> {
        Ok(self.tables.lock().unwrap().sessions.get(&session_id).cloned())
    }

    async fn write_column(
        &self,
        target: ColumnTarget,
        id: Uuid,
        value: &Value,
    ) -> Result<u64, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let exists = match target {
            ColumnTarget::InitialJsonSchema => {
                tables.templates.iter().any(|row| row.template_id == id)
            }
            ColumnTarget::InterviewReport => tables.sessions.contains_key(&id),
        };
        if !exists {
            return Ok(0);
        }
        if !self.drop_writes {
            tables.columns.insert((target, id), value.clone());
        }
        Ok(1)
    }

    async fn read_column(&self, target: ColumnTarget, id: Uuid) -> Result<Option<Value>, AppError> {
        Ok(self.column(target, id))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
