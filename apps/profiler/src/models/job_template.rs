use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A `job_templates` row as read by the job pipeline. The `initial_json_schema`
/// column is written through `store::ColumnTarget`, never read into this struct.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobTemplateRow {
    pub template_id: Uuid,
    pub user_job_description: Option<String>,
    pub template_name: Option<String>,
    pub job_role: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl JobTemplateRow {
    /// The job description, if present and not blank.
    pub fn description(&self) -> Option<&str> {
        self.user_job_description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}
