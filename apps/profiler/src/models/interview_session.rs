use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewSessionRow {
    pub session_id: Uuid,
    pub template_id: Option<Uuid>,
    pub session_information: Option<Value>,
}
