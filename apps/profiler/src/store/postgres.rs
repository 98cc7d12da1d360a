use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{InterviewSessionRow, JobTemplateRow};
use crate::store::{ColumnTarget, Store};

const JOB_TEMPLATE_COLUMNS: &str =
    "template_id, user_job_description, template_name, job_role, created_at";

/// `Store` backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn job_template(&self, template_id: Uuid) -> Result<Option<JobTemplateRow>, AppError> {
        let sql = format!("SELECT {JOB_TEMPLATE_COLUMNS} FROM job_templates WHERE template_id = $1");
        let row = sqlx::query_as::<_, JobTemplateRow>(&sql)
            .bind(template_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn pending_job_templates(
        &self,
        limit: Option<i64>,
    ) -> Result<Vec<JobTemplateRow>, AppError> {
        // LIMIT NULL means no limit in PostgreSQL.
        let sql = format!(
            r#"
            SELECT {JOB_TEMPLATE_COLUMNS}
            FROM job_templates
            WHERE initial_json_schema IS NULL AND is_active = true
            ORDER BY created_at DESC
            LIMIT $1
            "#
        );
        let rows = sqlx::query_as::<_, JobTemplateRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn interview_session(
        &self,
        session_id: Uuid,
    ) -> Result<Option<InterviewSessionRow>, AppError> {
        let row: Option<InterviewSessionRow> = sqlx::query_as(
            "SELECT session_id, template_id, session_information FROM interview_sessions WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn write_column(
        &self,
        target: ColumnTarget,
        id: Uuid,
        value: &Value,
    ) -> Result<u64, AppError> {
        // Identifiers come from ColumnTarget's fixed set, never from input.
        let sql = format!(
            "UPDATE {} SET {} = $1 WHERE {} = $2",
            target.table(),
            target.column(),
            target.key_column()
        );
        let result = sqlx::query(&sql)
            .bind(sqlx::types::Json(value))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn read_column(&self, target: ColumnTarget, id: Uuid) -> Result<Option<Value>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1",
            target.column(),
            target.table(),
            target.key_column()
        );
        let row: Option<(Option<Value>,)> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.and_then(|(value,)| value))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
