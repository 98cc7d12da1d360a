// Job pipeline: selects job descriptions, transforms them into profiles and
// persists the result.

pub mod prompts;
pub mod transformer;

pub use transformer::{stamp, ExtractionMode, JobTransformer};

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::output::{write_backup, write_json};
use crate::schema::template::get;
use crate::schema::{FilledProfile, OPEN};
use crate::store::{write_verified, ColumnTarget, Store};

const TITLE_PATH: &str = "jobProfile.coreDetails.title";

/// Which job templates a run processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSelection {
    ById(Uuid),
    /// Newest active template without a profile.
    LatestPending,
    AllPending,
    Ids(Vec<Uuid>),
}

impl JobSelection {
    pub async fn resolve(&self, store: &dyn Store) -> Result<Vec<Uuid>, AppError> {
        match self {
            JobSelection::ById(id) => Ok(vec![*id]),
            JobSelection::Ids(ids) => Ok(ids.clone()),
            JobSelection::LatestPending => {
                let rows = store.pending_job_templates(Some(1)).await?;
                let row = rows.into_iter().next().ok_or_else(|| {
                    AppError::NotFound("No pending job templates".to_string())
                })?;
                Ok(vec![row.template_id])
            }
            JobSelection::AllPending => {
                let rows = store.pending_job_templates(None).await?;
                Ok(rows.into_iter().map(|row| row.template_id).collect())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub template_id: Uuid,
    pub title: String,
    pub backup: Option<PathBuf>,
}

/// Fetches one job template, transforms it and saves the profile.
///
/// The local backup is best effort: a failed backup is logged and does not
/// fail a profile that is already stored.
pub async fn process_job_template(
    store: &dyn Store,
    transformer: &JobTransformer<'_>,
    template_id: Uuid,
    backup_dir: Option<&Path>,
) -> Result<JobOutcome, AppError> {
    let row = store
        .job_template(template_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job template {template_id} not found")))?;

    let description = row.description().ok_or_else(|| {
        AppError::Extraction(format!("Job template {template_id} has no job description"))
    })?;

    info!(
        "Processing job template {template_id} ({} chars, name: {})",
        description.len(),
        row.template_name.as_deref().unwrap_or("-")
    );

    let profile = transformer
        .transform(description, &template_id.to_string())
        .await?;
    let title = profile_title(&profile);
    let value = profile.into_value();

    write_verified(store, ColumnTarget::InitialJsonSchema, template_id, &value).await?;

    let backup = match backup_dir {
        Some(dir) => match write_backup(dir, &template_id.to_string(), "profile", &value).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Profile for {template_id} saved, but local backup failed: {e}");
                None
            }
        },
        None => None,
    };

    Ok(JobOutcome {
        template_id,
        title,
        backup,
    })
}

/// File-to-file flow: no database involved. The input file stem is the job id.
pub async fn transform_file(
    transformer: &JobTransformer<'_>,
    input: &Path,
    output: &Path,
) -> Result<FilledProfile, AppError> {
    let description = tokio::fs::read_to_string(input).await.map_err(|e| {
        AppError::NotFound(format!("Cannot read job description {}: {e}", input.display()))
    })?;
    let description = description.trim();
    if description.is_empty() {
        return Err(AppError::Extraction(format!(
            "{} contains no job description",
            input.display()
        )));
    }

    let job_id = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let profile = transformer.transform(description, &job_id).await?;
    write_json(output, &profile).await?;
    Ok(profile)
}

pub fn profile_title(profile: &FilledProfile) -> String {
    get(profile.as_value(), TITLE_PATH)
        .and_then(|v| v.as_str())
        .unwrap_or(OPEN)
        .to_string()
}
