//! Command-line surface of the `profiler` binary.
//!
//! ## Commands
//!
//! - `transform`: build job profiles for stored job templates
//! - `transform-file`: build a job profile from a text file, no database
//! - `evaluate`: score stored interview sessions
//! - `check`: verify the completion endpoint and database are reachable

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};
use uuid::Uuid;

use crate::config::Config;
use crate::job::{ExtractionMode, JobSelection};

#[derive(Debug, Parser)]
#[command(name = "profiler")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Job profile extraction and interview evaluation", long_about = None)]
pub struct Cli {
    /// Completion endpoint URL (overrides OLLAMA_URL)
    #[arg(long, global = true)]
    pub ollama_url: Option<String>,

    /// Model name (overrides OLLAMA_MODEL)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Template file (overrides TEMPLATE_PATH)
    #[arg(long, global = true)]
    pub template: Option<PathBuf>,

    /// Directory for local result copies (overrides OUTPUT_DIR)
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build job profiles for stored job templates (default: latest pending)
    #[command(group(ArgGroup::new("selection").args(["template_id", "all_pending", "batch_file"])))]
    Transform {
        /// Process a single template
        #[arg(long)]
        template_id: Option<Uuid>,

        /// Process every pending template, newest first
        #[arg(long)]
        all_pending: bool,

        /// File with one template id per line
        #[arg(long)]
        batch_file: Option<PathBuf>,

        /// How field values are requested from the model
        #[arg(long, value_enum, default_value_t = ExtractionMode::PerField)]
        mode: ExtractionMode,

        /// Skip the local copy in the output directory
        #[arg(long)]
        no_backup: bool,
    },

    /// Build a job profile from a job description file
    TransformFile {
        /// Job description text file
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the profile JSON
        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, value_enum, default_value_t = ExtractionMode::PerField)]
        mode: ExtractionMode,
    },

    /// Score stored interview sessions
    #[command(group(ArgGroup::new("sessions").required(true).args(["session_id", "batch_file"])))]
    Evaluate {
        /// Evaluate a single session
        #[arg(long)]
        session_id: Option<Uuid>,

        /// File with one session id per line
        #[arg(long)]
        batch_file: Option<PathBuf>,

        /// Skip the local copy in the output directory
        #[arg(long)]
        no_backup: bool,
    },

    /// Check that the completion endpoint and database are reachable
    Check,
}

impl Cli {
    /// Applies global flags on top of the environment configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.ollama_url {
            config.ollama_url = url.clone();
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(template) = &self.template {
            config.template_path = template.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.verbose {
            config.rust_log = "debug".to_string();
        }
    }
}

/// Job selection for `transform` when the ids are known up front.
/// Batch files are read by the caller and passed as `JobSelection::Ids`.
pub fn job_selection(template_id: Option<Uuid>, all_pending: bool) -> JobSelection {
    match (template_id, all_pending) {
        (Some(id), _) => JobSelection::ById(id),
        (None, true) => JobSelection::AllPending,
        (None, false) => JobSelection::LatestPending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_defaults_to_latest_pending_per_field() {
        let cli = Cli::try_parse_from(["profiler", "transform"]).unwrap();
        match cli.command {
            Commands::Transform {
                template_id,
                all_pending,
                batch_file,
                mode,
                no_backup,
            } => {
                assert_eq!(job_selection(template_id, all_pending), JobSelection::LatestPending);
                assert!(batch_file.is_none());
                assert_eq!(mode, ExtractionMode::PerField);
                assert!(!no_backup);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_transform_selection_flags_conflict() {
        let id = Uuid::new_v4().to_string();
        assert!(Cli::try_parse_from(["profiler", "transform", "--template-id", &id, "--all-pending"])
            .is_err());
    }

    #[test]
    fn test_block_mode_flag() {
        let cli = Cli::try_parse_from(["profiler", "transform", "--mode", "block", "--all-pending"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Transform { mode: ExtractionMode::Block, all_pending: true, .. }
        ));
    }

    #[test]
    fn test_evaluate_requires_a_session_source() {
        assert!(Cli::try_parse_from(["profiler", "evaluate"]).is_err());

        let id = Uuid::new_v4();
        let cli = Cli::try_parse_from(["profiler", "evaluate", "--session-id", &id.to_string()])
            .unwrap();
        assert!(matches!(cli.command, Commands::Evaluate { session_id: Some(s), .. } if s == id));
    }

    #[test]
    fn test_global_flags_override_config() {
        let cli = Cli::try_parse_from([
            "profiler",
            "check",
            "--model",
            "mistral",
            "--output-dir",
            "/tmp/out",
            "-v",
        ])
        .unwrap();
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.model, "mistral");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.rust_log, "debug");
        assert_eq!(config.ollama_url, crate::config::DEFAULT_OLLAMA_URL);
    }
}
