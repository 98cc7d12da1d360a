mod batch;
mod cli;
mod config;
mod db;
mod errors;
mod evaluation;
mod extraction;
mod job;
mod llm_client;
mod models;
mod output;
mod schema;
mod store;
#[cfg(test)]
mod testing;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::batch::{read_id_file, run_batch, BatchTally};
use crate::cli::{job_selection, Cli, Commands};
use crate::config::Config;
use crate::db::create_pool;
use crate::evaluation::{evaluate_session, EvaluationReportBuilder};
use crate::job::{process_job_template, transform_file, JobSelection, JobTransformer};
use crate::llm_client::LlmClient;
use crate::schema::Template;
use crate::store::{PgStore, Store};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Configuration errors are fatal before any document is touched
    let mut config = Config::from_env()?;
    cli.apply_overrides(&mut config);

    init_tracing(&config, cli.verbose, cli.json);
    info!("Starting profiler v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(&config)?;
    info!("Completion endpoint: {} (model: {})", llm.url(), llm.model());

    match &cli.command {
        Commands::Check => check(&config, &llm).await,
        Commands::TransformFile {
            input,
            output,
            mode,
        } => {
            let template = Template::load(&config.template_path).await?;
            let transformer = JobTransformer::new(&llm, &template, *mode);
            match transform_file(&transformer, input, output).await {
                Ok(profile) => {
                    println!(
                        "Profile '{}' written to {}",
                        job::profile_title(&profile),
                        output.display()
                    );
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    error!("Transform of {} failed ({}): {e}", input.display(), e.kind());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Transform {
            template_id,
            all_pending,
            batch_file,
            mode,
            no_backup,
        } => {
            let template = Template::load(&config.template_path).await?;
            let store = connect(&config).await?;
            let transformer = JobTransformer::new(&llm, &template, *mode);
            let backup_dir = (!no_backup).then_some(config.output_dir.as_path());

            let selection = match batch_file {
                Some(path) => match read_id_file(path).await {
                    Ok(ids) => JobSelection::Ids(ids),
                    Err(e) => {
                        error!("{e}");
                        return Ok(ExitCode::FAILURE);
                    }
                },
                None => job_selection(*template_id, *all_pending),
            };
            let batch = matches!(selection, JobSelection::AllPending | JobSelection::Ids(_));

            let ids = match selection.resolve(&store).await {
                Ok(ids) => ids,
                Err(e) => {
                    error!("{e}");
                    return Ok(ExitCode::FAILURE);
                }
            };

            let (store, transformer) = (&store, &transformer);
            if batch {
                let tally = run_batch(&ids, move |id| {
                    process_job_template(store, transformer, id, backup_dir)
                })
                .await;
                Ok(report_tally("Job profile", &tally, cli.json))
            } else {
                let mut exit = ExitCode::SUCCESS;
                for id in ids {
                    match process_job_template(store, transformer, id, backup_dir).await {
                        Ok(outcome) => println!(
                            "Profile for template {} saved (title: {})",
                            outcome.template_id, outcome.title
                        ),
                        Err(e) => {
                            error!("Template {id} failed ({}): {e}", e.kind());
                            exit = ExitCode::FAILURE;
                        }
                    }
                }
                Ok(exit)
            }
        }
        Commands::Evaluate {
            session_id,
            batch_file,
            no_backup,
        } => {
            let store = connect(&config).await?;
            let evaluator = format!("Ollama {} AI Assistant", config.model);
            let builder = EvaluationReportBuilder::new(&llm).with_evaluator(evaluator);
            let backup_dir = (!no_backup).then_some(config.output_dir.as_path());
            let (store, builder) = (&store, &builder);

            match (session_id, batch_file) {
                (Some(id), _) => match evaluate_session(store, builder, *id, backup_dir).await {
                    Ok(outcome) => {
                        let summary = &outcome.report.evaluation_summary;
                        println!(
                            "Evaluation for session {} saved: overall {}, recommendation '{}'",
                            outcome.session_id,
                            summary
                                .overall_score
                                .map_or_else(|| "n/a".to_string(), |s| s.to_string()),
                            summary.recommendation
                        );
                        Ok(ExitCode::SUCCESS)
                    }
                    Err(e) => {
                        error!("Session {id} failed ({}): {e}", e.kind());
                        Ok(ExitCode::FAILURE)
                    }
                },
                (None, Some(path)) => {
                    let ids = match read_id_file(path).await {
                        Ok(ids) => ids,
                        Err(e) => {
                            error!("{e}");
                            return Ok(ExitCode::FAILURE);
                        }
                    };
                    let tally = run_batch(&ids, move |id| {
                        evaluate_session(store, builder, id, backup_dir)
                    })
                    .await;
                    Ok(report_tally("Evaluation", &tally, cli.json))
                }
                // clap requires one of the two
                (None, None) => Ok(ExitCode::FAILURE),
            }
        }
    }
}

fn init_tracing(config: &Config, verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new(format!("{}=debug", env!("CARGO_PKG_NAME")))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}

async fn connect(config: &Config) -> Result<PgStore> {
    let pool = create_pool(config.require_database_url()?).await?;
    Ok(PgStore::new(pool))
}

async fn check(config: &Config, llm: &LlmClient) -> Result<ExitCode> {
    let mut healthy = true;

    if llm.is_reachable().await {
        println!("Completion endpoint {}: ok", llm.url());
    } else {
        println!("Completion endpoint {}: unreachable", llm.url());
        healthy = false;
    }

    match Template::load(&config.template_path).await {
        Ok(template) => println!(
            "Template {}: ok ({} leaves)",
            config.template_path.display(),
            template.leaves().len()
        ),
        Err(e) => {
            println!("Template {}: {e}", config.template_path.display());
            healthy = false;
        }
    }

    if config.database_url.is_some() {
        let ping = match connect(config).await {
            Ok(store) => store.ping().await.map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };
        match ping {
            Ok(()) => println!("Database: ok"),
            Err(e) => {
                println!("Database: {e:#}");
                healthy = false;
            }
        }
    } else {
        warn!("DATABASE_URL is not set; skipping database check");
    }

    Ok(if healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Prints the batch tally. Non-zero exit when any item failed.
fn report_tally(label: &str, tally: &BatchTally, json: bool) -> ExitCode {
    if json {
        match serde_json::to_string(tally) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!("Failed to serialize tally: {e}"),
        }
    } else {
        println!("{label} batch completed");
        println!("Success rate: {:.1}%", tally.success_rate());
        println!("Successful: {}", tally.succeeded.len());
        println!("Failed: {}", tally.failed.len());
        for (kind, count) in tally.failures_by_kind() {
            println!("  {kind}: {count}");
        }
        for failure in &tally.failed {
            println!("  {} ({}): {}", failure.id, failure.kind, failure.message);
        }
    }

    if tally.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

