//! CLI entrypoint for panel-consult
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use consult_application::{
    ConsultationEngine, ConsultationSession, NoRunObserver, RunObserver, RunOutcome,
};
use consult_domain::{ConsultationId, NewConsultation, OutputFormat};
use consult_infrastructure::{
    ConfigLoader, FileConfig, HttpClientConfig, HttpConsultationClient, JsonlTranscriptLogger,
};
use consult_presentation::{Cli, Command, ConsoleFormatter, ProgressReporter, SimpleProgress};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

type Session = ConsultationSession<HttpConsultationClient, HttpConsultationClient>;

/// Conventional exit status after SIGINT
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };

    let log_dir = cli.log_dir.clone().or_else(|| config.logging.log_dir());
    let _log_guard = init_tracing(cli.verbose, log_dir.as_deref());

    check_config(&config)?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    let Some(command) = cli.command.clone() else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();

    // Live turn output only makes sense for human-readable formats
    let live = !cli.quiet && format != OutputFormat::Json;
    let observer: Arc<dyn RunObserver> = if !live {
        Arc::new(NoRunObserver)
    } else if std::io::stdout().is_terminal() {
        Arc::new(ProgressReporter::new())
    } else {
        Arc::new(SimpleProgress)
    };

    let session = build_session(&config, observer)?;
    info!(base_url = %config.server.base_url, "Starting panel-consult");

    let app = App {
        session,
        format,
        live,
    };
    app.dispatch(command).await
}

/// Initialize logging based on verbosity level; `RUST_LOG` wins when set.
///
/// The returned guard must live until exit so the file writer flushes.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "panel-consult.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}

fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue.message);
    }

    let errors: Vec<&str> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.message.as_str())
        .collect();
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}

fn build_session(config: &FileConfig, observer: Arc<dyn RunObserver>) -> Result<Session> {
    // === Dependency Injection ===
    let http = Arc::new(
        HttpConsultationClient::new(&HttpClientConfig {
            base_url: config.server.base_url.clone(),
            timeout: config.server.timeout(),
            access_token: config.server.access_token.clone(),
        })
        .context("Failed to create HTTP client")?,
    );

    let mut engine = ConsultationEngine::new(Arc::clone(&http), http)
        .with_config(config.engine.to_engine_config())
        .with_observer(observer);

    if let Some(dir) = config.logging.transcript_dir() {
        info!(dir = %dir.display(), "Writing transcripts");
        engine = engine.with_transcript_logger(Arc::new(JsonlTranscriptLogger::new(dir)));
    }

    Ok(ConsultationSession::new(engine))
}

struct App {
    session: Session,
    format: OutputFormat,
    live: bool,
}

impl App {
    async fn dispatch(&self, command: Command) -> Result<ExitCode> {
        match command {
            Command::Start {
                problem,
                profile,
                no_run,
            } => self.start(problem, profile, no_run).await,
            Command::Run { id } => self.resume(&parse_id(&id)?).await,
            Command::Show { id } => {
                self.session.load(&parse_id(&id)?).await?;
                self.print_consultation(None);
                Ok(ExitCode::SUCCESS)
            }
            Command::History => {
                let consultations = self.session.history().await?;
                match self.format {
                    OutputFormat::Json => {
                        println!("{}", ConsoleFormatter::format_value_json(&consultations))
                    }
                    _ => print!("{}", ConsoleFormatter::format_history(&consultations)),
                }
                Ok(ExitCode::SUCCESS)
            }
            Command::Triage { problem } => {
                let triage = self.session.triage(&problem).await?;
                match self.format {
                    OutputFormat::Json => println!("{}", ConsoleFormatter::format_value_json(&triage)),
                    _ => print!("{}", ConsoleFormatter::format_triage(&triage)),
                }
                Ok(ExitCode::SUCCESS)
            }
            Command::Emergency { id } => {
                let guide = self.session.emergency_guide(&parse_id(&id)?).await?;
                match self.format {
                    OutputFormat::Json => println!("{}", ConsoleFormatter::format_value_json(&guide)),
                    _ => print!("{}", ConsoleFormatter::format_emergency_guide(&guide)),
                }
                Ok(ExitCode::SUCCESS)
            }
        }
    }

    async fn start(
        &self,
        problem: String,
        profile: Option<String>,
        no_run: bool,
    ) -> Result<ExitCode> {
        let mut request = NewConsultation::new(problem)?;
        if let Some(profile) = profile {
            request = request.with_patient_profile(profile);
        }

        let consultation = self.session.start(request).await?;

        if no_run {
            self.print_consultation(None);
            return Ok(ExitCode::SUCCESS);
        }

        if self.live {
            println!("Consultation {} opened", consultation.id);
            print!("{}", ConsoleFormatter::format_transcript(&self.session.transcript()));
        }
        self.run_and_report(&consultation.id).await
    }

    async fn resume(&self, consultation_id: &ConsultationId) -> Result<ExitCode> {
        let consultation = self.session.load(consultation_id).await?;

        if consultation.is_finished() {
            info!(consultation_id = %consultation_id, status = %consultation.status, "Nothing to run");
            self.print_consultation(None);
            return Ok(ExitCode::SUCCESS);
        }

        if self.live {
            print!("{}", ConsoleFormatter::format_transcript(&self.session.transcript()));
        }
        self.run_and_report(consultation_id).await
    }

    /// Run with Ctrl-C wired to cooperative cancellation, then print the result.
    async fn run_and_report(&self, consultation_id: &ConsultationId) -> Result<ExitCode> {
        let canceller = self.session.clone();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping after the current step");
                canceller.cancel();
            }
        });

        let outcome = self.session.run_for(consultation_id).await;
        interrupt.abort();

        if self.live {
            // Turns were already streamed by the observer
            print!("{}", ConsoleFormatter::format_outcome(&outcome));
            if self.format == OutputFormat::Full
                && let Some(summary) = self.session.summary()
            {
                print!("\n{}", ConsoleFormatter::format_summary(&summary));
            }
        } else {
            self.print_consultation(Some(&outcome));
        }

        Ok(match outcome {
            RunOutcome::Completed => ExitCode::SUCCESS,
            RunOutcome::Cancelled => ExitCode::from(EXIT_INTERRUPTED),
            RunOutcome::Failed(_) | RunOutcome::AlreadyRunning => ExitCode::FAILURE,
        })
    }

    fn print_consultation(&self, outcome: Option<&RunOutcome>) {
        let consultation = self.session.consultation();
        let turns = self.session.transcript();
        match self.format {
            OutputFormat::Full => print!(
                "{}",
                ConsoleFormatter::format(consultation.as_ref(), &turns, outcome)
            ),
            OutputFormat::Transcript => {
                print!("{}", ConsoleFormatter::format_transcript(&turns));
                if let Some(outcome) = outcome {
                    print!("{}", ConsoleFormatter::format_outcome(outcome));
                }
            }
            OutputFormat::Json => println!(
                "{}",
                ConsoleFormatter::format_json(consultation.as_ref(), &turns, outcome)
            ),
        }
    }
}

fn parse_id(raw: &str) -> Result<ConsultationId> {
    ConsultationId::new(raw).with_context(|| format!("Invalid consultation id '{}'", raw))
}
