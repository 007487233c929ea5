//! # Daybell CLI
//!
//! Daily birthday and calendar event digests, delivered to a messaging channel.
//!
//! Usage:
//!   daybell run                        # Check now, then every day at the configured time
//!   daybell check birthdays            # One check, then exit
//!   daybell doctor                     # Verify Google and Telegram access
//!   daybell config show                # Show configuration (secrets masked)

mod doctor;

use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use daybell_core::DaybellConfig;
use daybell_core::traits::CredentialProvider;
use daybell_notifier::{BirthdayClassifier, Notifier, TickReport};
use daybell_providers::GoogleCredentials;
use daybell_scheduler::{DailySchedule, SchedulerEngine};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "daybell",
    version,
    about = "🔔 Daybell — birthday and calendar digests for your chat",
    long_about = "Checks Google Calendar and Google Contacts every day and posts\ntoday's birthdays and today's/tomorrow's events to Telegram."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daily schedule until Ctrl+C
    Run {
        /// Skip the check normally done at startup
        #[arg(long)]
        no_initial_check: bool,
    },

    /// Run one check now and exit
    Check {
        #[arg(value_enum, default_value_t = CheckTarget::All)]
        target: CheckTarget,
    },

    /// Diagnose credentials, calendar, contacts and channel access
    Doctor,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show system info
    Info,
}

#[derive(Clone, Copy, ValueEnum)]
enum CheckTarget {
    All,
    Birthdays,
    Events,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    let config = match &cli.config {
        Some(path) => DaybellConfig::load_from(std::path::Path::new(path))?,
        None => DaybellConfig::load()?,
    };

    match cli.command {
        Commands::Run { no_initial_check } => {
            config.validate()?;
            let schedule = DailySchedule::new(config.schedule.hour, config.schedule.minute)?;
            let notifier = Arc::new(build_notifier(&config)?);

            println!("🔔 Daybell v{}", env!("CARGO_PKG_VERSION"));
            println!("   Calendar: {}", config.calendar.calendar_id);
            println!("   Channel: {}", config.channel.kind);
            println!("   Daily at: {schedule}");
            println!("\nRunning. Press Ctrl+C to stop.");

            if config.schedule.run_on_start && !no_initial_check {
                let notifier = notifier.clone();
                tokio::spawn(async move {
                    notifier.run_tick(Local::now().date_naive()).await;
                });
            }

            let engine = SchedulerEngine::new(schedule);
            engine
                .run(
                    move || {
                        let notifier = notifier.clone();
                        async move {
                            notifier.run_tick(Local::now().date_naive()).await;
                        }
                    },
                    shutdown_signal(),
                )
                .await;
            println!("\n👋 Daybell stopped.");
        }

        Commands::Check { target } => {
            config.validate()?;
            let notifier = build_notifier(&config)?;
            let today = Local::now().date_naive();

            let report = match target {
                CheckTarget::All => notifier.run_tick(today).await,
                CheckTarget::Birthdays => {
                    let mut report = TickReport::default();
                    report.push(
                        daybell_core::types::NotificationKind::Birthdays,
                        notifier.check_birthdays(today).await,
                    );
                    report
                }
                CheckTarget::Events => TickReport {
                    outcomes: notifier.check_events(today).await,
                },
            };

            for (kind, outcome) in &report.outcomes {
                let icon = if outcome.is_failed() { "❌" } else { "✅" };
                println!("{icon} {kind}: {outcome}");
            }
            if report.has_failures() {
                anyhow::bail!("one or more checks failed");
            }
        }

        Commands::Doctor => {
            let failures = doctor::run(&config).await;
            if failures > 0 {
                anyhow::bail!("{failures} diagnostic check(s) failed");
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&config.masked())?;
                println!("{content}");
            }
        },

        Commands::Info => {
            println!("🔔 Daybell v{}", env!("CARGO_PKG_VERSION"));
            println!("   Platform: {} / {}", std::env::consts::OS, std::env::consts::ARCH);
            println!(
                "   Config: {}",
                cli.config
                    .clone()
                    .unwrap_or_else(|| DaybellConfig::default_path().display().to_string())
            );
            println!("   Schedule: {:02}:{:02} local", config.schedule.hour, config.schedule.minute);
            println!(
                "   Calendar: {}",
                if config.calendar.calendar_id.is_empty() { "(not set)" } else { config.calendar.calendar_id.as_str() }
            );
            println!("   Contacts: {}", if config.contacts.enabled { "enabled" } else { "disabled" });
            println!("   Channel: {}", config.channel.kind);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool) {
    let default = if verbose { "daybell=debug" } else { "daybell=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
    }
}

/// Adapters are built once here and injected; nothing is created lazily.
fn build_notifier(config: &DaybellConfig) -> Result<Notifier> {
    let credentials: Arc<dyn CredentialProvider> = Arc::new(GoogleCredentials::resolve(&config.google));
    let events = daybell_providers::create_event_provider(config, credentials.clone());
    let contacts = daybell_providers::create_contacts_provider(config, credentials);
    let channel = daybell_channels::create_channel(config)?;

    Ok(Notifier::new(
        events,
        contacts,
        channel,
        BirthdayClassifier::from_config(&config.classifier),
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
