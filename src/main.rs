use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use heatwave::commands;
use heatwave::models::response::CommandResponse;
use heatwave::{AppState, DirectoryId, SettingsUpdate, StateOptions, Timestamp};

#[derive(Parser)]
#[command(name = "heatwave")]
#[command(about = "Rank the people you mean to keep in touch with", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print the raw JSON response instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Config file (default: ~/.heatwave/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file (default: ~/.heatwave/heatwave.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Sources snapshot (overrides `sources_file` in the config)
    #[arg(long, global = true)]
    sources: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check database, config and sources
    Health,

    /// List tracked contacts, most overdue first
    Rank(RankArgs),

    /// Re-scan the call history for every tracked contact
    Refresh,

    /// List directory entries with a phone number
    Browse {
        /// Only names starting with this
        prefix: Option<String>,
    },

    /// Start tracking contacts by directory id
    Track {
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Stop tracking contacts by directory id
    Untrack {
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Put a tracked contact on a wave
    Assign {
        id: i64,
        #[arg(required_unless_present = "none")]
        wave: Option<String>,
        /// Take the contact off its wave
        #[arg(long, conflicts_with = "wave")]
        none: bool,
    },

    /// Print the number to call for a contact
    Dial { id: i64 },

    /// Manage waves
    #[command(subcommand)]
    Waves(WaveCommands),

    /// Show or change settings
    Settings(SettingsArgs),
}

#[derive(Args)]
struct RankArgs {
    /// Re-scan the call history first
    #[arg(long, conflicts_with = "no_refresh")]
    refresh: bool,

    /// Use cached last contact times only
    #[arg(long)]
    no_refresh: bool,

    /// Rank as of this unix timestamp instead of now
    #[arg(long)]
    now: Option<Timestamp>,
}

#[derive(Subcommand)]
enum WaveCommands {
    /// List waves and how many contacts each has
    List,

    /// Create a wave (an existing wave of that name is returned unchanged)
    Create {
        name: String,
        #[arg(long)]
        days: i64,
    },

    /// Rename a wave or change its wavelength
    Update {
        name: String,
        #[arg(long)]
        rename: Option<String>,
        #[arg(long)]
        days: Option<i64>,
    },

    /// Delete a wave and unassign its contacts
    Delete { name: String },
}

#[derive(Args)]
struct SettingsArgs {
    /// Shortest call (seconds) that counts as contact
    #[arg(long)]
    min_call_duration: Option<i64>,

    /// Ignore missed calls
    #[arg(long)]
    exclude_missed: Option<bool>,

    /// Refresh from the call history before ranking
    #[arg(long)]
    refresh_on_rank: Option<bool>,

    /// Default sources snapshot
    #[arg(long)]
    sources_file: Option<PathBuf>,
}

impl SettingsArgs {
    fn into_update(self) -> Option<SettingsUpdate> {
        let update = SettingsUpdate {
            min_call_duration_secs: self.min_call_duration,
            exclude_missed_calls: self.exclude_missed,
            refresh_on_rank: self.refresh_on_rank,
            sources_file: self.sources_file,
            database_file: None,
        };
        let empty = update.min_call_duration_secs.is_none()
            && update.exclude_missed_calls.is_none()
            && update.refresh_on_rank.is_none()
            && update.sources_file.is_none();
        (!empty).then_some(update)
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print a response as JSON or through `render`; a failed response becomes
/// the process error.
fn emit<T: Serialize>(
    response: CommandResponse<T>,
    json: bool,
    render: impl FnOnce(&T),
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    match (response.success, response.data) {
        (true, Some(data)) => {
            if !json {
                render(&data);
            }
            Ok(())
        }
        _ => bail!(response
            .error
            .unwrap_or_else(|| "command failed".to_string())),
    }
}

fn format_timestamp(timestamp: Option<Timestamp>) -> String {
    timestamp
        .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "never".to_string())
}

fn directory_ids(ids: &[i64]) -> Vec<DirectoryId> {
    ids.iter().copied().map(DirectoryId).collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut state = AppState::open(StateOptions {
        config_path: cli.config,
        database_path: cli.db,
        sources_path: cli.sources,
    })
    .context("Failed to open heatwave state")?;
    let json = cli.json;

    match cli.command {
        Commands::Health => emit(commands::get_health(&state), json, |health| {
            println!(
                "{} (database: {}, config: {}, sources: {})",
                health.status, health.database, health.config, health.sources
            );
        }),
        Commands::Rank(args) => {
            let refresh = match (args.refresh, args.no_refresh) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let now = args.now.unwrap_or_else(|| chrono::Utc::now().timestamp());
            emit(commands::ranked_contacts(&state, now, refresh), json, |ranked| {
                for entry in ranked {
                    let contact = &entry.contact;
                    let marker = if entry.is_overdue() { "!" } else { " " };
                    println!(
                        "{} {:>6}  {:<24} {:<12} {:>7}  last: {}",
                        marker,
                        contact.directory_id(),
                        entry.display_name.as_deref().unwrap_or("(unknown)"),
                        contact.wave().map(|w| w.name()).unwrap_or("-"),
                        entry
                            .staleness
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        format_timestamp(contact.last_contact()),
                    );
                }
            })
        }
        Commands::Refresh => emit(commands::refresh_contacts(&state), json, |reports| {
            for report in reports {
                match &report.error {
                    Some(error) => println!("{:>6}  error: {}", report.directory_id, error),
                    None => println!(
                        "{:>6}  {}",
                        report.directory_id,
                        format_timestamp(report.last_contact)
                    ),
                }
            }
        }),
        Commands::Browse { prefix } => emit(
            commands::browse_contacts(&state, prefix.as_deref()),
            json,
            |contacts| {
                for contact in contacts {
                    let marker = if contact.tracked { "*" } else { " " };
                    println!(
                        "{} {:>6}  {}",
                        marker, contact.directory_id, contact.display_name
                    );
                }
            },
        ),
        Commands::Track { ids } => emit(
            commands::update_selection(&state, &directory_ids(&ids), &[]),
            json,
            |outcome| {
                println!("tracked {}", outcome.added.succeeded.len());
                for (id, error) in &outcome.added.failed {
                    println!("{:>6}  error: {}", id, error);
                }
            },
        ),
        Commands::Untrack { ids } => emit(
            commands::update_selection(&state, &[], &directory_ids(&ids)),
            json,
            |outcome| {
                println!("untracked {}", outcome.removed.succeeded.len());
                for (id, error) in &outcome.removed.failed {
                    println!("{:>6}  error: {}", id, error);
                }
            },
        ),
        Commands::Assign { id, wave, none } => {
            let wave = if none { None } else { wave };
            emit(
                commands::assign_contact(&state, DirectoryId(id), wave.as_deref()),
                json,
                |contact| match contact.wave() {
                    Some(wave) => println!("{} -> {}", contact.directory_id(), wave),
                    None => println!("{} -> no wave", contact.directory_id()),
                },
            )
        }
        Commands::Dial { id } => emit(
            commands::dial_contact(&state, DirectoryId(id)),
            json,
            |number| println!("{}", number),
        ),
        Commands::Waves(command) => match command {
            WaveCommands::List => emit(commands::list_waves(&state), json, |waves| {
                for summary in waves {
                    println!(
                        "{:<20} {:>6}  {} contacts",
                        summary.wave.name(),
                        summary.wave.wavelength().to_string(),
                        summary.members
                    );
                }
            }),
            WaveCommands::Create { name, days } => emit(
                commands::create_wave(&state, &name, days),
                json,
                |wave| println!("{}", wave),
            ),
            WaveCommands::Update {
                name,
                rename,
                days,
            } => emit(
                commands::update_wave(&state, &name, rename, days),
                json,
                |wave| println!("{}", wave),
            ),
            WaveCommands::Delete { name } => emit(
                commands::delete_wave(&state, &name),
                json,
                |cleared| println!("deleted '{}', {} contacts unassigned", name, cleared),
            ),
        },
        Commands::Settings(args) => {
            let response = match args.into_update() {
                Some(update) => commands::update_settings(&mut state, update),
                None => commands::get_settings(&state),
            };
            emit(response, json, |config| {
                println!("min_call_duration_secs: {}", config.min_call_duration_secs);
                println!("exclude_missed_calls:   {}", config.exclude_missed_calls);
                println!("refresh_on_rank:        {}", config.refresh_on_rank);
                if let Some(path) = &config.sources_file {
                    println!("sources_file:           {}", path.display());
                }
            })
        }
    }
}
