//! CLI entrypoint and subcommand orchestration.

mod config;
#[cfg(test)]
mod test_support;
mod tui;

use clap::{Parser, Subcommand};
use proto::{SessionRecord, SessionSummary};

#[cfg(not(test))]
use std::sync::Arc;

#[cfg(not(test))]
use backend::{ConsoleApi, HttpBackend};
#[cfg(not(test))]
use config::Config;
#[cfg(not(test))]
use proto::{CreateSessionRequest, SessionId};
#[cfg(not(test))]
use tracing::{info, warn};
#[cfg(not(test))]
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Top-level command-line arguments for the convosphere console.
#[derive(Parser)]
#[command(name = "convosphere")]
#[command(about = "Dual-pane operator console for client chats", version = "0.1.0")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable debug logging to ~/.convosphere/logs/debug.log
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Backend origin, overrides config and CONVOSPHERE_API_BASE
    #[arg(long)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// CLI subcommands available in the application.
#[derive(Subcommand)]
enum Commands {
    /// Start the full-screen console (default when no subcommand is given)
    Tui,

    /// Inspect or create chat sessions
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Check that the backend is reachable
    Health,
}

/// `sessions` sub-subcommands.
#[derive(Subcommand)]
enum SessionCommands {
    /// List every session the backend knows about
    List,
    /// Create a session; omitted fields are sent as empty strings
    Create {
        /// Client phone number
        #[arg(long, default_value = "")]
        phone: String,
        /// Client display name
        #[arg(long, default_value = "")]
        name: String,
        /// Free-form client details
        #[arg(long, default_value = "")]
        details: String,
    },
    /// Print a session's metadata and assistant transcript
    Show {
        /// Session id as listed by `sessions list`
        id: String,
    },
}

impl Commands {
    fn label(&self) -> &'static str {
        match self {
            Commands::Tui => "tui",
            Commands::Sessions { command } => match command {
                SessionCommands::List => "sessions list",
                SessionCommands::Create { .. } => "sessions create",
                SessionCommands::Show { .. } => "sessions show",
            },
            Commands::Health => "health",
        }
    }
}

#[cfg(not(test))]
#[tokio::main]
/// Program entrypoint.
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Tui);
    let is_tui = matches!(command, Commands::Tui);

    // Console output would corrupt the alternate screen, so TUI mode logs to a sink.
    // With --debug, debug-level logs go to ~/.convosphere/logs/debug.YYYY-MM-DD.log.
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    // WorkerGuard must outlive main() so buffered file writes are flushed on exit.
    let _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>;

    let debug_writer = if cli.debug {
        let log_dir = Config::home_dir()
            .unwrap_or_else(|| std::path::PathBuf::from(".convosphere"))
            .join("logs");
        std::fs::create_dir_all(&log_dir).ok();
        let appender = tracing_appender::rolling::daily(&log_dir, "debug.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        _file_guard = Some(guard);
        Some(writer)
    } else {
        _file_guard = None;
        None
    };

    match (is_tui, debug_writer) {
        (true, Some(writer)) => {
            let console = fmt::layer()
                .with_writer(std::io::sink)
                .with_target(false)
                .with_filter(console_filter);
            let file = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .with_filter(EnvFilter::new(
                    "debug,hyper=info,hyper_util=info,rustls=info,reqwest=info",
                ));
            tracing_subscriber::registry()
                .with(console)
                .with(file)
                .init();
        }
        (true, None) => {
            fmt()
                .with_env_filter(console_filter)
                .with_writer(std::io::sink)
                .with_target(false)
                .init();
        }
        (false, Some(writer)) => {
            let console = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(console_filter);
            let file = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .with_filter(EnvFilter::new(
                    "debug,hyper=info,hyper_util=info,rustls=info,reqwest=info",
                ));
            tracing_subscriber::registry()
                .with(console)
                .with(file)
                .init();
        }
        (false, None) => {
            fmt()
                .with_env_filter(console_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
    }

    if cli.debug {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            command = command.label(),
            log_level = %cli.log_level,
            "========== convosphere session start =========="
        );
    }

    let mut config = Config::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!("Failed to load config ({e}), using defaults");
        Config::default()
    });
    if let Some(base) = cli.api_base {
        config.backend.base_url = base;
        config.validate()?;
    }

    match command {
        Commands::Tui => cmd_tui(config).await,
        Commands::Sessions { command } => match command {
            SessionCommands::List => cmd_sessions_list(config).await,
            SessionCommands::Create {
                phone,
                name,
                details,
            } => {
                let req = CreateSessionRequest {
                    client_phone: phone,
                    client_name: name,
                    client_details: details,
                };
                cmd_sessions_create(config, req).await
            }
            SessionCommands::Show { id } => cmd_sessions_show(config, id).await,
        },
        Commands::Health => cmd_health(config).await,
    }
}

#[cfg(not(test))]
fn build_backend(config: &Config) -> HttpBackend {
    HttpBackend::new(config.backend.base_url.clone())
        .with_poll_batch_size(config.backend.poll_batch_size)
}

#[cfg(not(test))]
/// Starts the full-screen dual-pane console.
async fn cmd_tui(config: Config) -> anyhow::Result<()> {
    let api: Arc<dyn ConsoleApi> = Arc::new(build_backend(&config));
    info!(base_url = %config.backend.base_url, "Starting console");
    tui::run_tui(api, config.console_settings(), config.backend.base_url.clone()).await
}

#[cfg(not(test))]
async fn cmd_sessions_list(config: Config) -> anyhow::Result<()> {
    let backend = build_backend(&config);
    let sessions = backend.list_sessions().await?;
    if sessions.is_empty() {
        println!("No sessions yet.");
        return Ok(());
    }
    for summary in &sessions {
        println!("{}", format_session_line(summary));
    }
    Ok(())
}

#[cfg(not(test))]
async fn cmd_sessions_create(config: Config, req: CreateSessionRequest) -> anyhow::Result<()> {
    let backend = build_backend(&config);
    let created = backend.create_session(req).await?;
    info!(session = %created.id, "Session created");
    println!("{}", created.id);
    Ok(())
}

#[cfg(not(test))]
async fn cmd_sessions_show(config: Config, id: String) -> anyhow::Result<()> {
    let backend = build_backend(&config);
    let envelope = backend.get_session(&SessionId::from(id)).await?;
    println!("Session   {}", envelope.id);
    for line in format_record(&envelope.chat) {
        println!("{line}");
    }
    Ok(())
}

#[cfg(not(test))]
async fn cmd_health(config: Config) -> anyhow::Result<()> {
    let backend = build_backend(&config);
    let status = backend.health().await?;
    println!("{} {}", config.backend.base_url, status.status);
    Ok(())
}

/// One tab-separated row of `sessions list`: id, label, start time.
fn format_session_line(summary: &SessionSummary) -> String {
    format!(
        "{}\t{}\t{}",
        summary.id,
        summary.label(),
        summary.metadata.start_timestamp.as_deref().unwrap_or("-")
    )
}

/// Metadata block followed by the paired transcript.
fn format_record(record: &SessionRecord) -> Vec<String> {
    let meta = &record.metadata;
    let field = |v: &Option<String>| v.clone().filter(|s| !s.is_empty()).unwrap_or_else(|| "-".to_string());
    let mut lines = vec![
        format!("Client    {}", field(&meta.client_name)),
        format!("Phone     {}", field(&meta.client_phone)),
        format!("Details   {}", field(&meta.client_details)),
        format!("Started   {}", field(&meta.start_timestamp)),
        String::new(),
    ];
    if record.is_transcript_empty() {
        lines.push("(no assistant turns yet)".to_string());
        return lines;
    }
    for turn in record.transcript() {
        lines.push(format!("You:        {}", turn.user));
        lines.push(format!("ConvoSphere: {}", turn.reply));
    }
    lines
}
