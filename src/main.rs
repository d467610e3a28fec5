use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tawx::awx::client::AwxClient;
use tawx::awx::http::format_awx_error;
use tawx::config::Config;
use tawx::resource::state::load_document;
use tawx::resource::{
    project_schema, run_with_deadline, Operation, ProjectAttributes, ProjectResourceHandler,
    ProjectState, ResourceError,
};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Declarative AWX project management
#[derive(Parser, Debug)]
#[command(name = "tawx", version = tawx::VERSION, about, long_about = None)]
struct Args {
    /// AWX host (defaults to AWX_HOST, then http://localhost)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Basic-auth username (defaults to AWX_USERNAME)
    #[arg(long, global = true)]
    username: Option<String>,

    /// Basic-auth password (defaults to AWX_PASSWORD)
    #[arg(long, global = true)]
    password: Option<String>,

    /// OAuth2 token (defaults to AWX_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,

    /// Config file (defaults to <config dir>/tawx/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resource schema as JSON
    Schema,
    /// Check connectivity and credentials
    Ping,
    /// Create a project from a desired-state document
    Create { file: PathBuf },
    /// Read a project by the name and organization_id in a document
    Read { file: PathBuf },
    /// Replace every attribute of the project whose id is in the document
    Update { file: PathBuf },
    /// Delete the project whose id is in the document
    Delete { file: PathBuf },
    /// Reconstruct the state of an existing project from its id
    Import { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("tawx started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("tawx").join("tawx.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".tawx").join("tawx.log");
    }
    PathBuf::from("tawx.log")
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = match setup_logging(args.log_level) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            None
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            if let Some(hint) = hint_for(&err) {
                eprintln!("Hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<ResourceError>() {
        Some(ResourceError::Remote(remote)) => format_awx_error(remote),
        Some(_) => None,
        None => format_awx_error(err),
    }
}

async fn run(args: Args) -> Result<()> {
    let timeouts = project_schema().timeouts;

    match &args.command {
        Command::Schema => {
            print_json(&project_schema())?;
        }
        Command::Ping => {
            let client = connect(&args)?;
            let version = client.ping().await?;
            println!("AWX {} at {}", version, client.base_url());
        }
        Command::Create { file } => {
            let handler = ProjectResourceHandler::new(connect(&args)?);
            let desired: ProjectAttributes = load_document(file)?;
            let state =
                run_with_deadline(&timeouts, Operation::Create, handler.create(&desired)).await?;
            print_json(&state)?;
        }
        Command::Read { file } => {
            let handler = ProjectResourceHandler::new(connect(&args)?);
            let current: ProjectAttributes = load_document(file)?;
            let state = run_with_deadline(
                &timeouts,
                Operation::Read,
                handler.read(&current.name, current.organization_id),
            )
            .await?;
            print_json(&state)?;
        }
        Command::Update { file } => {
            let handler = ProjectResourceHandler::new(connect(&args)?);
            let current: ProjectState = load_document(file)?;
            let state = run_with_deadline(
                &timeouts,
                Operation::Update,
                handler.update(&current.id, &current.attributes),
            )
            .await?;
            print_json(&state)?;
        }
        Command::Delete { file } => {
            let handler = ProjectResourceHandler::new(connect(&args)?);
            let current: ProjectState = load_document(file)?;
            run_with_deadline(
                &timeouts,
                Operation::Delete,
                handler.delete(&current.id, current.attributes.organization_id),
            )
            .await?;
            print_json(&current.cleared())?;
        }
        Command::Import { id } => {
            let handler = ProjectResourceHandler::new(connect(&args)?);
            let state =
                run_with_deadline(&timeouts, Operation::Import, handler.import(id)).await?;
            print_json(&state)?;
        }
    }

    Ok(())
}

/// Build the AWX client from flags, config file and environment
fn connect(args: &Args) -> Result<AwxClient> {
    let file_config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = file_config.merge(Config {
        host: args.host.clone(),
        username: args.username.clone(),
        password: args.password.clone(),
        token: args.token.clone(),
        insecure: args.insecure.then_some(true),
    });

    let host = config.effective_host();
    tracing::info!("Using AWX host: {}", host);

    AwxClient::new(
        &host,
        config.effective_credentials(),
        config.effective_insecure(),
    )
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{}", rendered);
    Ok(())
}
