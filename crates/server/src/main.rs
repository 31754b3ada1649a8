use anyhow::Result;
use bankfront_core::logging::init_logging;
use bankfront_server::{Settings, commands};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// Bankfront - retail banking portal front server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Log in through a running portal and store the session
    Login {
        /// Portal base URL
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        url: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "BANKFRONT_PASSWORD")]
        password: String,
        /// Session file
        #[arg(long, default_value = "session.json")]
        session: PathBuf,
    },
    /// Drop a stored session
    Logout {
        #[arg(long, default_value = "session.json")]
        session: PathBuf,
    },
    /// Expire a stored session shortly before its deadline
    Watch {
        #[arg(long, default_value = "session.json")]
        session: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let settings = Settings::load(cli.config.as_deref())?;
    init_logging(&settings.log)?;

    if let Some(path) = &cli.config {
        info!("Loaded configuration from: {}", path.display());
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => commands::serve(settings).await,
        Command::Login {
            url,
            email,
            password,
            session,
        } => commands::login(&url, &email, &password, &session).await,
        Command::Logout { session } => commands::logout(&session),
        Command::Watch { session } => commands::watch_session(&settings, &session).await,
    }
}
