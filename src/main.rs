//! Courtside server entry point.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use courtside::{answer_question, create_router, AppState, AskOutcome, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Courtside: natural-language basketball statistics service
#[derive(Parser, Debug)]
#[command(name = "courtside")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Answer a single question and print the JSON envelope
    Ask {
        /// The question to answer
        question: String,
        /// Include a natural-language summary
        #[arg(short, long)]
        narrate: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    match args.command {
        Some(Command::Ask { question, narrate }) => run_ask(config, &question, narrate).await,
        Some(Command::Serve { port }) => {
            let mut config = config;
            if let Some(port) = port {
                config.server.http_port = port;
            }
            run_server(config).await
        }
        None => run_server(config).await,
    }
}

fn init_tracing(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting Courtside server v{} on port {}",
        env!("CARGO_PKG_VERSION"),
        config.server.http_port
    );
    tracing::info!(
        season = config.league.current_season,
        backend = config.backend.is_configured(),
        "Configuration loaded"
    );

    let state = Arc::new(AppState::initialize(&config).await?);
    let router = create_router(state, &config.server);

    let addr = format!("0.0.0.0:{}", config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

async fn run_ask(config: Config, question: &str, narrate: bool) -> anyhow::Result<()> {
    let state = AppState::initialize(&config).await?;

    match answer_question(&state, question, narrate).await? {
        AskOutcome::Answer(response) => {
            println!("{}", serde_json::to_string_pretty(&*response)?);
        }
        AskOutcome::Rejected { error, suggestions } => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "error": error,
                    "suggestions": suggestions,
                }))?
            );
        }
    }

    Ok(())
}
