//! Vybot CLI
//!
//! Command-line entrypoint for the Vybe analytics Telegram bot.

mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use vybot_api::VybeClient;
use vybot_config::Config;
use vybot_core::BotRuntime;
use vybot_ipc::EventBus;
use vybot_telegram::TelegramAdapter;

#[derive(Parser)]
#[command(name = "vybot")]
#[command(about = "Telegram bot for Vybe Network on-chain analytics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (overrides the config file)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot in the foreground
    Start,

    /// Validate the configuration and exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::CheckConfig => check_config(&cli, &config),
        Commands::Start => start(&cli, config).await,
    }
}

fn check_config(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.config {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: {} (default)", Config::default_path()?.display()),
    }
    println!("Data dir:    {}", config.data_dir()?.display());
    println!("API base:    {}", config.vybe.base_url);
    match config.validate() {
        Ok(()) => {
            println!("Configuration OK");
            Ok(())
        }
        Err(err) => {
            println!("Configuration error: {}", err);
            Err(err)
        }
    }
}

async fn start(cli: &Cli, config: Config) -> Result<()> {
    let data_dir = config.data_dir()?;
    let log_level = cli
        .log_level
        .as_deref()
        .unwrap_or_else(|| config.log_level());
    let _logging_guard = logging::init_logging(&data_dir.join("logs"), log_level)?;

    config.validate()?;
    info!("starting vybot");

    let client = VybeClient::new(config.vybe.api_key.clone(), config.vybe.base_url.clone());
    let bus = EventBus::new();

    let mut bot_commands = vec![
        ("start".to_string(), "Show available commands".to_string()),
        ("help".to_string(), "Show available commands".to_string()),
    ];
    for command in vybot_core::commands::all() {
        let spec = command.spec();
        bot_commands.push((spec.command.to_string(), spec.description.to_string()));
    }

    let adapter = Arc::new(
        TelegramAdapter::new(&config.telegram, data_dir)
            .with_event_bus(bus.clone())
            .with_bot_commands(bot_commands),
    );

    let runtime = Arc::new(BotRuntime::new(adapter.clone(), client));
    let runtime_task = {
        let runtime = runtime.clone();
        let bus = bus.clone();
        tokio::spawn(async move {
            runtime.run(bus).await;
        })
    };

    if let Err(err) = adapter.poll().await {
        error!("telegram polling stopped: {}", err);
    }
    runtime_task.abort();
    Ok(())
}
