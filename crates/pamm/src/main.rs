//! PAMM - Package AI Management Module
//!
//! Interactive assistant that turns natural-language requests into pip
//! operations through the model's function-calling interface.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pamm_chat::ChatSession;
use pamm_config::Config;
use pamm_executor::{Executor, Pip};
use pamm_provider::MistralProvider;

/// PAMM - AI assistant for managing Python packages
#[derive(Parser)]
#[command(name = "pamm")]
#[command(about = "Package AI Management Module")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {}

#[tokio::main]
async fn main() {
    let _cli = Cli::parse();

    // Logging is driven by RUST_LOG; the interactive surface itself has no
    // flags.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::load().await.context("failed to load configuration")?;

    // Missing credential is the one startup-fatal condition.
    let api_key = config
        .resolve_api_key()
        .context("cannot start the assistant")?;

    debug!(
        "model {}, pip binary {}",
        config.model(),
        config.packages.pip_binary
    );

    let provider = MistralProvider::with_timeout(
        api_key,
        config.api_base(),
        Some(config.model()),
        Duration::from_secs(config.provider.request_timeout_secs),
    );
    let executor = Executor::new(Pip::new(
        config.packages.pip_binary.clone(),
        config.packages.command_timeout_secs,
    ));
    let mut session = ChatSession::with_params(
        provider,
        executor,
        config.model(),
        config.chat.max_tokens,
        config.chat.temperature,
    );

    println!("Welcome to PAMM - Package AI Management Module");
    println!("Type 'exit' to quit the program.");

    loop {
        print!("pamm> ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        let bytes = std::io::stdin().read_line(&mut input)?;
        if bytes == 0 {
            // EOF ends the session like the sentinel does.
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            break;
        }

        match session.handle(input).await {
            Ok(answer) => println!("{}", answer),
            // The turn is aborted but the session lives on; the user gets a
            // diagnostic instead of silence.
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    println!("Thank you for using PAMM. Goodbye!");
    Ok(())
}
