use anyhow::{Context, Result};
use clap::Parser;
use giveaway::api::HttpTransport;
use giveaway::config::{self, GiveawayConfig, BEARER_TOKEN_ENV};
use giveaway::model::WinnerRecord;
use giveaway::{report, Giveaway, Outcome};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "giveaway")]
#[command(about = "Pick a giveaway winner among accounts that retweeted, replied with the hashtag and follow you")]
#[command(version)]
struct Cli {
    /// Path to the configuration file (default: ./giveaway.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log every API request
    #[arg(short, long)]
    debug: bool,

    /// Write the winner record without asking
    #[arg(short, long)]
    yes: bool,

    /// Do not open the winner record after writing it
    #[arg(long)]
    no_open: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = config::locate(cli.config.as_deref())?;
    let raw = config::read(&path).with_context(|| format!("[FAIL] {}", path.display()))?;

    let level = if cli.debug || raw.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("giveaway={}", level))),
        )
        .with_target(false)
        .init();

    let config = GiveawayConfig::from_raw(raw, std::env::var(BEARER_TOKEN_ENV).ok())
        .context("[FAIL] invalid configuration")?;

    let transport = HttpTransport::new(config.bearer_token.clone(), config.api.request_timeout)
        .context("failed to build HTTP client")?;

    let outcome = match Giveaway::prepare(config, Arc::new(transport)).await {
        Ok(giveaway) => {
            println!("Initializing giveaway:");
            print!("{}", giveaway);
            let outcome = giveaway.pick_winner().await;
            outcome.map(|o| (o, giveaway.config().output.clone()))
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok((Outcome::Winner { winner, qualified }, output)) => {
            print_winner(&winner, qualified);
            if cli.yes || confirm(&format!(
                "Would you like to write this information to {}?",
                output.winner_filename.display()
            ))? {
                report::save_winner(&output.winner_filename, &winner)?;
                println!("Winner written to: {}", output.winner_filename.display());
                if output.open_winner && !cli.no_open {
                    if let Err(e) = open::that(&output.winner_filename) {
                        tracing::warn!(error = %e, "could not open winner record");
                    }
                }
            }
        }
        Ok((Outcome::NoQualifiedEntries, _)) => println!("No qualified entries. Aborting."),
        Err(e) => println!("[FAIL] Could not pick winner: \n{}", e),
    }

    Ok(())
}

fn heading(message: &str) {
    println!("{}", "-".repeat(80));
    println!("{:^80}", message);
    println!("{}", "-".repeat(80));
}

fn print_winner(winner: &WinnerRecord, qualified: usize) {
    heading("Winner Found!");
    println!("\n\n{}\n\n", ":)".repeat(40));
    println!("{:<30}{}", "Qualified Entries:", qualified);
    println!("{:<30}{}", "Name:", winner.name);
    println!("{:<30}{}", "Username:", winner.username);
    println!("{:<30}{}", "Comment URL:", winner.comment_url);
    println!("\n\n{}\n\n", ":)".repeat(40));
}

/// Ask a yes/no question on the terminal, defaulting to yes.
fn confirm(question: &str) -> Result<bool> {
    print!("{} [Y/n] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();

    Ok(answer.is_empty() || answer == "y" || answer == "yes")
}
