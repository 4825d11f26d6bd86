//! CLI administration tool for shortlink.
//!
//! Manages links directly against the configured Link Store, without going
//! through the HTTP API or the key allow-list.
//!
//! # Usage
//!
//! ```bash
//! # Create a link that never expires
//! cargo run --bin admin -- link create https://example.com
//!
//! # Create a link that expires at a Unix timestamp
//! cargo run --bin admin -- link create https://example.com --validity 1893456000
//!
//! # Show and delete a link
//! cargo run --bin admin -- link show Ab3xYz
//! cargo run --bin admin -- link delete Ab3xYz
//!
//! # Remove every expired link
//! cargo run --bin admin -- purge
//!
//! # Inspect the token codec
//! cargo run --bin admin -- codec encode 62
//! cargo run --bin admin -- codec decode aA
//!
//! # View statistics / check the store
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `CONFIG_PATH`, `DATABASE_URL` and the other overrides
//! documented in `shortlink::config`.

use shortlink::application::services::LinkService;
use shortlink::config::{self, Config, DEFAULT_CONFIG_PATH, mask_connection_string};
use shortlink::domain::entities::LinkStatus;
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::persistence;
use shortlink::utils::base62;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for managing shortlink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to $CONFIG_PATH or config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Delete every expired link
    Purge {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Convert between ids and tokens
    Codec {
        #[command(subcommand)]
        action: CodecAction,
    },

    /// Show statistics
    Stats,

    /// Store operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a new short link
    Create {
        /// Target URL
        url: String,

        /// Unix timestamp after which the link expires (never, if omitted)
        #[arg(short, long)]
        validity: Option<i64>,
    },

    /// Show the link behind a token
    Show { token: String },

    /// Delete the link behind a token
    Delete {
        token: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CodecAction {
    /// Encode an id as a token
    Encode { id: u128 },

    /// Decode a token to its id
    Decode { token: String },
}

/// Store diagnostic subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check the store connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config_path = cli.config;

    match cli.command {
        Commands::Link { action } => {
            let (config, repository) = open_store(config_path).await?;
            handle_link_action(action, &config, repository).await?;
        }
        Commands::Purge { yes } => {
            let (_, repository) = open_store(config_path).await?;
            purge(repository, yes).await?;
        }
        Commands::Codec { action } => handle_codec_action(action)?,
        Commands::Stats => {
            let (_, repository) = open_store(config_path).await?;
            handle_stats(repository).await?;
        }
        Commands::Db { action } => {
            let (config, repository) = open_store(config_path).await?;
            handle_db_action(action, &config, repository).await?;
        }
    }

    Ok(())
}

/// Loads the configuration and connects the Link Store it names.
async fn open_store(config_path: Option<PathBuf>) -> Result<(Config, Arc<dyn LinkRepository>)> {
    let config_path = config_path.unwrap_or_else(|| {
        std::env::var("CONFIG_PATH")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
            .into()
    });
    let config = config::load(&config_path).context("Failed to load configuration")?;
    let repository = persistence::connect(&config).await?;

    Ok((config, repository))
}

/// Dispatches link management commands.
async fn handle_link_action(
    action: LinkAction,
    config: &Config,
    repository: Arc<dyn LinkRepository>,
) -> Result<()> {
    match action {
        LinkAction::Create { url, validity } => {
            create_link(config, repository, url, validity).await?;
        }
        LinkAction::Show { token } => {
            show_link(repository, token).await?;
        }
        LinkAction::Delete { token, yes } => {
            delete_link(repository, token, yes).await?;
        }
    }

    Ok(())
}

/// Creates a link, bypassing the key allow-list.
async fn create_link(
    config: &Config,
    repository: Arc<dyn LinkRepository>,
    url: String,
    validity: Option<i64>,
) -> Result<()> {
    println!("{}", "🔗 Create Link".bright_blue().bold());
    println!();

    if let Some(expiry) = validity {
        anyhow::ensure!(
            expiry > Utc::now().timestamp(),
            "Validity must be a Unix timestamp in the future"
        );
    }
    let expiry = validity;
    let service = LinkService::new(repository, Vec::<String>::new(), config.token_length);

    let allocation = service
        .shorten(&url, expiry)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {} ({})", e, e.details()))?;

    println!("{}", "✅ Link created successfully!".green().bold());
    println!();
    println!("  Token:   {}", allocation.token.bright_yellow().bold());
    println!("  Id:      {}", allocation.id.to_string().bright_black());
    println!("  Target:  {}", url.cyan());
    println!("  Expires: {}", format_expiry(expiry));
    println!();

    Ok(())
}

/// Prints the stored row behind a token.
async fn show_link(repository: Arc<dyn LinkRepository>, token: String) -> Result<()> {
    let id = token_id(&token)?;

    let link = repository
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Store error: {}", e))?
        .context("Link not found")?;

    let status = match link.status_at(Utc::now().timestamp()) {
        LinkStatus::Live => "LIVE".green(),
        LinkStatus::Expired => "EXPIRED".red(),
        LinkStatus::Empty => "EMPTY TARGET".yellow(),
    };

    println!("{}", "🔗 Link".bright_blue().bold());
    println!();
    println!("  Token:   {}", token.bright_yellow());
    println!("  Id:      {}", link.id.to_string().bright_black());
    println!("  Target:  {}", link.target.cyan());
    println!("  Expires: {}", format_expiry(link.expiry));
    println!("  Status:  {}", status);
    println!();

    Ok(())
}

/// Deletes the link behind a token with confirmation prompt.
async fn delete_link(repository: Arc<dyn LinkRepository>, token: String, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Link".bright_blue().bold());
    println!();

    let id = token_id(&token)?;
    let link = repository
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Store error: {}", e))?
        .context("Link not found")?;

    println!("  Token:  {}", token.bright_yellow());
    println!("  Target: {}", link.target.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    repository
        .delete(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!("{}", "✅ Link deleted".green().bold());
    println!();

    Ok(())
}

/// Removes every link whose expiry has passed.
async fn purge(repository: Arc<dyn LinkRepository>, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Purge Expired Links".bright_blue().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete all expired links?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = repository
        .delete_expired(Utc::now().timestamp())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to purge links: {}", e))?;

    println!(
        "  Removed: {}",
        removed.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

fn handle_codec_action(action: CodecAction) -> Result<()> {
    match action {
        CodecAction::Encode { id } => {
            println!("{}", base62::encode(id));
        }
        CodecAction::Decode { token } => {
            let id = base62::decode(&token).with_context(|| format!("Cannot decode '{}'", token))?;
            println!("{}", id);
        }
    }

    Ok(())
}

/// Displays store statistics.
async fn handle_stats(repository: Arc<dyn LinkRepository>) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count = repository
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    println!(
        "  Links: {}",
        links_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles store diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config, repository: Arc<dyn LinkRepository>) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking link store...".bright_blue());
            println!(
                "  Store: {}",
                mask_connection_string(&config.database_url()?).bright_white()
            );

            repository
                .count()
                .await
                .map_err(|e| anyhow::anyhow!("Store check failed: {}", e))?;

            println!("{}", "✅ Link store OK".green().bold());
        }
    }

    Ok(())
}

/// Decodes `token` to a storable id.
fn token_id(token: &str) -> Result<i64> {
    let id = base62::decode(token).with_context(|| format!("Invalid token '{}'", token))?;
    i64::try_from(id).with_context(|| format!("Token '{}' is out of range", token))
}

fn format_expiry(expiry: Option<i64>) -> ColoredString {
    match expiry.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)) {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_white(),
        None => "never".bright_black(),
    }
}
