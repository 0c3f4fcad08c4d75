//! CLI administration tool for goodiex-api.
//!
//! Manages the third-party API keys held in the Redis credential store and
//! runs the same DNS checks as the HTTP API, straight from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Store the Stripe key (prompted, hidden input)
//! cargo run --bin admin -- keys set stripe
//!
//! # Show which keys are stored (masked)
//! cargo run --bin admin -- keys show
//!
//! # Remove the OpenAI key
//! cargo run --bin admin -- keys remove openai
//!
//! # Resolve a domain and list its records
//! cargo run --bin admin -- domain verify shop.example.com
//!
//! # Print the CNAME record for store 42
//! cargo run --bin admin -- domain cname 42
//! ```
//!
//! # Environment Variables
//!
//! - `REDIS_URL` or `REDIS_HOST`.. (required for `keys`): credential store connection
//! - `CNAME_BASE_DOMAIN` (optional): parent domain of store CNAMEs

use goodiex_api::application::credentials::{OPENAI_API_KEY, STRIPE_SECRET_KEY};
use goodiex_api::application::services::DomainVerificationService;
use goodiex_api::config::Config;
use goodiex_api::domain::entities::RecordKind;
use goodiex_api::domain::ports::CredentialStore;
use goodiex_api::infrastructure::credentials::RedisCredentialStore;
use goodiex_api::infrastructure::dns::HickoryDnsLookup;
use goodiex_api::utils::secrets::mask_secret;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use dialoguer::{Confirm, Password};
use std::sync::Arc;

/// CLI tool for managing goodiex-api.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage API keys in the credential store
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },

    /// Custom-domain DNS checks
    Domain {
        #[command(subcommand)]
        action: DomainAction,
    },
}

/// API key subcommands.
#[derive(Subcommand)]
enum KeysAction {
    /// Store an API key
    Set {
        key: KeyName,

        /// Key value (prompted with hidden input if not provided)
        #[arg(long)]
        value: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show which keys are stored
    Show,

    /// Remove an API key
    Remove {
        key: KeyName,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Domain subcommands.
#[derive(Subcommand)]
enum DomainAction {
    /// Resolve a domain and list its A, CNAME and MX records
    Verify { domain: String },

    /// Print the CNAME record a store must create
    Cname { store_id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum KeyName {
    Stripe,
    Openai,
}

impl KeyName {
    fn field(self) -> &'static str {
        match self {
            KeyName::Stripe => STRIPE_SECRET_KEY,
            KeyName::Openai => OPENAI_API_KEY,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Keys { action } => {
            let store = connect_store(&config).await?;
            handle_keys_action(action, store).await?
        }
        Commands::Domain { action } => handle_domain_action(action, &config).await?,
    }

    Ok(())
}

async fn connect_store(config: &Config) -> Result<Arc<RedisCredentialStore>> {
    let redis_url = config
        .redis_url
        .as_deref()
        .context("REDIS_URL or REDIS_HOST must be set to manage keys")?;

    let store = RedisCredentialStore::connect(redis_url)
        .await
        .context("Failed to connect to Redis")?;

    Ok(Arc::new(store))
}

/// Dispatches key management commands.
async fn handle_keys_action(action: KeysAction, store: Arc<RedisCredentialStore>) -> Result<()> {
    match action {
        KeysAction::Set { key, value, yes } => set_key(store, key, value, yes).await,
        KeysAction::Show => show_keys(store).await,
        KeysAction::Remove { key, yes } => remove_key(store, key, yes).await,
    }
}

/// Stores a key, prompting for the value when it is not given.
///
/// Running servers pick the new value up the next time they find their key
/// missing; a server already holding a key keeps it until restart.
async fn set_key(
    store: Arc<RedisCredentialStore>,
    key: KeyName,
    value: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Store API Key".bright_blue().bold());
    println!();

    let value = match value {
        Some(v) => v,
        None => Password::new()
            .with_prompt(format!("Value for {}", key.field()))
            .interact()?,
    };

    let value = value.trim().to_string();
    if value.is_empty() {
        anyhow::bail!("Key value must not be empty");
    }

    println!("  Key:   {}", key.field().cyan());
    println!("  Value: {}", mask_secret(&value).bright_yellow());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Store this key?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    store
        .save(key.field(), &value)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to store key: {}", e))?;

    println!("{}", "✅ Key stored successfully!".green().bold());
    println!();

    Ok(())
}

/// Lists known keys with masked values.
///
/// # Output Format
///
/// ```text
/// 📋 API Keys
///
///   Key                  Value
///   ───────────────────────────────────────
///   stripe_secret_key    ***4f2a
///   openai_api_key       not set
/// ```
async fn show_keys(store: Arc<RedisCredentialStore>) -> Result<()> {
    println!("{}", "📋 API Keys".bright_blue().bold());
    println!();

    println!(
        "  {:<20} {}",
        "Key".bright_white().bold(),
        "Value".bright_white().bold()
    );
    println!("  {}", "─".repeat(40).bright_black());

    for key in [KeyName::Stripe, KeyName::Openai] {
        let value = store
            .load(key.field())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", key.field(), e))?;

        let shown = match value {
            Some(v) => mask_secret(&v).green(),
            None => "not set".yellow(),
        };

        println!("  {:<20} {}", key.field().cyan(), shown);
    }

    println!();
    Ok(())
}

/// Removes a key after confirmation (default: No).
async fn remove_key(store: Arc<RedisCredentialStore>, key: KeyName, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Remove API Key".bright_blue().bold());
    println!();
    println!("  Key: {}", key.field().cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Remove this key?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = store
        .remove(key.field())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to remove key: {}", e))?;

    if removed {
        println!("{}", "✅ Key removed".green().bold());
    } else {
        println!("{}", "⚠️  Key was not set".yellow());
    }
    println!();

    Ok(())
}

/// Dispatches domain commands.
async fn handle_domain_action(action: DomainAction, config: &Config) -> Result<()> {
    let service = DomainVerificationService::new(
        Arc::new(HickoryDnsLookup::from_system_conf()),
        &config.cname_base_domain,
    );

    match action {
        DomainAction::Verify { domain } => {
            println!("{}", "🌐 Domain Verification".bright_blue().bold());
            println!();

            let result = service.verify(Some(&domain)).await?;

            let status = match result.ip_address {
                Some(ip) => format!("{} ({})", result.dns_status.as_str(), ip).green(),
                None => result.dns_status.as_str().red(),
            };

            println!("  Domain: {}", result.domain.cyan());
            println!("  Status: {}", status);
            println!();

            for kind in RecordKind::ALL {
                let records = result.dns_records.get(kind);
                if records.is_empty() {
                    println!("  {:<6} {}", kind.as_str().bright_white(), "-".bright_black());
                }
                for record in records {
                    println!("  {:<6} {}", kind.as_str().bright_white(), record);
                }
            }
            println!();
        }
        DomainAction::Cname { store_id } => {
            let instruction = service.generate_cname(Some(&store_id))?;

            println!("{}", "📝 CNAME Record".bright_blue().bold());
            println!();
            println!("  Type:  {}", instruction.dns_type.as_str().bright_white());
            println!("  Name:  {}", instruction.dns_name.cyan());
            println!("  Value: {}", instruction.dns_value().bright_yellow());
            println!();
        }
    }

    Ok(())
}
