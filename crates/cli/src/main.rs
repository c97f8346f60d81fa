//! Folio CLI - BackOffice for the portfolio site's content.
//!
//! # Usage
//!
//! ```bash
//! # Log in with the demo account
//! folio login -e admin@example.com -p password123
//!
//! # Store the tabular API credentials
//! folio settings set-key pat123...
//! folio settings set-base app123...
//!
//! # Edit content (JSON in, JSON out; `-` reads stdin)
//! folio hero set '{"title": "Hi", "subtitle": "I build things"}'
//! folio skills save '[{"name": "Go", "category": "other"}]'
//! folio portfolio delete rec123
//!
//! # Render the public site content
//! folio site
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` - BackOffice session
//! - `settings` - API key and base id
//! - `hero` / `contact` - Singleton content (`get`, `set`)
//! - `portfolio` / `career` / `skills` - Collections (`list`, `save`, `delete`)
//! - `site` - Assembled public content with placeholders
//!
//! Writing content requires a logged-in session.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use folio_backoffice::{Backoffice, BackofficeConfig};

mod commands;

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about = "Folio BackOffice")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the BackOffice
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Log out of the BackOffice
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Manage tabular API credentials
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Hero banner
    Hero {
        #[command(subcommand)]
        action: SingletonAction,
    },
    /// Contact details
    Contact {
        #[command(subcommand)]
        action: SingletonAction,
    },
    /// Portfolio projects
    Portfolio {
        #[command(subcommand)]
        action: CollectionAction,
    },
    /// Career timeline
    Career {
        #[command(subcommand)]
        action: CollectionAction,
    },
    /// Skills
    Skills {
        #[command(subcommand)]
        action: CollectionAction,
    },
    /// Print the public site content
    Site,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Store the API key
    SetKey {
        /// Personal access token
        key: String,
    },
    /// Store the base id
    SetBase {
        /// Base identifier (`app...`)
        base_id: String,
    },
    /// Show which credentials are set
    Show,
    /// Remove both credentials
    Clear,
}

#[derive(Subcommand)]
enum SingletonAction {
    /// Print the current record
    Get,
    /// Create or update the record from JSON
    Set {
        /// JSON object, or `-` to read stdin
        json: String,
    },
}

#[derive(Subcommand)]
enum CollectionAction {
    /// Print every item
    List,
    /// Create or update items from JSON
    Save {
        /// JSON object or array of objects, or `-` to read stdin
        json: String,
    },
    /// Delete an item by id
    Delete {
        /// Record id
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays valid JSON
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "folio_cli=info,folio_backoffice=info".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = BackofficeConfig::from_env()?;
    let backoffice = Backoffice::open(config)?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&backoffice, &email, &password)?;
        }
        Commands::Logout => commands::auth::logout(&backoffice)?,
        Commands::Whoami => commands::auth::whoami(&backoffice)?,
        Commands::Settings { action } => match action {
            SettingsAction::SetKey { key } => commands::settings::set_key(&backoffice, &key)?,
            SettingsAction::SetBase { base_id } => {
                commands::settings::set_base(&backoffice, &base_id)?;
            }
            SettingsAction::Show => commands::settings::show(&backoffice)?,
            SettingsAction::Clear => commands::settings::clear(&backoffice)?,
        },
        Commands::Hero { action } => singleton(backoffice.hero(), &backoffice, action).await?,
        Commands::Contact { action } => {
            singleton(backoffice.contact(), &backoffice, action).await?;
        }
        Commands::Portfolio { action } => {
            collection(backoffice.portfolio(), &backoffice, action).await?;
        }
        Commands::Career { action } => {
            collection(backoffice.career(), &backoffice, action).await?;
        }
        Commands::Skills { action } => {
            collection(backoffice.skills(), &backoffice, action).await?;
        }
        Commands::Site => commands::content::site(&backoffice).await?,
    }

    backoffice.close()?;
    Ok(())
}

async fn singleton<R>(
    service: &folio_backoffice::services::SingletonService<R>,
    backoffice: &Backoffice,
    action: SingletonAction,
) -> Result<(), commands::CommandError>
where
    R: folio_backoffice::services::TableRecord + serde::Serialize + serde::de::DeserializeOwned,
{
    match action {
        SingletonAction::Get => commands::content::get_singleton(service).await,
        SingletonAction::Set { json } => {
            commands::content::set_singleton(service, backoffice, &json).await
        }
    }
}

async fn collection<R>(
    service: &folio_backoffice::services::CollectionService<R>,
    backoffice: &Backoffice,
    action: CollectionAction,
) -> Result<(), commands::CommandError>
where
    R: folio_backoffice::services::TableRecord + serde::Serialize + serde::de::DeserializeOwned,
{
    match action {
        CollectionAction::List => commands::content::list(service).await,
        CollectionAction::Save { json } => {
            commands::content::save(service, backoffice, &json).await
        }
        CollectionAction::Delete { id } => {
            commands::content::delete(service, backoffice, &id).await
        }
    }
}
