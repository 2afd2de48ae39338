//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use parley_core::config::{self, Config};
use parley_core::logging::{self, LogGuard, LogTarget};
use parley_core::store::LocalStore;

mod commands;

/// Filter for one-shot commands when `PARLEY_LOG` is unset.
const ONE_SHOT_LOG_FILTER: &str = "warn";

#[derive(Parser)]
#[command(name = "parley")]
#[command(version = "0.1")]
#[command(about = "Terminal client for a Parley chat backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the interactive chat (default)
    Chat,

    /// Send one message and print the reply
    Send {
        /// The message to send
        #[arg(short, long)]
        message: String,

        /// Start a new conversation instead of continuing the active one
        #[arg(long)]
        new: bool,

        /// Subject for a new conversation
        #[arg(short, long)]
        subject: Option<String>,
    },

    /// Manage saved conversations
    Conversations {
        #[command(subcommand)]
        command: ConversationCommands,
    },

    /// Search message history
    Search {
        /// Text to search for
        #[arg(value_name = "TERM")]
        term: String,
    },

    /// Log in and store the session cookie
    Login(Credentials),

    /// Create an account and store the session cookie
    Register(Credentials),

    /// Forget the session cookie and the active conversation
    Logout,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Args)]
struct Credentials {
    #[arg(short, long)]
    username: String,

    #[arg(short, long, env = "PARLEY_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(clap::Subcommand)]
enum ConversationCommands {
    /// Lists saved conversations
    List,
    /// Shows the transcript of a conversation
    Show {
        #[arg(value_name = "CONVERSATION_ID")]
        id: String,
    },
    /// Renames a conversation
    Rename {
        #[arg(value_name = "CONVERSATION_ID")]
        id: String,
        /// New name for the conversation
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Deletes a conversation
    Delete {
        #[arg(value_name = "CONVERSATION_ID")]
        id: String,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set the backend base URL
    SetServer {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Config commands only touch the file, so a broken config can be repaired.
    if let Some(Commands::Config { command }) = &cli.command {
        return run_config(command);
    }

    let config = Config::load().context("load config")?;
    let _log_guard = init_logging(cli.command.as_ref(), &config)?;

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli, config).await })
}

fn run_config(command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Path => {
            commands::config::path();
            Ok(())
        }
        ConfigCommands::Init => commands::config::init(),
        ConfigCommands::SetServer { url } => commands::config::set_server(url),
    }
}

fn init_logging(command: Option<&Commands>, config: &Config) -> Result<LogGuard> {
    match command {
        None | Some(Commands::Chat) => {
            let dir = config::paths::logs_dir();
            logging::init(LogTarget::File(&dir), &config.effective_log_filter())
        }
        Some(_) => {
            let directive = std::env::var(config::LOG_FILTER_ENV)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| ONE_SHOT_LOG_FILTER.to_string());
            logging::init(LogTarget::Stderr, &directive)
        }
    }
}

async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let mut store = LocalStore::open().context("open client state")?;

    // default to chat mode
    let Some(command) = cli.command else {
        return commands::chat::run(&config, store).await;
    };

    match command {
        Commands::Chat => commands::chat::run(&config, store).await,
        Commands::Send {
            message,
            new,
            subject,
        } => commands::send::run(&config, &mut store, &message, new, subject.as_deref()).await,

        Commands::Conversations { command } => match command {
            ConversationCommands::List => commands::conversations::list(&config, &store).await,
            ConversationCommands::Show { id } => {
                commands::conversations::show(&config, &store, &id).await
            }
            ConversationCommands::Rename { id, name } => {
                commands::conversations::rename(&config, &store, &id, &name).await
            }
            ConversationCommands::Delete { id } => {
                commands::conversations::delete(&config, &mut store, &id).await
            }
        },

        Commands::Search { term } => commands::search::run(&config, &store, &term).await,

        Commands::Login(creds) => {
            commands::auth::login(&config, &mut store, &creds.username, &creds.password).await
        }
        Commands::Register(creds) => {
            commands::auth::register(&config, &mut store, &creds.username, &creds.password).await
        }
        Commands::Logout => commands::auth::logout(&mut store),

        Commands::Config { command } => run_config(&command),
    }
}
