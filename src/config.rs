use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dialoguer::Password;
use reqwest::Url;
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::auth::RefreshMode;
use crate::http_client::parse_base_url;
use crate::models::CategoryType;

/// Application name used for the config directory
const APP_NAME: &str = "budget-tracker";

/// Session file name inside the config directory
const SESSION_FILE: &str = "session.json";

/// Default API base URL (local development server)
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Budget Tracker - command line client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// API base URL
    #[arg(short = 'u', long, env = "API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Where the session tokens are stored
    #[arg(short = 's', long, env = "SESSION_FILE")]
    pub session_file: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT", default_value = "30")]
    pub http_timeout: u64,

    /// Share one token refresh between concurrent requests
    #[arg(long, env = "COALESCE_REFRESH")]
    pub coalesce_refresh: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Log in and store a session
    Login {
        username: String,
        /// Prompted for when omitted
        #[arg(long, env = "BUDGET_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Create a new account
    Register {
        username: String,
        email: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        /// Prompted for when omitted
        #[arg(long, env = "BUDGET_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Show whether a session is stored
    Status,
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoryCommand,
    },
    /// Manage transactions
    Transactions {
        #[command(subcommand)]
        action: TransactionCommand,
    },
    /// Manage monthly budgets
    Budgets {
        #[command(subcommand)]
        action: BudgetCommand,
    },
    /// Monthly income, expenses and budget status
    Summary {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CategoryCommand {
    List,
    Create {
        name: String,
        /// income or expense
        #[arg(long = "type")]
        kind: CategoryType,
    },
    Update {
        id: i64,
        name: String,
        #[arg(long = "type")]
        kind: CategoryType,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum TransactionCommand {
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        end_date: Option<NaiveDate>,
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        min_amount: Option<Decimal>,
        #[arg(long)]
        max_amount: Option<Decimal>,
        #[arg(long = "type")]
        kind: Option<CategoryType>,
    },
    Get {
        id: i64,
    },
    Create {
        #[arg(long)]
        category: i64,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        note: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        category: i64,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        note: Option<String>,
    },
    Delete {
        id: i64,
    },
    /// Daily totals for charts
    Stats {
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum BudgetCommand {
    List {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    Create {
        year: i32,
        month: u32,
        amount: Decimal,
    },
    Update {
        id: i64,
        year: i32,
        month: u32,
        amount: Decimal,
    },
    Delete {
        id: i64,
    },
}

#[derive(Clone, Debug)]
pub struct Config {
    // API
    pub api_url: Url,

    // Session
    pub session_file: PathBuf,
    pub refresh_mode: RefreshMode,
    pub login_path: String,

    // HTTP client
    pub http_connect_timeout: u64,
    pub http_request_timeout: u64,

    // Logging
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with priority: CLI > ENV > defaults
    pub fn load() -> Result<(Self, Command)> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let args = CliArgs::parse();
        let config = Self::from_args(&args)?;
        Ok((config, args.command))
    }

    /// Build configuration from parsed arguments plus env-only settings
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let api_url = parse_base_url(&args.api_url).context("Invalid API_URL")?;

        let session_file = match args.session_file {
            Some(ref path) => expand_tilde(path),
            None => default_session_file(),
        };

        let config = Config {
            api_url,
            session_file,
            refresh_mode: if args.coalesce_refresh {
                RefreshMode::Coalesced
            } else {
                RefreshMode::Independent
            },
            login_path: std::env::var("LOGIN_PATH").unwrap_or_else(|_| "/login".to_string()),
            http_connect_timeout: std::env::var("HTTP_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            http_request_timeout: args.http_timeout,
            log_level: args.log_level.clone(),
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.http_request_timeout == 0 {
            anyhow::bail!("HTTP_REQUEST_TIMEOUT must be greater than zero");
        }
        if self.http_connect_timeout == 0 {
            anyhow::bail!("HTTP_CONNECT_TIMEOUT must be greater than zero");
        }
        if self.session_file.as_os_str().is_empty() {
            anyhow::bail!("SESSION_FILE must not be empty");
        }
        Ok(())
    }
}

/// `<config dir>/budget-tracker/session.json`, or the working directory as a fallback
fn default_session_file() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join(APP_NAME).join(SESSION_FILE),
        None => PathBuf::from(format!(".{}-{}", APP_NAME, SESSION_FILE)),
    }
}

/// Expand tilde (~) in file paths to user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

// === Interactive Prompts ===

/// Use the given password or prompt for one without echoing
pub fn password_or_prompt(password: Option<String>, confirm: bool) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    let password = prompt.interact().context("Failed to read password")?;

    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }
    Ok(password)
}
