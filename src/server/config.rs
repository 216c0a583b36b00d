//! Command line and environment configuration for `smartcontact-server`.

use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;

pub(crate) const DEFAULT_PORT: u16 = 5000;

/// REST service holding the SmartContact contacts collection.
///
/// CLI arguments take precedence over environment variables.
#[derive(Parser, Debug, Default)]
#[command(name = "smartcontact-server", version, about)]
pub struct Cli {
    /// Bind address [env: PORT binds 0.0.0.0:$PORT] [default: 0.0.0.0:5000]
    #[arg(long, short = 'b')]
    pub bind: Option<String>,

    /// SQLite database file [env: SMARTCONTACT_DB]
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_cli_and_env(cli: Cli) -> Self {
        Self::from_cli_and_lookup(cli, |key| std::env::var(key).ok())
    }

    pub fn from_cli_and_lookup(cli: Cli, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind_addr = cli
            .bind
            .or_else(|| {
                lookup("PORT")
                    .and_then(|p| p.trim().parse::<u16>().ok())
                    .map(|port| format!("0.0.0.0:{port}"))
            })
            .unwrap_or_else(|| format!("0.0.0.0:{DEFAULT_PORT}"));

        let db_path = cli
            .db
            .or_else(|| lookup("SMARTCONTACT_DB").map(PathBuf::from))
            .unwrap_or_else(default_db_path);

        Self { bind_addr, db_path }
    }
}

fn default_db_path() -> PathBuf {
    ProjectDirs::from("com", "example", "SmartContact")
        .map(|proj| proj.data_dir().join("smartcontact.sqlite"))
        .unwrap_or_else(|| PathBuf::from("smartcontact.sqlite"))
}
