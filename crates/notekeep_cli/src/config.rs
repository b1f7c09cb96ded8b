//! Command-line and environment configuration for the notes server.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "notekeep")]
#[command(author, version, about = "Named text notes over HTTP", long_about = None)]
#[command(disable_help_flag = true)]
pub struct Config {
    /// Interface to bind
    #[arg(short = 'h', long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// TCP port to listen on
    #[arg(short = 'p', long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// JSON file holding the notes; created when missing
    #[arg(short = 'c', long, env = "CACHE", default_value = "./cache/notes.json")]
    pub cache: PathBuf,

    /// trace|debug|info|warn|error (defaults by build mode)
    #[arg(long, env = "NOTEKEEP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotated log files; stderr when unset
    #[arg(long, env = "NOTEKEEP_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Print help
    #[arg(long, action = clap::ArgAction::Help)]
    help: Option<bool>,
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| notekeep_core::default_log_level())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL advertised in the API document.
    pub fn server_url(&self) -> String {
        format!("http://{}", self.bind_addr())
    }
}
