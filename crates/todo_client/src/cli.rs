use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::api::ClientConfig;

pub const DEFAULT_SESSION_FILE: &str = ".todo-board-session.json";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Terminal client for the todo board API")]
pub struct Cli {
    /// Base URL of the API server
    #[arg(long, env = "TODO_API_URL", default_value = crate::api::DEFAULT_BASE_URL)]
    pub base_url: String,
    /// Where the logged-in user is remembered between runs
    #[arg(long, env = "TODO_SESSION_FILE", default_value = DEFAULT_SESSION_FILE)]
    pub session_file: PathBuf,
    /// Request timeout in seconds
    #[arg(long, default_value_t = crate::api::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
    /// Write logs to this file (the terminal is taken by the UI)
    #[arg(long, env = "TODO_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url, Duration::from_secs(self.timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "todo",
            "--base-url",
            "http://board.test/",
            "--timeout-secs",
            "3",
        ])
        .expect("arguments should parse");
        let cfg = cli.client_config();
        assert_eq!(cfg.base_url, "http://board.test");
        assert_eq!(cfg.timeout.as_secs(), 3);
    }
}
