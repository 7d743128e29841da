use clap::Parser;
use conflict_explorer::config::env::{API_URL_VAR, DEBUG_VAR, LOG_FILE_VAR};

#[derive(Debug, Parser)]
#[command(
    name = "conflict-explorer",
    version,
    about = "Explore conflict-event records in the terminal"
)]
pub struct CliArgs {
    /// Print a summary for the filters and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Use the built-in demo data even if an API is configured
    #[arg(long)]
    pub demo: bool,

    /// Override the events API base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Start from a shared filter query, e.g. "from=2024-01-01&countries=Sudan"
    #[arg(long, value_name = "QUERY")]
    pub query: Option<String>,

    /// Override the log file used by the interactive dashboard
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.api_url {
            std::env::set_var(API_URL_VAR, url);
        }
        if let Some(path) = &self.log_file {
            std::env::set_var(LOG_FILE_VAR, path);
        }
        if self.debug {
            std::env::set_var(DEBUG_VAR, "1");
        }
    }

    pub fn query(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_query_and_flags() {
        let args = CliArgs::parse_from([
            "conflict-explorer",
            "--headless",
            "--json",
            "--query",
            "?countries=Sudan",
        ]);

        assert!(args.headless && args.json);
        assert!(!args.demo);
        assert_eq!(args.query(), "?countries=Sudan");
    }
}
