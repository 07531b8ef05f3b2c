use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use todoboard_core::AppConfig;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("TODOBOARD_BUILD_COMMIT"),
    ")"
);

#[derive(Parser)]
#[command(name = "todoboard")]
#[command(about = "A keyboard-driven kanban board for Todoist tasks", long_about = None)]
#[command(version = VERSION)]
pub struct Cli {
    /// Storage file holding the API key (or set TODOBOARD_STORAGE)
    #[arg(long, value_name = "FILE", env = "TODOBOARD_STORAGE", global = true)]
    pub storage: Option<PathBuf>,

    /// Todoist REST base URL (or set TODOBOARD_API_URL)
    #[arg(long, value_name = "URL", env = "TODOBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Quiet period before a card move is sent, 300 to 500 ms
    #[arg(long, value_name = "MS", env = "TODOBOARD_DEBOUNCE_MS")]
    pub debounce_ms: Option<u64>,

    /// Route to open first: /, /todos or /todos/<id>
    #[arg(long, value_name = "PATH", default_value = "/")]
    pub route: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Layer command-line flags over the config file.
    pub fn apply_to(&self, mut config: AppConfig) -> AppConfig {
        if let Some(storage) = &self.storage {
            config.storage_path = Some(storage.clone());
        }
        if let Some(url) = &self.api_url {
            config.api_base_url = Some(url.clone());
        }
        if let Some(ms) = self.debounce_ms {
            config.debounce_ms = Some(ms);
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the stored Todoist API key
    Key(KeyCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct KeyCommand {
    #[command(subcommand)]
    pub action: KeyAction,
}

#[derive(Subcommand)]
pub enum KeyAction {
    /// Store an API key
    Set {
        /// Todoist API token
        key: String,
    },
    /// Remove the stored API key
    Clear,
    /// Report whether an API key is stored
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::time::Duration;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "todoboard",
            "--storage",
            "/tmp/board.json",
            "--debounce-ms",
            "320",
        ]);
        let base = AppConfig {
            api_base_url: Some("http://localhost:9000".into()),
            debounce_ms: Some(450),
            storage_path: None,
        };
        let config = cli.apply_to(base);
        assert_eq!(config.storage_path, Some(PathBuf::from("/tmp/board.json")));
        assert_eq!(config.effective_debounce(), Duration::from_millis(320));
        assert_eq!(config.effective_api_base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_key_subcommands_parse() {
        let cli = Cli::parse_from(["todoboard", "key", "set", "abc"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Key(KeyCommand {
                action: KeyAction::Set { ref key }
            })) if key == "abc"
        ));
        assert_eq!(cli.route, "/");
    }
}
