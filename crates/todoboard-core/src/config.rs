use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.todoist.com/rest/v2";
pub const DEFAULT_DEBOUNCE_MS: u64 = 400;
pub const MIN_DEBOUNCE_MS: u64 = 300;
pub const MAX_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Quiet period before a card move is sent to the server.
    #[serde(default)]
    pub debounce_ms: Option<u64>,

    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/todoboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("todoboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("todoboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                match std::fs::read_to_string(&config_path) {
                    Ok(content) => match Self::from_toml(&content) {
                        Some(config) => return config,
                        None => tracing::warn!(
                            "Ignoring malformed config file {}",
                            config_path.display()
                        ),
                    },
                    Err(e) => tracing::warn!("Failed to read {}: {}", config_path.display(), e),
                }
            }
        }
        Self::default()
    }

    pub fn from_toml(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    pub fn effective_api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// Debounce window, clamped into the range the board is tuned for.
    pub fn effective_debounce(&self) -> Duration {
        let ms = self
            .debounce_ms
            .unwrap_or(DEFAULT_DEBOUNCE_MS)
            .clamp(MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS);
        Duration::from_millis(ms)
    }

    pub fn effective_storage_path(&self) -> Option<PathBuf> {
        self.storage_path
            .clone()
            .or_else(|| dirs::data_dir().map(|data| data.join("todoboard").join("storage.json")))
    }
}
