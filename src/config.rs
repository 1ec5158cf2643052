use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const BACKEND_URL_ENV: &str = "ORACLE_BACKEND_URL";
const MIN_STEP_DELAY_MS: u64 = 1;

fn default_log_level() -> String {
    "info".to_string()
}

fn default_step_delay_ms() -> u64 {
    1800
}

fn default_demo_step_delay_ms() -> u64 {
    2000
}

fn default_reveal_after_flow() -> bool {
    true
}

fn default_toast_seconds() -> u64 {
    4
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub window: WindowConfig,
    #[serde(default)]
    pub flow: FlowConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlowConfig {
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
    #[serde(default = "default_demo_step_delay_ms")]
    pub demo_step_delay_ms: u64,
    /// Hold the answer back until the pipeline animation has finished.
    #[serde(default = "default_reveal_after_flow")]
    pub reveal_after_flow: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub desktop: bool,
    #[serde(default = "default_toast_seconds")]
    pub toast_seconds: u64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        FlowConfig {
            step_delay_ms: default_step_delay_ms(),
            demo_step_delay_ms: default_demo_step_delay_ms(),
            reveal_after_flow: default_reveal_after_flow(),
        }
    }
}

impl FlowConfig {
    /// Tick period for the home page flow, never zero.
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms.max(MIN_STEP_DELAY_MS))
    }

    pub fn demo_step_delay(&self) -> Duration {
        Duration::from_millis(self.demo_step_delay_ms.max(MIN_STEP_DELAY_MS))
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        NotificationConfig {
            desktop: false,
            toast_seconds: default_toast_seconds(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend: BackendConfig {
                base_url: "http://localhost:5050".to_string(),
            },
            window: WindowConfig {
                width: 1280,
                height: 860,
                min_width: 720,
                min_height: 480,
            },
            flow: FlowConfig::default(),
            notifications: NotificationConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Reads the config file, falling back to defaults when it is missing or broken.
    ///
    /// Runs before logging is initialised, so problems are returned as
    /// warnings for the caller to emit once a subscriber exists.
    pub fn load() -> (Self, Vec<String>) {
        let config_path = Self::get_config_path();
        let mut warnings = Vec::new();

        let mut config = if config_path.exists() {
            match fs::read_to_string(&config_path) {
                Ok(contents) => match Self::parse(&contents) {
                    Ok(config) => config,
                    Err(e) => {
                        warnings.push(format!("Error parsing config.toml: {}. Using defaults.", e));
                        Config::default()
                    }
                },
                Err(e) => {
                    warnings.push(format!("Error reading config.toml: {}. Using defaults.", e));
                    Config::default()
                }
            }
        } else {
            if let Some(parent) = config_path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            Config::default()
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            config.apply_backend_override(&url);
        }

        (config, warnings)
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn apply_backend_override(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            self.backend.base_url = url.trim_end_matches('/').to_string();
        }
    }

    pub fn get_config_path() -> PathBuf {
        Self::get_config_dir().join("config.toml")
    }

    pub fn get_config_dir() -> PathBuf {
        if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home).join(".config/ask-oracle")
        } else {
            PathBuf::from(".")
        }
    }
}
