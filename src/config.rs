use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use etcetera::base_strategy::{BaseStrategy, choose_base_strategy};

use crate::trace::{ConvertOptions, DEFAULT_GRANULARITY, Micros, Trim};

/// Default conversion settings.
///
/// Command-line flags take precedence over these.
///
/// # Example
///
/// ```toml
/// # Minimum -ftime-trace span to embed, in microseconds
/// granularity = 20000
///
/// # Report every step in a log, not just the latest build
/// show-all = true
///
/// # Always embed -ftime-trace files found next to outputs
/// embed-time-trace = true
///
/// # Indent the JSON output
/// pretty = false
/// ```
///
/// Config file location:
/// - Linux: `$XDG_CONFIG_HOME/steptrace/config.toml` or `~/.config/steptrace/config.toml`
/// - macOS: `$XDG_CONFIG_HOME/steptrace/config.toml` or `~/.config/steptrace/config.toml`
/// - Windows: `%APPDATA%\steptrace\config.toml`
///
/// Environment variables: `STEPTRACE_GRANULARITY`, `STEPTRACE_SHOW_ALL`, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SteptraceConfig {
    pub granularity: u64,

    #[serde(alias = "show_all")]
    pub show_all: bool,

    #[serde(alias = "embed_time_trace")]
    pub embed_time_trace: bool,

    pub pretty: bool,
}

impl Default for SteptraceConfig {
    fn default() -> Self {
        Self {
            granularity: DEFAULT_GRANULARITY.0,
            show_all: false,
            embed_time_trace: false,
            pretty: false,
        }
    }
}

impl SteptraceConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Later sources override earlier ones:
    /// 1. Default values
    /// 2. Config file (see struct documentation for platform-specific paths)
    /// 3. Environment variables (STEPTRACE_*)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(get_config_path().as_deref())
    }

    /// Like [`load`](Self::load), reading the config file at `path` if it exists.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = path
            && path.exists()
        {
            log::debug!("Loading config from {}", path.display());
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("STEPTRACE")
                .prefix_separator("_")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;

        if config.granularity == 0 {
            return Err(ConfigError::Message(
                "granularity must be at least 1 microsecond".into(),
            ));
        }

        Ok(config)
    }

    /// Conversion options implied by this configuration alone.
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            trim: if self.show_all {
                Trim::ShowAll
            } else {
                Trim::LatestBuild
            },
            granularity: Micros(self.granularity),
            embed_time_trace: self.embed_time_trace,
        }
    }
}

fn get_config_path() -> Option<PathBuf> {
    // Explicit override, used by tests to isolate from the user's config
    if let Ok(path) = std::env::var("STEPTRACE_CONFIG_PATH") {
        return Some(PathBuf::from(path));
    }

    // choose_base_strategy uses:
    // - XDG on Linux (respects XDG_CONFIG_HOME, falls back to ~/.config)
    // - XDG on macOS (~/.config instead of ~/Library/Application Support)
    // - Windows conventions on Windows (%APPDATA%)
    let strategy = choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("steptrace").join("config.toml"))
}
