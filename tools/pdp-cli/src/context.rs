//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use pdp_core::config::WidgetConfig;
use pdp_observability::{LogFormat, LogLevel, StructuredLogger};

use crate::output::Output;

/// Config file names searched for, in order.
pub const CONFIG_NAMES: [&str; 3] = ["pdp.toml", ".pdp.toml", "pdp.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Widget configuration, parsed but not yet validated.
    pub config: WidgetConfig,
    /// Where the config came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let config = WidgetConfig::read(path)
                .with_context(|| format!("Failed to load config from {}", path))?;
            (config, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (WidgetConfig::default(), None),
            }
        };

        if let Some(path) = &config_path {
            output.debug(&format!("Using config {}", path.display()));
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(WidgetConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = WidgetConfig::read(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Logger for a widget driven by this command.
    ///
    /// `--verbose` lowers the level to debug and switches to human output
    /// unless JSON output was requested.
    pub fn logger(&self) -> StructuredLogger {
        let logger = self.config.logger();
        if !self.output.is_verbose() {
            return logger;
        }
        let format = if self.output.is_json() {
            LogFormat::Json
        } else {
            LogFormat::Human
        };
        logger.with_min_level(LogLevel::Debug).with_format(format)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}
