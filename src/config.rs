use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// Environment variable naming an explicit user config file.
pub const CONFIG_ENV_VAR: &str = "MICROSHELL_CONFIG";

// ── Final (merged) config types ──

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub shell: ShellConfig,
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShellConfig {
    /// ANSI colors in help, tree and shutdown messages.
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TreeConfig {
    /// Recursion bound for `tree -r`.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Log file; defaults to `~/.local/share/microshell/microshell.log`.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_depth() -> usize {
    5
}

fn default_level() -> String {
    "warn".to_string()
}

// ── Overlay types (user config that overrides defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    shell: ShellOverlay,
    #[serde(default)]
    tree: TreeOverlay,
    #[serde(default)]
    logging: LoggingOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct ShellOverlay {
    color: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct TreeOverlay {
    max_depth: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct LoggingOverlay {
    level: Option<String>,
    file: Option<PathBuf>,
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Override with the user file at `$MICROSHELL_CONFIG`, or else
    ///    `~/.config/microshell/config.toml`, if it exists
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(path) = Self::user_config_path() {
            if let Some(overlay) = Self::load_overlay(&path) {
                config.apply_overlay(overlay);
            }
        }
        config
    }

    fn user_config_path() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(explicit));
        }
        let home = std::env::var_os("HOME")?;
        Some(Path::new(&home).join(".config/microshell/config.toml"))
    }

    fn load_overlay(path: &Path) -> Option<ConfigOverlay> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("microshell: config parse error in {}: {e}", path.display());
                None
            }
        }
    }

    /// Apply an overlay on top of this config. Scalars present in the overlay win.
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        if let Some(v) = overlay.shell.color {
            self.shell.color = v;
        }
        if let Some(v) = overlay.tree.max_depth {
            self.tree.max_depth = v;
        }
        if let Some(v) = overlay.logging.level {
            self.logging.level = v;
        }
        if let Some(v) = overlay.logging.file {
            self.logging.file = Some(v);
        }
    }
}
