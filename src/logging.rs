use crate::config::LoggingConfig;
use log::LevelFilter;
use simplelog::WriteLogger;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Install a file logger per `config`.
///
/// Best-effort: an unknown level, a missing `HOME` or an unwritable file leaves
/// logging off. Nothing is ever logged to the terminal.
pub fn init(config: &LoggingConfig) {
    let level = level_filter(&config.level);
    if level == LevelFilter::Off {
        return;
    }
    let Some(path) = config.file.clone().or_else(default_log_path) else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    else {
        return;
    };

    let log_config = simplelog::ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    let _ = WriteLogger::init(level, log_config, file);
}

/// Parse a level name; anything unrecognized turns logging off.
pub fn level_filter(name: &str) -> LevelFilter {
    LevelFilter::from_str(name.trim()).unwrap_or(LevelFilter::Off)
}

/// `~/.local/share/microshell/microshell.log`
pub fn default_log_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(Path::new(&home).join(".local/share/microshell/microshell.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!(level_filter("debug"), LevelFilter::Debug);
        assert_eq!(level_filter("WARN"), LevelFilter::Warn);
        assert_eq!(level_filter(" off "), LevelFilter::Off);
    }

    #[test]
    fn unknown_level_disables_logging() {
        assert_eq!(level_filter("loud"), LevelFilter::Off);
    }

    #[test]
    fn default_path_lives_under_home() {
        if let Some(path) = default_log_path() {
            assert!(path.ends_with(".local/share/microshell/microshell.log"));
        }
    }
}
