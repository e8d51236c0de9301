use crate::config::Config;
use crate::style::Style;
use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable, user-level view of the process environment shared by every command.
///
/// The environment contains:
/// - `vars`: environment variables visible to `echo` and to spawned programs.
/// - `current_dir`: the working directory, kept in sync with the process by `cd`.
/// - `should_exit`: raised by `exit`; the shell loop stops before the next prompt.
/// - `style`: whether output is colored.
/// - `tree_depth`: recursion bound used by `tree -r`.
#[derive(Debug, Clone)]
pub struct Environment {
    pub vars: HashMap<String, String>,
    pub current_dir: PathBuf,
    pub should_exit: bool,
    pub style: Style,
    pub tree_depth: usize,
}

impl Environment {
    /// Default recursion bound for `tree -r`.
    pub const DEFAULT_TREE_DEPTH: usize = 5;

    /// Capture the current process state into a new `Environment` instance.
    ///
    /// Variables are copied from `std::env::vars()`, `current_dir` from
    /// `std::env::current_dir()`. Colors are on.
    pub fn new() -> Self {
        let vars = stdenv::vars().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars,
            current_dir,
            should_exit: false,
            style: Style::colored(),
            tree_depth: Self::DEFAULT_TREE_DEPTH,
        }
    }

    /// Capture the process state, taking output style and tree bound from `config`.
    pub fn with_config(config: &Config) -> Self {
        Self {
            style: Style::new(config.shell.color),
            tree_depth: config.tree.max_depth,
            ..Self::new()
        }
    }

    /// Get the value of an environment variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Set or override an environment variable in `self.vars`.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::env::Environment;

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = Environment::new();
        env.vars.clear();

        // initially absent
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE");

        assert_eq!(env.get_var("KEY"), Some("VALUE".to_string()));
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
    }

    #[test]
    fn test_empty_name_is_never_set() {
        let mut env = Environment::new();
        env.set_var("", "oops");
        assert_eq!(env.get_var(""), None);
    }

    #[test]
    fn test_with_config_takes_style_and_depth() {
        let mut config = Config::default_config();
        config.shell.color = false;
        config.tree.max_depth = 2;

        let env = Environment::with_config(&config);
        assert!(!env.style.is_enabled());
        assert_eq!(env.tree_depth, 2);
        assert!(!env.should_exit);
    }
}
