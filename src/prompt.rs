use crate::env::Environment;
use log::warn;

const UNKNOWN_USER: &str = "Unknown user";

/// `{user}@{cwd} > `, with the process working directory as `cwd`.
pub(crate) fn render(env: &Environment) -> String {
    let user = env
        .get_var("USER")
        .unwrap_or_else(|| UNKNOWN_USER.to_string());
    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(e) => {
            warn!("getcwd failed: {e}");
            eprintln!("microshell: getcwd() error: {e}");
            String::new()
        }
    };
    format!("{user}@{cwd} > ")
}
