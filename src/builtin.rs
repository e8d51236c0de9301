use crate::command::{CommandFactory, ExecutableCommand, ExitCode, Stdin, Stdout};
use crate::env::Environment;
use crate::flags::{FlagStatus, check_flag, flag_args};
use crate::interpreter::Factory;
use crate::style::Color;
use crate::tree::TreeRenderer;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use log::{debug, info, warn};
use regex::Regex;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins implement [`argh::FromArgs`] by hand, since every argument is a plain
/// word to them, and run in-process without spawning a child.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name() -> &'static str;

    /// Executes the command writing to `stdout`.
    ///
    /// Return value follows shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        _stdin: Box<dyn Stdin>,
        mut stdout: Box<dyn Stdout>,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        let result = <T as BuiltinCommand>::execute(*self, &mut stdout, env);
        stdout.flush()?;
        match result {
            Ok(x) => Ok(x),
            Err(e) => {
                warn!("{}: {:#}", T::name(), e);
                eprintln!("microshell: {:#}", e);
                Ok(1)
            }
        }
    }
}

/// The fixed command table, in declaration order.
///
/// Lookup walks [`Builtin::ALL`] front to back and compares names case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Exit,
    Help,
    Echo,
    Tree,
}

impl Builtin {
    /// Every built-in, in the order lookup tries them and `help` lists them.
    pub const ALL: [Builtin; 5] = [
        Builtin::Cd,
        Builtin::Exit,
        Builtin::Help,
        Builtin::Echo,
        Builtin::Tree,
    ];

    /// The word that invokes this built-in.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Cd => Cd::name(),
            Builtin::Exit => Exit::name(),
            Builtin::Help => Help::name(),
            Builtin::Echo => Echo::name(),
            Builtin::Tree => Tree::name(),
        }
    }

    /// One-line summary printed by `help`.
    pub fn description(self) -> &'static str {
        match self {
            Builtin::Cd => "Change the current directory. Usage: cd <directory_path>",
            Builtin::Exit => "Exit the microshell.",
            Builtin::Help => "Display this help message.",
            Builtin::Echo => {
                "Echo the input arguments to the console. Supports environment variables with $VAR_NAME."
            }
            Builtin::Tree => "Display a directory tree. Usage: tree [directory_path] [-r]",
        }
    }

    /// Find the built-in called `name`. Matching is exact and case-sensitive.
    pub fn lookup(name: &str) -> Option<Builtin> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    fn create(self, args: &[&str]) -> Box<dyn ExecutableCommand> {
        match self {
            Builtin::Cd => parse::<Cd>(args),
            Builtin::Exit => parse::<Exit>(args),
            Builtin::Help => parse::<Help>(args),
            Builtin::Echo => parse::<Echo>(args),
            Builtin::Tree => parse::<Tree>(args),
        }
    }
}

fn parse<T: BuiltinCommand + 'static>(args: &[&str]) -> Box<dyn ExecutableCommand> {
    match T::from_args(&[T::name()], args) {
        Ok(cmd) => Box::new(cmd),
        Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
            name: T::name(),
            output,
            is_error: status.is_err(),
        }),
    }
}

/// Argument parsing stopped early: either a usage error or a `--help` request.
struct InvalidArgs {
    name: &'static str,
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        _stdin: Box<dyn Stdin>,
        mut stdout: Box<dyn Stdout>,
        _env: &mut Environment,
    ) -> Result<ExitCode> {
        if self.is_error {
            warn!("{}: {}", self.name, self.output.trim_end());
            eprintln!("microshell: {}: {}", self.name, self.output.trim_end());
            Ok(1)
        } else {
            writeln!(stdout, "{}", self.output.trim_end())?;
            Ok(0)
        }
    }
}

impl CommandFactory for Factory<Builtin> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        Builtin::lookup(name).map(|builtin| builtin.create(args))
    }
}

fn usage_error(message: impl Into<String>) -> EarlyExit {
    EarlyExit {
        output: message.into(),
        status: Err(()),
    }
}

/// Change the current working directory.
///
/// Every argument is a path, including ones starting with `-`. Only a lone
/// `--help` is taken as a request for usage.
pub struct Cd {
    pub paths: Vec<String>,
}

impl FromArgs for Cd {
    fn from_args(command_name: &[&str], args: &[&str]) -> Result<Self, EarlyExit> {
        if args == ["--help"] {
            return Err(EarlyExit {
                output: format!(
                    "Usage: {} <directory_path>\n\nChange the current working directory.",
                    command_name.join(" ")
                ),
                status: Ok(()),
            });
        }
        Ok(Cd {
            paths: args.iter().map(|a| a.to_string()).collect(),
        })
    }
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let [target] = self.paths.as_slice() else {
            eprintln!("microshell: Expected only 1 argument to \"cd\"");
            return Ok(1);
        };

        let target = PathBuf::from(target);
        let new_dir = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        debug!("cd: resolving {}", new_dir.display());
        let canonical = fs::canonicalize(&new_dir).context("Failed to change directory")?;
        env::set_current_dir(&canonical).context("Failed to change directory")?;
        info!("cd: {}", canonical.display());
        env.current_dir = canonical;
        Ok(0)
    }
}

/// Exit the shell. Arguments are ignored so that `exit` always works.
pub struct Exit;

impl FromArgs for Exit {
    fn from_args(_command_name: &[&str], _args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Exit)
    }
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}

/// List the built-in commands. Arguments are ignored.
pub struct Help;

impl FromArgs for Help {
    fn from_args(_command_name: &[&str], _args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Help)
    }
}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let style = env.style;
        writeln!(stdout, "{}", style.paint(Color::Cyan, "microshell: a tiny interactive shell"))?;
        writeln!(stdout, "{}", style.paint(Color::Cyan, "Microshell Help:"))?;
        writeln!(stdout, "{}", style.paint(Color::Green, "Available commands:"))?;
        for builtin in Builtin::ALL {
            writeln!(stdout, "{}", style.paint(Color::Yellow, format!(" - {}", builtin.name())))?;
            writeln!(
                stdout,
                "{}",
                style.paint(Color::Magenta, format!("     {}", builtin.description()))
            )?;
        }
        Ok(0)
    }
}

/// Write the arguments to standard output, expanding `$NAME` and `$NAME\suffix`.
///
/// Every argument is taken verbatim, including ones that look like options.
pub struct Echo {
    pub args: Vec<String>,
}

impl FromArgs for Echo {
    fn from_args(_command_name: &[&str], args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Echo {
            args: args.iter().map(|a| a.to_string()).collect(),
        })
    }
}

impl BuiltinCommand for Echo {
    fn name() -> &'static str {
        "echo"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        // `$` then the variable name up to the first backslash, then an optional literal suffix.
        let reference =
            Regex::new(r"^\$([^\\]*)(?:\\(.*))?$").context("echo: invalid reference pattern")?;

        for arg in &self.args {
            let Some(caps) = reference.captures(arg) else {
                write!(stdout, "{} ", arg)?;
                continue;
            };
            let name = caps.get(1).map_or("", |m| m.as_str());
            let suffix = caps.get(2).map(|m| m.as_str());
            match (env.get_var(name), suffix) {
                (Some(value), Some(suffix)) => write!(stdout, "{}{} ", value, suffix)?,
                (None, Some(suffix)) => write!(stdout, "{}{} ", not_found(name), suffix)?,
                (Some(value), None) => write!(stdout, "{}", value)?,
                (None, None) => write!(stdout, "{} ", not_found(name))?,
            }
        }
        writeln!(stdout)?;
        Ok(0)
    }
}

fn not_found(name: &str) -> String {
    format!("{{environment variable \"{}\" not found}}", name)
}

/// Print a directory tree. `-r` descends into subdirectories.
pub struct Tree {
    pub path: Option<String>,
    pub recursive: bool,
}

impl FromArgs for Tree {
    fn from_args(_command_name: &[&str], args: &[&str]) -> Result<Self, EarlyExit> {
        if args.len() > 2 {
            return Err(usage_error("Expected at most 2 arguments to \"tree\""));
        }

        let recursive = match check_flag(args, 'r') {
            FlagStatus::Absent => false,
            FlagStatus::Present => true,
            FlagStatus::Conflict => {
                return Err(usage_error(format!(
                    "unrecognized flag(s) {}",
                    flag_args(args).join(" ")
                )));
            }
        };

        let mut paths = args.iter().filter(|a| !a.starts_with('-'));
        let path = paths.next().map(|p| p.to_string());
        if paths.next().is_some() {
            return Err(usage_error("Expected a single directory path"));
        }

        Ok(Tree { path, recursive })
    }
}

impl BuiltinCommand for Tree {
    fn name() -> &'static str {
        "tree"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let max_depth = if self.recursive { env.tree_depth } else { 0 };
        let root = PathBuf::from(self.path.as_deref().unwrap_or("."));
        TreeRenderer::new(env.style, max_depth).render(&root, stdout)?;
        Ok(0)
    }
}
