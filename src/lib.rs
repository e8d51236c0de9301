//! A small interactive shell.
//!
//! The shell reads a line, splits it into whitespace-delimited tokens and either runs
//! one of a fixed set of built-in commands (`cd`, `exit`, `help`, `echo`, `tree`) or
//! launches an external program found on `PATH` and waits for it.
//!
//! The main entry point is [`Interpreter`], which owns the [`env::Environment`] and
//! dispatches token sequences. [`Interpreter::repl`] drives the interactive loop and
//! reports how it ended as a [`Shutdown`].

mod builtin;
pub mod command;
pub mod config;
pub mod env;
mod external;
pub mod flags;
mod interpreter;
mod io_adapters;
pub mod lexer;
pub mod logging;
mod prompt;
mod shutdown;
pub mod style;
#[cfg(test)]
mod testutil;
mod tree;

pub use builtin::Builtin;
pub use interpreter::{Interpreter, LineSource, PlainLines};
pub use io_adapters::{MemReader, MemWriter};
pub use shutdown::Shutdown;
