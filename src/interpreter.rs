use crate::builtin::Builtin;
use crate::command::{CommandFactory, ExecutableCommand, ExitCode, NOT_FOUND, Stdin, Stdout};
use crate::env::Environment;
use crate::external::ExternalCommand;
use crate::lexer::{self, LexingError};
use crate::prompt;
use crate::shutdown::Shutdown;
use log::{debug, error, info, warn};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, IsTerminal, Read, Write};
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate: the [`Builtin`] table and
/// [`ExternalCommand`].
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// Where the shell loop gets its lines from.
///
/// Implemented for rustyline's editor; tests feed scripted lines.
pub trait LineSource {
    /// Show `prompt` and return the next line without its terminator.
    fn read_line(&mut self, prompt: &str) -> rustyline::Result<String>;
}

impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> rustyline::Result<String> {
        self.readline(prompt)
    }
}

/// Line input without editing, for when stdin is a pipe or a file.
///
/// rustyline stays silent in that case; this source still writes the prompt.
pub struct PlainLines<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PlainLines<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> LineSource for PlainLines<R, W> {
    fn read_line(&mut self, prompt: &str) -> rustyline::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ReadlineError::Eof);
        }
        let line = line.strip_suffix('\n').unwrap_or(&line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        Ok(line.to_string())
    }
}

/// A minimal interactive shell that runs built-in and external commands.
///
/// The interpreter owns an [`Environment`] and asks its factories, in order, to build
/// a command for each name: built-ins first, then programs on `PATH`.
///
/// Example
/// ```
/// use microshell::{Interpreter, MemReader, MemWriter};
/// let mut sh = Interpreter::default();
/// let out = MemWriter::new();
/// let code = sh
///     .execute_line_with_io("echo hello world", Box::new(MemReader::empty()), Box::new(out.clone()))
///     .unwrap();
/// assert_eq!(code, 0);
/// assert_eq!(out.contents(), "hello world \n");
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
    interrupted: Arc<AtomicBool>,
}

impl Interpreter {
    /// Create an interpreter over `env` with the built-in table followed by the
    /// external command launcher.
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            commands: vec![
                Box::new(Factory::<Builtin>::default()),
                Box::new(Factory::<ExternalCommand>::default()),
            ],
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    fn create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        self.commands
            .iter()
            .find_map(|factory| factory.try_create(&self.env, name, args))
    }

    /// Flag the loop polls before and after every read.
    ///
    /// Setting it makes [`Interpreter::run_loop`] end with [`Shutdown::Interrupted`]
    /// once the current command has finished.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    /// Tokenize and run one line of input against the terminal's streams.
    pub fn execute_line(&mut self, line: &str) -> Result<ExitCode, LexingError> {
        let stdin = InheritedStdin(std::io::stdin());
        self.execute_line_with_io(line, Box::new(stdin), Box::new(std::io::stdout()))
    }

    /// Tokenize and run one line of input.
    ///
    /// A blank line is a no-op with status 0. Unknown commands and commands that fail
    /// are reported on stderr and give a non-zero status; only tokenizer failures are
    /// returned as errors, and those end the shell.
    pub fn execute_line_with_io(
        &mut self,
        line: &str,
        stdin: Box<dyn Stdin>,
        stdout: Box<dyn Stdout>,
    ) -> Result<ExitCode, LexingError> {
        let tokens = lexer::split_into_tokens(line)?;
        debug!("tokens: {:?}", tokens);

        let Some((name, rest)) = tokens.split_first() else {
            return Ok(0);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        let Some(cmd) = self.create(name, &args) else {
            warn!("command not found: {}", name);
            eprintln!("microshell: Command not found: {}", name);
            return Ok(NOT_FOUND);
        };

        match cmd.execute(stdin, stdout, &mut self.env) {
            Ok(code) => {
                debug!("{} finished with {}", name, code);
                Ok(code)
            }
            Err(e) => {
                warn!("{}: {:#}", name, e);
                eprintln!("microshell: {:#}", e);
                Ok(1)
            }
        }
    }

    /// Interactive loop on the process's stdin.
    ///
    /// Installs a SIGINT handler that only raises [`Interpreter::interrupt_flag`], then
    /// reads through rustyline on a terminal or [`PlainLines`] otherwise.
    pub fn repl(&mut self) -> Shutdown {
        let flag = self.interrupt_flag();
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
            warn!("cannot install SIGINT handler: {}", e);
        }

        if !std::io::stdin().is_terminal() {
            info!("stdin is not a terminal, reading plain lines");
            let mut source = PlainLines::new(std::io::stdin().lock(), std::io::stdout());
            return self.run_loop(&mut source);
        }

        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => return Shutdown::EditorUnavailable(e.to_string()),
        };
        self.run_loop(&mut rl)
    }

    /// Prompt, read, tokenize and dispatch until a command asks to stop or input fails.
    ///
    /// Ctrl-C at the prompt arrives from the line editor as
    /// [`ReadlineError::Interrupted`]. Ctrl-C anywhere else raises the interrupt flag,
    /// which is checked before each prompt and after each read. Both end the loop
    /// cleanly.
    pub fn run_loop(&mut self, source: &mut dyn LineSource) -> Shutdown {
        while !self.env.should_exit {
            if self.is_interrupted() {
                return Shutdown::Interrupted;
            }
            let prompt = prompt::render(&self.env);
            let read = source.read_line(&prompt);
            if self.is_interrupted() {
                return Shutdown::Interrupted;
            }
            let line = match read {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => return Shutdown::Interrupted,
                Err(ReadlineError::Eof) => return Shutdown::InputClosed,
                Err(e) => {
                    error!("read failed: {}", e);
                    return Shutdown::ReadFailed(e.to_string());
                }
            };

            if let Err(e) = self.execute_line(&line) {
                error!("{}", e);
                eprintln!("microshell: {}", e);
                return e.into();
            }
        }
        Shutdown::Requested
    }
}

impl Default for Interpreter {
    /// An interpreter over the current process environment.
    fn default() -> Self {
        Self::new(Environment::new())
    }
}

/// The shell's own stdin, handed to children as-is.
///
/// Holds the unlocked handle: [`PlainLines`] may keep stdin locked for the whole loop.
struct InheritedStdin(std::io::Stdin);

impl Read for InheritedStdin {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.0.read(buf)
    }
}

impl Stdin for InheritedStdin {
    fn stdio(self: Box<Self>) -> Stdio {
        Stdio::inherit()
    }
}
