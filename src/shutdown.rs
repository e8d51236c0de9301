use crate::lexer::LexingError;
use crate::style::{Color, Style};
use std::fmt;

/// Why the shell loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shutdown {
    /// The user ran `exit`.
    Requested,
    /// Ctrl-C at the prompt.
    Interrupted,
    /// Standard input reached end of file.
    InputClosed,
    /// Reading a line failed.
    ReadFailed(String),
    /// The line editor could not be set up.
    EditorUnavailable(String),
    /// A line held more tokens than the shell accepts.
    TooManyTokens,
    /// Memory for a line could not be reserved.
    AllocationFailure,
}

impl Shutdown {
    pub const SUCCESS_CODE: i32 = 0;
    pub const ALLOCATION_ERROR_CODE: i32 = 2;
    pub const MISC_FAILURE_CODE: i32 = 3;

    /// Process exit status for this shutdown.
    pub fn exit_code(&self) -> i32 {
        match self {
            Shutdown::Requested | Shutdown::Interrupted => Self::SUCCESS_CODE,
            Shutdown::AllocationFailure => Self::ALLOCATION_ERROR_CODE,
            Shutdown::InputClosed
            | Shutdown::ReadFailed(_)
            | Shutdown::EditorUnavailable(_)
            | Shutdown::TooManyTokens => Self::MISC_FAILURE_CODE,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.exit_code() == Self::SUCCESS_CODE
    }

    /// Print the final message: stdout in green for clean exits, stderr in red otherwise.
    pub fn report(&self, style: Style) {
        let line = format!("microshell: {self}");
        if self.is_clean() {
            println!("{}", style.paint(Color::Green, line));
        } else {
            eprintln!("{}", style.paint(Color::Red, line));
        }
    }
}

impl fmt::Display for Shutdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shutdown::Requested => write!(f, "Exiting microshell. Goodbye!"),
            Shutdown::Interrupted => write!(f, "Exiting microshell due to SIGINT (Ctrl+C)."),
            Shutdown::AllocationFailure => {
                write!(f, "Exiting microshell due to allocation error.")
            }
            Shutdown::InputClosed => {
                write!(f, "Exiting microshell due to an error: end of input")
            }
            Shutdown::ReadFailed(e) => {
                write!(f, "Exiting microshell due to an error: cannot read input: {e}")
            }
            Shutdown::EditorUnavailable(e) => {
                write!(f, "Exiting microshell due to an error: cannot start line editor: {e}")
            }
            Shutdown::TooManyTokens => {
                write!(f, "Exiting microshell due to an error: too many tokens")
            }
        }
    }
}

impl From<LexingError> for Shutdown {
    fn from(e: LexingError) -> Self {
        match e {
            LexingError::TooManyTokens { .. } => Shutdown::TooManyTokens,
            LexingError::Allocation(_) => Shutdown::AllocationFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_category() {
        assert_eq!(Shutdown::Requested.exit_code(), 0);
        assert_eq!(Shutdown::Interrupted.exit_code(), 0);
        assert_eq!(Shutdown::AllocationFailure.exit_code(), 2);
        assert_eq!(Shutdown::InputClosed.exit_code(), 3);
        assert_eq!(Shutdown::TooManyTokens.exit_code(), 3);
        assert_eq!(Shutdown::ReadFailed("boom".into()).exit_code(), 3);
    }

    #[test]
    fn lexing_errors_map_to_shutdowns() {
        let s: Shutdown = LexingError::TooManyTokens { limit: 64 }.into();
        assert_eq!(s, Shutdown::TooManyTokens);
    }

    #[test]
    fn messages_name_the_reason() {
        assert_eq!(Shutdown::Requested.to_string(), "Exiting microshell. Goodbye!");
        assert!(Shutdown::TooManyTokens.to_string().contains("too many tokens"));
    }
}
