//! Lexical analysis: splitting an input line into word tokens.

use std::collections::TryReserveError;
use std::fmt;

/// Characters that separate tokens. Any run of them counts as one separator.
pub const TOKEN_DELIMITERS: [char; 5] = [' ', '\t', '\r', '\n', '\x07'];

/// Upper bound on the number of tokens in a single line.
pub const MAX_TOKENS: usize = 64;

/// Errors that can occur during lexical analysis.
///
/// Both are fatal for the shell; see [`crate::Shutdown`].
#[derive(Debug)]
pub enum LexingError {
    /// The line holds more than [`MAX_TOKENS`] words.
    TooManyTokens { limit: usize },
    /// Storage for the token sequence could not be reserved.
    Allocation(TryReserveError),
}

impl fmt::Display for LexingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexingError::TooManyTokens { limit } => {
                write!(f, "Too many tokens (at most {limit} allowed)")
            }
            LexingError::Allocation(e) => write!(f, "Allocation error: {e}"),
        }
    }
}

impl std::error::Error for LexingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LexingError::Allocation(e) => Some(e),
            LexingError::TooManyTokens { .. } => None,
        }
    }
}

impl From<TryReserveError> for LexingError {
    fn from(e: TryReserveError) -> Self {
        LexingError::Allocation(e)
    }
}

/// Split `line` into owned, non-empty tokens.
///
/// Blank input (empty, or delimiters only) gives an empty vector.
pub fn split_into_tokens(line: &str) -> Result<Vec<String>, LexingError> {
    let mut tokens: Vec<String> = Vec::new();

    for word in line.split(TOKEN_DELIMITERS).filter(|w| !w.is_empty()) {
        if tokens.len() >= MAX_TOKENS {
            return Err(LexingError::TooManyTokens { limit: MAX_TOKENS });
        }
        tokens.try_reserve(1)?;

        let mut owned = String::new();
        owned.try_reserve_exact(word.len())?;
        owned.push_str(word);
        tokens.push(owned);
    }

    Ok(tokens)
}
