//! ANSI coloring for shell output.

/// Terminal colors used by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    /// Dimmed default foreground.
    Dim,
}

impl Color {
    fn code(self) -> &'static str {
        match self {
            Color::Red => "\x1b[0;31m",
            Color::Green => "\x1b[0;32m",
            Color::Yellow => "\x1b[0;33m",
            Color::Blue => "\x1b[0;34m",
            Color::Magenta => "\x1b[0;35m",
            Color::Cyan => "\x1b[0;36m",
            Color::Dim => "\x1b[2m",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Decides whether text gets wrapped in escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    enabled: bool,
}

impl Style {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn colored() -> Self {
        Self::new(true)
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Wrap `text` in `color`, or return it unchanged when colors are off.
    pub fn paint(&self, color: Color, text: impl AsRef<str>) -> String {
        let text = text.as_ref();
        if self.enabled {
            format!("{}{}{}", color.code(), text, RESET)
        } else {
            text.to_string()
        }
    }
}
