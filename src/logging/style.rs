//! Terminal colors for level tags and helper glyphs.
//!
//! Everything here is a pure function of its input. Whether escape codes
//! are actually emitted is decided by `colored` (TTY detection,
//! `NO_COLOR`, `CLICOLOR_FORCE`).

use colored::{Color, ColoredString, Colorize};

use crate::logging::level::Level;

/// Color used for a level's tag.
pub fn level_color(level: Level) -> Color {
    match level {
        Level::Debug => Color::Cyan,
        Level::Info => Color::Green,
        Level::Warn => Color::Yellow,
        Level::Error | Level::DPanic | Level::Panic | Level::Fatal => Color::Red,
    }
}

/// Bracketed, colored tag such as `[INFO]`.
pub fn level_tag(level: Level) -> ColoredString {
    format!("[{}]", level.as_upper_str())
        .as_str()
        .color(level_color(level))
}

/// Symbol prefixed to the message by the semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Success,
    Progress,
    Warning,
    Failure,
}

impl Glyph {
    pub fn symbol(&self) -> &'static str {
        match self {
            Glyph::Success => "✓",
            Glyph::Progress => "→",
            Glyph::Warning => "⚠",
            Glyph::Failure => "✗",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Glyph::Success => Color::Green,
            Glyph::Progress => Color::Blue,
            Glyph::Warning => Color::Yellow,
            Glyph::Failure => Color::Red,
        }
    }

    /// Level the helper emits at.
    pub fn level(&self) -> Level {
        match self {
            Glyph::Success | Glyph::Progress => Level::Info,
            Glyph::Warning => Level::Warn,
            Glyph::Failure => Level::Error,
        }
    }

    pub fn colored(&self) -> ColoredString {
        self.symbol().color(self.color())
    }
}
