//! Per-session display preferences

use serde::{Deserialize, Serialize};
use std::fmt;

/// Colour themes, cycled in declaration order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    White,
    G10,
    G90,
    G100,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::White, Theme::G10, Theme::G90, Theme::G100];

    /// The theme after this one, wrapping around
    pub fn next(self) -> Theme {
        let index = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::White => "white",
            Theme::G10 => "g10",
            Theme::G90 => "g90",
            Theme::G100 => "g100",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
    pub sidebar_open: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::White,
            sidebar_open: true,
        }
    }
}

impl Preferences {
    /// Advances to the next theme and returns it
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.next();
        self.theme
    }

    /// Flips the sidebar, or sets it to `forced` when given
    pub fn toggle_sidebar(&mut self, forced: Option<bool>) -> bool {
        self.sidebar_open = forced.unwrap_or(!self.sidebar_open);
        self.sidebar_open
    }
}
