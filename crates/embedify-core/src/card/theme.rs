//! Message categories and their color/glyph themes.

use serde::{Deserialize, Serialize};

/// Semantic category of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Default,
    Info,
    Success,
    Warning,
    Error,
}

/// Color and emoji glyph bound to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Theme {
    pub color: u32,
    pub glyph: &'static str,
}

const DEFAULT_THEME: Theme = Theme {
    color: 0x1e88e5,
    glyph: "",
};
const INFO_THEME: Theme = Theme {
    color: 0x03c9d7,
    glyph: "ℹ️",
};
const SUCCESS_THEME: Theme = Theme {
    color: 0x00c853,
    glyph: "✅",
};
const WARNING_THEME: Theme = Theme {
    color: 0xffc107,
    glyph: "⚠️",
};
const ERROR_THEME: Theme = Theme {
    color: 0xf44336,
    glyph: "❌",
};

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Default,
        Self::Info,
        Self::Success,
        Self::Warning,
        Self::Error,
    ];

    /// Theme for this category
    pub const fn theme(&self) -> Theme {
        match self {
            Self::Default => DEFAULT_THEME,
            Self::Info => INFO_THEME,
            Self::Success => SUCCESS_THEME,
            Self::Warning => WARNING_THEME,
            Self::Error => ERROR_THEME,
        }
    }

    pub const fn color(&self) -> u32 {
        self.theme().color
    }

    pub const fn glyph(&self) -> &'static str {
        self.theme().glyph
    }
}
