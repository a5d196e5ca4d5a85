//! Built-in marker styles.

use serde::{Deserialize, Serialize};

use crate::toggle::MarkerPair;

/// A built-in inline markup style.
#[derive(
    clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MarkerType {
    #[default]
    Highlight,
    Bold,
    Italic,
    Strikethrough,
    Code,
}

impl MarkerType {
    /// Every built-in style, in command registration order.
    pub const ALL: [Self; 5] = [
        Self::Highlight,
        Self::Bold,
        Self::Italic,
        Self::Strikethrough,
        Self::Code,
    ];

    /// Settings key and command id suffix.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Highlight => "highlight",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Strikethrough => "strikethrough",
            Self::Code => "code",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Highlight => "Highlight",
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Strikethrough => "Strikethrough",
            Self::Code => "Inline Code",
        }
    }

    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Highlight => "==",
            Self::Bold => "**",
            Self::Italic => "_",
            Self::Strikethrough => "~~",
            Self::Code => "`",
        }
    }

    /// Built-in styles are symmetric.
    pub const fn postfix(self) -> &'static str {
        self.prefix()
    }

    pub fn marker_pair(self) -> MarkerPair {
        MarkerPair::new(self.prefix(), self.postfix())
    }
}
