//! Terminal emphasis for map markers.
//!
//! Styles are plain values handed to `place_marker`; the escape sequences are
//! produced through crossterm's ANSI commands when a grid is rendered.

use crossterm::style::{Attribute, Color, SetAttribute, SetForegroundColor};
use serde::{Deserialize, Serialize};

/// Emphasis applied to a marker label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
    /// Underlined red, the default marker look
    #[default]
    Highlight,
    Red,
    Green,
    Yellow,
    Blue,
    Purple,
    Bold,
    Blink,
}

impl MarkerStyle {
    /// Parse a style name (case-insensitive). Unknown names return None.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "highlight" => Some(Self::Highlight),
            "red" => Some(Self::Red),
            "green" => Some(Self::Green),
            "yellow" => Some(Self::Yellow),
            "blue" => Some(Self::Blue),
            "purple" => Some(Self::Purple),
            "bold" => Some(Self::Bold),
            "blink" => Some(Self::Blink),
            _ => None,
        }
    }

    /// Escape sequence emitted before the first cell of a styled label
    pub fn start_token(self) -> String {
        match self {
            Self::Highlight => format!(
                "{}{}",
                SetAttribute(Attribute::Underlined),
                SetForegroundColor(Color::DarkRed)
            ),
            Self::Red => SetForegroundColor(Color::DarkRed).to_string(),
            Self::Green => SetForegroundColor(Color::DarkGreen).to_string(),
            Self::Yellow => SetForegroundColor(Color::DarkYellow).to_string(),
            Self::Blue => SetForegroundColor(Color::DarkBlue).to_string(),
            Self::Purple => SetForegroundColor(Color::Magenta).to_string(),
            Self::Bold => SetAttribute(Attribute::Bold).to_string(),
            Self::Blink => SetAttribute(Attribute::SlowBlink).to_string(),
        }
    }
}

/// Escape sequence closing any style
pub fn end_token() -> String {
    SetAttribute(Attribute::Reset).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_escape_sequences() {
        for style in [
            MarkerStyle::Highlight,
            MarkerStyle::Red,
            MarkerStyle::Green,
            MarkerStyle::Yellow,
            MarkerStyle::Blue,
            MarkerStyle::Purple,
            MarkerStyle::Bold,
            MarkerStyle::Blink,
        ] {
            assert!(style.start_token().starts_with("\x1b["), "{:?}", style);
        }
        assert!(end_token().starts_with("\x1b["));
    }

    #[test]
    fn test_by_name() {
        assert_eq!(MarkerStyle::by_name("GREEN"), Some(MarkerStyle::Green));
        assert_eq!(MarkerStyle::by_name("highlight"), Some(MarkerStyle::Highlight));
        assert_eq!(MarkerStyle::by_name("sparkly"), None);
    }

    #[test]
    fn test_default_is_highlight() {
        assert_eq!(MarkerStyle::default(), MarkerStyle::Highlight);
    }
}
