//! Terminal colors used for logger names and message text
//!
//! Colors are stored in config files by their camelCase name (`"brightYellow"`,
//! `"bgMagenta"`) and rendered with crossterm when printing.

use std::fmt;
use std::str::FromStr;

use crossterm::style::{self, Color, Stylize};
use serde::{Deserialize, Serialize};

/// A named terminal color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TermColor {
    Reset,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    BgBlack,
    BgRed,
    BgGreen,
    BgYellow,
    BgBlue,
    BgMagenta,
    BgCyan,
    BgWhite,
    BgGray,
    BgBrightRed,
    BgBrightGreen,
    BgBrightYellow,
    BgBrightBlue,
    BgBrightMagenta,
    BgBrightCyan,
    BgBrightWhite,
}

impl TermColor {
    /// Every color, in declaration order
    pub const ALL: [TermColor; 33] = [
        TermColor::Reset,
        TermColor::Black,
        TermColor::Red,
        TermColor::Green,
        TermColor::Yellow,
        TermColor::Blue,
        TermColor::Magenta,
        TermColor::Cyan,
        TermColor::White,
        TermColor::Gray,
        TermColor::BrightRed,
        TermColor::BrightGreen,
        TermColor::BrightYellow,
        TermColor::BrightBlue,
        TermColor::BrightMagenta,
        TermColor::BrightCyan,
        TermColor::BrightWhite,
        TermColor::BgBlack,
        TermColor::BgRed,
        TermColor::BgGreen,
        TermColor::BgYellow,
        TermColor::BgBlue,
        TermColor::BgMagenta,
        TermColor::BgCyan,
        TermColor::BgWhite,
        TermColor::BgGray,
        TermColor::BgBrightRed,
        TermColor::BgBrightGreen,
        TermColor::BgBrightYellow,
        TermColor::BgBrightBlue,
        TermColor::BgBrightMagenta,
        TermColor::BgBrightCyan,
        TermColor::BgBrightWhite,
    ];

    /// Name used in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            TermColor::Reset => "reset",
            TermColor::Black => "black",
            TermColor::Red => "red",
            TermColor::Green => "green",
            TermColor::Yellow => "yellow",
            TermColor::Blue => "blue",
            TermColor::Magenta => "magenta",
            TermColor::Cyan => "cyan",
            TermColor::White => "white",
            TermColor::Gray => "gray",
            TermColor::BrightRed => "brightRed",
            TermColor::BrightGreen => "brightGreen",
            TermColor::BrightYellow => "brightYellow",
            TermColor::BrightBlue => "brightBlue",
            TermColor::BrightMagenta => "brightMagenta",
            TermColor::BrightCyan => "brightCyan",
            TermColor::BrightWhite => "brightWhite",
            TermColor::BgBlack => "bgBlack",
            TermColor::BgRed => "bgRed",
            TermColor::BgGreen => "bgGreen",
            TermColor::BgYellow => "bgYellow",
            TermColor::BgBlue => "bgBlue",
            TermColor::BgMagenta => "bgMagenta",
            TermColor::BgCyan => "bgCyan",
            TermColor::BgWhite => "bgWhite",
            TermColor::BgGray => "bgGray",
            TermColor::BgBrightRed => "bgBrightRed",
            TermColor::BgBrightGreen => "bgBrightGreen",
            TermColor::BgBrightYellow => "bgBrightYellow",
            TermColor::BgBrightBlue => "bgBrightBlue",
            TermColor::BgBrightMagenta => "bgBrightMagenta",
            TermColor::BgBrightCyan => "bgBrightCyan",
            TermColor::BgBrightWhite => "bgBrightWhite",
        }
    }

    /// Check whether a raw name belongs to the enumeration
    pub fn is_member(name: &str) -> bool {
        name.parse::<TermColor>().is_ok()
    }

    /// Whether this color paints the background instead of the text
    pub fn is_background(&self) -> bool {
        self.as_str().starts_with("bg")
    }

    /// The crossterm color behind this name, `None` for `reset`
    fn crossterm_color(&self) -> Option<Color> {
        // crossterm calls the normal-intensity ANSI colors "Dark*"
        let color = match self {
            TermColor::Reset => return None,
            TermColor::Black | TermColor::BgBlack => Color::Black,
            TermColor::Red | TermColor::BgRed => Color::DarkRed,
            TermColor::Green | TermColor::BgGreen => Color::DarkGreen,
            TermColor::Yellow | TermColor::BgYellow => Color::DarkYellow,
            TermColor::Blue | TermColor::BgBlue => Color::DarkBlue,
            TermColor::Magenta | TermColor::BgMagenta => Color::DarkMagenta,
            TermColor::Cyan | TermColor::BgCyan => Color::DarkCyan,
            TermColor::White | TermColor::BgWhite => Color::Grey,
            TermColor::Gray | TermColor::BgGray => Color::DarkGrey,
            TermColor::BrightRed | TermColor::BgBrightRed => Color::Red,
            TermColor::BrightGreen | TermColor::BgBrightGreen => Color::Green,
            TermColor::BrightYellow | TermColor::BgBrightYellow => Color::Yellow,
            TermColor::BrightBlue | TermColor::BgBrightBlue => Color::Blue,
            TermColor::BrightMagenta | TermColor::BgBrightMagenta => Color::Magenta,
            TermColor::BrightCyan | TermColor::BgBrightCyan => Color::Cyan,
            TermColor::BrightWhite | TermColor::BgBrightWhite => Color::White,
        };
        Some(color)
    }
}

impl fmt::Display for TermColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TermColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TermColor::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("{} is not a known color", s))
    }
}

/// Ordered pair of colors: logger name color, then message text color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorPair(pub TermColor, pub TermColor);

impl ColorPair {
    pub fn new(name: TermColor, text: TermColor) -> Self {
        Self(name, text)
    }

    /// Color used for the logger name
    pub fn name(&self) -> TermColor {
        self.0
    }

    /// Color used for the message text
    pub fn text(&self) -> TermColor {
        self.1
    }

    /// Whether this is the neutral pair a caller gets when no colors were chosen
    pub fn is_default(&self) -> bool {
        *self == DEFAULT_COLORS
    }
}

impl Default for ColorPair {
    fn default() -> Self {
        DEFAULT_COLORS
    }
}

impl fmt::Display for ColorPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.0, self.1)
    }
}

/// Neutral color pair
pub const DEFAULT_COLORS: ColorPair = ColorPair(TermColor::White, TermColor::White);

/// Render `text` in `color` using ANSI escape sequences
pub fn paint(text: &str, color: TermColor) -> String {
    match color.crossterm_color() {
        None => text.to_string(),
        Some(c) if color.is_background() => style::style(text).on(c).to_string(),
        Some(c) => style::style(text).with(c).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_names_round_trip_through_from_str() {
        for color in TermColor::ALL {
            assert_eq!(color.as_str().parse::<TermColor>().unwrap(), color);
        }
    }

    #[test]
    fn test_is_member() {
        assert!(TermColor::is_member("brightYellow"));
        assert!(TermColor::is_member("bgMagenta"));
        assert!(!TermColor::is_member("purple"));
        assert!(!TermColor::is_member("Red"));
    }

    #[test]
    fn test_serde_names_match_as_str() {
        let json = serde_json::to_string(&TermColor::BgBrightCyan).unwrap();
        assert_eq!(json, "\"bgBrightCyan\"");
    }

    #[test]
    fn test_color_pair_serializes_as_tuple() {
        let pair = ColorPair::new(TermColor::Red, TermColor::Green);
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, r#"["red","green"]"#);
    }

    #[test]
    fn test_default_pair() {
        assert!(ColorPair::default().is_default());
        assert!(!ColorPair::new(TermColor::Red, TermColor::White).is_default());
    }

    #[test]
    fn test_paint_reset_is_plain() {
        assert_eq!(paint("hello", TermColor::Reset), "hello");
    }

    #[test]
    fn test_paint_wraps_text_in_escapes() {
        let painted = paint("hello", TermColor::Magenta);
        assert!(painted.contains("hello"));

        // crossterm drops the escapes when NO_COLOR is set
        if std::env::var_os("NO_COLOR").is_none() {
            assert!(painted.starts_with('\u{1b}'));
            assert_ne!(painted, paint("hello", TermColor::BgMagenta));
        }
    }
}
