//! Color themes.
//!
//! A theme is pure data: the core only ever emits categories, and front ends
//! look the colors up here at render time.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tinct_syntax::TokenCategory;

use crate::{CoreError, CoreResult};

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from `0xRRGGBB`.
    pub const fn hex(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Parses `#RRGGBB`.
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::hex)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::parse(&s).ok_or_else(|| format!("invalid color {s:?}, expected #RRGGBB"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// One color per token category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxColors {
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub complex: Color,
    pub boolean: Color,
    pub none: Color,
    pub collection: Color,
    pub comment: Color,
    pub operator: Color,
    pub builtins: Color,
}

impl Default for SyntaxColors {
    fn default() -> Self {
        Self {
            keyword: Color::hex(0xFF00FF),    // Magenta
            string: Color::hex(0xFFD700),     // Gold
            number: Color::hex(0x7B68EE),     // Slate blue
            complex: Color::hex(0x00FFFF),    // Cyan
            boolean: Color::hex(0x00FF00),    // Green
            none: Color::hex(0x808080),       // Gray
            collection: Color::hex(0xFFA500), // Orange
            comment: Color::hex(0x888888),    // Gray
            operator: Color::hex(0xFF69B4),   // Pink
            builtins: Color::hex(0x0000FF),   // Blue
        }
    }
}

/// Editor theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Theme name
    pub name: String,

    /// Is this a dark theme?
    pub is_dark: bool,

    pub background: Color,
    pub foreground: Color,
    /// Caret color
    pub insert: Color,

    /// Line number column
    pub gutter_background: Color,
    pub gutter_foreground: Color,

    /// Syntax highlighting colors
    #[serde(default)]
    pub syntax: SyntaxColors,
}

impl Theme {
    /// Names of the built-in themes, in menu order.
    pub const NAMES: [&'static str; 7] = [
        "Light",
        "Dark",
        "Monokai",
        "Solarized Light",
        "Solarized Dark",
        "Dracula",
        "Nord",
    ];

    fn base(name: &str, is_dark: bool, colors: [u32; 5]) -> Self {
        let [background, foreground, insert, gutter_background, gutter_foreground] =
            colors.map(Color::hex);
        Self {
            name: name.to_string(),
            is_dark,
            background,
            foreground,
            insert,
            gutter_background,
            gutter_foreground,
            syntax: SyntaxColors::default(),
        }
    }

    pub fn light() -> Self {
        Self::base("Light", false, [0xFFFFFF, 0x000000, 0x000000, 0xD3D3D3, 0x000000])
    }

    pub fn dark() -> Self {
        Self::base("Dark", true, [0x1E1E1E, 0xD4D4D4, 0xD4D4D4, 0x2D2D2D, 0xD4D4D4])
    }

    pub fn monokai() -> Self {
        Self::base("Monokai", true, [0x272822, 0xF8F8F2, 0xF8F8F2, 0x3E3D32, 0xF8F8F2])
    }

    pub fn solarized_light() -> Self {
        Self::base(
            "Solarized Light",
            false,
            [0xFDF6E3, 0x657B83, 0x657B83, 0xEEE8D5, 0x657B83],
        )
    }

    pub fn solarized_dark() -> Self {
        Self::base(
            "Solarized Dark",
            true,
            [0x002B36, 0x839496, 0x93A1A1, 0x073642, 0x839496],
        )
    }

    pub fn dracula() -> Self {
        Self::base("Dracula", true, [0x282A36, 0xF8F8F2, 0xF8F8F2, 0x44475A, 0xF8F8F2])
    }

    pub fn nord() -> Self {
        Self::base("Nord", true, [0x2E3440, 0xD8DEE9, 0xD8DEE9, 0x3B4252, 0xD8DEE9])
    }

    /// Looks up a built-in theme, ignoring case.
    pub fn named(name: &str) -> CoreResult<Self> {
        let theme = match name.trim().to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "monokai" => Self::monokai(),
            "solarized light" => Self::solarized_light(),
            "solarized dark" => Self::solarized_dark(),
            "dracula" => Self::dracula(),
            "nord" => Self::nord(),
            _ => return Err(CoreError::UnknownTheme(name.to_string())),
        };
        Ok(theme)
    }

    /// All built-in themes.
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::light(),
            Self::dark(),
            Self::monokai(),
            Self::solarized_light(),
            Self::solarized_dark(),
            Self::dracula(),
            Self::nord(),
        ]
    }

    /// Color for a token category.
    pub fn color_for(&self, category: TokenCategory) -> Color {
        let s = &self.syntax;
        match category {
            TokenCategory::Keyword => s.keyword,
            TokenCategory::String => s.string,
            TokenCategory::Number => s.number,
            TokenCategory::ImaginaryNumber => s.complex,
            TokenCategory::Boolean => s.boolean,
            TokenCategory::NullLiteral => s.none,
            TokenCategory::Collection => s.collection,
            TokenCategory::Comment => s.comment,
            TokenCategory::Operator => s.operator,
            TokenCategory::KnownBuiltin => s.builtins,
        }
    }

    /// Loads a theme from a JSON file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_resolves() {
        for name in Theme::NAMES {
            assert_eq!(Theme::named(name).unwrap().name, name);
        }
        assert_eq!(Theme::named("solarized DARK").unwrap().name, "Solarized Dark");
        assert_eq!(Theme::builtin().len(), Theme::NAMES.len());
    }

    #[test]
    fn test_unknown_theme() {
        let err = Theme::named("Vaporwave").unwrap_err();
        assert!(matches!(err, CoreError::UnknownTheme(name) if name == "Vaporwave"));
    }

    #[test]
    fn test_category_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.color_for(TokenCategory::Keyword), Color::hex(0xFF00FF));
        assert_eq!(theme.color_for(TokenCategory::ImaginaryNumber), Color::hex(0x00FFFF));
        assert_eq!(theme.color_for(TokenCategory::KnownBuiltin), Color::hex(0x0000FF));
    }

    #[test]
    fn test_color_parse_and_display() {
        let color = Color::parse("#1e1e1e").unwrap();
        assert_eq!(color, Color::rgb(0x1E, 0x1E, 0x1E));
        assert_eq!(color.to_string(), "#1E1E1E");
        assert_eq!(Color::parse("1e1e1e"), None);
        assert_eq!(Color::parse("#12345"), None);
    }

    #[test]
    fn test_load_theme_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nord.json");

        let content = serde_json::to_string_pretty(&Theme::nord()).unwrap();
        assert!(content.contains("\"#2E3440\""));
        std::fs::write(&path, content).unwrap();
        assert_eq!(Theme::load(&path).unwrap(), Theme::nord());
    }

    #[test]
    fn test_load_malformed_theme_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r##"{"name": "Broken", "background": "#12"}"##).unwrap();

        let err = Theme::load(&path).unwrap_err();
        assert!(matches!(err, CoreError::Io(e) if e.kind() == std::io::ErrorKind::InvalidData));
        assert!(Theme::load(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_light_is_default() {
        let theme = Theme::default();
        assert_eq!(theme.background, Color::WHITE);
        assert_eq!(theme.foreground, Color::BLACK);
        assert!(!theme.is_dark);
    }
}
