//! Color palettes for the light and dark themes.

use ratatui::style::Color;
use serde::{de, Deserialize, Deserializer};

use crate::domain::ThemeMode;

/// Colors used to draw one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub muted: Color,
    pub liked: Color,
    pub error: Color,
    pub status_fg: Color,
    pub status_bg: Color,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            background: Color::Black,
            foreground: Color::White,
            accent: Color::Rgb(0x5f, 0xba, 0x9a),
            muted: Color::DarkGray,
            liked: Color::LightRed,
            error: Color::Red,
            status_fg: Color::White,
            status_bg: Color::DarkGray,
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::White,
            foreground: Color::Black,
            accent: Color::Rgb(0x2e, 0x7d, 0x62),
            muted: Color::Gray,
            liked: Color::Red,
            error: Color::Red,
            status_fg: Color::Black,
            status_bg: Color::Gray,
        }
    }
}

/// `[colors]` section: the starting theme plus per-theme overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub theme: ThemeMode,
    #[serde(deserialize_with = "deserialize_dark")]
    pub dark: Palette,
    #[serde(deserialize_with = "deserialize_light")]
    pub light: Palette,
}

impl ColorConfig {
    pub fn palette(&self, mode: ThemeMode) -> &Palette {
        match mode {
            ThemeMode::Dark => &self.dark,
            ThemeMode::Light => &self.light,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            dark: Palette::dark(),
            light: Palette::light(),
        }
    }
}

/// Palette table as written in the config file; unset entries keep the
/// theme's built-in color.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PaletteOverrides {
    background: Option<String>,
    foreground: Option<String>,
    accent: Option<String>,
    muted: Option<String>,
    liked: Option<String>,
    error: Option<String>,
    status_fg: Option<String>,
    status_bg: Option<String>,
}

impl PaletteOverrides {
    fn apply(self, base: Palette) -> Result<Palette, String> {
        let pick = |value: Option<String>, fallback: Color| match value {
            Some(s) => parse_color_string(&s),
            None => Ok(fallback),
        };

        Ok(Palette {
            background: pick(self.background, base.background)?,
            foreground: pick(self.foreground, base.foreground)?,
            accent: pick(self.accent, base.accent)?,
            muted: pick(self.muted, base.muted)?,
            liked: pick(self.liked, base.liked)?,
            error: pick(self.error, base.error)?,
            status_fg: pick(self.status_fg, base.status_fg)?,
            status_bg: pick(self.status_bg, base.status_bg)?,
        })
    }
}

fn deserialize_dark<'de, D>(deserializer: D) -> Result<Palette, D::Error>
where
    D: Deserializer<'de>,
{
    PaletteOverrides::deserialize(deserializer)?
        .apply(Palette::dark())
        .map_err(de::Error::custom)
}

fn deserialize_light<'de, D>(deserializer: D) -> Result<Palette, D::Error>
where
    D: Deserializer<'de>,
{
    PaletteOverrides::deserialize(deserializer)?
        .apply(Palette::light())
        .map_err(de::Error::custom)
}

/// Parse a named color ("Cyan", "darkgray") or a hex code ("#RRGGBB", "#RGB").
pub fn parse_color_string(s: &str) -> Result<Color, String> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex).ok_or_else(|| format!("Invalid hex color: {}", s));
    }

    match s.to_lowercase().as_str() {
        "black" => Ok(Color::Black),
        "red" => Ok(Color::Red),
        "green" => Ok(Color::Green),
        "yellow" => Ok(Color::Yellow),
        "blue" => Ok(Color::Blue),
        "magenta" => Ok(Color::Magenta),
        "cyan" => Ok(Color::Cyan),
        "gray" | "grey" => Ok(Color::Gray),
        "darkgray" | "darkgrey" => Ok(Color::DarkGray),
        "lightred" => Ok(Color::LightRed),
        "lightgreen" => Ok(Color::LightGreen),
        "lightyellow" => Ok(Color::LightYellow),
        "lightblue" => Ok(Color::LightBlue),
        "lightmagenta" => Ok(Color::LightMagenta),
        "lightcyan" => Ok(Color::LightCyan),
        "white" => Ok(Color::White),
        "reset" => Ok(Color::Reset),
        _ => Err(format!("Unknown color: {}", s)),
    }
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();

    match hex.len() {
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        // #RGB expands to #RRGGBB
        3 => Some(Color::Rgb(
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        )),
        _ => None,
    }
}
