//! Keybinding configuration for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::tui::event::Action;

/// Key strings per action. Every list is tried in order.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: Vec<String>,
    pub next_article: Vec<String>,
    pub prev_article: Vec<String>,
    pub toggle_like: Vec<String>,
    pub share: Vec<String>,
    pub open_in_browser: Vec<String>,
    pub languages: Vec<String>,
    pub liked: Vec<String>,
    pub retry: Vec<String>,
    pub toggle_theme: Vec<String>,
    pub select: Vec<String>,
    pub back: Vec<String>,
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: keys(&["q", "Ctrl+c"]),
            next_article: keys(&["j", "Down", "PageDown", "Space"]),
            prev_article: keys(&["k", "Up", "PageUp"]),
            toggle_like: keys(&["l", "f"]),
            share: keys(&["s"]),
            open_in_browser: keys(&["o"]),
            languages: keys(&["L"]),
            liked: keys(&["v"]),
            retry: keys(&["r"]),
            toggle_theme: keys(&["t"]),
            select: keys(&["Enter"]),
            back: keys(&["Esc", "Backspace"]),
        }
    }
}

impl KeybindingConfig {
    /// Get the action for a key event.
    pub fn get_action(&self, key: &KeyEvent) -> Action {
        let table: [(&[String], Action); 12] = [
            (&self.quit, Action::Quit),
            (&self.next_article, Action::Next),
            (&self.prev_article, Action::Prev),
            (&self.toggle_like, Action::ToggleLike),
            (&self.share, Action::Share),
            (&self.open_in_browser, Action::OpenInBrowser),
            (&self.languages, Action::Languages),
            (&self.liked, Action::ToggleLikedView),
            (&self.retry, Action::Retry),
            (&self.toggle_theme, Action::ToggleTheme),
            (&self.select, Action::Select),
            (&self.back, Action::Back),
        ];

        table
            .iter()
            .find(|(bindings, _)| matches_key(key, bindings))
            .map(|(_, action)| *action)
            .unwrap_or(Action::None)
    }

    /// Check every binding parses, reporting the first that doesn't.
    pub fn validate(&self) -> Result<(), String> {
        [
            &self.quit,
            &self.next_article,
            &self.prev_article,
            &self.toggle_like,
            &self.share,
            &self.open_in_browser,
            &self.languages,
            &self.liked,
            &self.retry,
            &self.toggle_theme,
            &self.select,
            &self.back,
        ]
        .into_iter()
        .flatten()
        .try_for_each(|binding| parse_key_string(binding).map(|_| ()))
    }
}

fn matches_key(key: &KeyEvent, bindings: &[String]) -> bool {
    bindings
        .iter()
        .filter_map(|binding| parse_key_string(binding).ok())
        .any(|parsed| parsed.matches(key))
}

/// A parsed key binding with code and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Uppercase characters arrive with SHIFT set, so SHIFT is ignored when
    /// the binding itself doesn't ask for it.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers == key.modifiers
                || self.modifiers == (key.modifiers & !KeyModifiers::SHIFT))
    }
}

/// Parse "j", "Enter", "Ctrl+c", "Shift+Tab" and the like.
pub fn parse_key_string(s: &str) -> Result<KeyBinding, String> {
    let s = s.trim();
    let parts: Vec<&str> = s.split('+').collect();

    let mut modifiers = KeyModifiers::NONE;
    let (key_part, modifier_parts) = match parts.split_last() {
        Some((last, rest)) if !rest.is_empty() && !last.is_empty() => (*last, rest),
        _ => (s, &[][..]),
    };

    for part in modifier_parts {
        match part.to_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => return Err(format!("Unknown modifier: {}", part)),
        }
    }

    let code = parse_key_code(key_part)?;

    Ok(KeyBinding { code, modifiers })
}

fn parse_key_code(s: &str) -> Result<KeyCode, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    match s.to_lowercase().as_str() {
        "enter" | "return" => Ok(KeyCode::Enter),
        "tab" => Ok(KeyCode::Tab),
        "backtab" => Ok(KeyCode::BackTab),
        "backspace" | "bs" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdn" => Ok(KeyCode::PageDown),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "space" => Ok(KeyCode::Char(' ')),
        f if f.starts_with('f') => f[1..]
            .parse::<u8>()
            .ok()
            .filter(|n| (1..=12).contains(n))
            .map(KeyCode::F)
            .ok_or_else(|| format!("Unknown key: {}", s)),
        _ => Err(format!("Unknown key: {}", s)),
    }
}
