//! Handing article links to something outside the app.

use serde::Deserialize;

use crate::app::{Result, WikwokError};

/// Delivers text to an external surface and describes what happened.
pub trait ShareSink: Send + Sync {
    /// Returns a confirmation message for the status line.
    fn share(&self, text: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareTarget {
    #[default]
    Clipboard,
    Browser,
}

impl ShareTarget {
    pub fn sink(self) -> Box<dyn ShareSink> {
        match self {
            ShareTarget::Clipboard => Box::new(ClipboardShare),
            ShareTarget::Browser => Box::new(BrowserShare),
        }
    }
}

/// Copies the text to the system clipboard.
pub struct ClipboardShare;

impl ShareSink for ClipboardShare {
    fn share(&self, text: &str) -> Result<String> {
        arboard::Clipboard::new()
            .and_then(|mut cb| cb.set_text(text))
            .map_err(|e| WikwokError::Share(format!("clipboard unavailable: {}", e)))?;
        Ok("Link copied to clipboard".to_string())
    }
}

/// Hands the link to the system's default handler.
pub struct BrowserShare;

impl ShareSink for BrowserShare {
    fn share(&self, text: &str) -> Result<String> {
        open::that(text).map_err(|e| WikwokError::Share(format!("failed to open {}: {}", text, e)))?;
        Ok("Link opened in browser".to_string())
    }
}
