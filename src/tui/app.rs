use std::time::{Duration, Instant};

use ratatui::widgets::ListState;

use crate::domain::{Article, FeedState, Language, LikedArticles, ThemeMode};

/// How long a flash message stays in the status bar.
pub const FLASH_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Feed,
    Liked,
}

/// Language picker popup.
pub struct LanguagePicker {
    pub languages: Vec<Language>,
    pub list_state: ListState,
}

impl LanguagePicker {
    pub fn new(current: &Language) -> Self {
        let languages = Language::catalog();
        let index = languages
            .iter()
            .position(|l| l.code == current.code)
            .unwrap_or(0);

        let mut list_state = ListState::default();
        list_state.select(Some(index));

        Self {
            languages,
            list_state,
        }
    }

    pub fn selected(&self) -> Option<&Language> {
        self.list_state.selected().and_then(|i| self.languages.get(i))
    }

    pub fn move_down(&mut self) {
        let i = self.list_state.selected().unwrap_or(0);
        if i + 1 < self.languages.len() {
            self.list_state.select(Some(i + 1));
        }
    }

    pub fn move_up(&mut self) {
        let i = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some(i.saturating_sub(1)));
    }
}

pub struct TuiApp {
    pub view: View,
    pub feed: FeedState,
    pub liked: LikedArticles,
    pub feed_index: usize,
    pub liked_index: usize,
    pub picker: Option<LanguagePicker>,
    pub theme: ThemeMode,
    pub prefetch_threshold: usize,
    pub should_quit: bool,
    flash: Option<(String, Instant)>,
}

impl TuiApp {
    pub fn new(feed: FeedState, liked: LikedArticles, theme: ThemeMode, prefetch_threshold: usize) -> Self {
        Self {
            view: View::Feed,
            feed,
            liked,
            feed_index: 0,
            liked_index: 0,
            picker: None,
            theme,
            prefetch_threshold,
            should_quit: false,
            flash: None,
        }
    }

    /// Take a new feed snapshot. A language switch starts over at the top.
    pub fn set_feed(&mut self, feed: FeedState) {
        if feed.epoch != self.feed.epoch {
            self.feed_index = 0;
        }
        self.feed = feed;
        self.feed_index = clamp_index(self.feed_index, self.feed.articles.len());
    }

    pub fn set_liked(&mut self, liked: LikedArticles) {
        self.liked = liked;
        self.liked_index = clamp_index(self.liked_index, self.liked.len());
    }

    /// The article on screen in the current view.
    pub fn current_article(&self) -> Option<&Article> {
        match self.view {
            View::Feed => self.feed.articles.get(self.feed_index),
            View::Liked => self.liked.articles.get(self.liked_index),
        }
    }

    pub fn is_liked(&self, id: i64) -> bool {
        self.liked.contains(id)
    }

    pub fn next(&mut self) {
        let (index, len) = self.cursor();
        if index + 1 < len {
            *self.cursor_mut() = index + 1;
        }
    }

    pub fn prev(&mut self) {
        let (index, _) = self.cursor();
        *self.cursor_mut() = index.saturating_sub(1);
    }

    fn cursor(&self) -> (usize, usize) {
        match self.view {
            View::Feed => (self.feed_index, self.feed.articles.len()),
            View::Liked => (self.liked_index, self.liked.len()),
        }
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.view {
            View::Feed => &mut self.feed_index,
            View::Liked => &mut self.liked_index,
        }
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Feed => View::Liked,
            View::Liked => View::Feed,
        };
    }

    pub fn open_picker(&mut self) {
        self.picker = Some(LanguagePicker::new(&self.feed.language));
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
    }

    /// Whether the feed view has reached the point where the next batch
    /// should be requested.
    pub fn wants_more(&self) -> bool {
        self.view == View::Feed
            && !self.feed.loading
            && self.feed.error.is_none()
            && should_load_more(self.feed_index, self.feed.articles.len(), self.prefetch_threshold)
    }

    pub fn set_flash(&mut self, message: impl Into<String>) {
        self.flash = Some((message.into(), Instant::now()));
    }

    pub fn flash(&self) -> Option<&str> {
        self.flash.as_ref().map(|(msg, _)| msg.as_str())
    }

    pub fn expire_flash(&mut self, now: Instant) {
        if let Some((_, shown_at)) = &self.flash {
            if now.duration_since(*shown_at) >= FLASH_DURATION {
                self.flash = None;
            }
        }
    }
}

/// True once `index` is within `threshold` articles of the end of a
/// non-empty list.
pub fn should_load_more(index: usize, len: usize, threshold: usize) -> bool {
    len > 0 && index + threshold >= len
}

fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: i64) -> Article {
        Article::new(
            id,
            format!("A{}", id),
            format!("https://en.wikipedia.org/wiki/A{}", id),
            Language::english(),
        )
    }

    fn feed_with(n: i64) -> FeedState {
        let mut feed = FeedState::new(Language::english());
        feed.articles = (1..=n).map(article).collect();
        feed
    }

    #[test]
    fn test_should_load_more() {
        assert!(!should_load_more(0, 0, 3));
        assert!(!should_load_more(26, 30, 3));
        assert!(should_load_more(27, 30, 3));
        assert!(should_load_more(0, 2, 3));
    }

    #[test]
    fn test_navigation_is_bounded() {
        let mut app = TuiApp::new(feed_with(2), LikedArticles::default(), ThemeMode::Dark, 3);
        app.prev();
        assert_eq!(app.feed_index, 0);
        app.next();
        app.next();
        assert_eq!(app.feed_index, 1);
        assert_eq!(app.current_article().map(|a| a.id), Some(2));
    }

    #[test]
    fn test_language_switch_resets_position() {
        let mut app = TuiApp::new(feed_with(5), LikedArticles::default(), ThemeMode::Dark, 3);
        app.feed_index = 4;

        let mut same_epoch = feed_with(10);
        same_epoch.epoch = 0;
        app.set_feed(same_epoch);
        assert_eq!(app.feed_index, 4);

        let mut switched = FeedState::new(Language::find("es").unwrap());
        switched.reset(Language::find("es").unwrap());
        app.set_feed(switched);
        assert_eq!(app.feed_index, 0);
        assert!(app.current_article().is_none());
    }

    #[test]
    fn test_wants_more_respects_loading_and_error() {
        let mut app = TuiApp::new(feed_with(4), LikedArticles::default(), ThemeMode::Dark, 3);
        app.feed_index = 1;
        assert!(app.wants_more());

        app.feed.loading = true;
        assert!(!app.wants_more());

        app.feed.loading = false;
        app.feed.error = Some("offline".into());
        assert!(!app.wants_more());

        app.feed.error = None;
        app.toggle_view();
        assert!(!app.wants_more());
    }

    #[test]
    fn test_liked_view_follows_snapshot() {
        let liked = LikedArticles {
            articles: vec![article(7), article(8)],
        };
        let mut app = TuiApp::new(feed_with(0), liked, ThemeMode::Dark, 3);
        app.toggle_view();
        app.next();
        assert_eq!(app.current_article().map(|a| a.id), Some(8));

        app.set_liked(LikedArticles {
            articles: vec![article(7)],
        });
        assert_eq!(app.liked_index, 0);
        assert!(app.is_liked(7));
        assert!(!app.is_liked(8));
    }

    #[test]
    fn test_picker_starts_on_current_language() {
        let mut app = TuiApp::new(feed_with(0), LikedArticles::default(), ThemeMode::Dark, 3);
        app.open_picker();
        let picker = app.picker.as_mut().unwrap();
        assert_eq!(picker.selected().map(|l| l.code.as_str()), Some("en"));

        picker.move_up();
        picker.move_down();
        assert!(picker.selected().is_some());
    }

    #[test]
    fn test_flash_expires() {
        let mut app = TuiApp::new(feed_with(0), LikedArticles::default(), ThemeMode::Dark, 3);
        app.set_flash("Link copied to clipboard");
        app.expire_flash(Instant::now());
        assert_eq!(app.flash(), Some("Link copied to clipboard"));

        app.expire_flash(Instant::now() + FLASH_DURATION);
        assert_eq!(app.flash(), None);
    }
}
