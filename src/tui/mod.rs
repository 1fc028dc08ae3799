pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{AppContext, Result};
use crate::feed::FeedController;

use self::app::{TuiApp, View};
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(terminal: &mut Tui, ctx: Arc<AppContext>) -> Result<()> {
    let controller = ctx.feed_controller();
    let mut feed_rx = controller.subscribe();
    let mut liked_rx = ctx.liked.observe_liked();

    let mut tui_app = TuiApp::new(
        controller.state(),
        liked_rx.borrow_and_update().clone(),
        ctx.config.colors.theme,
        ctx.config.feed.prefetch_threshold,
    );
    let event_handler = EventHandler::new(Duration::from_millis(100));

    loop {
        if feed_rx.has_changed().unwrap_or(false) {
            tui_app.set_feed(feed_rx.borrow_and_update().clone());
        }
        if liked_rx.has_changed().unwrap_or(false) {
            tui_app.set_liked(liked_rx.borrow_and_update().clone());
        }

        if tui_app.wants_more() {
            controller.load_more();
        }

        terminal.draw(|frame| layout::render(frame, &mut tui_app, &ctx.config.colors))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                let action = ctx.config.keybindings.get_action(&key);
                if tui_app.picker.is_some() {
                    handle_picker_action(&mut tui_app, &controller, action).await;
                } else {
                    handle_action(&mut tui_app, &ctx, &controller, action).await;
                }
            }
            AppEvent::Resize => {}
            AppEvent::Tick => {
                tui_app.expire_flash(Instant::now());
            }
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

async fn handle_action(
    tui_app: &mut TuiApp,
    ctx: &AppContext,
    controller: &FeedController,
    action: Action,
) {
    match action {
        Action::Quit => {
            tui_app.should_quit = true;
        }
        Action::Next => {
            tui_app.next();
        }
        Action::Prev => {
            tui_app.prev();
        }
        Action::ToggleLike => {
            if let Some(article) = tui_app.current_article().cloned() {
                match controller.toggle_like(&article).await {
                    Ok(true) => tui_app.set_flash(format!("Liked \"{}\"", article.title)),
                    Ok(false) => tui_app.set_flash(format!("Removed \"{}\" from liked", article.title)),
                    Err(e) => {
                        tracing::error!("Failed to toggle like for {}: {}", article.id, e);
                        tui_app.set_flash(format!("Could not save like: {}", e));
                    }
                }
            }
        }
        Action::Share => {
            if let Some(article) = tui_app.current_article() {
                let message = match ctx.share.share(&article.url) {
                    Ok(message) => message,
                    Err(e) => {
                        tracing::warn!("Share failed: {}", e);
                        e.to_string()
                    }
                };
                tui_app.set_flash(message);
            }
        }
        Action::OpenInBrowser => {
            if let Some(article) = tui_app.current_article() {
                if let Err(e) = open::that(&article.url) {
                    tui_app.set_flash(format!("Failed to open browser: {}", e));
                }
            }
        }
        Action::Languages => {
            tui_app.open_picker();
        }
        Action::ToggleLikedView => {
            tui_app.toggle_view();
        }
        Action::Back => {
            if tui_app.view == View::Liked {
                tui_app.toggle_view();
            }
        }
        Action::Retry => {
            if tui_app.view == View::Feed && controller.load_more().is_some() {
                tui_app.set_flash("Loading articles...");
            }
        }
        Action::ToggleTheme => {
            tui_app.toggle_theme();
        }
        Action::Select | Action::None => {}
    }
}

async fn handle_picker_action(tui_app: &mut TuiApp, controller: &FeedController, action: Action) {
    let Some(picker) = tui_app.picker.as_mut() else {
        return;
    };

    match action {
        Action::Quit => {
            tui_app.should_quit = true;
        }
        Action::Next => picker.move_down(),
        Action::Prev => picker.move_up(),
        Action::Back | Action::Languages => tui_app.close_picker(),
        Action::Select => {
            let language = picker.selected().cloned();
            tui_app.close_picker();

            if let Some(language) = language {
                let name = language.name.clone();
                match controller.change_language(language).await {
                    Ok(Some(_)) => {
                        tui_app.view = View::Feed;
                        tui_app.set_flash(format!("Switched to {}", name));
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::error!("Failed to switch language: {}", e);
                        tui_app.set_flash(format!("Could not switch language: {}", e));
                    }
                }
            }
        }
        _ => {}
    }
}
