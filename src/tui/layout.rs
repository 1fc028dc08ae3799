use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::config::{ColorConfig, Palette};
use crate::domain::{Article, FeedPhase};
use crate::tui::app::{TuiApp, View};

pub fn render(frame: &mut Frame, app: &mut TuiApp, colors: &ColorConfig) {
    let palette = *colors.palette(app.theme);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Article pane
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.foreground)),
        frame.area(),
    );

    match app.view {
        View::Feed => render_feed(frame, app, chunks[0], &palette),
        View::Liked => render_liked(frame, app, chunks[0], &palette),
    }
    render_status_bar(frame, app, chunks[1], &palette);

    if app.picker.is_some() {
        render_picker(frame, app, &palette);
    }
}

fn render_feed(frame: &mut Frame, app: &TuiApp, area: Rect, palette: &Palette) {
    let feed = &app.feed;
    let language = &feed.language;

    match feed.phase() {
        FeedPhase::EmptyLoading => render_message(
            frame,
            area,
            palette,
            vec![Line::from(format!("Loading articles from {}...", language.wikipedia_host()))],
        ),
        FeedPhase::EmptyError => render_message(
            frame,
            area,
            palette,
            vec![
                Line::from(Span::styled(
                    "Could not load articles",
                    Style::default().fg(palette.error).add_modifier(Modifier::BOLD),
                )),
                Line::from(feed.error.clone().unwrap_or_default()),
                Line::from(""),
                Line::from(Span::styled("Press r to retry", Style::default().fg(palette.muted))),
            ],
        ),
        FeedPhase::Empty => render_message(
            frame,
            area,
            palette,
            vec![
                Line::from("No articles to show"),
                Line::from(Span::styled("Press r to load more", Style::default().fg(palette.muted))),
            ],
        ),
        FeedPhase::HasArticles | FeedPhase::HasArticlesLoading | FeedPhase::HasArticlesError => {
            let Some(article) = app.current_article() else {
                return;
            };

            let mut position = format!(" {}/{} ", app.feed_index + 1, feed.articles.len());
            if feed.loading {
                position.push_str("loading more... ");
            }

            let footer = feed.error.as_ref().map(|e| {
                Line::from(Span::styled(
                    format!("Loading more failed: {} (r to retry)", e),
                    Style::default().fg(palette.error),
                ))
            });

            render_article(frame, area, article, app.is_liked(article.id), position, footer, palette);
        }
    }
}

fn render_liked(frame: &mut Frame, app: &TuiApp, area: Rect, palette: &Palette) {
    if app.liked.is_empty() {
        render_message(frame, area, palette, vec![Line::from("No liked articles yet")]);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    let items: Vec<ListItem> = app
        .liked
        .articles
        .iter()
        .map(|a| ListItem::new(format!("{} [{}]", a.title, a.language.code)))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" Liked ({}) ", app.liked.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent)),
        )
        .highlight_style(
            Style::default()
                .bg(palette.status_bg)
                .fg(palette.status_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default().with_selected(Some(app.liked_index));
    frame.render_stateful_widget(list, chunks[0], &mut list_state);

    if let Some(article) = app.current_article() {
        let position = format!(" {}/{} ", app.liked_index + 1, app.liked.len());
        render_article(frame, chunks[1], article, true, position, None, palette);
    }
}

fn render_article(
    frame: &mut Frame,
    area: Rect,
    article: &Article,
    is_liked: bool,
    position: String,
    footer: Option<Line<'static>>,
    palette: &Palette,
) {
    let extract_alignment = if article.language.is_rtl {
        Alignment::Right
    } else {
        Alignment::Left
    };

    let (heart, heart_style) = if is_liked {
        ("♥ Liked", Style::default().fg(palette.liked).add_modifier(Modifier::BOLD))
    } else {
        ("♡", Style::default().fg(palette.muted))
    };

    let mut lines = vec![
        Line::from(Span::styled(
            article.title.clone(),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ))
        .alignment(extract_alignment),
        Line::from(vec![
            Span::styled(article.language.to_string(), Style::default().fg(palette.muted)),
            Span::raw("  "),
            Span::styled(heart, heart_style),
        ]),
    ];

    if let Some(thumbnail) = &article.thumbnail {
        lines.push(Line::from(Span::styled(
            format!("Image: {}", thumbnail),
            Style::default().fg(palette.muted),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from("─".repeat(area.width.saturating_sub(2) as usize)));
    lines.push(Line::from(""));

    for paragraph in article.extract.lines() {
        lines.push(Line::from(paragraph.to_string()).alignment(extract_alignment));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Link: {}", article.url),
        Style::default().fg(palette.muted),
    )));

    if let Some(footer) = footer {
        lines.push(Line::from(""));
        lines.push(footer);
    }

    let block = Block::default()
        .title(position)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn render_message(frame: &mut Frame, area: Rect, palette: &Palette, lines: Vec<Line<'static>>) {
    let height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);

    let paragraph = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .style(Style::default().fg(palette.foreground))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, chunks[1]);
}

fn render_picker(frame: &mut Frame, app: &mut TuiApp, palette: &Palette) {
    let Some(picker) = app.picker.as_mut() else {
        return;
    };

    let area = centered_rect(50, 70, frame.area());
    let current = &app.feed.language.code;

    let items: Vec<ListItem> = picker
        .languages
        .iter()
        .map(|l| {
            let marker = if &l.code == current { "●" } else { " " };
            ListItem::new(format!("{} {:<24} {}", marker, l.name, l.code))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Language (Enter to select, Esc to close) ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .style(Style::default().bg(palette.background).fg(palette.foreground)),
        )
        .highlight_style(
            Style::default()
                .bg(palette.accent)
                .fg(palette.background)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut picker.list_state);
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, area: Rect, palette: &Palette) {
    let status = if let Some(msg) = app.flash() {
        msg.to_string()
    } else if app.picker.is_some() {
        "j/k:Move  Enter:Select  Esc:Close".to_string()
    } else {
        let hints = match app.view {
            View::Feed => "j/k:Next/Prev  l:Like  s:Share  o:Open  L:Language  v:Liked  t:Theme  q:Quit",
            View::Liked => "j/k:Next/Prev  l:Unlike  s:Share  o:Open  v:Feed  t:Theme  q:Quit",
        };
        format!("[{}] {}", app.feed.language.code, hints)
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(palette.status_fg).bg(palette.status_bg));

    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
