use crate::app::App;
use conflict_explorer::fetch::FetchStatus;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, BRAILLE_SIX};

/// Builds a footer line of `key: action` pairs in the usual key style.
pub fn key_hints<'a>(hints: &[(&'a str, &'a str)]) -> TextLine<'a> {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let spans = hints
        .iter()
        .enumerate()
        .flat_map(|(index, (key, action))| {
            let separator = if index + 1 < hints.len() { "   " } else { "" };
            [
                Span::styled(*key, key_style),
                Span::raw(format!(": {action}{separator}")),
            ]
        })
        .collect::<Vec<_>>();

    TextLine::from(spans)
}

/// Spinner while the front view loads, the inline error if its last read failed,
/// otherwise the latest status message.
pub fn render_status_line(app: &App, f: &mut Frame<'_>, area: Rect) {
    let (status, error) = app.current_status();

    let line = if app.is_loading() {
        let throbber = Throbber::default()
            .label("Loading...")
            .style(Style::default().fg(Color::Cyan))
            .throbber_set(BRAILLE_SIX);
        throbber.to_line(&app.throbber)
    } else if let (FetchStatus::Error, Some(error)) = (status, error) {
        let retry = if error.is_retryable() { "(r to retry)" } else { "" };
        TextLine::from(vec![
            Span::styled(
                " Error ",
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {} ", error.user_message()),
                Style::default().fg(Color::Red),
            ),
            Span::styled(retry, Style::default().fg(Color::Gray)),
        ])
    } else {
        TextLine::from(Span::styled(
            app.status_message.clone(),
            Style::default().fg(Color::Gray),
        ))
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Left), area);
}
