use crate::app::state::AppScreen;
use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use ratatui::Frame;

pub fn render_header(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let titles = AppScreen::TABS
        .iter()
        .enumerate()
        .map(|(index, screen)| TextLine::from(format!("{} {}", index + 1, screen.label())))
        .collect::<Vec<_>>();

    // Details belong to the tab they were opened from.
    let selected = app
        .screen
        .tab_index()
        .or_else(|| app.previous_screen.tab_index())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(" Conflict Explorer ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Rgb(0, 0, 238))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));
    f.render_widget(tabs, chunks[0]);

    let mut spans = Vec::new();
    if let Some(notice) = app.actions.source.notice() {
        spans.push(Span::styled(
            format!(" {notice} "),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }
    let filters = app.current_filters();
    let summary = if filters.is_default_for(app.filters.today()) {
        "Default filters  ".to_string()
    } else {
        format!("{} filters active  ", filters.active_filter_count())
    };
    spans.push(Span::styled(summary, Style::default().fg(Color::Cyan)));
    spans.push(Span::styled(
        format!("?{}", app.location.current()),
        Style::default().fg(Color::DarkGray),
    ));

    f.render_widget(Paragraph::new(TextLine::from(spans)), chunks[1]);
}
