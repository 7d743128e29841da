use crate::app::App;
use crate::ui::widgets::status::key_hints;
use conflict_explorer::config::{AnalyticsReport, EmbedTarget};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;

pub fn render_analytics(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let selected = AnalyticsReport::ALL
        .iter()
        .position(|report| *report == app.analytics_report)
        .unwrap_or(0);
    let tabs = Tabs::new(AnalyticsReport::ALL.iter().map(|report| report.title()))
        .block(
            Block::default()
                .title("Reports")
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

    let report = app.analytics_report;
    let mut lines = vec![
        TextLine::from(Span::styled(
            report.title(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        TextLine::from(report.description()),
        TextLine::default(),
    ];

    match app.analytics.target(report) {
        EmbedTarget::Ready(url) => {
            lines.push(TextLine::from("Open this report in a browser:"));
            lines.push(TextLine::from(Span::styled(
                url.to_string(),
                Style::default().fg(Color::Cyan),
            )));
        }
        EmbedTarget::NotConfigured(missing) => {
            lines.push(TextLine::from(Span::styled(
                "Analytics not configured",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(TextLine::from(format!("Set {}", missing.join(", "))));
        }
    }

    lines.push(TextLine::default());
    lines.push(key_hints(&[("←/→", "Switch report")]));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Analytics").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, chunks[1]);
}
