use crate::app::App;
use crate::ui::widgets::map::render_world_map;
use conflict_explorer::stats::{StatsSummary, STATS_WINDOW_DAYS, UNAVAILABLE_MESSAGE};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_explore(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    render_stats_strip(app.stats_summary(), f, chunks[0]);

    let explore = app.explore();
    render_world_map(&app.map, explore.data.as_deref(), f, chunks[1]);
}

fn render_stats_strip(summary: StatsSummary, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!("Last {STATS_WINDOW_DAYS} days"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let line = match summary {
        StatsSummary::Loading => TextLine::from(Span::styled(
            "Loading statistics...",
            Style::default().fg(Color::Gray),
        )),
        StatsSummary::Unavailable => TextLine::from(Span::styled(
            UNAVAILABLE_MESSAGE,
            Style::default().fg(Color::Red),
        )),
        StatsSummary::Ready(totals) => {
            let value = Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD);
            TextLine::from(vec![
                Span::styled(totals.events.to_string(), value),
                Span::raw(" events   "),
                Span::styled(totals.deaths.to_string(), value.fg(Color::Red)),
                Span::raw(" deaths   "),
                Span::styled(totals.civilians.to_string(), value.fg(Color::Magenta)),
                Span::raw(" civilian deaths"),
            ])
        }
    };

    f.render_widget(
        Paragraph::new(line).block(block).alignment(Alignment::Center),
        area,
    );
}
