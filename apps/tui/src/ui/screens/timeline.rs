use crate::app::App;
use crate::ui::widgets::charts::render_timeline_chart;
use conflict_explorer::api::SeriesTotals;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_timeline(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(area);

    let result = app.timeline();
    let points = result.data.as_deref().map_or(&[][..], Vec::as_slice);
    render_timeline_chart(points, app.timeline_metric, f, chunks[0]);

    let totals = SeriesTotals::from_points(points);
    let summary = format!(
        "{} periods   {} events   {} deaths   {} civilian deaths",
        points.len(),
        totals.events,
        totals.deaths,
        totals.civilians
    );
    let paragraph = Paragraph::new(summary)
        .block(
            Block::default()
                .title("Totals")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Center);
    f.render_widget(paragraph, chunks[1]);
}
