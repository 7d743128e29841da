use crate::app::views::TimelineMetric;
use conflict_explorer::api::{RegionAgg, TimePoint};
use ratatui::layout::{Alignment, Direction, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph,
};
use ratatui::Frame;

/// How many regions the bar chart shows.
pub const TOP_REGIONS: usize = 10;

fn empty_panel(title: &str, message: &str, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let paragraph = Paragraph::new(message.to_string())
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

pub const fn metric_value(point: &TimePoint, metric: TimelineMetric) -> u64 {
    match metric {
        TimelineMetric::Events => point.event_count,
        TimelineMetric::Deaths => point.death_count,
        TimelineMetric::Civilians => point.civilian_death_count,
    }
}

pub const fn metric_color(metric: TimelineMetric) -> Color {
    match metric {
        TimelineMetric::Events => Color::Cyan,
        TimelineMetric::Deaths => Color::Red,
        TimelineMetric::Civilians => Color::Magenta,
    }
}

#[allow(clippy::cast_precision_loss)]
pub fn render_timeline_chart(
    points: &[TimePoint],
    metric: TimelineMetric,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let title = format!("{} over time  (m: metric)", metric.label());
    if points.is_empty() {
        empty_panel(&title, "No data for the selected filters", f, area);
        return;
    }

    let data: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(index, point)| (index as f64, metric_value(point, metric) as f64))
        .collect();
    let max_value = points
        .iter()
        .map(|point| metric_value(point, metric))
        .max()
        .unwrap_or(0)
        .max(1);

    let last = points.len() - 1;
    let x_labels = [0, last / 2, last]
        .iter()
        .map(|index| Span::raw(points[*index].period.clone()))
        .collect::<Vec<_>>();
    let y_labels = vec![
        Span::raw("0"),
        Span::raw((max_value / 2).to_string()),
        Span::raw(max_value.to_string()),
    ];

    let datasets = vec![Dataset::default()
        .name(metric.label())
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(metric_color(metric)))
        .data(&data)];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .x_axis(
            Axis::default()
                .title("Period")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, last.max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(metric.label())
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max_value as f64])
                .labels(y_labels),
        );

    f.render_widget(chart, area);
}

/// Horizontal bars for the regions with the most events.
pub fn render_region_bars(regions: &[RegionAgg], f: &mut Frame<'_>, area: Rect) {
    let title = format!("Top {TOP_REGIONS} regions by events");
    if regions.is_empty() {
        empty_panel(&title, "No regions for the selected filters", f, area);
        return;
    }

    let mut top: Vec<&RegionAgg> = regions.iter().collect();
    top.sort_by(|a, b| b.event_count.cmp(&a.event_count));
    top.truncate(TOP_REGIONS);

    let bars: Vec<Bar<'_>> = top
        .iter()
        .map(|region| {
            Bar::default()
                .value(region.event_count)
                .label(TextLine::from(region.region_key.clone()))
                .style(Style::default().fg(Color::Rgb(0, 0, 238)))
                .value_style(
                    Style::default()
                        .fg(Color::White)
                        .bg(Color::Rgb(0, 0, 238))
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let max_value = top
        .iter()
        .map(|region| region.event_count)
        .max()
        .unwrap_or(0)
        .max(1);

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .max(max_value)
        .bar_gap(0)
        .bar_width(1);

    f.render_widget(chart, area);
}
