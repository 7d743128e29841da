use crate::app::App;
use crate::ui::widgets::map::violence_color;
use crate::ui::widgets::status::key_hints;
use conflict_explorer::api::ConflictEvent;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_details(app: &App, f: &mut Frame<'_>, area: Rect) {
    let result = app.details();
    let block = Block::default()
        .title("Event details")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let Some(event) = result.data.as_deref() else {
        let message = result
            .error_message
            .clone()
            .unwrap_or_else(|| "Loading event...".to_string());
        let paragraph = Paragraph::new(vec![
            TextLine::from(message),
            TextLine::default(),
            key_hints(&[("Esc", "Back"), ("r", "Retry")]),
        ])
        .block(block)
        .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    };

    let mut lines = vec![TextLine::from(Span::styled(
        event.conflict_name.clone(),
        Style::default()
            .fg(violence_color(event.violence_type()))
            .add_modifier(Modifier::BOLD),
    ))];
    lines.extend(detail_lines(event));
    lines.push(TextLine::default());
    lines.push(key_hints(&[("Esc", "Back")]));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn detail_lines(event: &ConflictEvent) -> Vec<TextLine<'static>> {
    let optional = |value: Option<&String>| value.cloned().unwrap_or_else(|| "-".to_string());
    let count = |value: Option<u32>| value.map_or_else(|| "-".to_string(), |n| n.to_string());

    let dates = match event.date_end {
        Some(end) if end != event.date_start => format!("{} to {end}", event.date_start),
        _ => event.date_start.to_string(),
    };

    [
        ("Date", dates),
        ("Type", event.violence_label()),
        ("Country", event.country.clone()),
        ("Region", optional(event.region.as_ref())),
        ("Admin 1", optional(event.adm_1.as_ref())),
        ("Admin 2", optional(event.adm_2.as_ref())),
        ("Location", optional(event.where_description.as_ref())),
        (
            "Coordinates",
            format!("{:.4}, {:.4}", event.latitude, event.longitude),
        ),
        ("Side A", event.side_a.clone()),
        ("Side B", event.side_b.clone()),
        (
            "Deaths",
            format!("{} (low {}, high {})", event.best, event.low, event.high),
        ),
        ("Civilian deaths", event.deaths_civilians.to_string()),
        ("Deaths side A", count(event.deaths_a)),
        ("Deaths side B", count(event.deaths_b)),
        ("Unknown deaths", count(event.deaths_unknown)),
        (
            "Clarity",
            event
                .event_clarity
                .map_or_else(|| "-".to_string(), |level| level.to_string()),
        ),
        ("Sources", count(event.number_of_sources)),
        ("Headline", optional(event.source_headline.as_ref())),
    ]
    .into_iter()
    .map(|(label, value)| {
        TextLine::from(vec![
            Span::styled(
                format!("{label:>16}: "),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(value),
        ])
    })
    .collect()
}
