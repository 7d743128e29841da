use crate::app::views::EventSort;
use crate::app::App;
use crate::ui::widgets::map::violence_color;
use crate::ui::widgets::status::key_hints;
use crate::ui::widgets::tables::{header_style, scroll_offset, selected_row_style};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn render_events(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(2)])
        .split(area);

    render_events_table(app, f, chunks[0]);

    let hints = if app.table.searching {
        key_hints(&[("Enter", "Keep search"), ("Esc", "Clear search")])
    } else {
        key_hints(&[
            ("↑/↓", "Select"),
            ("←/→", "Page"),
            ("s", "Sort"),
            ("d", "Direction"),
            ("/", "Search"),
            ("Enter", "Details"),
        ])
    };
    let help = Paragraph::new(hints)
        .block(Block::default().borders(Borders::TOP))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[1]);
}

fn render_events_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let result = app.events();
    let Some(page) = result.data.as_deref() else {
        let block = Block::default()
            .title("Events")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let message = if result.is_pending() {
            "Loading events..."
        } else {
            "No events loaded"
        };
        let paragraph = Paragraph::new(message)
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    };

    let rows_data = app.table.rows(page);
    let arrow = if app.table.descending { "▼" } else { "▲" };
    let header = Row::new(
        [
            ("Date", Some(EventSort::Date)),
            ("Country", Some(EventSort::Country)),
            ("Admin 1", Some(EventSort::Adm1)),
            ("Type", Some(EventSort::ViolenceType)),
            ("Deaths", Some(EventSort::Deaths)),
            ("Civilians", Some(EventSort::Civilians)),
            ("Side A", None),
            ("Side B", None),
        ]
        .into_iter()
        .map(|(label, sort)| {
            if sort == Some(app.table.sort) {
                Cell::from(format!("{label} {arrow}"))
            } else {
                Cell::from(label)
            }
        }),
    )
    .style(header_style());

    let total_rows = rows_data.len();
    let max_visible_rows = area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(total_rows, max_visible_rows, app.table.selected);

    let rows = rows_data
        .iter()
        .skip(offset)
        .take(max_visible_rows)
        .enumerate()
        .map(|(i, event)| {
            let style = if i + offset == app.table.selected {
                selected_row_style()
            } else {
                Style::default().fg(violence_color(event.violence_type()))
            };

            Row::new(vec![
                Cell::from(event.date_start.to_string()),
                Cell::from(event.country.clone()),
                Cell::from(event.adm_1.clone().unwrap_or_default()),
                Cell::from(event.violence_label()),
                Cell::from(event.best.to_string()),
                Cell::from(event.deaths_civilians.to_string()),
                Cell::from(event.side_a.clone()),
                Cell::from(event.side_b.clone()),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(11),
        Constraint::Min(12),
        Constraint::Min(12),
    ];

    let search = if app.table.search.is_empty() && !app.table.searching {
        String::new()
    } else {
        let cursor = if app.table.searching { "_" } else { "" };
        format!("  search: {}{cursor}", app.table.search)
    };
    let title = format!(
        "Events (page {} of {}, {} total){search}",
        page.page,
        page.total_pages().max(1),
        page.total_count
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .column_spacing(1);

    f.render_widget(table, area);
}
