use crate::app::views::RegionSort;
use crate::app::App;
use crate::ui::widgets::charts::render_region_bars;
use crate::ui::widgets::tables::{header_style, scroll_offset, selected_row_style};
use conflict_explorer::api::RegionAgg;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn render_regions(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let result = app.regions();
    let Some(regions) = result.data.as_deref() else {
        let message = if result.is_pending() {
            "Loading regions..."
        } else {
            "No regions loaded"
        };
        let paragraph = Paragraph::new(message)
            .block(
                Block::default()
                    .title("Regions")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    };

    render_regions_table(app, regions, f, chunks[0]);
    render_region_bars(regions, f, chunks[1]);
}

fn render_regions_table(app: &App, regions: &[RegionAgg], f: &mut Frame<'_>, area: Rect) {
    let sorted = app.regions_table.sorted(regions);
    let arrow = if app.regions_table.descending { "▼" } else { "▲" };

    let header = Row::new(
        [
            RegionSort::Region,
            RegionSort::Events,
            RegionSort::Deaths,
            RegionSort::Civilians,
        ]
        .into_iter()
        .map(|sort| {
            if sort == app.regions_table.sort {
                Cell::from(format!("{} {arrow}", sort.label()))
            } else {
                Cell::from(sort.label())
            }
        }),
    )
    .style(header_style());

    let max_visible_rows = area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(sorted.len(), max_visible_rows, app.regions_table.selected);

    let rows = sorted
        .iter()
        .skip(offset)
        .take(max_visible_rows)
        .enumerate()
        .map(|(i, region)| {
            let row = Row::new(vec![
                Cell::from(region.region_key.clone()),
                Cell::from(region.event_count.to_string()),
                Cell::from(region.death_count.to_string()),
                Cell::from(region.civilian_death_count.to_string()),
            ]);
            if i + offset == app.regions_table.selected {
                row.style(selected_row_style())
            } else {
                row
            }
        });

    let widths = [
        Constraint::Min(16),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(11),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!("Regions ({})  s: sort, d: direction", sorted.len()))
                .borders(Borders::ALL),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}
