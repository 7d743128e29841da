use crate::app::filter_panel::FilterField;
use crate::app::App;
use crate::ui::widgets::popup::open_popup;
use crate::ui::widgets::status::key_hints;
use crate::ui::widgets::tables::{scroll_offset, selected_row_style};
use conflict_explorer::fetch::LookupStatus;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_filter_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let filters = app.current_filters();
    let lookups = app.lookups.get();
    let border = if app.filter_panel.focused {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let mut lines = Vec::new();
    for (index, field) in FilterField::ALL.iter().enumerate() {
        let selected = app.filter_panel.focused && index == app.filter_panel.selected;
        let label_style = if selected {
            selected_row_style()
        } else {
            Style::default().fg(Color::Yellow)
        };
        lines.push(TextLine::from(Span::styled(field.label(), label_style)));
        lines.push(TextLine::from(Span::raw(format!(
            "  {}",
            field.display(&filters, lookups.as_deref())
        ))));
    }

    let note = match app.lookups.status() {
        LookupStatus::Idle | LookupStatus::Pending => Some(("Loading options...", Color::Gray)),
        LookupStatus::Failed(_) => Some(("Options unavailable (L to retry)", Color::Red)),
        LookupStatus::Ready => None,
    };
    if let Some((text, color)) = note {
        lines.push(TextLine::default());
        lines.push(TextLine::from(Span::styled(text, Style::default().fg(color))));
    }

    let title = if app.filter_panel.focused {
        "Filters (Enter edit, x clear)"
    } else {
        "Filters (f to focus)"
    };
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .wrap(Wrap { trim: false });

    // Keep the selected field on screen in short terminals.
    let visible_lines = area.height.saturating_sub(2) as usize;
    let offset = scroll_offset(
        FilterField::ALL.len() * 2,
        visible_lines,
        app.filter_panel.selected * 2 + 1,
    );
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    f.render_widget(paragraph.scroll((offset, 0)), area);
}

pub fn render_edit_popup(app: &App, f: &mut Frame<'_>) {
    if let Some(picker) = &app.filter_panel.picker {
        let inner = open_popup(f, &format!(" {} ", picker.field.label()), 50, 60);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(inner);

        f.render_widget(
            Paragraph::new(format!("Search: {}_", picker.query)),
            chunks[0],
        );

        let visible = picker.visible();
        let max_rows = chunks[1].height as usize;
        let offset = scroll_offset(visible.len(), max_rows, picker.cursor);
        let options = visible
            .iter()
            .enumerate()
            .skip(offset)
            .take(max_rows)
            .map(|(index, (value, label))| {
                let mark = if picker.chosen.contains(value) { "[x]" } else { "[ ]" };
                let style = if index == picker.cursor {
                    selected_row_style()
                } else {
                    Style::default()
                };
                TextLine::from(Span::styled(format!("{mark} {label}"), style))
            })
            .collect::<Vec<_>>();
        let options = if options.is_empty() {
            vec![TextLine::from(Span::styled(
                "No matching options",
                Style::default().fg(Color::Gray),
            ))]
        } else {
            options
        };
        f.render_widget(Paragraph::new(options), chunks[1]);

        f.render_widget(
            Paragraph::new(key_hints(&[
                ("Space", "Toggle"),
                ("Enter", "Apply"),
                ("Esc", "Cancel"),
            ])),
            chunks[2],
        );
        return;
    }

    if let Some(entry) = &app.filter_panel.text {
        let inner = open_popup(f, &format!(" {} ", entry.field.label()), 40, 20);
        let hint = match entry.field {
            FilterField::From | FilterField::To => "YYYY-MM-DD",
            _ => "whole number, empty for no bound",
        };
        let lines = vec![
            TextLine::from(Span::styled(
                format!("{}_", entry.buffer),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            TextLine::from(Span::styled(hint, Style::default().fg(Color::Gray))),
            key_hints(&[("Enter", "Apply"), ("Esc", "Cancel")]),
        ];
        f.render_widget(Paragraph::new(lines), inner);
    }
}
