use crate::ui::widgets::popup::open_popup;
use crate::ui::widgets::status::key_hints;
use ratatui::text::{Line as TextLine, Span};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

const SECTIONS: [(&str, &[(&str, &str)]); 6] = [
    (
        "Global",
        &[
            ("Tab/1-5", "switch view"),
            ("f", "focus filters"),
            ("F", "hide filters"),
            ("R", "reset filters"),
            ("r", "retry"),
            ("L", "reload filter options"),
            ("q", "quit"),
        ],
    ),
    (
        "Filters",
        &[
            ("↑/↓", "select"),
            ("Enter", "edit or cycle"),
            ("x", "clear"),
            ("Space", "toggle option"),
            ("Esc", "cancel"),
        ],
    ),
    (
        "Explore",
        &[
            ("arrows", "pan"),
            ("+/-", "zoom"),
            ("h", "events/heat"),
            ("c", "fit view"),
        ],
    ),
    (
        "Events",
        &[
            ("←/→", "page"),
            ("s", "sort column"),
            ("d", "direction"),
            ("/", "search"),
            ("Enter", "details"),
        ],
    ),
    ("Timeline / Regions", &[("m", "metric"), ("s", "sort"), ("d", "direction")]),
    ("Analytics", &[("←/→", "report")]),
];

pub fn render_help(f: &mut Frame<'_>) {
    let inner = open_popup(f, " Help (Esc to close) ", 70, 70);

    let mut lines = Vec::new();
    for (title, hints) in SECTIONS {
        lines.push(TextLine::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(key_hints(hints));
        lines.push(TextLine::default());
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}
