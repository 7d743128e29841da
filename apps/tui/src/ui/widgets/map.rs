use crate::app::actions::ExploreData;
use crate::app::views::{MapLayer, MapViewport};
use conflict_explorer::ViolenceType;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Map, MapResolution, Points};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

pub fn violence_color(kind: Option<ViolenceType>) -> Color {
    match kind {
        Some(ViolenceType::StateBased) => Color::Red,
        Some(ViolenceType::NonState) => Color::Yellow,
        Some(ViolenceType::OneSided) => Color::Magenta,
        None => Color::Gray,
    }
}

/// Heat weights split into thirds of the heaviest cell.
const HEAT_COLORS: [Color; 3] = [Color::LightYellow, Color::LightRed, Color::Red];

pub fn render_world_map(
    viewport: &MapViewport,
    data: Option<&ExploreData>,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let title = match data {
        Some(data) => format!(
            "Map [{}] {} of {} events  (h: layer, c: reset view)",
            viewport.layer.label(),
            data.events.len(),
            data.total_count
        ),
        None => format!("Map [{}]", viewport.layer.label()),
    };

    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .marker(Marker::Braille)
        .x_bounds(viewport.x_bounds())
        .y_bounds(viewport.y_bounds())
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();

            let Some(data) = data else {
                return;
            };

            match viewport.layer {
                MapLayer::Markers => {
                    for kind in [None]
                        .into_iter()
                        .chain(ViolenceType::ALL.into_iter().map(Some))
                    {
                        let coords: Vec<(f64, f64)> = data
                            .events
                            .iter()
                            .filter(|event| {
                                event.has_coordinates() && event.violence_type() == kind
                            })
                            .map(|event| (event.longitude, event.latitude))
                            .collect();
                        ctx.draw(&Points {
                            coords: &coords,
                            color: violence_color(kind),
                        });
                    }
                }
                MapLayer::Heat => {
                    let max = data
                        .heat
                        .iter()
                        .map(|cell| cell.weight)
                        .fold(0.0_f64, f64::max);
                    if max <= 0.0 {
                        return;
                    }
                    for (band, color) in HEAT_COLORS.iter().enumerate() {
                        let coords: Vec<(f64, f64)> = data
                            .heat
                            .iter()
                            .filter(|cell| heat_band(cell.weight, max) == band)
                            .map(|cell| (cell.longitude, cell.latitude))
                            .collect();
                        ctx.draw(&Points {
                            coords: &coords,
                            color: *color,
                        });
                    }
                }
            }
        });

    f.render_widget(canvas, area);
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn heat_band(weight: f64, max: f64) -> usize {
    let ratio = (weight / max).clamp(0.0, 1.0);
    ((ratio * 3.0).ceil() as usize).clamp(1, 3) - 1
}
