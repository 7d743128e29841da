use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};

use chrono::NaiveDate;
use conflict_explorer::api::{ApiError, SeriesTotals};
use conflict_explorer::filters::{query, FilterState};
use conflict_explorer::stats::window_filters;

use crate::app::actions::AppActions;
use crate::app::{handle_input, App};
use crate::terminal::DashboardTerminal;
use crate::ui;

const TOP_REGIONS: usize = 5;

/// Prints a one-shot summary for the given filters instead of starting the UI.
pub async fn run_headless(
    actions: &AppActions,
    filters: &FilterState,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let report = build_headless_report(actions, filters, today).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_headless_text(&report);
    }

    Ok(())
}

fn render_headless_text(report: &HeadlessReport) {
    println!("\nConflict Events");
    println!("===============");
    println!("Source: {}", report.source);
    if let Some(notice) = &report.notice {
        println!("{notice}");
    }
    println!("Filters: ?{}", report.query);

    if let Some(count) = report.event_count {
        println!("Matching events: {count}");
    }
    if let Some(totals) = report.totals {
        println!(
            "Totals: {} events, {} deaths, {} civilian deaths",
            totals.events, totals.deaths, totals.civilians
        );
    }
    if let Some(recent) = report.last_30_days {
        println!(
            "Last 30 days: {} events, {} deaths, {} civilian deaths",
            recent.events, recent.deaths, recent.civilians
        );
    }

    if !report.top_regions.is_empty() {
        println!("\nTop regions:");
        for region in &report.top_regions {
            println!(
                "- {} | {} events | {} deaths",
                region.region, region.events, region.deaths
            );
        }
    }

    for error in &report.errors {
        println!("\n{} unavailable: {}", error.section, error.message);
    }
}

async fn build_headless_report(
    actions: &AppActions,
    filters: &FilterState,
    today: NaiveDate,
) -> HeadlessReport {
    let recent_filters = window_filters(today);
    let (count, series, recent, regions) = tokio::join!(
        actions.event_count(filters),
        actions.series(filters),
        actions.series(&recent_filters),
        actions.regions_for(filters),
    );

    let mut errors = Vec::new();
    let mut keep = |section: &'static str, error: ApiError| {
        tracing::warn!(section, error = %error, "headless read failed");
        errors.push(HeadlessError {
            section,
            message: error.user_message().to_string(),
        });
    };

    let event_count = count.map_err(|e| keep("events", e)).ok();
    let totals = series
        .map(|points| SeriesTotals::from_points(&points))
        .map_err(|e| keep("timeline", e))
        .ok();
    let last_30_days = recent
        .map(|points| SeriesTotals::from_points(&points))
        .map_err(|e| keep("stats", e))
        .ok();
    let top_regions: Vec<HeadlessRegion> = regions
        .map(|mut regions| {
            regions.sort_by(|a, b| b.event_count.cmp(&a.event_count));
            regions
                .into_iter()
                .take(TOP_REGIONS)
                .map(|region| HeadlessRegion {
                    region: region.region_key,
                    events: region.event_count,
                    deaths: region.death_count,
                })
                .collect()
        })
        .map_err(|e| keep("regions", e))
        .unwrap_or_default();

    HeadlessReport {
        source: actions.source.describe(),
        notice: actions.source.notice(),
        query: query::encode(filters),
        event_count,
        totals,
        last_30_days,
        top_regions,
        errors,
    }
}

#[derive(Debug, serde::Serialize)]
struct HeadlessReport {
    source: String,
    notice: Option<String>,
    query: String,
    event_count: Option<u64>,
    totals: Option<SeriesTotals>,
    last_30_days: Option<SeriesTotals>,
    top_regions: Vec<HeadlessRegion>,
    errors: Vec<HeadlessError>,
}

#[derive(Debug, serde::Serialize)]
struct HeadlessRegion {
    region: String,
    events: u64,
    deaths: u64,
}

#[derive(Debug, serde::Serialize)]
struct HeadlessError {
    section: &'static str,
    message: String,
}

/// Run the main application event loop
pub async fn run(terminal: &mut DashboardTerminal, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    loop {
        // Drain view messages and advance the spinner
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(_) | Err(_) => {}
            }
        }

        // Let spawned reads make progress between frames
        tokio::task::yield_now().await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use conflict_explorer::api::DataSource;
    use conflict_explorer::fetch::FetchConfig;

    #[tokio::test]
    async fn headless_report_covers_every_section() {
        let actions = AppActions::new(
            DataSource::Demo {
                reason: "CONFLICT_API_URL is not set".into(),
            },
            FetchConfig::default(),
        );
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let filters = FilterState::default_for(today);

        let report = build_headless_report(&actions, &filters, today).await;

        assert_eq!(report.event_count, Some(2));
        assert_eq!(report.totals.map(|totals| totals.events), Some(597));
        assert_eq!(report.top_regions[0].region, "Demo Region C");
        assert!(report.errors.is_empty());
        assert_eq!(
            report.notice.as_deref(),
            Some("Demo data: CONFLICT_API_URL is not set")
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["event_count"], 2);
    }
}
