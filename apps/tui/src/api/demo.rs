//! Built-in demo data, served when no API endpoint is configured.
//!
//! Every screen that shows these values also shows a "demo data" notice.

use chrono::NaiveDate;

use super::models::{
    ConflictEvent, HeatCell, LookupOption, Lookups, Page, RegionAgg, TimePoint,
};

pub fn lookups() -> Lookups {
    Lookups {
        countries: strings(&["Demo Country A", "Demo Country B", "Demo Country C"]),
        regions: strings(&["Demo Region A", "Demo Region B", "Demo Region C"]),
        adm1: strings(&["Demo Admin 1", "Demo Admin 2", "Demo Admin 3"]),
        sides_a: strings(&[
            "Government Forces",
            "Militia Group Alpha",
            "Armed Group Beta",
        ]),
        sides_b: strings(&["Armed Group Alpha", "Local Forces", "Rebel Group Gamma"]),
        violence_types: vec![
            option(1, "State-based violence"),
            option(2, "Non-state violence"),
            option(3, "One-sided violence"),
        ],
        years: vec![2024],
    }
}

pub fn events() -> Vec<ConflictEvent> {
    vec![
        event(DemoEvent {
            id: "demo-1",
            conflict_name: "Demo Conflict A",
            date: (2024, 12, 1),
            coordinates: (40.7128, -74.006),
            violence: 1,
            sides: ("Government Forces", "Armed Group Alpha"),
            deaths: (15, 10, 20),
            civilians: 3,
            clarity: 1,
        }),
        event(DemoEvent {
            id: "demo-2",
            conflict_name: "Demo Conflict B",
            date: (2024, 12, 2),
            coordinates: (51.5074, -0.1278),
            violence: 2,
            sides: ("Militia Group Beta", "Local Forces"),
            deaths: (8, 5, 12),
            civilians: 2,
            clarity: 2,
        }),
    ]
}

pub fn event_page(page: u32, page_size: u32) -> Page<ConflictEvent> {
    let all = events();
    let total_count = all.len() as u64;
    let skip = page.saturating_sub(1) as usize * page_size as usize;
    Page {
        items: all.into_iter().skip(skip).take(page_size as usize).collect(),
        total_count,
        page,
        page_size,
    }
}

pub fn series() -> Vec<TimePoint> {
    [
        ("2024-01", 45, 234, 67),
        ("2024-02", 52, 289, 89),
        ("2024-03", 38, 198, 45),
        ("2024-04", 61, 345, 123),
        ("2024-05", 47, 267, 78),
        ("2024-06", 55, 312, 94),
        ("2024-07", 42, 223, 56),
        ("2024-08", 58, 334, 112),
        ("2024-09", 49, 278, 83),
        ("2024-10", 53, 298, 91),
        ("2024-11", 46, 245, 69),
        ("2024-12", 51, 287, 87),
    ]
    .into_iter()
    .map(|(period, events, deaths, civilians)| TimePoint {
        period: period.to_string(),
        event_count: events,
        death_count: deaths,
        civilian_death_count: civilians,
    })
    .collect()
}

pub fn regions() -> Vec<RegionAgg> {
    [
        ("Demo Region A", 45, 234, 67),
        ("Demo Region B", 38, 198, 45),
        ("Demo Region C", 52, 289, 89),
    ]
    .into_iter()
    .map(|(key, events, deaths, civilians)| RegionAgg {
        region_key: key.to_string(),
        event_count: events,
        death_count: deaths,
        civilian_death_count: civilians,
    })
    .collect()
}

pub fn heat() -> Vec<HeatCell> {
    [
        (40.7128, -74.006, 15.0),
        (51.5074, -0.1278, 8.0),
        (48.8566, 2.3522, 12.0),
        (35.6762, 139.6503, 6.0),
        (-33.8688, 151.2093, 9.0),
    ]
    .into_iter()
    .map(|(latitude, longitude, weight)| HeatCell {
        latitude,
        longitude,
        weight,
        geohash: None,
    })
    .collect()
}

struct DemoEvent {
    id: &'static str,
    conflict_name: &'static str,
    date: (i32, u32, u32),
    coordinates: (f64, f64),
    violence: u8,
    sides: (&'static str, &'static str),
    deaths: (u32, u32, u32),
    civilians: u32,
    clarity: u8,
}

fn event(demo: DemoEvent) -> ConflictEvent {
    let (year, month, day) = demo.date;
    let date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
    ConflictEvent {
        id: demo.id.to_string(),
        conflict_name: demo.conflict_name.to_string(),
        dyad_name: None,
        date_start: date,
        date_end: Some(date),
        country: "Demo Country".to_string(),
        region: None,
        adm_1: Some("Demo Region".to_string()),
        adm_2: None,
        latitude: demo.coordinates.0,
        longitude: demo.coordinates.1,
        type_of_violence: demo.violence,
        side_a: demo.sides.0.to_string(),
        side_b: demo.sides.1.to_string(),
        best: demo.deaths.0,
        low: demo.deaths.1,
        high: demo.deaths.2,
        deaths_a: None,
        deaths_b: None,
        deaths_civilians: demo.civilians,
        deaths_unknown: None,
        event_clarity: Some(demo.clarity),
        where_description: None,
        source_headline: None,
        number_of_sources: None,
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn option(id: u8, label: &str) -> LookupOption {
    LookupOption {
        id,
        label: label.to_string(),
    }
}
