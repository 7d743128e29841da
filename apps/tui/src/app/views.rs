use std::cmp::Ordering;

use conflict_explorer::api::{ConflictEvent, Page, RegionAgg};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

pub const EVENTS_PAGE_SIZE: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapLayer {
    Markers,
    Heat,
}

impl MapLayer {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Markers => "Events",
            Self::Heat => "Heat",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Markers => Self::Heat,
            Self::Heat => Self::Markers,
        }
    }
}

/// Visible window onto the world map, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub center_lon: f64,
    pub center_lat: f64,
    pub zoom: f64,
    pub layer: MapLayer,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self::world(MapLayer::Markers)
    }
}

impl MapViewport {
    pub const WORLD_CENTER: (f64, f64) = (0.0, 20.0);
    pub const MIN_ZOOM: f64 = 1.0;
    pub const MAX_ZOOM: f64 = 32.0;
    const PADDING: f64 = 1.2;

    pub const fn world(layer: MapLayer) -> Self {
        Self {
            center_lon: Self::WORLD_CENTER.0,
            center_lat: Self::WORLD_CENTER.1,
            zoom: Self::MIN_ZOOM,
            layer,
        }
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        let half = 180.0 / self.zoom;
        [self.center_lon - half, self.center_lon + half]
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        let half = 90.0 / self.zoom;
        [self.center_lat - half, self.center_lat + half]
    }

    /// Pans by a fraction of the visible span.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.center_lon = (self.center_lon + dx * 360.0 / self.zoom).clamp(-180.0, 180.0);
        self.center_lat = (self.center_lat + dy * 180.0 / self.zoom).clamp(-90.0, 90.0);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.5).min(Self::MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.5).max(Self::MIN_ZOOM);
    }

    /// Fits the events that carry coordinates, or returns to the world view when there are none.
    pub fn reset(&mut self, events: &[ConflictEvent]) {
        let mut located = events.iter().filter(|event| event.has_coordinates());
        let Some(first) = located.next() else {
            *self = Self::world(self.layer);
            return;
        };

        let init = (first.longitude, first.longitude, first.latitude, first.latitude);
        let (min_lon, max_lon, min_lat, max_lat) =
            located.fold(init, |(min_lon, max_lon, min_lat, max_lat), event| {
                (
                    min_lon.min(event.longitude),
                    max_lon.max(event.longitude),
                    min_lat.min(event.latitude),
                    max_lat.max(event.latitude),
                )
            });

        let lon_span = (max_lon - min_lon) * Self::PADDING;
        let lat_span = (max_lat - min_lat) * Self::PADDING;
        let zoom_lon = if lon_span > 0.0 { 360.0 / lon_span } else { Self::MAX_ZOOM };
        let zoom_lat = if lat_span > 0.0 { 180.0 / lat_span } else { Self::MAX_ZOOM };

        self.center_lon = (min_lon + max_lon) / 2.0;
        self.center_lat = (min_lat + max_lat) / 2.0;
        self.zoom = zoom_lon.min(zoom_lat).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSort {
    Date,
    Country,
    Adm1,
    ViolenceType,
    Deaths,
    Civilians,
}

impl EventSort {
    pub const ALL: [Self; 6] = [
        Self::Date,
        Self::Country,
        Self::Adm1,
        Self::ViolenceType,
        Self::Deaths,
        Self::Civilians,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Country => "Country",
            Self::Adm1 => "Admin 1",
            Self::ViolenceType => "Type",
            Self::Deaths => "Deaths",
            Self::Civilians => "Civilians",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|sort| *sort == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    fn compare(self, a: &ConflictEvent, b: &ConflictEvent) -> Ordering {
        match self {
            Self::Date => a.date_start.cmp(&b.date_start),
            Self::Country => a.country.cmp(&b.country),
            Self::Adm1 => a.adm_1.cmp(&b.adm_1),
            Self::ViolenceType => a.type_of_violence.cmp(&b.type_of_violence),
            Self::Deaths => a.best.cmp(&b.best),
            Self::Civilians => a.deaths_civilians.cmp(&b.deaths_civilians),
        }
    }
}

/// Events table state: server page plus local sort and search over that page.
#[derive(Debug, Clone)]
pub struct EventsTable {
    pub page: u32,
    pub selected: usize,
    pub sort: EventSort,
    pub descending: bool,
    pub search: String,
    pub searching: bool,
}

impl Default for EventsTable {
    fn default() -> Self {
        Self {
            page: 1,
            selected: 0,
            sort: EventSort::Date,
            descending: true,
            search: String::new(),
            searching: false,
        }
    }
}

impl EventsTable {
    /// Same column flips direction; a new column starts descending.
    pub fn sort_by(&mut self, sort: EventSort) {
        if self.sort == sort {
            self.descending = !self.descending;
        } else {
            self.sort = sort;
            self.descending = true;
        }
        self.selected = 0;
    }

    pub fn rows<'a>(&self, page: &'a Page<ConflictEvent>) -> Vec<&'a ConflictEvent> {
        let mut rows: Vec<&ConflictEvent> = if self.search.trim().is_empty() {
            page.items.iter().collect()
        } else {
            let matcher = SkimMatcherV2::default();
            let pattern = self.search.trim();
            page.items
                .iter()
                .filter(|event| matcher.fuzzy_match(&search_text(event), pattern).is_some())
                .collect()
        };

        rows.sort_by(|a, b| {
            let ordering = self.sort.compare(a, b);
            if self.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        rows
    }
}

fn search_text(event: &ConflictEvent) -> String {
    format!(
        "{} {} {} {} {}",
        event.country,
        event.adm_1.as_deref().unwrap_or_default(),
        event.side_a,
        event.side_b,
        event.conflict_name
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSort {
    Region,
    Events,
    Deaths,
    Civilians,
}

impl RegionSort {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Region => "Region",
            Self::Events => "Events",
            Self::Deaths => "Deaths",
            Self::Civilians => "Civilians",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Region => Self::Events,
            Self::Events => Self::Deaths,
            Self::Deaths => Self::Civilians,
            Self::Civilians => Self::Region,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegionsTable {
    pub selected: usize,
    pub sort: RegionSort,
    pub descending: bool,
}

impl Default for RegionsTable {
    fn default() -> Self {
        Self {
            selected: 0,
            sort: RegionSort::Events,
            descending: true,
        }
    }
}

impl RegionsTable {
    pub fn sorted<'a>(&self, regions: &'a [RegionAgg]) -> Vec<&'a RegionAgg> {
        let mut rows: Vec<&RegionAgg> = regions.iter().collect();
        rows.sort_by(|a, b| {
            let ordering = match self.sort {
                RegionSort::Region => a.region_key.cmp(&b.region_key),
                RegionSort::Events => a.event_count.cmp(&b.event_count),
                RegionSort::Deaths => a.death_count.cmp(&b.death_count),
                RegionSort::Civilians => a.civilian_death_count.cmp(&b.civilian_death_count),
            };
            if self.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        rows
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimelineMetric {
    #[default]
    Events,
    Deaths,
    Civilians,
}

impl TimelineMetric {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Events => "Events",
            Self::Deaths => "Deaths",
            Self::Civilians => "Civilian deaths",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Events => Self::Deaths,
            Self::Deaths => Self::Civilians,
            Self::Civilians => Self::Events,
        }
    }
}
