use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ViolenceType;

/// A single conflict event as returned by the events API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictEvent {
    pub id: String,
    #[serde(default)]
    pub conflict_name: String,
    #[serde(default)]
    pub dyad_name: Option<String>,
    pub date_start: NaiveDate,
    #[serde(default)]
    pub date_end: Option<NaiveDate>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub adm_1: Option<String>,
    #[serde(default)]
    pub adm_2: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub type_of_violence: u8,
    #[serde(default)]
    pub side_a: String,
    #[serde(default)]
    pub side_b: String,
    #[serde(default)]
    pub best: u32,
    #[serde(default)]
    pub low: u32,
    #[serde(default)]
    pub high: u32,
    #[serde(default)]
    pub deaths_a: Option<u32>,
    #[serde(default)]
    pub deaths_b: Option<u32>,
    #[serde(default)]
    pub deaths_civilians: u32,
    #[serde(default)]
    pub deaths_unknown: Option<u32>,
    #[serde(default, alias = "clarity_of_location")]
    pub event_clarity: Option<u8>,
    #[serde(default)]
    pub where_description: Option<String>,
    #[serde(default)]
    pub source_headline: Option<String>,
    #[serde(default)]
    pub number_of_sources: Option<u32>,
}

impl ConflictEvent {
    pub const fn violence_type(&self) -> Option<ViolenceType> {
        ViolenceType::from_code(self.type_of_violence)
    }

    pub fn violence_label(&self) -> String {
        self.violence_type().map_or_else(
            || format!("Type {}", self.type_of_violence),
            |kind| kind.label().to_string(),
        )
    }

    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (self.latitude != 0.0 || self.longitude != 0.0)
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(alias = "data")]
    pub items: Vec<T>,
    #[serde(alias = "total")]
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 1;
        }
        let pages = self.total_count.div_ceil(u64::from(self.page_size)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

/// Aggregate counts for one period of the time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePoint {
    pub period: String,
    #[serde(alias = "events")]
    pub event_count: u64,
    #[serde(alias = "deaths")]
    pub death_count: u64,
    #[serde(alias = "civilians")]
    pub civilian_death_count: u64,
}

/// Aggregate counts for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionAgg {
    #[serde(alias = "key", alias = "region")]
    pub region_key: String,
    #[serde(alias = "events")]
    pub event_count: u64,
    #[serde(alias = "deaths")]
    pub death_count: u64,
    #[serde(alias = "civilians")]
    pub civilian_death_count: u64,
}

/// A weighted heatmap cell, usually one geohash bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatCell {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng")]
    pub longitude: f64,
    #[serde(alias = "count")]
    pub weight: f64,
    #[serde(default, alias = "geohash6")]
    pub geohash: Option<String>,
}

/// A labelled facet option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupOption {
    pub id: u8,
    #[serde(alias = "name")]
    pub label: String,
}

/// Facet vocabularies used to populate the filter selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lookups {
    pub countries: Vec<String>,
    pub regions: Vec<String>,
    pub adm1: Vec<String>,
    pub sides_a: Vec<String>,
    pub sides_b: Vec<String>,
    pub violence_types: Vec<LookupOption>,
    pub years: Vec<i32>,
}

impl Lookups {
    /// Label for a violence type, preferring the server vocabulary.
    pub fn violence_label(&self, kind: ViolenceType) -> String {
        self.violence_types
            .iter()
            .find(|option| option.id == kind.code())
            .map_or_else(|| kind.label().to_string(), |option| option.label.clone())
    }
}

/// Totals over a series, as shown in the stats strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeriesTotals {
    pub events: u64,
    pub deaths: u64,
    pub civilians: u64,
}

impl SeriesTotals {
    pub fn from_points(points: &[TimePoint]) -> Self {
        points.iter().fold(Self::default(), |acc, point| Self {
            events: acc.events + point.event_count,
            deaths: acc.deaths + point.death_count,
            civilians: acc.civilians + point.civilian_death_count,
        })
    }

    pub fn from_regions(regions: &[RegionAgg]) -> Self {
        regions.iter().fold(Self::default(), |acc, region| Self {
            events: acc.events + region.event_count,
            deaths: acc.deaths + region.death_count,
            civilians: acc.civilians + region.civilian_death_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_accepts_backend_field_names() {
        let json = r#"{"data":[],"total":51,"page":2,"pageSize":25,"totalPages":3}"#;
        let page: Page<ConflictEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_count, 51);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn aggregates_accept_short_names() {
        let point: TimePoint =
            serde_json::from_str(r#"{"period":"2024-01","events":45,"deaths":234,"civilians":67}"#)
                .unwrap();
        assert_eq!(point.civilian_death_count, 67);

        let region: RegionAgg =
            serde_json::from_str(r#"{"key":"Sahel","events":4,"deaths":9,"civilians":1}"#).unwrap();
        assert_eq!(region.region_key, "Sahel");

        let cell: HeatCell =
            serde_json::from_str(r#"{"geohash6":"s0d1x2","lat":12.6,"lng":-8.0,"count":3}"#)
                .unwrap();
        assert_eq!(cell.geohash.as_deref(), Some("s0d1x2"));
        assert!((cell.weight - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn lookups_tolerate_missing_lists() {
        let lookups: Lookups = serde_json::from_str(
            r#"{"countries":["Mali"],"violenceTypes":[{"id":1,"name":"State-based violence"}]}"#,
        )
        .unwrap();
        assert_eq!(lookups.countries, vec!["Mali".to_string()]);
        assert!(lookups.sides_a.is_empty());
        assert_eq!(
            lookups.violence_label(ViolenceType::StateBased),
            "State-based violence"
        );
        assert_eq!(lookups.violence_label(ViolenceType::OneSided), "One-sided");
    }

    #[test]
    fn event_decodes_minimal_record() {
        let event: ConflictEvent = serde_json::from_str(
            r#"{"id":"e1","date_start":"2024-12-01","latitude":12.6,"longitude":-8.0,
                "type_of_violence":2,"best":15,"deaths_civilians":3,"clarity_of_location":1}"#,
        )
        .unwrap();
        assert_eq!(event.violence_label(), "Non-state");
        assert_eq!(event.event_clarity, Some(1));
        assert!(event.has_coordinates());
    }
}
