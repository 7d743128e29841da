//! Query-string form of a [`FilterState`].
//!
//! `decode(encode(s)) == s` holds for every state the store can produce. Decoding never
//! fails: absent or malformed values fall back to the field default.

use std::collections::{BTreeSet, HashMap};

use chrono::{Local, NaiveDate};
use url::form_urlencoded;

use super::state::{normalize_name, Bounds, DateRange, FilterState};
use crate::domain::{Clarity, ViolenceType};

pub const FROM: &str = "from";
pub const TO: &str = "to";
pub const COUNTRIES: &str = "countries";
pub const REGIONS: &str = "regions";
pub const ADM1: &str = "adm1";
pub const VIOLENCE_TYPES: &str = "violenceTypes";
pub const SIDES_A: &str = "sidesA";
pub const SIDES_B: &str = "sidesB";
pub const MIN_DEATHS: &str = "minDeaths";
pub const MAX_DEATHS: &str = "maxDeaths";
pub const HAS_CIVILIANS: &str = "hasCivilians";
pub const CLARITY_MIN: &str = "clarityMin";
pub const CLARITY_MAX: &str = "clarityMax";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Key/value pairs for every non-empty field, in a fixed key order.
pub fn encode_pairs(state: &FilterState) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::with_capacity(13);

    pairs.push((FROM, state.date_range.from().format(DATE_FORMAT).to_string()));
    pairs.push((TO, state.date_range.to().format(DATE_FORMAT).to_string()));

    push_names(&mut pairs, COUNTRIES, &state.countries);
    push_names(&mut pairs, REGIONS, &state.regions);
    push_names(&mut pairs, ADM1, &state.adm1);

    if !state.violence_types.is_empty() {
        let codes = state
            .violence_types
            .iter()
            .map(|kind| kind.code().to_string())
            .collect::<Vec<_>>()
            .join(",");
        pairs.push((VIOLENCE_TYPES, codes));
    }

    push_names(&mut pairs, SIDES_A, &state.sides_a);
    push_names(&mut pairs, SIDES_B, &state.sides_b);

    if let Some(min) = state.deaths.min() {
        pairs.push((MIN_DEATHS, min.to_string()));
    }
    if let Some(max) = state.deaths.max() {
        pairs.push((MAX_DEATHS, max.to_string()));
    }
    if let Some(flag) = state.has_civilians {
        pairs.push((HAS_CIVILIANS, flag.to_string()));
    }
    if let Some(min) = state.clarity.min() {
        pairs.push((CLARITY_MIN, min.level().to_string()));
    }
    if let Some(max) = state.clarity.max() {
        pairs.push((CLARITY_MAX, max.level().to_string()));
    }

    pairs
}

/// Form-urlencoded query string without the leading `?`.
pub fn encode(state: &FilterState) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(encode_pairs(state))
        .finish()
}

/// Decodes relative to the local calendar date.
pub fn decode(query: &str) -> FilterState {
    decode_at(query, Local::now().date_naive())
}

pub fn decode_at(query: &str, today: NaiveDate) -> FilterState {
    let query = query.trim().trim_start_matches('?');

    // URLSearchParams.get semantics: the first occurrence of a key wins.
    let mut params: HashMap<String, String> = HashMap::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    let get = |key: &str| params.get(key).map(String::as_str);

    let default_range = DateRange::last_365_days(today);
    let from = get(FROM)
        .and_then(parse_date)
        .unwrap_or_else(|| default_range.from());
    let to = get(TO)
        .and_then(parse_date)
        .unwrap_or_else(|| default_range.to());

    FilterState {
        date_range: DateRange::ordered(from, to),
        countries: get(COUNTRIES).map(split_names).unwrap_or_default(),
        regions: get(REGIONS).map(split_names).unwrap_or_default(),
        adm1: get(ADM1).map(split_names).unwrap_or_default(),
        violence_types: get(VIOLENCE_TYPES)
            .map(|raw| raw.split(',').filter_map(ViolenceType::parse).collect())
            .unwrap_or_default(),
        sides_a: get(SIDES_A).map(split_names).unwrap_or_default(),
        sides_b: get(SIDES_B).map(split_names).unwrap_or_default(),
        deaths: Bounds::ordered(
            get(MIN_DEATHS).and_then(parse_count),
            get(MAX_DEATHS).and_then(parse_count),
        ),
        has_civilians: get(HAS_CIVILIANS).and_then(parse_flag),
        clarity: Bounds::ordered(
            get(CLARITY_MIN).and_then(Clarity::parse),
            get(CLARITY_MAX).and_then(Clarity::parse),
        ),
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

fn parse_count(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn push_names(pairs: &mut Vec<(&'static str, String)>, key: &'static str, names: &BTreeSet<String>) {
    if names.is_empty() {
        return;
    }
    let joined = names
        .iter()
        .map(|name| escape_name(name))
        .collect::<Vec<_>>()
        .join(",");
    pairs.push((key, joined));
}

// Commas separate values, so a literal comma or backslash inside a name is escaped.
fn escape_name(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch == ',' || ch == '\\' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn split_names(raw: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut current = String::new();
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ',' => {
                names.extend(normalize_name(&current));
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    names.extend(normalize_name(&current));

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::state::FilterPatch;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn mali_scenario_encodes_only_present_keys() {
        let state = FilterState::default_for(today())
            .merged(FilterPatch::countries(["Mali"]))
            .merged(FilterPatch::deaths(Bounds::new(Some(5), None).unwrap()));

        let query = encode(&state);

        assert!(query.contains("countries=Mali&minDeaths=5"), "{query}");
        assert!(!query.contains("regions="));
        assert!(!query.contains("adm1="));
        assert!(!query.contains("maxDeaths="));
    }

    #[test]
    fn empty_query_yields_default_window() {
        let state = decode_at("", today());
        assert_eq!(state, FilterState::default_for(today()));
        assert_eq!(state.date_range.to(), today());
        assert_eq!(
            state.date_range.from(),
            NaiveDate::from_ymd_opt(2023, 6, 16).unwrap()
        );
    }

    #[test]
    fn malformed_values_decode_to_unset() {
        let state = decode_at(
            "?minDeaths=abc&maxDeaths=-4&clarityMin=9&hasCivilians=yes&violenceTypes=7,x,2&from=2024-13-01",
            today(),
        );

        assert_eq!(state.deaths, Bounds::unbounded());
        assert_eq!(state.clarity, Bounds::unbounded());
        assert_eq!(state.has_civilians, None);
        assert_eq!(
            state.violence_types,
            BTreeSet::from([ViolenceType::NonState])
        );
        assert_eq!(
            state.date_range.from(),
            DateRange::last_365_days(today()).from()
        );
    }

    #[test]
    fn inverted_values_are_swapped_and_first_key_wins() {
        let state = decode_at(
            "from=2024-05-01&to=2024-01-01&minDeaths=50&maxDeaths=10&countries=Chad&countries=Niger",
            today(),
        );

        assert_eq!(state.date_range.from(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(state.date_range.to(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(state.deaths.min(), Some(10));
        assert_eq!(state.deaths.max(), Some(50));
        assert_eq!(state.countries, BTreeSet::from(["Chad".to_string()]));
    }

    #[test]
    fn names_with_commas_survive_the_round_trip() {
        let state = FilterState::default_for(today()).merged(FilterPatch {
            sides_a: Some(BTreeSet::from([
                "Government of Congo, DR".to_string(),
                r"back\slash".to_string(),
            ])),
            ..FilterPatch::default()
        });

        assert_eq!(decode_at(&encode(&state), today()), state);
    }

    fn name() -> impl Strategy<Value = String> {
        r"[A-Za-zé(][A-Za-zé ,()'\\-]{0,16}[A-Za-z)]"
    }

    fn names() -> impl Strategy<Value = BTreeSet<String>> {
        proptest::collection::btree_set(name(), 0..4)
    }

    fn optional_clarity() -> impl Strategy<Value = Option<Clarity>> {
        proptest::option::of(proptest::sample::select(Clarity::ALL.to_vec()))
    }

    prop_compose! {
        fn reachable_state()(
            start in 0_i64..2_000,
            span in 0_i64..800,
            countries in names(),
            regions in names(),
            adm1 in names(),
            sides_a in names(),
            sides_b in names(),
            violence in proptest::collection::btree_set(
                proptest::sample::select(ViolenceType::ALL.to_vec()), 0..=3),
            deaths in (proptest::option::of(0_u32..5_000), proptest::option::of(0_u32..5_000)),
            has_civilians in proptest::option::of(any::<bool>()),
            clarity in (optional_clarity(), optional_clarity()),
        ) -> FilterState {
            let base = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
            let from = base + chrono::Duration::days(start);
            let to = from + chrono::Duration::days(span);
            FilterState::default_for(today()).merged(FilterPatch {
                date_range: Some(DateRange::new(from, to).unwrap()),
                countries: Some(countries),
                regions: Some(regions),
                adm1: Some(adm1),
                violence_types: Some(violence),
                sides_a: Some(sides_a),
                sides_b: Some(sides_b),
                deaths: Some(Bounds::ordered(deaths.0, deaths.1)),
                has_civilians: Some(has_civilians),
                clarity: Some(Bounds::ordered(clarity.0, clarity.1)),
            })
        }
    }

    proptest! {
        #[test]
        fn decode_is_left_inverse_of_encode(state in reachable_state()) {
            prop_assert_eq!(decode_at(&encode(&state), today()), state);
        }
    }
}
