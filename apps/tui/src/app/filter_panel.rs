//! Sidebar that edits every field of the filter state.
//!
//! The panel never touches a [`FilterState`] directly: each edit is turned into a
//! [`FilterPatch`] that the store applies.

use std::collections::BTreeSet;

use conflict_explorer::api::Lookups;
use conflict_explorer::filters::query::parse_date;
use conflict_explorer::filters::{Bounds, FilterError, FilterPatch, FilterState};
use conflict_explorer::{Clarity, ViolenceType};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    From,
    To,
    Countries,
    Regions,
    Adm1,
    ViolenceTypes,
    SidesA,
    SidesB,
    MinDeaths,
    MaxDeaths,
    HasCivilians,
    ClarityMin,
    ClarityMax,
}

impl FilterField {
    pub const ALL: [Self; 13] = [
        Self::From,
        Self::To,
        Self::Countries,
        Self::Regions,
        Self::Adm1,
        Self::ViolenceTypes,
        Self::SidesA,
        Self::SidesB,
        Self::MinDeaths,
        Self::MaxDeaths,
        Self::HasCivilians,
        Self::ClarityMin,
        Self::ClarityMax,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::From => "From",
            Self::To => "To",
            Self::Countries => "Countries",
            Self::Regions => "Regions",
            Self::Adm1 => "Admin 1",
            Self::ViolenceTypes => "Violence types",
            Self::SidesA => "Side A",
            Self::SidesB => "Side B",
            Self::MinDeaths => "Min deaths",
            Self::MaxDeaths => "Max deaths",
            Self::HasCivilians => "Civilian deaths",
            Self::ClarityMin => "Clarity min",
            Self::ClarityMax => "Clarity max",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    const fn is_facet(self) -> bool {
        matches!(
            self,
            Self::Countries
                | Self::Regions
                | Self::Adm1
                | Self::ViolenceTypes
                | Self::SidesA
                | Self::SidesB
        )
    }

    const fn is_text(self) -> bool {
        matches!(
            self,
            Self::From | Self::To | Self::MinDeaths | Self::MaxDeaths
        )
    }

    /// Current value as shown in the sidebar.
    pub fn display(self, filters: &FilterState, lookups: Option<&Lookups>) -> String {
        let names = |set: &BTreeSet<String>| {
            if set.is_empty() {
                "Any".to_string()
            } else {
                set.iter().cloned().collect::<Vec<_>>().join(", ")
            }
        };
        let number = |value: Option<u32>| value.map_or_else(|| "-".to_string(), |n| n.to_string());
        let clarity = |value: Option<Clarity>| {
            value.map_or_else(|| "-".to_string(), |c| format!("{} ({})", c.level(), c.label()))
        };

        match self {
            Self::From => filters.date_range.from().to_string(),
            Self::To => filters.date_range.to().to_string(),
            Self::Countries => names(&filters.countries),
            Self::Regions => names(&filters.regions),
            Self::Adm1 => names(&filters.adm1),
            Self::ViolenceTypes => {
                if filters.violence_types.is_empty() {
                    "Any".to_string()
                } else {
                    filters
                        .violence_types
                        .iter()
                        .map(|kind| {
                            lookups.map_or_else(
                                || kind.label().to_string(),
                                |lookups| lookups.violence_label(*kind),
                            )
                        })
                        .collect::<Vec<_>>()
                        .join(", ")
                }
            }
            Self::SidesA => names(&filters.sides_a),
            Self::SidesB => names(&filters.sides_b),
            Self::MinDeaths => number(filters.deaths.min()),
            Self::MaxDeaths => number(filters.deaths.max()),
            Self::HasCivilians => match filters.has_civilians {
                None => "Any".to_string(),
                Some(true) => "Required".to_string(),
                Some(false) => "None".to_string(),
            },
            Self::ClarityMin => clarity(filters.clarity.min()),
            Self::ClarityMax => clarity(filters.clarity.max()),
        }
    }

    /// Patch that clears this field.
    pub fn cleared(self, filters: &FilterState, today: chrono::NaiveDate) -> FilterPatch {
        let default = FilterState::default_for(today);
        match self {
            Self::From | Self::To => {
                let range = if self == Self::From {
                    filters.date_range.with_from(default.date_range.from())
                } else {
                    filters.date_range.with_to(default.date_range.to())
                };
                FilterPatch::date_range(range.unwrap_or(default.date_range))
            }
            Self::Countries | Self::Regions | Self::Adm1 | Self::SidesA | Self::SidesB => {
                facet_patch(self, BTreeSet::new())
            }
            Self::ViolenceTypes => FilterPatch::violence_types(BTreeSet::new()),
            Self::MinDeaths => FilterPatch::deaths(Bounds::ordered(None, filters.deaths.max())),
            Self::MaxDeaths => FilterPatch::deaths(Bounds::ordered(filters.deaths.min(), None)),
            Self::HasCivilians => FilterPatch::has_civilians(None),
            Self::ClarityMin => FilterPatch::clarity(Bounds::ordered(None, filters.clarity.max())),
            Self::ClarityMax => FilterPatch::clarity(Bounds::ordered(filters.clarity.min(), None)),
        }
    }
}

fn facet_patch(field: FilterField, names: BTreeSet<String>) -> FilterPatch {
    let mut patch = FilterPatch::default();
    match field {
        FilterField::Countries => patch.countries = Some(names),
        FilterField::Regions => patch.regions = Some(names),
        FilterField::Adm1 => patch.adm1 = Some(names),
        FilterField::SidesA => patch.sides_a = Some(names),
        FilterField::SidesB => patch.sides_b = Some(names),
        _ => {}
    }
    patch
}

/// Multi-select popup for one facet, with fuzzy search over the vocabulary.
#[derive(Debug, Clone)]
pub struct FacetPicker {
    pub field: FilterField,
    /// `(value, label)` pairs in vocabulary order.
    pub options: Vec<(String, String)>,
    pub chosen: BTreeSet<String>,
    pub query: String,
    pub cursor: usize,
}

impl FacetPicker {
    pub fn open(field: FilterField, filters: &FilterState, lookups: &Lookups) -> Option<Self> {
        let (options, chosen): (Vec<(String, String)>, BTreeSet<String>) = match field {
            FilterField::Countries => (pairs(&lookups.countries), filters.countries.clone()),
            FilterField::Regions => (pairs(&lookups.regions), filters.regions.clone()),
            FilterField::Adm1 => (pairs(&lookups.adm1), filters.adm1.clone()),
            FilterField::SidesA => (pairs(&lookups.sides_a), filters.sides_a.clone()),
            FilterField::SidesB => (pairs(&lookups.sides_b), filters.sides_b.clone()),
            FilterField::ViolenceTypes => (
                ViolenceType::ALL
                    .into_iter()
                    .map(|kind| (kind.code().to_string(), lookups.violence_label(kind)))
                    .collect(),
                filters
                    .violence_types
                    .iter()
                    .map(|kind| kind.code().to_string())
                    .collect(),
            ),
            _ => return None,
        };

        Some(Self {
            field,
            options,
            chosen,
            query: String::new(),
            cursor: 0,
        })
    }

    /// Options matching the query, best match first.
    pub fn visible(&self) -> Vec<&(String, String)> {
        let query = self.query.trim();
        if query.is_empty() {
            return self.options.iter().collect();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, &(String, String))> = self
            .options
            .iter()
            .filter_map(|option| {
                matcher
                    .fuzzy_match(&option.1, query)
                    .map(|score| (score, option))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, option)| option).collect()
    }

    pub fn toggle_current(&mut self) {
        let Some(value) = self.visible().get(self.cursor).map(|option| option.0.clone()) else {
            return;
        };
        if !self.chosen.remove(&value) {
            self.chosen.insert(value);
        }
    }

    pub fn push_query(&mut self, ch: char) {
        self.query.push(ch);
        self.cursor = 0;
    }

    pub fn pop_query(&mut self) {
        self.query.pop();
        self.cursor = 0;
    }

    pub fn patch(&self) -> FilterPatch {
        if self.field == FilterField::ViolenceTypes {
            let kinds = self
                .chosen
                .iter()
                .filter_map(|code| ViolenceType::parse(code))
                .collect();
            return FilterPatch::violence_types(kinds);
        }
        facet_patch(self.field, self.chosen.clone())
    }
}

fn pairs(values: &[String]) -> Vec<(String, String)> {
    values
        .iter()
        .map(|value| (value.clone(), value.clone()))
        .collect()
}

/// Free-text entry for dates and death bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    pub field: FilterField,
    pub buffer: String,
}

impl TextEntry {
    /// Parses the buffer into a patch; the error is shown in the status line.
    pub fn patch(&self, filters: &FilterState) -> Result<FilterPatch, String> {
        let value = self.buffer.trim();
        match self.field {
            FilterField::From | FilterField::To => {
                let date = parse_date(value)
                    .ok_or_else(|| FilterError::InvalidDate(value.to_string()).to_string())?;
                let range = if self.field == FilterField::From {
                    filters.date_range.with_from(date)
                } else {
                    filters.date_range.with_to(date)
                };
                range
                    .map(FilterPatch::date_range)
                    .map_err(|e| e.to_string())
            }
            FilterField::MinDeaths | FilterField::MaxDeaths => {
                let number = if value.is_empty() {
                    None
                } else {
                    Some(
                        value
                            .parse::<u32>()
                            .map_err(|_| format!("Invalid number {value:?}"))?,
                    )
                };
                let bounds = if self.field == FilterField::MinDeaths {
                    filters.deaths.with_min(number)
                } else {
                    filters.deaths.with_max(number)
                };
                bounds.map(FilterPatch::deaths).map_err(|e| e.to_string())
            }
            _ => Err(format!("{} is not a text field", self.field.label())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEdit {
    Text(TextEntry),
    Picker(FilterField),
}

#[derive(Debug, Clone, Default)]
pub struct FilterPanel {
    pub visible: bool,
    pub focused: bool,
    pub selected: usize,
    pub picker: Option<FacetPicker>,
    pub text: Option<TextEntry>,
}

impl FilterPanel {
    pub fn field(&self) -> FilterField {
        FilterField::from_index(self.selected).unwrap_or(FilterField::From)
    }

    pub const fn is_editing(&self) -> bool {
        self.picker.is_some() || self.text.is_some()
    }

    /// What Enter on the selected field should do.
    pub fn begin_edit(&self, filters: &FilterState) -> Option<PanelEdit> {
        let field = self.field();
        if field.is_facet() {
            return Some(PanelEdit::Picker(field));
        }
        if field.is_text() {
            let buffer = match field {
                FilterField::From => filters.date_range.from().to_string(),
                FilterField::To => filters.date_range.to().to_string(),
                FilterField::MinDeaths => filters.deaths.min().map(|n| n.to_string()).unwrap_or_default(),
                FilterField::MaxDeaths => filters.deaths.max().map(|n| n.to_string()).unwrap_or_default(),
                _ => String::new(),
            };
            return Some(PanelEdit::Text(TextEntry { field, buffer }));
        }
        None
    }

    /// Patch for fields that cycle through a small closed set instead of being edited.
    pub fn cycle(&self, filters: &FilterState) -> Option<FilterPatch> {
        match self.field() {
            FilterField::HasCivilians => {
                let next = match filters.has_civilians {
                    None => Some(true),
                    Some(true) => Some(false),
                    Some(false) => None,
                };
                Some(FilterPatch::has_civilians(next))
            }
            FilterField::ClarityMin => {
                let max = filters.clarity.max();
                let next = next_clarity_within(filters.clarity.min(), None, max);
                Some(FilterPatch::clarity(Bounds::ordered(next, max)))
            }
            FilterField::ClarityMax => {
                let min = filters.clarity.min();
                let next = next_clarity_within(filters.clarity.max(), min, None);
                Some(FilterPatch::clarity(Bounds::ordered(min, next)))
            }
            _ => None,
        }
    }
}

fn next_clarity(current: Option<Clarity>) -> Option<Clarity> {
    match current {
        None => Some(Clarity::High),
        Some(Clarity::High) => Some(Clarity::Medium),
        Some(Clarity::Medium) => Some(Clarity::Low),
        Some(Clarity::Low) => None,
    }
}

/// Next clarity in the cycle that keeps `lo <= value <= hi`; unset always qualifies.
fn next_clarity_within(
    current: Option<Clarity>,
    lo: Option<Clarity>,
    hi: Option<Clarity>,
) -> Option<Clarity> {
    let mut next = next_clarity(current);
    while let Some(value) = next {
        let above_lo = !matches!(lo, Some(lo) if value < lo);
        let below_hi = !matches!(hi, Some(hi) if value > hi);
        if above_lo && below_hi {
            break;
        }
        next = next_clarity(next);
    }
    next
}
