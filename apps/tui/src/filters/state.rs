use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use thiserror::Error;

use crate::domain::{Clarity, ViolenceType};

/// Length of the default date window, counted back from today.
pub const DEFAULT_WINDOW_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("date range starts after it ends: {from} > {to}")]
    InvertedDateRange { from: NaiveDate, to: NaiveDate },

    #[error("range minimum {min} is greater than maximum {max}")]
    InvertedBounds { min: String, max: String },

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Inclusive calendar date range with `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, FilterError> {
        if from > to {
            return Err(FilterError::InvertedDateRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// Builds a range from two dates in any order.
    pub fn ordered(a: NaiveDate, b: NaiveDate) -> Self {
        Self {
            from: a.min(b),
            to: a.max(b),
        }
    }

    pub fn last_365_days(today: NaiveDate) -> Self {
        Self {
            from: today - Duration::days(DEFAULT_WINDOW_DAYS),
            to: today,
        }
    }

    pub const fn from(&self) -> NaiveDate {
        self.from
    }

    pub const fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn with_from(self, from: NaiveDate) -> Result<Self, FilterError> {
        Self::new(from, self.to)
    }

    pub fn with_to(self, to: NaiveDate) -> Result<Self, FilterError> {
        Self::new(self.from, to)
    }
}

/// Optional lower and upper bound; `min <= max` when both are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds<T> {
    min: Option<T>,
    max: Option<T>,
}

impl<T: Copy + PartialOrd + std::fmt::Display> Bounds<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Result<Self, FilterError> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(FilterError::InvertedBounds {
                    min: lo.to_string(),
                    max: hi.to_string(),
                });
            }
        }
        Ok(Self { min, max })
    }

    /// Same as [`Bounds::new`] but swaps an inverted pair instead of failing.
    pub fn ordered(min: Option<T>, max: Option<T>) -> Self {
        match (min, max) {
            (Some(lo), Some(hi)) if lo > hi => Self {
                min: Some(hi),
                max: Some(lo),
            },
            _ => Self { min, max },
        }
    }

    pub fn with_min(self, min: Option<T>) -> Result<Self, FilterError> {
        Self::new(min, self.max)
    }

    pub fn with_max(self, max: Option<T>) -> Result<Self, FilterError> {
        Self::new(self.min, max)
    }
}

impl<T: Copy> Bounds<T> {
    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    pub const fn min(&self) -> Option<T> {
        self.min
    }

    pub const fn max(&self) -> Option<T> {
        self.max
    }

    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

impl<T: Copy> Default for Bounds<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// The query the user is constructing.
///
/// Values are never mutated once shared: the store hands out `Arc` snapshots and
/// builds a fresh value for every update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub date_range: DateRange,
    pub countries: BTreeSet<String>,
    pub regions: BTreeSet<String>,
    pub adm1: BTreeSet<String>,
    pub violence_types: BTreeSet<ViolenceType>,
    pub sides_a: BTreeSet<String>,
    pub sides_b: BTreeSet<String>,
    pub deaths: Bounds<u32>,
    pub has_civilians: Option<bool>,
    pub clarity: Bounds<Clarity>,
}

impl FilterState {
    pub fn default_for(today: NaiveDate) -> Self {
        Self {
            date_range: DateRange::last_365_days(today),
            countries: BTreeSet::new(),
            regions: BTreeSet::new(),
            adm1: BTreeSet::new(),
            violence_types: BTreeSet::new(),
            sides_a: BTreeSet::new(),
            sides_b: BTreeSet::new(),
            deaths: Bounds::unbounded(),
            has_civilians: None,
            clarity: Bounds::unbounded(),
        }
    }

    /// Shallow-merges `patch` over this state. Fields absent from the patch are kept.
    pub fn merged(&self, patch: FilterPatch) -> Self {
        Self {
            date_range: patch.date_range.unwrap_or(self.date_range),
            countries: merge_names(patch.countries, &self.countries),
            regions: merge_names(patch.regions, &self.regions),
            adm1: merge_names(patch.adm1, &self.adm1),
            violence_types: patch
                .violence_types
                .unwrap_or_else(|| self.violence_types.clone()),
            sides_a: merge_names(patch.sides_a, &self.sides_a),
            sides_b: merge_names(patch.sides_b, &self.sides_b),
            deaths: patch.deaths.unwrap_or(self.deaths),
            has_civilians: patch.has_civilians.unwrap_or(self.has_civilians),
            clarity: patch.clarity.unwrap_or(self.clarity),
        }
    }

    pub fn is_default_for(&self, today: NaiveDate) -> bool {
        *self == Self::default_for(today)
    }

    /// Number of constraints beyond the date window, for the panel badge.
    pub fn active_filter_count(&self) -> usize {
        let sets = [
            &self.countries,
            &self.regions,
            &self.adm1,
            &self.sides_a,
            &self.sides_b,
        ]
        .iter()
        .filter(|set| !set.is_empty())
        .count();

        sets + usize::from(!self.violence_types.is_empty())
            + usize::from(!self.deaths.is_unbounded())
            + usize::from(self.has_civilians.is_some())
            + usize::from(!self.clarity.is_unbounded())
    }
}

/// Normalizes a facet name; `None` for names that carry no value.
pub fn normalize_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn merge_names(patch: Option<BTreeSet<String>>, current: &BTreeSet<String>) -> BTreeSet<String> {
    patch.map_or_else(
        || current.clone(),
        |names| names.iter().filter_map(|name| normalize_name(name)).collect(),
    )
}

/// A partial update; `None` leaves the field untouched.
///
/// `has_civilians` is doubly optional so a patch can clear the flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub date_range: Option<DateRange>,
    pub countries: Option<BTreeSet<String>>,
    pub regions: Option<BTreeSet<String>>,
    pub adm1: Option<BTreeSet<String>>,
    pub violence_types: Option<BTreeSet<ViolenceType>>,
    pub sides_a: Option<BTreeSet<String>>,
    pub sides_b: Option<BTreeSet<String>>,
    pub deaths: Option<Bounds<u32>>,
    pub has_civilians: Option<Option<bool>>,
    pub clarity: Option<Bounds<Clarity>>,
}

impl FilterPatch {
    pub fn date_range(range: DateRange) -> Self {
        Self {
            date_range: Some(range),
            ..Self::default()
        }
    }

    pub fn countries<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            countries: Some(names.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn deaths(bounds: Bounds<u32>) -> Self {
        Self {
            deaths: Some(bounds),
            ..Self::default()
        }
    }

    pub fn has_civilians(value: Option<bool>) -> Self {
        Self {
            has_civilians: Some(value),
            ..Self::default()
        }
    }

    pub fn clarity(bounds: Bounds<Clarity>) -> Self {
        Self {
            clarity: Some(bounds),
            ..Self::default()
        }
    }

    pub fn violence_types(types: BTreeSet<ViolenceType>) -> Self {
        Self {
            violence_types: Some(types),
            ..Self::default()
        }
    }
}
