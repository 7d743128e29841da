// Library half of the dashboard: filter state, query codec, fetch scheduling, API access.
pub mod api;
pub mod bus;
pub mod config;
pub mod domain;
pub mod fetch;
pub mod filters;
pub mod logging;
pub mod stats;

pub use domain::{Clarity, ViolenceType};
pub use filters::{FilterPatch, FilterState, FilterStore};
