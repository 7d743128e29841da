pub mod lookup;
pub mod orchestrator;

pub use lookup::{LookupCache, LookupStatus};
pub use orchestrator::{FetchConfig, FetchOrchestrator, FetchResult, FetchStatus, FilterFeed};
