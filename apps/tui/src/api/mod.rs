pub mod client;
pub mod demo;
pub mod error;
pub mod models;
pub mod source;

pub use client::ApiClient;
pub use error::ApiError;
pub use models::{
    ConflictEvent, HeatCell, LookupOption, Lookups, Page, RegionAgg, SeriesTotals, TimePoint,
};
pub use source::DataSource;
