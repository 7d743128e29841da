// Filter state, its query-string codec, and the store that publishes snapshots.

pub mod query;
pub mod state;
pub mod store;

pub use state::{Bounds, DateRange, FilterError, FilterPatch, FilterState};
pub use store::{AddressBar, FilterStore, FilterSubscriber, Location};
