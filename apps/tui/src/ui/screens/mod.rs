pub mod analytics;
pub mod details;
pub mod events;
pub mod explore;
pub mod filters;
pub mod header;
pub mod help;
pub mod regions;
pub mod timeline;
