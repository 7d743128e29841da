pub mod analytics;
pub mod env;

pub use analytics::{AnalyticsEmbed, AnalyticsReport, EmbedTarget};
pub use env::{AppConfig, ConfigError, DataSourceConfig, DEFAULT_LOG_FILE};
