use super::client::ApiClient;
use super::demo;
use super::error::ApiError;
use super::models::{ConflictEvent, HeatCell, Lookups, Page, RegionAgg, TimePoint};
use crate::filters::FilterState;

/// Where dashboard data comes from.
///
/// `Demo` is chosen once at startup when the API is not configured. A configured API that
/// fails at runtime reports errors; it never silently switches to demo data.
#[derive(Debug, Clone)]
pub enum DataSource {
    Remote(ApiClient),
    Demo { reason: String },
}

impl DataSource {
    pub const fn is_demo(&self) -> bool {
        matches!(self, Self::Demo { .. })
    }

    /// Banner text for the header, if any.
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::Remote(_) => None,
            Self::Demo { reason } => Some(format!("Demo data: {reason}")),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Remote(client) => client.base_url().to_string(),
            Self::Demo { .. } => "built-in demo data".to_string(),
        }
    }

    pub async fn events(
        &self,
        filters: &FilterState,
        page: u32,
        page_size: u32,
    ) -> Result<Page<ConflictEvent>, ApiError> {
        match self {
            Self::Remote(client) => client.events(filters, page, page_size).await,
            Self::Demo { .. } => Ok(demo::event_page(page, page_size)),
        }
    }

    pub async fn event(&self, id: &str) -> Result<ConflictEvent, ApiError> {
        match self {
            Self::Remote(client) => client.event(id).await,
            Self::Demo { .. } => demo::events()
                .into_iter()
                .find(|event| event.id == id)
                .ok_or_else(|| ApiError::NotFound(format!("event {id}"))),
        }
    }

    pub async fn lookups(&self) -> Result<Lookups, ApiError> {
        match self {
            Self::Remote(client) => client.lookups().await,
            Self::Demo { .. } => Ok(demo::lookups()),
        }
    }

    pub async fn series(&self, filters: &FilterState) -> Result<Vec<TimePoint>, ApiError> {
        match self {
            Self::Remote(client) => client.series(filters).await,
            Self::Demo { .. } => Ok(demo::series()),
        }
    }

    pub async fn regions(&self, filters: &FilterState) -> Result<Vec<RegionAgg>, ApiError> {
        match self {
            Self::Remote(client) => client.regions(filters).await,
            Self::Demo { .. } => Ok(demo::regions()),
        }
    }

    pub async fn heat(&self, filters: &FilterState) -> Result<Vec<HeatCell>, ApiError> {
        match self {
            Self::Remote(client) => client.heat(filters).await,
            Self::Demo { .. } => Ok(demo::heat()),
        }
    }
}
