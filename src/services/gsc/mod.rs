//! The Search Console provider boundary: the trait the session fetches
//! through, the wire row shapes, and the paginated fetcher that turns
//! keyed pages into a flat, bounded result.

pub mod auth;
pub mod client;
pub mod fetcher;

pub use client::GscClient;
pub use fetcher::PaginatedAnalyticsFetcher;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{AggregationType, SearchType, Site};

/// One page request against the provider. Dates serialize as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRequest {
    pub site_url: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub dimensions: Vec<String>,
    pub search_type: Option<SearchType>,
    pub aggregation_type: Option<AggregationType>,
    /// Page size for this request, already capped by the provider maximum.
    pub row_limit: usize,
    pub start_row: usize,
}

/// Raw keyed row as returned by the provider. Metrics default to zero when
/// absent; `keys` may be shorter than the requested dimension list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub clicks: f64,
    #[serde(default)]
    pub impressions: f64,
    #[serde(default)]
    pub ctr: f64,
    #[serde(default)]
    pub position: f64,
}

/// One page of provider output.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsPage {
    #[serde(default)]
    pub rows: Vec<RawRow>,
    #[serde(rename = "responseAggregationType", default)]
    pub response_aggregation_type: Option<String>,
}

/// Remote analytics provider: one site listing plus one paged query
/// operation. Implementations perform a single attempt per call; retries
/// are intentionally not part of this boundary.
pub trait AnalyticsProvider {
    fn list_sites(&self) -> Result<Vec<Site>>;
    fn query_page(&self, request: &PageRequest) -> Result<AnalyticsPage>;
}

impl<T: AnalyticsProvider + ?Sized> AnalyticsProvider for &T {
    fn list_sites(&self) -> Result<Vec<Site>> {
        (**self).list_sites()
    }

    fn query_page(&self, request: &PageRequest) -> Result<AnalyticsPage> {
        (**self).query_page(request)
    }
}
