use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::site::Site;

/// One normalized analytics row: the declared dimensions flattened to
/// name/value pairs plus the four fixed metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsRow {
    #[serde(flatten)]
    pub keys: Map<String, Value>,
    pub clicks: u64,
    pub impressions: u64,
    pub ctr: f64,
    pub position: f64,
}

/// Flat, bounded result of one query. Superseded, never merged, by the
/// next successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    pub rows: Vec<AnalyticsRow>,
    #[serde(rename = "responseAggregationType")]
    pub aggregation_type: String,
    #[serde(rename = "totalFetched")]
    pub total_fetched: usize,
}

/// JSON shape for the `list-sites` action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteList {
    pub sites: Vec<Site>,
    #[serde(rename = "totalSites")]
    pub total_sites: usize,
}

impl SiteList {
    pub fn new(sites: Vec<Site>) -> Self {
        let total_sites = sites.len();
        Self { sites, total_sites }
    }
}
