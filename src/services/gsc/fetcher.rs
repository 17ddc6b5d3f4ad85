//! Drives the provider across as many page requests as needed, enforces the
//! global row limit, and normalizes keyed rows into flat records.

use anyhow::Result;
use serde_json::{Map, Value};

use super::{AnalyticsProvider, PageRequest, RawRow};
use crate::models::{AnalyticsQuery, AnalyticsResult, AnalyticsRow};

/// Hard per-request row cap imposed by the provider.
pub const PROVIDER_MAX_PAGE_SIZE: usize = 25_000;

/// Stateless pagination driver. The page-size cap is parameterized so tests
/// can exercise multi-page loops with small fixtures.
#[derive(Debug, Clone, Copy)]
pub struct PaginatedAnalyticsFetcher {
    max_page_size: usize,
}

impl Default for PaginatedAnalyticsFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginatedAnalyticsFetcher {
    pub fn new() -> Self {
        Self {
            max_page_size: PROVIDER_MAX_PAGE_SIZE,
        }
    }

    pub fn with_max_page_size(max_page_size: usize) -> Self {
        Self { max_page_size }
    }

    /// Fetches up to `query.row_limit` rows. With `fetch_all` unset, a
    /// single page is requested regardless of the limit; otherwise pages
    /// are requested until the provider returns a short page or the limit
    /// is reached. The query is never mutated; a fresh result is returned
    /// on every call.
    pub fn fetch<P: AnalyticsProvider + ?Sized>(
        &self,
        provider: &P,
        query: &AnalyticsQuery,
        fetch_all: bool,
    ) -> Result<AnalyticsResult> {
        let page_size = query.row_limit.min(self.max_page_size);
        let mut raw_rows: Vec<RawRow> = Vec::new();
        let mut start_row = 0usize;
        let mut aggregation_type = String::new();

        loop {
            let page = provider.query_page(&PageRequest {
                site_url: query.site.url.clone(),
                start_date: query.range.start,
                end_date: query.range.end,
                dimensions: query.dimensions.clone(),
                search_type: query.search_type,
                aggregation_type: query.aggregation_type,
                row_limit: page_size,
                start_row,
            })?;

            let fetched = page.rows.len();
            tracing::debug!(start_row, fetched, "fetched analytics page");
            if let Some(kind) = page.response_aggregation_type {
                aggregation_type = kind;
            }
            raw_rows.extend(page.rows);

            if !fetch_all || fetched < page_size || raw_rows.len() >= query.row_limit {
                break;
            }
            start_row += fetched;
        }

        // The last page may overshoot the limit.
        raw_rows.truncate(query.row_limit);

        let rows: Vec<AnalyticsRow> = raw_rows
            .iter()
            .map(|raw| normalize_row(raw, &query.dimensions))
            .collect();
        let total_fetched = rows.len();
        Ok(AnalyticsResult {
            rows,
            aggregation_type,
            total_fetched,
        })
    }
}

/// Binds raw keys to dimension names by position. A raw row shorter than
/// the dimension list is not a format error: trailing dimensions are left
/// unpopulated, and surplus keys are ignored.
pub fn normalize_row(raw: &RawRow, dimensions: &[String]) -> AnalyticsRow {
    let mut keys = Map::new();
    for (dimension, key) in dimensions.iter().zip(raw.keys.iter()) {
        keys.insert(dimension.clone(), Value::String(key.clone()));
    }
    AnalyticsRow {
        keys,
        clicks: raw.clicks as u64,
        impressions: raw.impressions as u64,
        ctr: raw.ctr,
        position: raw.position,
    }
}
