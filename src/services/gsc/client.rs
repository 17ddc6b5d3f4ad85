//! Blocking REST client for the Search Console API.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::form_urlencoded;

use super::auth::{ServiceAccountKey, TokenProvider};
use super::{AnalyticsPage, AnalyticsProvider, PageRequest};
use crate::models::Site;

const API_BASE: &str = "https://www.googleapis.com/webmasters/v3";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Client for the Search Console API, authenticated with a service account.
pub struct GscClient {
    http: Client,
    tokens: TokenProvider,
}

impl GscClient {
    /// Builds a client from a service-account credentials file.
    pub fn new(credentials_path: &Path) -> Result<Self> {
        let key = ServiceAccountKey::from_file(credentials_path)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client for Search Console")?;
        Ok(Self {
            http,
            tokens: TokenProvider::new(key)?,
        })
    }

    fn bearer(&self) -> Result<String> {
        self.tokens.access_token(&self.http)
    }

    /// Reads an error message out of the provider's JSON error envelope,
    /// falling back to the raw body.
    fn provider_error(status: reqwest::StatusCode, body: &str) -> anyhow::Error {
        #[derive(Deserialize)]
        struct Envelope {
            error: ErrorBody,
        }
        #[derive(Deserialize)]
        struct ErrorBody {
            message: String,
        }
        match serde_json::from_str::<Envelope>(body) {
            Ok(envelope) => anyhow::anyhow!("Provider returned {status}: {}", envelope.error.message),
            Err(_) => anyhow::anyhow!("Provider returned {status}: {body}"),
        }
    }
}

impl AnalyticsProvider for GscClient {
    fn list_sites(&self) -> Result<Vec<Site>> {
        let token = self.bearer()?;
        tracing::debug!("listing Search Console sites");
        let response = self
            .http
            .get(format!("{API_BASE}/sites"))
            .bearer_auth(token)
            .send()
            .context("Site listing request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Self::provider_error(status, &body));
        }

        #[derive(Deserialize)]
        struct SiteListResponse {
            #[serde(rename = "siteEntry", default)]
            site_entry: Vec<SiteEntry>,
        }
        #[derive(Deserialize)]
        struct SiteEntry {
            #[serde(rename = "siteUrl", default)]
            site_url: String,
            #[serde(rename = "permissionLevel", default)]
            permission_level: String,
        }

        let body: SiteListResponse = response
            .json()
            .context("Failed to decode site listing response")?;
        Ok(body
            .site_entry
            .into_iter()
            .map(|entry| Site::new(entry.site_url, entry.permission_level))
            .collect())
    }

    fn query_page(&self, request: &PageRequest) -> Result<AnalyticsPage> {
        let token = self.bearer()?;
        let body = QueryBody::from(request);
        let encoded_site: String =
            form_urlencoded::byte_serialize(request.site_url.as_bytes()).collect();
        let url = format!("{API_BASE}/sites/{encoded_site}/searchAnalytics/query");

        tracing::debug!(
            site = %request.site_url,
            start_row = request.start_row,
            page_size = request.row_limit,
            "querying search analytics page"
        );
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .context("Search analytics request failed")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(Self::provider_error(status, &text));
        }
        response
            .json()
            .context("Failed to decode search analytics response")
    }
}

/// Wire body for `searchAnalytics/query`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryBody {
    start_date: String,
    end_date: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dimensions: Vec<String>,
    row_limit: usize,
    start_row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aggregation_type: Option<String>,
}

impl From<&PageRequest> for QueryBody {
    fn from(request: &PageRequest) -> Self {
        Self {
            start_date: request.start_date.format("%Y-%m-%d").to_string(),
            end_date: request.end_date.format("%Y-%m-%d").to_string(),
            dimensions: request.dimensions.clone(),
            row_limit: request.row_limit,
            start_row: request.start_row,
            search_type: request.search_type.map(|t| t.as_str().to_string()),
            aggregation_type: request.aggregation_type.map(|a| a.as_str().to_string()),
        }
    }
}

/// Rejects anything that is not a `YYYY-MM-DD` calendar date. Used at the
/// string boundary (CLI flags) before a date can reach the provider.
pub fn parse_wire_date(value: &str) -> Result<chrono::NaiveDate> {
    match chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => bail!("Dates must be in YYYY-MM-DD format, got `{value}`"),
    }
}
