use anyhow::bail;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::site::Site;

/// Days the provider needs before data for a date is final.
pub const REPORTING_LAG_DAYS: i64 = 2;

/// Latest date with finalized data as of `today`.
pub fn latest_final_date(today: NaiveDate) -> NaiveDate {
    today - Duration::days(REPORTING_LAG_DAYS)
}

/// Inclusive date window. Invariant: `start <= end <= today - 2 days`,
/// upheld by the date resolver that produces every instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Search surface the provider can segment by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchType {
    Web,
    Image,
    Video,
    Discover,
    GoogleNews,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Image => "image",
            Self::Video => "video",
            Self::Discover => "discover",
            Self::GoogleNews => "googleNews",
        }
    }
}

impl FromStr for SearchType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "web" => Ok(Self::Web),
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "discover" => Ok(Self::Discover),
            "googleNews" => Ok(Self::GoogleNews),
            other => bail!(
                "Invalid search type `{other}`. Must be one of: web, image, video, discover, googleNews"
            ),
        }
    }
}

/// Row aggregation the provider applies before returning data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregationType {
    Auto,
    ByPage,
    ByQuery,
    ByNewsShowcasePanel,
}

impl AggregationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::ByPage => "byPage",
            Self::ByQuery => "byQuery",
            Self::ByNewsShowcasePanel => "byNewsShowcasePanel",
        }
    }
}

impl FromStr for AggregationType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "auto" => Ok(Self::Auto),
            "byPage" => Ok(Self::ByPage),
            "byQuery" => Ok(Self::ByQuery),
            "byNewsShowcasePanel" => Ok(Self::ByNewsShowcasePanel),
            other => bail!(
                "Invalid aggregation type `{other}`. Must be one of: auto, byPage, byQuery, byNewsShowcasePanel"
            ),
        }
    }
}

/// Fully bound analytics query. Constructed only by the command assembler
/// once the site and date range resolutions have both succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    pub site: Site,
    pub range: DateRange,
    /// Unique, order matters: dimension `i` binds to raw key index `i`.
    pub dimensions: Vec<String>,
    pub search_type: Option<SearchType>,
    pub aggregation_type: Option<AggregationType>,
    pub row_limit: usize,
}
