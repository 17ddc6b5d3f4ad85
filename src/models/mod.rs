pub mod analytics;
pub mod query;
pub mod site;

pub use analytics::{AnalyticsResult, AnalyticsRow, SiteList};
pub use query::{
    latest_final_date, AggregationType, AnalyticsQuery, DateRange, SearchType, REPORTING_LAG_DAYS,
};
pub use site::Site;
