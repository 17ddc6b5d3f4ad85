//! Combines the assistant's proposed action with the resolver outputs into
//! a final, fully-specified query. This is the single point where an
//! assistant-suggested command is allowed to reach execution.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{dates, parser::ProposedAction, sites, sites::SiteResolution, ui};
use crate::models::{AnalyticsQuery, Site};

static PAGE_MENTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(p[áa]gina|page|ruta|route|url)\b").expect("page-mention pattern")
});

static PAGE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s]+").expect("page-url pattern"));

/// Result of assembling a proposed action.
#[derive(Debug, Clone, PartialEq)]
pub enum Assembly {
    ListSites,
    /// A fully bound query, plus any notes the caller should surface
    /// (scope relaxations, discarded hints).
    Query {
        query: AnalyticsQuery,
        notes: Vec<String>,
    },
    /// Site resolution did not produce a concrete site; execution pauses
    /// until the caller obtains a disambiguated choice.
    Unresolved(SiteResolution),
    Prose(String),
}

/// Assembles the final query from the assistant's proposal.
///
/// The proposal contributes only the action type, dimensions, and
/// type/aggregation hints. The site candidate goes through the site
/// resolver against the authoritative list, and the date window is
/// re-derived from the user's original question.
pub fn assemble(
    action: ProposedAction,
    question: &str,
    active_site: Option<&Site>,
    known_sites: &[Site],
    today: NaiveDate,
    default_row_limit: usize,
) -> Assembly {
    let proposed = match action {
        ProposedAction::Prose(text) => return Assembly::Prose(text),
        ProposedAction::ListSites => return Assembly::ListSites,
        ProposedAction::SearchAnalytics(proposed) => proposed,
    };

    let candidate = proposed
        .site
        .clone()
        .or_else(|| active_site.map(|site| site.url.clone()));
    let site = match sites::resolve(candidate.as_deref(), known_sites) {
        SiteResolution::Resolved(site) => site,
        unresolved => return Assembly::Unresolved(unresolved),
    };

    let range = dates::resolve(question, today);
    let mut notes = Vec::new();

    let mut dimensions = dedup_preserving_order(proposed.dimensions);
    if PAGE_MENTION.is_match(question) {
        if !dimensions.iter().any(|dimension| dimension == "page") {
            dimensions.push("page".to_string());
        }
        if !PAGE_URL.is_match(question) {
            notes.push(ui::whole_domain_note());
        }
    }

    let search_type = match proposed.search_type.as_deref() {
        Some(raw) => match raw.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                tracing::warn!(hint = raw, "discarding invalid search-type hint");
                notes.push(ui::discarded_hint_note("search type", raw));
                None
            }
        },
        None => None,
    };
    let aggregation_type = match proposed.aggregation_type.as_deref() {
        Some(raw) => match raw.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                tracing::warn!(hint = raw, "discarding invalid aggregation-type hint");
                notes.push(ui::discarded_hint_note("aggregation type", raw));
                None
            }
        },
        None => None,
    };

    let row_limit = proposed.row_limit.unwrap_or(default_row_limit).max(1);

    Assembly::Query {
        query: AnalyticsQuery {
            site,
            range,
            dimensions,
            search_type,
            aggregation_type,
            row_limit,
        },
        notes,
    }
}

fn dedup_preserving_order(dimensions: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for dimension in dimensions {
        if !seen.contains(&dimension) {
            seen.push(dimension);
        }
    }
    seen
}
