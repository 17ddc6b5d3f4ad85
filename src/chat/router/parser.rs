//! Classifies assistant replies into actionable commands or prose and
//! extracts candidate fields from the command syntax.
//!
//! Everything extracted here is a candidate, not ground truth: the site
//! goes through the site resolver, dates are discarded outright, and
//! type/aggregation hints are validated before use.

/// The assistant's reply, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum ProposedAction {
    ListSites,
    SearchAnalytics(ProposedQuery),
    /// Anything else: non-actionable explanation, relayed or answered via a
    /// follow-up explanation call, never executed.
    Prose(String),
}

/// Candidate fields extracted from a `search-analytics` command string.
/// Date flags are intentionally absent: the resolver re-derives the window
/// from the user's own question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProposedQuery {
    pub site: Option<String>,
    pub dimensions: Vec<String>,
    pub search_type: Option<String>,
    pub aggregation_type: Option<String>,
    pub row_limit: Option<usize>,
}

/// Classifies a raw assistant reply. Stray double quotes are stripped
/// before matching, as models tend to quote flag values.
pub fn classify(reply: &str) -> ProposedAction {
    let cleaned = reply.replace('"', "");
    let cleaned = cleaned.trim();
    if cleaned.starts_with("list-sites") {
        return ProposedAction::ListSites;
    }
    if let Some(rest) = cleaned.strip_prefix("search-analytics") {
        return ProposedAction::SearchAnalytics(parse_flags(rest));
    }
    ProposedAction::Prose(reply.trim().to_string())
}

fn parse_flags(rest: &str) -> ProposedQuery {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let mut query = ProposedQuery::default();
    let mut index = 0;
    while index < tokens.len() {
        let token = tokens[index];
        let (flag, mut value) = match token.split_once('=') {
            Some((flag, inline)) => (flag, Some(inline.to_string())),
            None => (token, None),
        };
        if value.is_none() && index + 1 < tokens.len() && !tokens[index + 1].starts_with("--") {
            value = Some(tokens[index + 1].to_string());
            index += 1;
        }
        match flag {
            "--site-url" => query.site = value,
            "--dimensions" => {
                if let Some(list) = value {
                    query.dimensions = list
                        .split(',')
                        .map(str::trim)
                        .filter(|entry| !entry.is_empty())
                        .map(str::to_string)
                        .collect();
                }
            }
            "--type" => query.search_type = value,
            "--aggregation-type" => query.aggregation_type = value,
            "--row-limit" => query.row_limit = value.and_then(|raw| raw.parse().ok()),
            // Assistant-proposed dates are discarded; the resolver owns the window.
            "--start-date" | "--end-date" => {}
            _ => {}
        }
        index += 1;
    }
    query
}
