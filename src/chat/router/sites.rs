//! Maps a possibly partial, hallucinated, or missing site identifier onto
//! exactly one entry of the authoritative site list.
//!
//! The assistant may *suggest* a site, but a query only ever runs against a
//! property verifiably present in the list: a plausible-looking domain is
//! never substituted for a real one.

use crate::models::Site;

/// Outcome of resolving a site candidate against the known list.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteResolution {
    /// Exactly one authoritative entry matched.
    Resolved(Site),
    /// No candidate was supplied; the caller must ask the user to pick.
    NeedsSelection,
    /// A partial candidate matched more than one entry. Never auto-resolved.
    Ambiguous { candidate: String, matches: Vec<Site> },
    /// The candidate matches no known property.
    NotFound { candidate: String },
}

/// Resolves `candidate` against `known`.
///
/// A candidate containing a `.` is treated as a fully-qualified property
/// (URL or domain-property token) and looked up by exact identity. A
/// candidate without a `.` is treated as an informal name and substring
/// matched (case-sensitive, unanchored) against the property URLs.
pub fn resolve(candidate: Option<&str>, known: &[Site]) -> SiteResolution {
    let candidate = match candidate.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return SiteResolution::NeedsSelection,
    };

    if candidate.contains('.') {
        return match known.iter().find(|site| site.url == candidate) {
            Some(site) => SiteResolution::Resolved(site.clone()),
            None => SiteResolution::NotFound {
                candidate: candidate.to_string(),
            },
        };
    }

    let mut matches: Vec<Site> = known
        .iter()
        .filter(|site| site.url.contains(candidate))
        .cloned()
        .collect();
    match matches.len() {
        1 => SiteResolution::Resolved(matches.remove(0)),
        0 => SiteResolution::NotFound {
            candidate: candidate.to_string(),
        },
        _ => SiteResolution::Ambiguous {
            candidate: candidate.to_string(),
            matches,
        },
    }
}
