//! Per-session turn state and its transition rules.
//!
//! The state is a tuple of independent fields mutated turn by turn, but the
//! transitions follow fixed rules and are exposed as small methods so the
//! state machine can be tested without simulating an interactive loop.
//! Nothing here is persisted; the state dies with the process.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::{AnalyticsResult, DateRange, Site};

/// How answers are rendered back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    Text,
    Json,
    Both,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Both => "both",
        }
    }
}

impl FromStr for OutputMode {
    type Err = ();

    /// Accepts the English mode names plus the Spanish aliases the original
    /// interface used.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "text" | "texto" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "both" | "ambos" => Ok(Self::Both),
            _ => Err(()),
        }
    }
}

/// Whether a turn needs a fresh remote fetch or can reuse the cached result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDecision {
    Fetch(FetchReason),
    Reuse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchReason {
    SiteChanged,
    RangeChanged,
    NoCachedResult,
}

/// In-memory session state: output mode, active site, and the last
/// question/range/result of the most recent successful fetch.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub mode: OutputMode,
    pub active_site: Option<Site>,
    pub last_result: Option<AnalyticsResult>,
    pub last_question: Option<String>,
    pub last_range: Option<DateRange>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Text,
            active_site: None,
            last_result: None,
            last_question: None,
            last_range: None,
        }
    }

    /// Sets the output mode and clears the active site, forcing the user to
    /// re-confirm scope on the next query.
    pub fn switch_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
        self.active_site = None;
    }

    /// Scans the raw user text for a recognizable form of any known site
    /// (full URL, bare host, or domain-property token). When a different
    /// site than the active one is mentioned, switches to it and clears the
    /// cached result, returning the newly active site.
    pub fn note_site_mention(&mut self, input: &str, known_sites: &[Site]) -> Option<Site> {
        for site in known_sites {
            let bare = site.bare_host();
            let mentioned = input.contains(&site.url) || (!bare.is_empty() && input.contains(bare));
            if !mentioned {
                continue;
            }
            if self.active_site.as_ref() == Some(site) {
                return None;
            }
            return Some(self.adopt_site_inner(site.clone()));
        }
        None
    }

    /// Makes `site` the active scope. When this changes the scope, cached
    /// results from the previous site are dropped (stale results must not
    /// be shown under a changed scope). Returns true when the scope changed.
    pub fn adopt_site(&mut self, site: Site) -> bool {
        if self.active_site.as_ref() == Some(&site) {
            return false;
        }
        self.adopt_site_inner(site);
        true
    }

    fn adopt_site_inner(&mut self, site: Site) -> Site {
        self.active_site = Some(site.clone());
        self.last_result = None;
        self.last_range = None;
        site
    }

    /// The session's only caching rule: fetch when the site just changed,
    /// the resolved range differs from the last one, or nothing is cached;
    /// otherwise the cached result may be reused for follow-ups.
    pub fn fetch_decision(&self, site_changed: bool, range: DateRange) -> FetchDecision {
        if site_changed {
            return FetchDecision::Fetch(FetchReason::SiteChanged);
        }
        if self.last_range != Some(range) {
            return FetchDecision::Fetch(FetchReason::RangeChanged);
        }
        if self.last_result.is_none() {
            return FetchDecision::Fetch(FetchReason::NoCachedResult);
        }
        FetchDecision::Reuse
    }

    /// Supersedes (never merges) the cached result after a successful fetch.
    pub fn absorb_result(&mut self, question: &str, range: DateRange, result: AnalyticsResult) {
        self.last_result = Some(result);
        self.last_range = Some(range);
        self.last_question = Some(question.to_string());
    }

    pub fn record_question(&mut self, question: &str) {
        self.last_question = Some(question.to_string());
    }
}
