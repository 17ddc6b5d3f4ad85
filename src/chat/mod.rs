//! The interactive session: one turn at a time, strictly sequential.
//!
//! `ChatSession` owns the session state, the authoritative site list
//! (fetched once at start), and the two external boundaries (assistant,
//! analytics provider). It never performs terminal I/O: turns that need
//! user input suspend by returning an [`InteractionRequest`], and the
//! surrounding shell performs the prompt and feeds the choice back in.

pub mod router;
pub mod session;

use anyhow::Result;
use chrono::Local;
use uuid::Uuid;

use crate::config::FetchSettings;
use crate::models::{AnalyticsQuery, AnalyticsResult, Site, SiteList};
use crate::services::assistant::{prompt, Assistant};
use crate::services::gsc::{AnalyticsProvider, PaginatedAnalyticsFetcher};
use self::router::{sites::SiteResolution, ui, Assembly};
use self::session::{FetchDecision, OutputMode, SessionState};

const EXIT_KEYWORDS: &[&str] = &["salir", "exit", "quit"];

/// A suspension point: the session needs the user to pick a property
/// before any remote call can happen.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRequest {
    pub ticket_id: Uuid,
    pub prompt: String,
    pub options: Vec<Site>,
}

/// Rendered answer for one turn, shaped by the session's output mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnAnswer {
    /// Side notes to surface before the answer (scope changes, relaxations).
    pub notes: Vec<String>,
    pub json: Option<String>,
    pub explanation: Option<String>,
}

/// What one turn produced.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Empty input; nothing to do.
    Ignored,
    /// The user asked to end the session.
    Exit,
    /// A one-line status message (mode switches, turn-local failures).
    Notice(String),
    /// The turn paused: the shell must collect a site choice and call
    /// [`ChatSession::select_site`], then resubmit the same input.
    SelectSite(InteractionRequest),
    /// A data answer, rendered per the session's output mode.
    Answer(TurnAnswer),
    /// Assistant prose (non-actionable reply or follow-up explanation).
    Prose(String),
}

/// One interactive session against a fixed site list.
pub struct ChatSession<A: Assistant, P: AnalyticsProvider> {
    assistant: A,
    provider: P,
    fetcher: PaginatedAnalyticsFetcher,
    fetch: FetchSettings,
    sites: Vec<Site>,
    state: SessionState,
}

impl<A: Assistant, P: AnalyticsProvider> ChatSession<A, P> {
    /// Creates a session, fetching the authoritative site list once. The
    /// list is treated as read-only for the session's lifetime.
    pub fn new(assistant: A, provider: P, fetch: FetchSettings) -> Result<Self> {
        let sites = provider.list_sites()?;
        tracing::info!(site_count = sites.len(), "session started");
        Ok(Self {
            assistant,
            provider,
            fetcher: PaginatedAnalyticsFetcher::new(),
            fetch,
            sites,
            state: SessionState::new(),
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Applies an explicit site choice collected by the shell in response
    /// to a [`TurnOutcome::SelectSite`]. Returns the notice to display.
    pub fn select_site(&mut self, site: Site) -> String {
        let notice = ui::using_property_notice(&site.url);
        self.state.adopt_site(site);
        notice
    }

    /// Processes one turn of user input.
    pub fn handle_turn(&mut self, input: &str) -> Result<TurnOutcome> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(TurnOutcome::Ignored);
        }
        if EXIT_KEYWORDS.contains(&input.to_lowercase().as_str()) {
            return Ok(TurnOutcome::Exit);
        }
        if let Some(argument) = mode_argument(input) {
            return Ok(self.switch_mode(argument));
        }

        let mut notes = Vec::new();
        let mut site_changed = false;
        if let Some(site) = self.state.note_site_mention(input, &self.sites) {
            site_changed = true;
            notes.push(ui::using_property_notice(&site.url));
        }

        if self.sites.is_empty() {
            return Ok(TurnOutcome::Notice(ui::no_sites_message()));
        }
        let Some(active) = self.state.active_site.clone() else {
            return Ok(TurnOutcome::SelectSite(ui::site_interaction(
                &SiteResolution::NeedsSelection,
                &self.sites,
            )));
        };

        let user_text = format!("{}{input}", prompt::context_prefix(&active.url));
        let proposal = self
            .assistant
            .propose(&prompt::command_system_prompt(), &user_text)?;
        tracing::debug!(proposal = %proposal, "assistant proposal");

        let today = Local::now().date_naive();
        let assembly = router::assemble(
            router::classify(&proposal),
            input,
            Some(&active),
            &self.sites,
            today,
            self.fetch.row_limit,
        );
        match assembly {
            Assembly::Prose(text) => self.follow_up(input, text),
            Assembly::ListSites => self.answer_site_list(input, notes),
            Assembly::Unresolved(resolution) => Ok(TurnOutcome::SelectSite(ui::site_interaction(
                &resolution,
                &self.sites,
            ))),
            Assembly::Query {
                query,
                notes: query_notes,
            } => {
                notes.extend(query_notes);
                self.run_query(input, query, site_changed, notes)
            }
        }
    }

    fn switch_mode(&mut self, argument: &str) -> TurnOutcome {
        match argument.to_lowercase().parse::<OutputMode>() {
            Ok(mode) => {
                self.state.switch_mode(mode);
                TurnOutcome::Notice(ui::mode_switched_notice(mode))
            }
            Err(()) => TurnOutcome::Notice(ui::invalid_mode_notice()),
        }
    }

    fn run_query(
        &mut self,
        question: &str,
        query: AnalyticsQuery,
        mut site_changed: bool,
        notes: Vec<String>,
    ) -> Result<TurnOutcome> {
        // The resolver may have bound a different (but verified) property
        // than the current scope; adopting it invalidates the cache too.
        site_changed |= self.state.adopt_site(query.site.clone());
        let previous_question = self.state.last_question.clone();

        let result = match self.state.fetch_decision(site_changed, query.range) {
            FetchDecision::Fetch(reason) => {
                tracing::info!(?reason, range = %query.range, site = %query.site.url, "fetching analytics");
                match self.fetcher.fetch(&self.provider, &query, self.fetch.fetch_all) {
                    Ok(result) => {
                        self.state.absorb_result(question, query.range, result.clone());
                        result
                    }
                    Err(err) => {
                        // Turn-local failure: prior session state stays valid.
                        return Ok(TurnOutcome::Notice(ui::provider_failure_notice(&format!(
                            "{err:#}"
                        ))));
                    }
                }
            }
            FetchDecision::Reuse => {
                tracing::debug!("reusing cached result for follow-up");
                self.state.record_question(question);
                match self.state.last_result.clone() {
                    Some(result) => result,
                    // Reuse is only decided when a cached result exists.
                    None => anyhow::bail!("cache reuse decided without a cached result"),
                }
            }
        };
        self.render_answer(question, previous_question.as_deref(), &result, notes)
    }

    fn render_answer(
        &self,
        question: &str,
        previous_question: Option<&str>,
        result: &AnalyticsResult,
        notes: Vec<String>,
    ) -> Result<TurnOutcome> {
        let json = serde_json::to_string_pretty(result)?;
        let explanation = match self.state.mode {
            OutputMode::Json => None,
            OutputMode::Text | OutputMode::Both => {
                let summary = prompt::summarize_result(result);
                let request = match previous_question {
                    Some(previous) => prompt::follow_up_prompt(previous, &summary, question),
                    None => prompt::explanation_prompt(&summary),
                };
                Some(self.explain(&request))
            }
        };
        let json = match self.state.mode {
            OutputMode::Text => None,
            OutputMode::Json | OutputMode::Both => Some(json),
        };
        Ok(TurnOutcome::Answer(TurnAnswer {
            notes,
            json,
            explanation,
        }))
    }

    fn answer_site_list(&mut self, question: &str, notes: Vec<String>) -> Result<TurnOutcome> {
        let listing = SiteList::new(self.sites.clone());
        let json = serde_json::to_string_pretty(&listing)?;
        self.state.record_question(question);
        let explanation = match self.state.mode {
            OutputMode::Json => None,
            OutputMode::Text | OutputMode::Both => {
                Some(self.explain(&prompt::explanation_prompt(&json)))
            }
        };
        let json = match self.state.mode {
            OutputMode::Text => None,
            OutputMode::Json | OutputMode::Both => Some(json),
        };
        Ok(TurnOutcome::Answer(TurnAnswer {
            notes,
            json,
            explanation,
        }))
    }

    /// Non-actionable assistant output: answered from the cached result
    /// when one exists, otherwise relayed verbatim.
    fn follow_up(&self, question: &str, prose: String) -> Result<TurnOutcome> {
        let context = self
            .state
            .last_question
            .clone()
            .zip(self.state.last_result.clone());
        match context {
            Some((previous_question, result)) => {
                let summary = prompt::summarize_result(&result);
                let request = prompt::follow_up_prompt(&previous_question, &summary, question);
                Ok(TurnOutcome::Prose(self.explain(&request)))
            }
            None => Ok(TurnOutcome::Prose(prose)),
        }
    }

    fn explain(&self, request: &str) -> String {
        match self.assistant.explain(request) {
            Ok(text) => text,
            Err(err) => format!("Could not produce an explanation: {err:#}"),
        }
    }
}

fn mode_argument(input: &str) -> Option<&str> {
    let lower = input.to_lowercase();
    for prefix in ["/mode", "/modo"] {
        if lower.starts_with(prefix) {
            return Some(input[prefix.len()..].trim());
        }
    }
    None
}
