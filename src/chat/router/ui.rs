//! User-facing text for interaction requests and turn notices. The session
//! computes *what must be asked*; the surrounding shell performs the actual
//! prompt and reads the answer.

use uuid::Uuid;

use super::sites::SiteResolution;
use crate::chat::InteractionRequest;
use crate::chat::session::OutputMode;
use crate::models::Site;

/// Builds the interaction request for an unresolved site, with a prompt
/// tailored to why resolution paused.
pub fn site_interaction(resolution: &SiteResolution, known_sites: &[Site]) -> InteractionRequest {
    match resolution {
        SiteResolution::NeedsSelection => InteractionRequest {
            ticket_id: Uuid::new_v4(),
            prompt: format!(
                "Which property do you want to query?\n{}",
                numbered_list(known_sites)
            ),
            options: known_sites.to_vec(),
        },
        SiteResolution::NotFound { candidate } => InteractionRequest {
            ticket_id: Uuid::new_v4(),
            prompt: format!(
                "`{candidate}` is not among your verified properties. Pick one of:\n{}",
                numbered_list(known_sites)
            ),
            options: known_sites.to_vec(),
        },
        SiteResolution::Ambiguous { candidate, matches } => InteractionRequest {
            ticket_id: Uuid::new_v4(),
            prompt: format!(
                "Several properties match `{candidate}`:\n{}\nPlease specify which one to use.",
                numbered_list(matches)
            ),
            options: matches.clone(),
        },
        SiteResolution::Resolved(site) => InteractionRequest {
            ticket_id: Uuid::new_v4(),
            prompt: format!("Confirm the property to use: {}", site.url),
            options: vec![site.clone()],
        },
    }
}

/// Resolves a selection reply against the offered options: a 1-based index,
/// an exact property URL, or a substring matching exactly one option.
pub fn match_selection(reply: &str, options: &[Site]) -> Option<Site> {
    let reply = reply.trim();
    if reply.is_empty() {
        return None;
    }
    if let Ok(index) = reply.parse::<usize>() {
        if index >= 1 && index <= options.len() {
            return Some(options[index - 1].clone());
        }
        return None;
    }
    if let Some(site) = options.iter().find(|site| site.url == reply) {
        return Some(site.clone());
    }
    let matches: Vec<&Site> = options
        .iter()
        .filter(|site| site.url.contains(reply))
        .collect();
    match matches.len() {
        1 => Some(matches[0].clone()),
        _ => None,
    }
}

pub fn numbered_list(sites: &[Site]) -> String {
    sites
        .iter()
        .enumerate()
        .map(|(index, site)| format!("  {}. {}", index + 1, site.url))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn using_property_notice(url: &str) -> String {
    format!("Using property: {url}")
}

pub fn mode_switched_notice(mode: OutputMode) -> String {
    format!(
        "Response mode set to {}. The active property was cleared; the next query will ask for it again.",
        mode.as_str()
    )
}

pub fn invalid_mode_notice() -> String {
    "Valid modes: text, json, both".to_string()
}

pub fn whole_domain_note() -> String {
    "No page URL detected in the question; querying the whole property.".to_string()
}

pub fn discarded_hint_note(field: &str, value: &str) -> String {
    format!("Ignored invalid {field} `{value}` suggested by the assistant.")
}

pub fn no_sites_message() -> String {
    "You have no properties registered in Search Console.".to_string()
}

pub fn provider_failure_notice(detail: &str) -> String {
    format!("The query failed: {detail}\nThe previous result, if any, is still available.")
}
