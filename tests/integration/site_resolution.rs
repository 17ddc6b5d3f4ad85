use searchlens::chat::router::sites::{self, SiteResolution};
use searchlens::chat::router::ui;

use crate::support::site;

#[test]
fn substring_match_is_unanchored_and_reports_ambiguity() {
    let known = vec![site("https://a.com/"), site("https://ab.com/")];
    match sites::resolve(Some("a"), &known) {
        SiteResolution::Ambiguous { candidate, matches } => {
            assert_eq!(candidate, "a");
            assert_eq!(matches, known);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
}

#[test]
fn unknown_qualified_candidate_is_never_substituted() {
    let known = vec![site("https://a.com/"), site("https://ab.com/")];
    assert_eq!(
        sites::resolve(Some("https://zzz.com/"), &known),
        SiteResolution::NotFound {
            candidate: "https://zzz.com/".to_string()
        }
    );
}

#[test]
fn exact_membership_resolves() {
    let known = vec![site("https://a.com/"), site("https://ab.com/")];
    assert_eq!(
        sites::resolve(Some("https://ab.com/"), &known),
        SiteResolution::Resolved(site("https://ab.com/"))
    );
}

#[test]
fn domain_property_token_resolves_exactly() {
    let known = vec![site("sc-domain:a.com"), site("https://b.com/")];
    assert_eq!(
        sites::resolve(Some("sc-domain:a.com"), &known),
        SiteResolution::Resolved(site("sc-domain:a.com"))
    );
}

#[test]
fn unique_substring_resolves() {
    let known = vec![site("https://a.com/"), site("https://ab.com/")];
    assert_eq!(
        sites::resolve(Some("ab"), &known),
        SiteResolution::Resolved(site("https://ab.com/"))
    );
}

#[test]
fn substring_match_is_case_sensitive() {
    let known = vec![site("https://a.com/")];
    assert_eq!(
        sites::resolve(Some("A"), &known),
        SiteResolution::NotFound {
            candidate: "A".to_string()
        }
    );
}

#[test]
fn missing_candidate_requires_explicit_selection() {
    let known = vec![site("https://a.com/")];
    assert_eq!(sites::resolve(None, &known), SiteResolution::NeedsSelection);
    assert_eq!(
        sites::resolve(Some("   "), &known),
        SiteResolution::NeedsSelection
    );
}

#[test]
fn selection_reply_accepts_index_url_or_substring() {
    let options = vec![site("https://a.com/"), site("https://b.org/")];
    assert_eq!(
        ui::match_selection("2", &options),
        Some(site("https://b.org/"))
    );
    assert_eq!(
        ui::match_selection("https://a.com/", &options),
        Some(site("https://a.com/"))
    );
    assert_eq!(
        ui::match_selection("b.org", &options),
        Some(site("https://b.org/"))
    );
    assert_eq!(ui::match_selection("0", &options), None);
    assert_eq!(ui::match_selection("3", &options), None);
    // "https" matches both options; no silent pick.
    assert_eq!(ui::match_selection("https", &options), None);
}
