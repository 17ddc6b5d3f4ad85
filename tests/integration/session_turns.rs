use chrono::Local;
use searchlens::chat::router::dates;
use searchlens::chat::session::{FetchDecision, FetchReason, OutputMode, SessionState};
use searchlens::chat::{ChatSession, TurnOutcome};
use searchlens::models::{AnalyticsResult, DateRange};

use crate::support::{fetch_settings, page_of, site, ScriptedAssistant, ScriptedProvider};

fn resolved_range(question: &str) -> DateRange {
    dates::resolve(question, Local::now().date_naive())
}

fn empty_result() -> AnalyticsResult {
    AnalyticsResult {
        rows: Vec::new(),
        aggregation_type: String::new(),
        total_fetched: 0,
    }
}

#[test]
fn switching_mode_clears_the_active_site() {
    let mut state = SessionState::new();
    state.adopt_site(site("https://a.com/"));
    state.switch_mode(OutputMode::Json);
    assert_eq!(state.mode, OutputMode::Json);
    assert!(state.active_site.is_none());
}

#[test]
fn fetch_decision_priorities() {
    let mut state = SessionState::new();
    let range = resolved_range("últimos 3 meses");

    assert_eq!(
        state.fetch_decision(true, range),
        FetchDecision::Fetch(FetchReason::SiteChanged)
    );
    assert_eq!(
        state.fetch_decision(false, range),
        FetchDecision::Fetch(FetchReason::RangeChanged)
    );

    state.last_range = Some(range);
    assert_eq!(
        state.fetch_decision(false, range),
        FetchDecision::Fetch(FetchReason::NoCachedResult)
    );

    state.absorb_result("últimos 3 meses", range, empty_result());
    assert_eq!(state.fetch_decision(false, range), FetchDecision::Reuse);

    let other = resolved_range("últimos 6 meses");
    assert_eq!(
        state.fetch_decision(false, other),
        FetchDecision::Fetch(FetchReason::RangeChanged)
    );
}

#[test]
fn mode_switch_forces_site_reselection() {
    let assistant = ScriptedAssistant::new(&[]);
    let provider = ScriptedProvider::new(vec![site("https://a.com/"), site("https://b.com/")]);
    let mut session =
        ChatSession::new(&assistant, &provider, fetch_settings()).expect("session starts");

    session.select_site(site("https://a.com/"));
    let outcome = session.handle_turn("/mode json").expect("turn succeeds");
    assert!(matches!(outcome, TurnOutcome::Notice(ref text) if text.contains("json")));
    assert!(session.state().active_site.is_none());

    // With no active site and no proposal consumed, the next query pauses
    // for selection before any assistant or provider call.
    let outcome = session
        .handle_turn("clicks de los últimos 3 meses")
        .expect("turn succeeds");
    match outcome {
        TurnOutcome::SelectSite(request) => assert_eq!(request.options.len(), 2),
        other => panic!("expected selection pause, got {other:?}"),
    }
    assert_eq!(provider.request_count(), 0);
}

#[test]
fn range_change_fetches_and_identical_question_reuses_cache() {
    let question = "clicks de los últimos 3 meses";
    let command = "search-analytics --site-url https://a.com/ --dimensions query \
                   --start-date 2020-01-01 --end-date 2020-02-01";
    let assistant = ScriptedAssistant::new(&[command, command]);
    let provider = ScriptedProvider::new(vec![site("https://a.com/")]);
    provider.push_page(page_of(3, 0));
    let mut session =
        ChatSession::new(&assistant, &provider, fetch_settings()).expect("session starts");
    session.select_site(site("https://a.com/"));

    let outcome = session.handle_turn(question).expect("turn succeeds");
    assert!(matches!(outcome, TurnOutcome::Answer(_)));
    assert_eq!(provider.request_count(), 1);
    assert_eq!(session.state().last_range, Some(resolved_range(question)));

    // The assistant's 2020 dates never reach the provider.
    {
        let requests = provider.requests.borrow();
        assert_eq!(requests[0].start_date, resolved_range(question).start);
        assert_eq!(requests[0].end_date, resolved_range(question).end);
    }

    // Identical question: cached result is reused, no second remote call.
    let outcome = session.handle_turn(question).expect("turn succeeds");
    assert!(matches!(outcome, TurnOutcome::Answer(_)));
    assert_eq!(provider.request_count(), 1);

    // A different window triggers a fresh fetch.
    assistant.push_proposal(command);
    provider.push_page(page_of(2, 0));
    let wider = "mejor dame los últimos 6 meses";
    let outcome = session.handle_turn(wider).expect("turn succeeds");
    assert!(matches!(outcome, TurnOutcome::Answer(_)));
    assert_eq!(provider.request_count(), 2);
    assert_eq!(session.state().last_range, Some(resolved_range(wider)));
}

#[test]
fn provider_failure_is_turn_local_and_preserves_state() {
    let question = "clicks de los últimos 3 meses";
    let command = "search-analytics --site-url https://a.com/ --dimensions query";
    let assistant = ScriptedAssistant::new(&[command, command]);
    let provider = ScriptedProvider::new(vec![site("https://a.com/")]);
    provider.push_page(page_of(3, 0));
    let mut session =
        ChatSession::new(&assistant, &provider, fetch_settings()).expect("session starts");
    session.select_site(site("https://a.com/"));
    session.handle_turn(question).expect("turn succeeds");

    provider.fail_next_query();
    let outcome = session
        .handle_turn("¿y los últimos 2 meses?")
        .expect("turn succeeds");
    match outcome {
        TurnOutcome::Notice(text) => assert!(text.contains("quota exceeded"), "{text}"),
        other => panic!("expected a failure notice, got {other:?}"),
    }

    // The previous successful turn is still intact.
    let state = session.state();
    assert!(state.last_result.is_some());
    assert_eq!(state.last_range, Some(resolved_range(question)));
    assert_eq!(state.last_question.as_deref(), Some(question));
}

#[test]
fn explicit_site_mention_switches_scope_and_invalidates_cache() {
    let first = "clicks de los últimos 3 meses";
    let command_a = "search-analytics --site-url https://a.com/ --dimensions query";
    let command_b = "search-analytics --site-url https://b.com/ --dimensions query";
    let assistant = ScriptedAssistant::new(&[command_a, command_b]);
    let provider = ScriptedProvider::new(vec![site("https://a.com/"), site("https://b.com/")]);
    provider.push_page(page_of(3, 0));
    provider.push_page(page_of(4, 0));
    let mut session =
        ChatSession::new(&assistant, &provider, fetch_settings()).expect("session starts");
    session.select_site(site("https://a.com/"));
    session.handle_turn(first).expect("turn succeeds");
    assert_eq!(provider.request_count(), 1);

    let outcome = session
        .handle_turn("¿y cómo va b.com en los últimos 3 meses?")
        .expect("turn succeeds");
    match outcome {
        TurnOutcome::Answer(answer) => {
            assert!(
                answer.notes.iter().any(|note| note.contains("https://b.com/")),
                "missing scope-change note: {:?}",
                answer.notes
            );
        }
        other => panic!("expected an answer, got {other:?}"),
    }
    assert_eq!(provider.request_count(), 2, "same range, new site: must refetch");
    assert_eq!(provider.requests.borrow()[1].site_url, "https://b.com/");
    assert_eq!(
        session.state().active_site.as_ref().map(|s| s.url.as_str()),
        Some("https://b.com/")
    );
}

#[test]
fn follow_up_prose_is_answered_from_the_cached_result() {
    let question = "clicks de los últimos 3 meses";
    let command = "search-analytics --site-url https://a.com/ --dimensions query";
    let assistant = ScriptedAssistant::new(&[command, "The trend looks stable."]);
    let provider = ScriptedProvider::new(vec![site("https://a.com/")]);
    provider.push_page(page_of(3, 0));
    let mut session =
        ChatSession::new(&assistant, &provider, fetch_settings()).expect("session starts");
    session.select_site(site("https://a.com/"));
    session.handle_turn(question).expect("turn succeeds");

    let outcome = session
        .handle_turn("¿ves alguna tendencia?")
        .expect("turn succeeds");
    match outcome {
        TurnOutcome::Prose(text) => assert!(text.starts_with("explained"), "{text}"),
        other => panic!("expected prose, got {other:?}"),
    }
    let prompts = assistant.explanation_prompts.borrow();
    assert!(
        prompts.last().expect("explanation requested").contains(question),
        "follow-up must carry the previous question as context"
    );
    assert_eq!(provider.request_count(), 1, "follow-ups never refetch");
}

#[test]
fn prose_without_cached_context_is_relayed_verbatim() {
    let prose = "I can only answer questions about Search Console data.";
    let assistant = ScriptedAssistant::new(&[prose]);
    let provider = ScriptedProvider::new(vec![site("https://a.com/")]);
    let mut session =
        ChatSession::new(&assistant, &provider, fetch_settings()).expect("session starts");
    session.select_site(site("https://a.com/"));

    let outcome = session.handle_turn("tell me a joke").expect("turn succeeds");
    assert_eq!(outcome, TurnOutcome::Prose(prose.to_string()));
}

#[test]
fn hallucinated_site_pauses_without_any_remote_call() {
    let command = "search-analytics --site-url https://zzz.com/ --dimensions query";
    let assistant = ScriptedAssistant::new(&[command]);
    let provider = ScriptedProvider::new(vec![site("https://a.com/"), site("https://b.com/")]);
    let mut session =
        ChatSession::new(&assistant, &provider, fetch_settings()).expect("session starts");
    session.select_site(site("https://a.com/"));

    let outcome = session
        .handle_turn("clicks de zzz de los últimos 3 meses")
        .expect("turn succeeds");
    match outcome {
        TurnOutcome::SelectSite(request) => {
            assert!(request.prompt.contains("https://zzz.com/"), "{}", request.prompt);
            assert_eq!(request.options.len(), 2, "must offer the authoritative list");
        }
        other => panic!("expected selection pause, got {other:?}"),
    }
    assert_eq!(provider.request_count(), 0);
}

#[test]
fn exit_keywords_end_the_session() {
    let assistant = ScriptedAssistant::new(&[]);
    let provider = ScriptedProvider::new(vec![site("https://a.com/")]);
    let mut session =
        ChatSession::new(&assistant, &provider, fetch_settings()).expect("session starts");
    for word in ["salir", "exit", "QUIT"] {
        assert_eq!(session.handle_turn(word).expect("turn succeeds"), TurnOutcome::Exit);
    }
}

#[test]
fn json_mode_omits_explanation_and_skips_assistant_explain() {
    let question = "clicks de los últimos 3 meses";
    let command = "search-analytics --site-url https://a.com/ --dimensions query";
    let assistant = ScriptedAssistant::new(&[command]);
    let provider = ScriptedProvider::new(vec![site("https://a.com/")]);
    provider.push_page(page_of(2, 0));
    let mut session =
        ChatSession::new(&assistant, &provider, fetch_settings()).expect("session starts");
    session.handle_turn("/mode json").expect("turn succeeds");
    session.select_site(site("https://a.com/"));

    let outcome = session.handle_turn(question).expect("turn succeeds");
    match outcome {
        TurnOutcome::Answer(answer) => {
            assert!(answer.json.is_some());
            assert!(answer.explanation.is_none());
        }
        other => panic!("expected an answer, got {other:?}"),
    }
    assert!(assistant.explanation_prompts.borrow().is_empty());
}
