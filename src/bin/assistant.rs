//! Interactive shell around the chat session: reads questions from stdin,
//! performs the selection prompts the session suspends on, and renders
//! answers per the active output mode.

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use searchlens::chat::router::ui;
use searchlens::chat::{ChatSession, InteractionRequest, TurnAnswer, TurnOutcome};
use searchlens::config;
use searchlens::models::Site;
use searchlens::services::assistant::{Assistant, ClaudeAssistant};
use searchlens::services::gsc::{AnalyticsProvider, GscClient};

/// Selection prompts re-run the same question afterwards; bail out if the
/// session keeps suspending instead of answering.
const MAX_SELECTION_PASSES: usize = 3;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = config::load_or_default()?;
    let credentials = config.google.credentials_file()?;
    let provider = GscClient::new(&credentials)?;
    let assistant = ClaudeAssistant::try_from_env(&config.assistant)?;
    let mut session = ChatSession::new(assistant, provider, config.fetch)?;

    println!("Welcome! Ask about your Search Console data (or `exit` to quit).");
    println!("Switch the response mode with: /mode text, /mode json or /mode both\n");

    loop {
        let Some(input) = read_line("You: ")? else {
            break;
        };
        if !run_turn(&mut session, &input)? {
            break;
        }
    }
    Ok(())
}

/// Drives one turn to completion, looping through selection prompts.
/// Returns false when the session should end.
fn run_turn<A: Assistant, P: AnalyticsProvider>(
    session: &mut ChatSession<A, P>,
    input: &str,
) -> Result<bool> {
    let mut passes = 0;
    loop {
        let outcome = match session.handle_turn(input) {
            Ok(outcome) => outcome,
            Err(err) => {
                eprintln!("Error: {err:#}");
                return Ok(true);
            }
        };
        match outcome {
            TurnOutcome::Ignored => return Ok(true),
            TurnOutcome::Exit => return Ok(false),
            TurnOutcome::Notice(text) | TurnOutcome::Prose(text) => {
                println!("\n{text}\n");
                return Ok(true);
            }
            TurnOutcome::Answer(answer) => {
                print_answer(&answer);
                return Ok(true);
            }
            TurnOutcome::SelectSite(request) => {
                passes += 1;
                if passes > MAX_SELECTION_PASSES {
                    println!("\nNo property selected; skipping this question.\n");
                    return Ok(true);
                }
                let Some(site) = prompt_selection(&request)? else {
                    return Ok(false);
                };
                println!("\n{}", session.select_site(site));
            }
        }
    }
}

fn prompt_selection(request: &InteractionRequest) -> Result<Option<Site>> {
    println!("\n{}", request.prompt);
    loop {
        let Some(reply) = read_line("Choose the property (number or domain): ")? else {
            return Ok(None);
        };
        if let Some(site) = ui::match_selection(&reply, &request.options) {
            return Ok(Some(site));
        }
        println!("Please choose a valid number or domain.");
    }
}

fn print_answer(answer: &TurnAnswer) {
    for note in &answer.notes {
        println!("\n{note}");
    }
    if let Some(json) = &answer.json {
        println!("\nCLI response (JSON):\n{json}");
    }
    if let Some(explanation) = &answer.explanation {
        println!("\n{explanation}");
    }
    println!();
}

/// Reads one line from stdin, returning None at end of input.
fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut buffer = String::new();
    let read = io::stdin()
        .read_line(&mut buffer)
        .context("Failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(buffer.trim().to_string()))
}
