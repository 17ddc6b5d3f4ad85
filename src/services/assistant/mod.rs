//! The natural-language assistant boundary.
//!
//! The assistant is an untrusted oracle: it receives a prompt and returns
//! free text. Everything structured that the session extracts from that
//! text (site, dates, dimensions) is a candidate requiring independent
//! validation, never ground truth.

pub mod claude;
pub mod prompt;

pub use claude::ClaudeAssistant;

use anyhow::Result;

/// Free-text proposal/explanation service consumed by the chat session.
pub trait Assistant {
    /// Asks for a command proposal for the user's question. The reply is
    /// expected to be either an executable-looking command string or prose;
    /// callers must not assume well-formedness.
    fn propose(&self, system_prompt: &str, user_text: &str) -> Result<String>;

    /// Asks for a natural-language explanation of an already-fetched result.
    fn explain(&self, prompt: &str) -> Result<String>;
}

impl<T: Assistant + ?Sized> Assistant for &T {
    fn propose(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        (**self).propose(system_prompt, user_text)
    }

    fn explain(&self, prompt: &str) -> Result<String> {
        (**self).explain(prompt)
    }
}
