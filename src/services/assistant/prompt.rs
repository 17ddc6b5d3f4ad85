//! Prompt builders for the assistant calls.

use crate::models::AnalyticsResult;

/// Rows inlined when asking the assistant to explain a result. Keeps the
/// explanation prompt bounded regardless of how many rows were fetched.
pub const SUMMARY_ROWS: usize = 10;

/// System prompt for the command-proposal call. The assistant is asked to
/// answer with the exact command to run, nothing else; the session still
/// re-validates every field it extracts from the reply.
pub fn command_system_prompt() -> String {
    [
        "You are an expert Google Search Console assistant. ",
        "When the user asks for data, reply ONLY with the exact CLI command to run, using this syntax:\n",
        "To list sites:\n",
        "list-sites\n",
        "For analytics:\n",
        "search-analytics --site-url <property selected by the user> --start-date 2025-02-01 --end-date 2025-08-22 --dimensions query,page --type web\n",
        "Never use `https://yoursite.com/` or any generic domain. Always use the property selected by the user.\n",
        "Do not compare or mix properties; answer only about the selected property.\n",
        "Always use the exact flags: --site-url, --start-date, --end-date, --dimensions, --type, --aggregation-type, --row-limit.\n",
        "Do not use --site or --date-range. If you have no dates, use the last 6 months in YYYY-MM-DD format.\n",
        "Do not explain anything; reply with the command only.",
    ]
    .concat()
}

/// Context prefix sent ahead of the user's question once a property is
/// selected, so the assistant echoes the right site.
pub fn context_prefix(site_url: &str) -> String {
    format!("The selected property is: {site_url}. ")
}

/// Explanation prompt for a freshly fetched result.
pub fn explanation_prompt(result_summary: &str) -> String {
    format!(
        "You are a Google Search Console expert. Explain the following JSON \
         result of a query clearly and usefully, highlight insights, trends \
         and possible keyword cannibalization, and answer the user's intent. \
         If there is no data, say so kindly.\n\n{result_summary}"
    )
}

/// Explanation prompt for a follow-up question about a previous result.
pub fn follow_up_prompt(previous_question: &str, result_summary: &str, new_question: &str) -> String {
    format!(
        "Previous question: {previous_question}\n\
         Previous answer (JSON): {result_summary}\n\
         New question: {new_question}\n\
         Answer ONLY about the selected property. Explain clearly and \
         usefully, highlight insights, trends and possible keyword \
         cannibalization, and answer the user's intent. If there is no \
         data, say so kindly."
    )
}

/// Serializes a result for an explanation prompt, keeping only the first
/// [`SUMMARY_ROWS`] rows and noting the total when rows were dropped.
pub fn summarize_result(result: &AnalyticsResult) -> String {
    let total = result.rows.len();
    if total <= SUMMARY_ROWS {
        return serde_json::to_string_pretty(result).unwrap_or_default();
    }
    let mut trimmed = result.clone();
    trimmed.rows.truncate(SUMMARY_ROWS);
    let body = serde_json::to_string_pretty(&trimmed).unwrap_or_default();
    format!("{body}\n(Showing the first {SUMMARY_ROWS} of {total} rows.)")
}
