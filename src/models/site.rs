use serde::{Deserialize, Serialize};

/// A verified Search Console property.
///
/// Identity is the exact `url`: either a URL-prefix property
/// (`https://example.com/`) or a domain property (`sc-domain:example.com`).
/// The authoritative set is fetched once per session start and treated as
/// read-only for the rest of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub url: String,
    #[serde(rename = "permissionLevel", default)]
    pub permission_level: String,
}

impl Site {
    pub fn new(url: impl Into<String>, permission_level: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            permission_level: permission_level.into(),
        }
    }

    /// Bare host form used to spot explicit mentions in free text
    /// (`https://example.com/` and `sc-domain:example.com` both yield
    /// `example.com`).
    pub fn bare_host(&self) -> &str {
        self.url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("sc-domain:")
            .trim_end_matches('/')
    }
}
