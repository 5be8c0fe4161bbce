use serde::{Deserialize, Serialize};

/// Forced interpretation of a search keyword (`search_type` parameter).
///
/// Without one the API guesses from the keyword's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    /// Subdomains of a domain
    Subdomain,
    /// Domains sharing the keyword's registrable domain
    SameDomain,
    /// Records pointing at an IP
    Ip,
    /// Records inside an IP segment (CIDR)
    IpSegment,
}

impl SearchType {
    /// Wire value for the `search_type` query parameter
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subdomain => "subdomain",
            Self::SameDomain => "same_domain",
            Self::Ip => "ip",
            Self::IpSegment => "ip_segment",
        }
    }
}

impl std::fmt::Display for SearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
