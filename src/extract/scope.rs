// src/extract/scope.rs
// =============================================================================
// The crawl scope: which links we are allowed to follow.
//
// A link is in scope when it is http(s) and its network location (userinfo,
// host and port) is exactly the start URL's. The scheme is not compared, so
// http://example.com/ and https://example.com/ count as the same site.
// Subdomains do not: www.example.com is a different host.
// =============================================================================

use url::{Position, Url};

#[derive(Debug, Clone)]
pub struct Scope {
    host: Url,
}

impl Scope {
    pub fn new(host: Url) -> Self {
        Self { host }
    }

    /// The start URL the scope was built from
    pub fn host(&self) -> &Url {
        &self.host
    }

    pub fn is_valid(&self, link: &Url) -> bool {
        matches!(link.scheme(), "http" | "https") && netloc(link) == netloc(&self.host)
    }

    /// Resolves an asset reference (icon, image) against the crawl host
    pub fn resolve_asset(&self, href: &str) -> Option<String> {
        self.host.join(href).ok().map(String::from)
    }
}

/// The `user:pass@host:port` part of a URL. Default ports are already gone
/// after parsing, so `http://h:80/` and `http://h/` share one netloc.
pub fn netloc(url: &Url) -> &str {
    &url[Position::BeforeUsername..Position::AfterPort]
}
