// src/extract/page.rs
// =============================================================================
// Turns the text of one page into what the crawler keeps and follows:
// a title, a representative image and the page's outgoing links.
//
// Two different bases are used for resolving relative URLs:
// - anchors are resolved against the page they appear on, like a browser
// - icon and <img> references are resolved against the crawl host
// =============================================================================

use url::Url;

use super::document::{Document, ScraperDocument};
use super::scope::Scope;

/// Title recorded for pages without one
pub const NO_TITLE: &str = "No Title";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageData {
    pub title: String,
    pub image: Option<String>,
    /// Absolute links found on the page, fragments removed, not yet scoped
    pub links: Vec<Url>,
}

/// Parses `text` and extracts the page data for `page_url`
pub fn extract(scope: &Scope, page_url: &Url, text: &str) -> PageData {
    let document = ScraperDocument::parse(text);
    extract_from(&document, scope, page_url)
}

pub fn extract_from(document: &impl Document, scope: &Scope, page_url: &Url) -> PageData {
    PageData {
        title: document.title().unwrap_or_else(|| NO_TITLE.to_string()),
        image: representative_image(document, scope),
        links: document
            .anchor_hrefs()
            .iter()
            .filter_map(|href| resolve_link(page_url, href))
            .collect(),
    }
}

/// Picks one image for the page, first match wins:
/// og:image meta, icon link, first <img>.
///
/// The og:image value is kept as written. Icon and <img> references are
/// resolved against the crawl host, not the page URL.
pub fn representative_image(document: &impl Document, scope: &Scope) -> Option<String> {
    if let Some(content) = document.meta_content_by_property("og:image") {
        return Some(content);
    }

    if let Some(href) = document.link_href_by_rel("icon") {
        if let Some(resolved) = scope.resolve_asset(&href) {
            return Some(resolved);
        }
    }

    document
        .first_image_src()
        .and_then(|src| scope.resolve_asset(&src))
}

// Resolves an href against the page it was found on
//
// Examples (page = https://example.com/docs/page):
//   "/about"     -> https://example.com/about
//   "../other"   -> https://example.com/other
//   "next#intro" -> https://example.com/docs/next
fn resolve_link(page_url: &Url, href: &str) -> Option<Url> {
    let mut url = page_url.join(href).ok()?;
    url.set_fragment(None);
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> Scope {
        Scope::new(Url::parse("http://example.test/").unwrap())
    }

    fn page(path: &str) -> Url {
        Url::parse("http://example.test/").unwrap().join(path).unwrap()
    }

    #[test]
    fn test_title_and_sentinel() {
        let data = extract(&scope(), &page("/"), "<title>Home</title>");
        assert_eq!(data.title, "Home");

        let data = extract(&scope(), &page("/"), "<p>untitled</p>");
        assert_eq!(data.title, NO_TITLE);
    }

    #[test]
    fn test_og_image_beats_icon() {
        let html = r#"<head>
            <link rel="icon" href="/favicon.ico">
            <meta property="og:image" content="https://cdn.test/og.png">
        </head><body><img src="/hero.png"></body>"#;
        let data = extract(&scope(), &page("/"), html);
        assert_eq!(data.image.as_deref(), Some("https://cdn.test/og.png"));
    }

    #[test]
    fn test_og_image_is_not_resolved() {
        let html = r#"<meta property="og:image" content="/relative/og.png">"#;
        let data = extract(&scope(), &page("/a/b"), html);
        assert_eq!(data.image.as_deref(), Some("/relative/og.png"));
    }

    #[test]
    fn test_icon_beats_img() {
        let html = r#"<link rel="icon" href="/favicon.ico"><img src="/hero.png">"#;
        let data = extract(&scope(), &page("/"), html);
        assert_eq!(data.image.as_deref(), Some("http://example.test/favicon.ico"));
    }

    // Icon and <img> references resolve against the crawl host even on a
    // nested page. An href relative to the page would be resolved
    // differently by a browser; this pins the current behavior.
    #[test]
    fn test_assets_resolve_against_host_not_page() {
        let html = r#"<link rel="icon" href="icons/fav.png">"#;
        let data = extract(&scope(), &page("/blog/post/"), html);
        assert_eq!(data.image.as_deref(), Some("http://example.test/icons/fav.png"));

        let html = r#"<img src="pics/a.png">"#;
        let data = extract(&scope(), &page("/blog/post/"), html);
        assert_eq!(data.image.as_deref(), Some("http://example.test/pics/a.png"));
    }

    #[test]
    fn test_no_image() {
        let data = extract(&scope(), &page("/"), "<title>plain</title>");
        assert_eq!(data.image, None);
    }

    #[test]
    fn test_links_resolve_against_page() {
        let html = r#"
            <a href="/root">root</a>
            <a href="sibling">sibling</a>
            <a href="../up">up</a>
            <a href="http://other.test/x">external</a>
            <a href="mailto:me@example.test">mail</a>
        "#;
        let data = extract(&scope(), &page("/docs/guide/"), html);
        let links: Vec<&str> = data.links.iter().map(Url::as_str).collect();
        assert_eq!(
            links,
            vec![
                "http://example.test/root",
                "http://example.test/docs/guide/sibling",
                "http://example.test/docs/up",
                "http://other.test/x",
                "mailto:me@example.test",
            ]
        );
    }

    #[test]
    fn test_fragments_are_dropped() {
        let html = r##"<a href="#top">top</a><a href="/faq#q2">faq</a>"##;
        let data = extract(&scope(), &page("/about"), html);
        let links: Vec<&str> = data.links.iter().map(Url::as_str).collect();
        assert_eq!(links, vec!["http://example.test/about", "http://example.test/faq"]);
    }
}
