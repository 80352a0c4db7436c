// src/extract/document.rs
// =============================================================================
// A parsed HTML page, seen through the five lookups the crawler needs.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, so broken real-world HTML still parses
//
// The Document trait keeps the rest of the crate independent of scraper.
// Every lookup returns raw attribute values; resolving them to absolute URLs
// is the caller's job.
// =============================================================================

use scraper::{ElementRef, Html, Selector};

/// The queries the extractor runs against a page
pub trait Document {
    /// Text of the <title> element, None if missing or blank
    fn title(&self) -> Option<String>;

    /// `content` of the first <meta> whose `property` equals `property`
    fn meta_content_by_property(&self, property: &str) -> Option<String>;

    /// `href` of the first <link> whose `rel` token list contains `rel`
    fn link_href_by_rel(&self, rel: &str) -> Option<String>;

    /// `src` of the first <img>
    fn first_image_src(&self) -> Option<String>;

    /// `href` of every <a> that has one, in document order
    fn anchor_hrefs(&self) -> Vec<String>;
}

/// Document backed by scraper's html5ever tree
///
/// `scraper::Html` is not `Send`, so parse, query and drop it without an
/// `.await` in between.
pub struct ScraperDocument {
    html: Html,
}

impl ScraperDocument {
    pub fn parse(text: &str) -> Self {
        Self {
            html: Html::parse_document(text),
        }
    }

    fn first(&self, css: &str) -> Option<ElementRef<'_>> {
        self.html.select(&selector(css)).next()
    }
}

impl Document for ScraperDocument {
    fn title(&self) -> Option<String> {
        let title = self.first("title")?.text().collect::<String>();
        let title = title.trim();
        (!title.is_empty()).then(|| title.to_string())
    }

    fn meta_content_by_property(&self, property: &str) -> Option<String> {
        let meta = self
            .html
            .select(&selector("meta[property]"))
            .find(|el| el.value().attr("property") == Some(property))?;
        attr(meta, "content")
    }

    fn link_href_by_rel(&self, rel: &str) -> Option<String> {
        // rel is a space separated token list: "shortcut icon" has an icon
        let link = self.html.select(&selector("link[rel]")).find(|el| {
            el.value()
                .attr("rel")
                .map(|tokens| {
                    tokens
                        .split_ascii_whitespace()
                        .any(|t| t.eq_ignore_ascii_case(rel))
                })
                .unwrap_or(false)
        })?;
        attr(link, "href")
    }

    fn first_image_src(&self) -> Option<String> {
        attr(self.first("img")?, "src")
    }

    fn anchor_hrefs(&self) -> Vec<String> {
        self.html
            .select(&selector("a[href]"))
            .filter_map(|el| el.value().attr("href"))
            .map(str::to_owned)
            .collect()
    }
}

// Selectors here are string constants known to be valid, so a parse failure
// is a programmer error
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

// Non-empty attribute value
fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What do the selectors mean?
//    - "meta[property]" = every <meta> tag that has a property attribute
//    - "link[rel]" = every <link> tag that has a rel attribute
//    - "a[href]" = every <a> tag that has an href attribute
//
// 2. Why .find() instead of a more specific selector?
//    - find() stops at the first element that passes the check
//    - Comparing attribute values in Rust avoids building selectors from
//      strings at runtime
//
// 3. What is ElementRef<'_>?
//    - A reference to one element inside the parsed document
//    - The '_ lifetime ties it to the Html it came from
// -----------------------------------------------------------------------------
