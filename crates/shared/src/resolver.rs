use tracing::{debug, warn};
use url::Url;

use crate::document::{DocumentQuery, HtmlDocument};
use crate::fetcher::DocumentFetcher;

/// Publishers that refuse programmatic fetches.
pub const DEFAULT_HOSTILE_DOMAINS: &[&str] = &["bloomberg.com"];

/// Which tier produced a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    /// Derived from the URL slug of a hostile domain
    Slug,
    /// Filename of a PDF link
    Pdf,
    /// `<title>` of the fetched page
    Page,
    /// Last path segment after a failed fetch
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTitle {
    pub title: String,
    pub source: TitleSource,
}

impl ResolvedTitle {
    fn new(title: impl Into<String>, source: TitleSource) -> Self {
        Self {
            title: title.into(),
            source,
        }
    }
}

/// Resolves a display title for an article link. Never fails: every
/// tier ends in some title, possibly derived from the URL alone.
#[derive(Debug, Clone)]
pub struct TitleResolver {
    hostile_domains: Vec<String>,
}

impl Default for TitleResolver {
    fn default() -> Self {
        Self::new(DEFAULT_HOSTILE_DOMAINS.iter().map(|d| d.to_string()).collect())
    }
}

impl TitleResolver {
    pub fn new(hostile_domains: Vec<String>) -> Self {
        Self {
            hostile_domains: hostile_domains
                .into_iter()
                .map(|d| d.trim().trim_start_matches('.').to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub async fn resolve(&self, fetcher: &dyn DocumentFetcher, url: &str) -> ResolvedTitle {
        if self.is_hostile(url) {
            return ResolvedTitle::new(slug_title(url), TitleSource::Slug);
        }

        if url.ends_with(".pdf") {
            return ResolvedTitle::new(last_segment(url), TitleSource::Pdf);
        }

        match page_title(fetcher, url).await {
            Ok(title) => ResolvedTitle::new(title, TitleSource::Page),
            Err(e) => {
                warn!(url, error = %e, "title fetch failed, using last path segment");
                ResolvedTitle::new(last_segment(url), TitleSource::Fallback)
            }
        }
    }

    fn is_hostile(&self, url: &str) -> bool {
        let Some(host) = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase))
        else {
            return false;
        };

        self.hostile_domains
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
    }
}

async fn page_title(fetcher: &dyn DocumentFetcher, url: &str) -> anyhow::Result<String> {
    let body = fetcher.fetch(url).await?;
    let doc = HtmlDocument::parse(&body);
    let title = doc
        .select_first("title")?
        .map(|node| node.text().to_string())
        .unwrap_or_default();

    if title.is_empty() {
        debug!(url, "page has no title");
    }
    Ok(title)
}

/// Last non-empty `/`-segment after the host, untouched (query included).
/// Empty only when the path has no segments at all.
pub fn last_segment(url: &str) -> &str {
    path_part(url)
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or("")
}

/// Everything after `scheme://host`; strings without a scheme are all path.
fn path_part(url: &str) -> &str {
    let Some(start) = url.find("://") else {
        return url;
    };
    let rest = &url[start + 3..];
    rest.find('/').map(|i| &rest[i..]).unwrap_or("")
}

/// "https://host/a/b/some-story-slug/" -> "Some Story Slug"
pub fn slug_title(url: &str) -> String {
    title_case(last_segment(url)).replace('-', " ")
}

/// Uppercases the first letter of every word, leaving the rest as written.
/// Words are broken by anything that is not a letter, digit or underscore.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_separator = true;

    for c in s.chars() {
        if prev_is_separator {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_is_separator = is_word_separator(c);
    }

    out
}

fn is_word_separator(c: char) -> bool {
    if c.is_ascii() {
        return !(c.is_ascii_alphanumeric() || c == '_');
    }
    if c.is_alphanumeric() {
        return false;
    }
    c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubFetcher;

    const BLOOMBERG: &str = "https://www.bloomberg.com/opinion/articles/2020-05-04/texas-versus-california-a-story-of-dueling-coronavirus-rules/";

    #[tokio::test]
    async fn test_hostile_domain_from_url_only() {
        let fetcher = StubFetcher::new().with_page(BLOOMBERG, "<title>Never used</title>");
        let resolver = TitleResolver::default();

        let first = resolver.resolve(&fetcher, BLOOMBERG).await;
        let second = resolver.resolve(&fetcher, BLOOMBERG).await;

        assert_eq!(
            first.title,
            "Texas Versus California A Story Of Dueling Coronavirus Rules"
        );
        assert_eq!(first.source, TitleSource::Slug);
        assert_eq!(first, second);
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn test_hostile_domain_matches_bare_host_only_on_boundary() {
        let fetcher = StubFetcher::new();
        let resolver = TitleResolver::default();

        let bare = resolver
            .resolve(&fetcher, "https://bloomberg.com/news/some-story")
            .await;
        assert_eq!(bare.title, "Some Story");

        let lookalike = resolver
            .resolve(&fetcher, "https://notbloomberg.com/news/some-story")
            .await;
        assert_eq!(lookalike.source, TitleSource::Fallback);
        assert_eq!(fetcher.requested(), vec!["https://notbloomberg.com/news/some-story"]);
    }

    #[tokio::test]
    async fn test_pdf_uses_filename_verbatim() {
        let fetcher = StubFetcher::new();
        let resolved = TitleResolver::default()
            .resolve(&fetcher, "https://example.com/reports/q1-summary.pdf")
            .await;

        assert_eq!(resolved.title, "q1-summary.pdf");
        assert_eq!(resolved.source, TitleSource::Pdf);
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn test_pdf_suffix_is_case_sensitive() {
        let fetcher = StubFetcher::new();
        let resolved = TitleResolver::default()
            .resolve(&fetcher, "https://example.com/reports/Q1.PDF")
            .await;

        assert_eq!(resolved.source, TitleSource::Fallback);
        assert_eq!(resolved.title, "Q1.PDF");
        assert_eq!(fetcher.requested().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_falls_back_to_last_segment() {
        let fetcher = StubFetcher::new();
        let resolved = TitleResolver::default()
            .resolve(&fetcher, "https://unreachable.example/articles/foo-bar")
            .await;

        assert_eq!(resolved.title, "foo-bar");
        assert_eq!(resolved.source, TitleSource::Fallback);
    }

    #[tokio::test]
    async fn test_trailing_slash_keeps_last_segment() {
        let fetcher = StubFetcher::new();
        let resolver = TitleResolver::default();

        let fallback = resolver
            .resolve(&fetcher, "https://unreachable.example/articles/foo-bar/")
            .await;
        assert_eq!(fallback.title, "foo-bar");
        assert_eq!(fallback.source, TitleSource::Fallback);

        let slug = resolver
            .resolve(&fetcher, "https://www.bloomberg.com/news/some-story//")
            .await;
        assert_eq!(slug.title, "Some Story");
        assert_eq!(slug.source, TitleSource::Slug);
    }

    #[tokio::test]
    async fn test_fetched_title_is_verbatim() {
        let url = "https://news.test/story";
        let fetcher = StubFetcher::new().with_page(
            url,
            "<html><head><title>  The Story | News  </title></head><body><title>Other</title></body></html>",
        );
        let resolved = TitleResolver::default().resolve(&fetcher, url).await;

        assert_eq!(resolved.title, "  The Story | News  ");
        assert_eq!(resolved.source, TitleSource::Page);
    }

    #[tokio::test]
    async fn test_page_without_title_is_empty() {
        let url = "https://news.test/untitled";
        let fetcher = StubFetcher::new().with_page(url, "<html><body>hi</body></html>");
        let resolved = TitleResolver::default().resolve(&fetcher, url).await;

        assert_eq!(resolved.title, "");
        assert_eq!(resolved.source, TitleSource::Page);
    }

    #[tokio::test]
    async fn test_bare_domain_fallback_is_empty() {
        let fetcher = StubFetcher::new();
        let resolved = TitleResolver::default()
            .resolve(&fetcher, "https://down.example/")
            .await;

        assert_eq!(resolved.title, "");
        assert_eq!(resolved.source, TitleSource::Fallback);
    }

    #[test]
    fn test_configured_domains_are_normalized() {
        let resolver = TitleResolver::new(vec![" .FT.com ".into(), "".into()]);
        assert!(resolver.is_hostile("https://www.ft.com/content/abc"));
        assert!(!resolver.is_hostile("https://www.bloomberg.com/x"));
        assert!(!resolver.is_hostile("not a url"));
    }

    #[test]
    fn test_title_case_word_boundaries() {
        assert_eq!(title_case("2020-05-04"), "2020-05-04");
        assert_eq!(title_case("it's-a_test"), "It'S-A_test");
        assert_eq!(title_case("iPhone-sales"), "IPhone-Sales");
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("https://a.test/x/y?z=1"), "y?z=1");
        assert_eq!(last_segment("https://a.test/x/"), "x");
        assert_eq!(last_segment("https://a.test/x//"), "x");
        assert_eq!(last_segment("https://a.test/"), "");
        assert_eq!(last_segment("https://a.test"), "");
        assert_eq!(last_segment("plain"), "plain");
    }
}
