use tracing::{debug, info};

use crate::fetcher::DocumentFetcher;
use crate::models::{ArticleRecord, ResultSet};
use crate::resolver::{TitleResolver, TitleSource};

/// Resolves every URL in order, one at a time, and collects the records.
/// A URL that can't be fetched still yields a record with a fallback title.
pub async fn assemble(
    urls: Vec<String>,
    resolver: &TitleResolver,
    fetcher: &dyn DocumentFetcher,
) -> ResultSet {
    let mut result = ResultSet::new();
    let mut fallbacks = 0;

    for url in urls {
        let resolved = resolver.resolve(fetcher, &url).await;
        debug!(url = %url, source = ?resolved.source, title = %resolved.title, "resolved title");

        if resolved.source == TitleSource::Fallback {
            fallbacks += 1;
        }
        result.push(ArticleRecord::new(url, resolved.title));
    }

    info!(articles = result.len(), fallbacks, "assembled reading list");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubFetcher;

    #[tokio::test]
    async fn test_order_kept_and_failures_contained() {
        let fetcher = StubFetcher::new()
            .with_page("https://ok.test/a", "<title>Page A</title>")
            .with_page("https://ok.test/c", "<title>Page C</title>");
        let urls = vec![
            "https://ok.test/a".to_string(),
            "https://gone.test/missing-b".to_string(),
            "https://ok.test/c".to_string(),
            "https://ok.test/a".to_string(),
        ];

        let result = assemble(urls, &TitleResolver::default(), &fetcher).await;

        assert_eq!(
            result.records(),
            &[
                ArticleRecord::new("https://ok.test/a", "Page A"),
                ArticleRecord::new("https://gone.test/missing-b", "missing-b"),
                ArticleRecord::new("https://ok.test/c", "Page C"),
                ArticleRecord::new("https://ok.test/a", "Page A"),
            ]
        );
        assert_eq!(
            fetcher.requested(),
            vec![
                "https://ok.test/a",
                "https://gone.test/missing-b",
                "https://ok.test/c",
                "https://ok.test/a",
            ]
        );
    }

    #[tokio::test]
    async fn test_no_urls_is_empty_result() {
        let fetcher = StubFetcher::new();
        let result = assemble(Vec::new(), &TitleResolver::default(), &fetcher).await;
        assert!(result.is_empty());
    }
}
