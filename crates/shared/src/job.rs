use tracing::{info, warn};
use url::Url;

use crate::assembler::assemble;
use crate::config::Config;
use crate::document::HtmlDocument;
use crate::error::RunError;
use crate::extractor::ArticleExtractor;
use crate::fetcher::DocumentFetcher;
use crate::locator::PostLocator;
use crate::models::ResultSet;
use crate::notifier::{DeliveryContext, Notifier};
use crate::resolver::TitleResolver;

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub post_url: String,
    pub result: ResultSet,
    pub payload: String,
}

/// One pass over the blog: find the post, pull its links, title them.
pub struct ReadsJob<'a> {
    fetcher: &'a dyn DocumentFetcher,
    blog_url: String,
    locator: PostLocator,
    extractor: ArticleExtractor,
    resolver: TitleResolver,
}

impl<'a> ReadsJob<'a> {
    pub fn new(config: &Config, fetcher: &'a dyn DocumentFetcher) -> Self {
        Self {
            fetcher,
            blog_url: config.blog_url.clone(),
            locator: PostLocator::new(&config.post_link_selector, config.post_url.clone()),
            extractor: ArticleExtractor::new(&config.article_body_selector),
            resolver: TitleResolver::new(config.hostile_domains.clone()),
        }
    }

    /// Finds today's post and resolves its articles, without delivering.
    pub async fn collect(&self) -> Result<(String, ResultSet), RunError> {
        let post_url = self.find_post().await?;

        let post = self.fetcher.fetch(&post_url).await?;
        let urls = self.extractor.extract(&HtmlDocument::parse(&post))?;
        if urls.is_empty() {
            warn!(post = %post_url, "post has no quoted article links");
        } else {
            info!(post = %post_url, links = urls.len(), "extracted article links");
        }

        let result = assemble(urls, &self.resolver, self.fetcher).await;
        Ok((post_url, result))
    }

    /// Collects and hands the serialized list to `notifier`. A delivery
    /// failure still carries the collected result.
    pub async fn run(&self, notifier: &dyn Notifier) -> Result<RunReport, RunError> {
        let (post_url, result) = self.collect().await?;
        let payload = result.to_json()?;

        let context = DeliveryContext {
            source_post_url: post_url.clone(),
        };
        if let Err(source) = notifier.deliver(&payload, &context).await {
            return Err(RunError::Delivery { source, result });
        }

        Ok(RunReport {
            post_url,
            result,
            payload,
        })
    }

    async fn find_post(&self) -> Result<String, RunError> {
        if let Some(url) = self.locator.override_url() {
            info!(url, "using configured post URL");
            return Ok(url.to_string());
        }

        let index = self.fetcher.fetch(&self.blog_url).await?;
        let href = self
            .locator
            .locate(&HtmlDocument::parse(&index))?
            .ok_or_else(|| RunError::PostNotFound {
                index_url: self.blog_url.clone(),
            })?;

        // Index links may be relative to the blog root
        let post_url = Url::parse(&self.blog_url)
            .and_then(|base| base.join(&href))
            .map(String::from)
            .unwrap_or(href);

        info!(url = %post_url, "found reading-list post");
        Ok(post_url)
    }
}
