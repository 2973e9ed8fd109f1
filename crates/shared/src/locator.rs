use tracing::debug;

use crate::document::{DocumentQuery, QueryNode};
use crate::error::QueryError;

/// A post link read from the blog index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub display_text: String,
    pub target_url: Option<String>,
}

impl Candidate {
    fn from_node(node: &QueryNode) -> Self {
        // Post-title links carry the full post name in their title attribute
        let display_text = node
            .attr("title")
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| node.text())
            .to_string();

        Self {
            display_text,
            target_url: node.attr("href").map(str::to_string),
        }
    }

    /// Reading-list posts are named like "10 Tuesday AM Reads" or "Weekend Reads".
    pub fn is_reading_list(&self) -> bool {
        let text = self.display_text.to_lowercase();
        text.contains("read") && (text.contains("day") || text.contains("weekend"))
    }
}

/// Finds today's reading-list post on the blog index.
#[derive(Debug, Clone)]
pub struct PostLocator {
    post_link_selector: String,
    override_url: Option<String>,
}

impl PostLocator {
    pub fn new(post_link_selector: impl Into<String>, override_url: Option<String>) -> Self {
        Self {
            post_link_selector: post_link_selector.into(),
            override_url,
        }
    }

    /// A configured post URL; when set the index is never scanned.
    pub fn override_url(&self) -> Option<&str> {
        self.override_url.as_deref()
    }

    /// Returns the URL of the first matching post, or `None` when the index
    /// has no reading-list post.
    pub fn locate<D: DocumentQuery + ?Sized>(&self, index: &D) -> Result<Option<String>, QueryError> {
        if let Some(url) = &self.override_url {
            return Ok(Some(url.clone()));
        }

        let candidates = index.select(&self.post_link_selector)?;
        debug!(count = candidates.len(), "scanning post candidates");

        let found = candidates
            .iter()
            .map(Candidate::from_node)
            .filter(|c| c.target_url.is_some())
            .find(Candidate::is_reading_list)
            .and_then(|c| c.target_url);

        Ok(found)
    }
}
