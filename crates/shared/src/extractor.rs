use crate::document::DocumentQuery;
use crate::error::QueryError;

/// Pulls the quoted article links out of a reading-list post.
#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    link_path: String,
}

impl ArticleExtractor {
    /// `article_body_selector` may be a selector list; each alternative
    /// gets its own `blockquote p a` descent.
    pub fn new(article_body_selector: &str) -> Self {
        let link_path = split_selector_list(article_body_selector)
            .into_iter()
            .map(|body| format!("{} blockquote p a", body))
            .collect::<Vec<_>>()
            .join(", ");

        Self { link_path }
    }

    /// Link targets in document order, repeats included. Anchors without an
    /// href are skipped; nothing else is filtered.
    pub fn extract<D: DocumentQuery + ?Sized>(&self, post: &D) -> Result<Vec<String>, QueryError> {
        Ok(post
            .select(&self.link_path)?
            .iter()
            .filter_map(|node| node.attr("href").map(str::to_string))
            .collect())
    }
}

/// Splits on commas outside of `(...)` and `[...]`, so `:is(.a, .b)` stays whole.
fn split_selector_list(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in list.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(list[start..].trim());

    parts.into_iter().filter(|p| !p.is_empty()).collect()
}
