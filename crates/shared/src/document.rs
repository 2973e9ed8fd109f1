use scraper::{Html, Selector};

use crate::error::QueryError;

/// An element matched by a query, detached from the parsed tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryNode {
    text: String,
    attributes: Vec<(String, String)>,
}

impl QueryNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Concatenated text content of the element and its descendants
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Structural queries over a parsed document.
///
/// Locating, extraction and title lookup only need this; the HTML engine
/// behind it is interchangeable.
pub trait DocumentQuery {
    /// All elements matching a CSS-style structural path, in document order.
    fn select(&self, path: &str) -> Result<Vec<QueryNode>, QueryError>;

    fn select_first(&self, path: &str) -> Result<Option<QueryNode>, QueryError> {
        Ok(self.select(path)?.into_iter().next())
    }
}

/// scraper-backed HTML document.
///
/// Not `Send`; parse, query and drop it between awaits.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }
}

impl DocumentQuery for HtmlDocument {
    fn select(&self, path: &str) -> Result<Vec<QueryNode>, QueryError> {
        let selector = Selector::parse(path).map_err(|e| QueryError::InvalidSelector {
            selector: path.to_string(),
            reason: e.to_string(),
        })?;

        Ok(self
            .html
            .select(&selector)
            .map(|element| QueryNode {
                text: element.text().collect(),
                attributes: element
                    .value()
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
            })
            .collect())
    }
}
