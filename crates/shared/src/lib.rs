// Public modules
pub mod assembler;
pub mod config;
pub mod document;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod io;
pub mod job;
pub mod locator;
pub mod models;
pub mod notifier;
pub mod resolver;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::{Config, MailgunConfig, RunMode};
pub use document::{DocumentQuery, HtmlDocument, QueryNode};
pub use error::{DeliveryError, FetchError, QueryError, RunError};
pub use extractor::ArticleExtractor;
pub use fetcher::{DocumentFetcher, HttpFetcher};
pub use io::{get_default_reads_dir, save_payload};
pub use job::{ReadsJob, RunReport};
pub use locator::{Candidate, PostLocator};
pub use models::{ArticleRecord, ResultSet};
pub use notifier::{notifier_for, ConsoleNotifier, DeliveryContext, MailgunNotifier, Notifier};
pub use resolver::{ResolvedTitle, TitleResolver, TitleSource};
