use thiserror::Error;

use crate::models::ResultSet;

/// Failure to obtain a document. Fatal for the index and the post,
/// recovered per article by the title resolver.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("status code error fetching {url}: {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to send message: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail API returned {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to write payload: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a run ended without delivering its result.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("could not query document: {0}")]
    Query(#[from] QueryError),

    #[error("no reading-list post found on {index_url}")]
    PostNotFound { index_url: String },

    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The result was computed; only delivery failed.
    #[error("delivery of {} articles failed: {source}", .result.len())]
    Delivery {
        #[source]
        source: DeliveryError,
        result: ResultSet,
    },
}

impl RunError {
    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::Fetch(_) => "fetch",
            RunError::Query(_) => "parse",
            RunError::PostNotFound { .. } => "not_found",
            RunError::Serialize(_) => "serialize",
            RunError::Delivery { .. } => "delivery",
        }
    }

    /// The computed result, when the failure happened after assembly.
    pub fn result(&self) -> Option<&ResultSet> {
        match self {
            RunError::Delivery { result, .. } => Some(result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleRecord;

    #[test]
    fn test_delivery_error_keeps_result() {
        let result = ResultSet::from(vec![ArticleRecord::new("https://a.test/x", "X")]);
        let err = RunError::Delivery {
            source: DeliveryError::Rejected {
                status: reqwest::StatusCode::UNAUTHORIZED,
                body: "Forbidden".to_string(),
            },
            result,
        };

        assert_eq!(err.kind(), "delivery");
        assert_eq!(err.result().map(|r| r.len()), Some(1));
        assert!(err.to_string().contains("delivery of 1 articles failed"));
    }

    #[test]
    fn test_not_found_is_not_delivery() {
        let err = RunError::PostNotFound {
            index_url: "http://blog.test/".to_string(),
        };
        assert_eq!(err.kind(), "not_found");
        assert!(err.result().is_none());
    }
}
