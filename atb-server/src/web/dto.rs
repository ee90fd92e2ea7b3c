//! Data transfer objects for web requests and responses.

use std::convert::Infallible;

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::{HeaderValue, Uri, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Output format requested in the query string.
///
/// `?pretty` selects indented JSON whether or not it has a value or repeats.
/// Extraction never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormatQuery {
    pub pretty: bool,
}

impl FormatQuery {
    pub fn from_uri(uri: &Uri) -> Self {
        let pretty = Query::<Vec<(String, String)>>::try_from_uri(uri)
            .map(|Query(pairs)| pairs.iter().any(|(key, _)| key == "pretty"))
            .unwrap_or(false);
        Self { pretty }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for FormatQuery {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_uri(&parts.uri))
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,

    /// Error message safe to show to clients
    pub message: String,
}

/// A JSON response, compact or indented.
#[derive(Debug)]
pub struct JsonBody<T> {
    pub value: T,
    pub pretty: bool,
}

impl<T> JsonBody<T> {
    pub fn new(value: T, format: &FormatQuery) -> Self {
        Self {
            value,
            pretty: format.is_pretty(),
        }
    }
}

impl<T: Serialize> IntoResponse for JsonBody<T> {
    fn into_response(self) -> Response {
        let body = if self.pretty {
            serde_json::to_vec_pretty(&self.value)
        } else {
            serde_json::to_vec(&self.value)
        };

        match body {
            Ok(body) => (
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                )],
                body,
            )
                .into_response(),
            Err(e) => {
                error!(error = %e, "failed to serialize response");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    [(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    )],
                    r#"{"status":500,"message":"internal server error"}"#,
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(q: &str) -> FormatQuery {
        let uri: Uri = format!("/x?{q}").parse().unwrap();
        FormatQuery::from_uri(&uri)
    }

    #[test]
    fn pretty_flag_without_value() {
        assert!(query("pretty").is_pretty());
        assert!(query("pretty=1").is_pretty());
        assert!(query("pretty=").is_pretty());
        assert!(query("a=b&pretty").is_pretty());
    }

    #[test]
    fn repeated_pretty_flag() {
        assert!(query("pretty&pretty").is_pretty());
        assert!(query("pretty=1&pretty=0").is_pretty());
    }

    #[test]
    fn no_pretty_flag() {
        assert!(!query("").is_pretty());
        assert!(!query("other=1").is_pretty());
        assert!(!query("prettyish").is_pretty());
        assert!(!query("x=pretty").is_pretty());
        assert!(!FormatQuery::default().is_pretty());

        let uri: Uri = "/x".parse().unwrap();
        assert!(!FormatQuery::from_uri(&uri).is_pretty());
    }

    #[tokio::test]
    async fn sets_json_content_type() {
        let response = JsonBody {
            value: serde_json::json!({"a": 1}),
            pretty: false,
        }
        .into_response();

        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"a":1}"#);
    }

    #[tokio::test]
    async fn pretty_output_is_indented() {
        let response = JsonBody {
            value: serde_json::json!({"a": 1}),
            pretty: true,
        }
        .into_response();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"{\n  \"a\": 1\n}");
    }
}
