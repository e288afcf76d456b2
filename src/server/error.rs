//! Error types and response handling for the proxy's HTTP surface.
//!
//! Maps each error class to an HTTP status and a `{error, details}` JSON body.
//! An unknown strategy name is deliberately not represented here: it resolves
//! silently to the configured default instead of failing the request.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::executor::ExecutorError;

/// Errors that can terminate a `/sql` request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Request body carried no query.
    #[error("Missing 'query' in body")]
    MissingQuery,

    /// Statement matched the proxy-side denylist.
    #[error("Forbidden SQL command at proxy")]
    Forbidden { fragment: &'static str },

    /// Connection or execution failure on the chosen host.
    #[error(transparent)]
    Execution(#[from] ExecutorError),
}

impl ProxyError {
    /// Map error variant to the appropriate HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingQuery => StatusCode::BAD_REQUEST,
            ProxyError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ProxyError::Execution(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error identifier for logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            ProxyError::MissingQuery => "missing_query",
            ProxyError::Forbidden { .. } => "forbidden_statement",
            ProxyError::Execution(ExecutorError::Connection { .. })
            | ProxyError::Execution(ExecutorError::ConnectTimeout { .. }) => "connection_error",
            ProxyError::Execution(ExecutorError::Query { .. }) => "query_error",
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ProxyError::MissingQuery => None,
            ProxyError::Forbidden { fragment } => {
                Some(format!("statement contains '{fragment}'"))
            }
            ProxyError::Execution(err) => Some(err.detail()),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::warn!(error_type = self.error_type(), error = %self, "request failed");

        let mut body = serde_json::json!({ "error": self.to_string() });
        if let Some(details) = self.details() {
            body["details"] = serde_json::Value::String(details);
        }
        (self.status_code(), Json(body)).into_response()
    }
}
