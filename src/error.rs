//! Unified error type.

use tracing::{debug, error};

use crate::response::{IntoResponse, Response};
use crate::status::Status;
use crate::validate::ValidationError;

/// The error type returned by appmeta's fallible operations.
///
/// Request-level failures (bad payload, unknown id) and infrastructure
/// failures (binding a port) share this type. Each variant knows which HTTP
/// status it maps to; see the [`IntoResponse`] impl.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed JSON body. Displays the parser's message verbatim.
    #[error("{0}")]
    Json(serde_json::Error),

    /// Malformed YAML body. Displays the parser's message verbatim.
    #[error("{0}")]
    Yaml(serde_yaml::Error),

    #[error("Unsupported Media Type")]
    UnsupportedMediaType,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound,

    #[error("encode: {0}")]
    Encode(serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn status(&self) -> Status {
        match self {
            Self::Json(_) | Self::Yaml(_) | Self::Validation(_) => Status::BadRequest,
            Self::UnsupportedMediaType => Status::UnsupportedMediaType,
            Self::NotFound => Status::NotFound,
            Self::Encode(_) | Self::Io(_) => Status::InternalServerError,
        }
    }
}

/// 4xx errors carry their message as a plain-text body, except `NotFound`
/// which is bodiless. 5xx errors never leak their message to the client.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::NotFound => Response::status(status),
            Self::Encode(_) | Self::Io(_) => {
                error!(error = %self, "request failed");
                Response::status(status)
            }
            _ => {
                debug!(error = %self, "request rejected");
                Response::builder().status(status).text(self.to_string())
            }
        }
    }
}
