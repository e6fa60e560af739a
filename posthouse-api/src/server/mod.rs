use axum::{
    Json, Router,
    extract::{
        FromRef, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use posthouse_common::model::{Id, InvalidIdError, post::PostMarker};
use posthouse_db::{client::DbError, collection::PostCollection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, error};

mod routes;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, Debug, FromRef)]
pub struct ServerState {
    pub posts: Arc<dyn PostCollection>,
}

impl ServerState {
    #[must_use]
    pub fn new(posts: Arc<dyn PostCollection>) -> Self {
        Self { posts }
    }
}

/// Builds the complete application around an already opened post collection.
pub fn app(state: ServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::routes()
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Incoming JSON rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdError),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("No posts found")]
    NoPosts,
    #[error("Post with id {0} was not found.")]
    PostByIdNotFound(Id<PostMarker>),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::PathRejection(_)
            | ServerError::NoPosts
            | ServerError::PostByIdNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::JsonRejection(_) | ServerError::InvalidIdentifier(_) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of every error reply. Store failures are not described to the client.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
struct ErrorResponse {
    status: u16,
    error: String,
}

impl From<&ServerError> for ErrorResponse {
    fn from(err: &ServerError) -> Self {
        let status = err.status();
        let error = if status.is_server_error() {
            status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_owned()
        } else {
            err.to_string()
        };

        Self {
            status: status.as_u16(),
            error,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, %status, "Replying with error");
        } else {
            debug!(error = %self, %status, "Rejecting request");
        }

        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use crate::server::{ErrorResponse, ServerError};
    use axum::http::StatusCode;
    use posthouse_common::model::{Id, ModelValidationError, post::PostMarker};
    use posthouse_db::client::DbError;

    fn foreign_id_failure() -> ServerError {
        DbError::Data(ModelValidationError::ForeignId("\"legacy\"".to_owned())).into()
    }

    #[test]
    fn reads_on_nothing_are_not_found() {
        assert_eq!(ServerError::NoPosts.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServerError::PostByIdNotFound(Id::generate()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn malformed_ids_are_bad_requests() {
        let err = "nope".parse::<Id<PostMarker>>().unwrap_err();
        assert_eq!(ServerError::from(err).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_failures_are_internal_errors() {
        assert_eq!(
            foreign_id_failure().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn client_errors_are_described() {
        assert_eq!(
            ErrorResponse::from(&ServerError::NoPosts),
            ErrorResponse {
                status: 404,
                error: "No posts found".to_owned(),
            }
        );
    }

    #[test]
    fn store_failures_are_not_described() {
        assert_eq!(
            ErrorResponse::from(&foreign_id_failure()),
            ErrorResponse {
                status: 500,
                error: "Internal Server Error".to_owned(),
            }
        );
    }
}
