use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

pub const EXECUTION_ERROR_MESSAGE: &str = "query execution failed";

/// What a request can fail with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    /// The body was not a valid filter request. Nothing reached the database.
    Validation(String),
    /// The database could not answer. Details are logged, not returned.
    Execution,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonErrorResponse {
    pub message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServerError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ServerError::Execution => (
                StatusCode::INTERNAL_SERVER_ERROR,
                EXECUTION_ERROR_MESSAGE.to_string(),
            ),
        };

        tracing::warn!("Returning error: {message} with status code: {status}");
        (status, Json(JsonErrorResponse { message })).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::Validation(rejection.body_text())
    }
}

impl From<query_engine_execution::error::Error> for ServerError {
    fn from(err: query_engine_execution::error::Error) -> Self {
        match &err {
            query_engine_execution::error::Error::Query(err) => tracing::error!("{}", err),
            query_engine_execution::error::Error::DB(err) => tracing::error!("{}", err),
        }
        ServerError::Execution
    }
}
