use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CallmeError {
    #[error("Internal server error")]
    InternalError,
    #[error("{0}")]
    BadClientData(String),
    #[error("{0}")]
    NotFound(String),
}

/// Body of every error response
#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ResponseError for CallmeError {
    fn status_code(&self) -> StatusCode {
        match *self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadClientData(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            detail: self.to_string(),
        })
    }
}
