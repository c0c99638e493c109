use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CmsError>;

/// Error surface of the document store and the admin API built on it.
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("document not found")]
    NotFound,
    #[error("operation not permitted on this document")]
    NotPermitted,
    #[error("a document with that name already exists here")]
    NameTaken,
    #[error("not a text document")]
    UnsupportedMimeType,
    #[error("{0}")]
    BadRequest(String),
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResponseError for CmsError {
    fn status_code(&self) -> StatusCode {
        match self {
            CmsError::NotFound => StatusCode::NOT_FOUND,
            CmsError::NotPermitted => StatusCode::FORBIDDEN,
            CmsError::NameTaken => StatusCode::CONFLICT,
            CmsError::UnsupportedMimeType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            CmsError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CmsError::Storage(_) | CmsError::Archive(_) | CmsError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_the_failure_kind() {
        assert_eq!(CmsError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(CmsError::NotPermitted.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(CmsError::NameTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            CmsError::UnsupportedMimeType.status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            CmsError::BadRequest("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
