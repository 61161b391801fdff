use crate::utils::try_respond;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::{self, Json};
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, error, warn};

pub const INVALID_PATH: &str = "Not Found: Invalid Path";
pub const INVALID_ARTICLE_ID: &str = "Bad Request: Invalid Article ID";
pub const INVALID_COMMENT_ID: &str = "Bad Request: Invalid Comment ID";
pub const INVALID_BODY: &str = "Bad Request: Invalid Request Body";
pub const INVALID_INPUT: &str = "Bad Request: Invalid Input";
pub const MISSING_FIELDS: &str = "Bad Request: Missing Required Fields";
pub const NO_SUCH_ARTICLE: &str = "Not Found: Non-Existent Article ID";
pub const NO_SUCH_COMMENT: &str = "Not Found: Non-Existent Comment ID";
pub const NO_SUCH_TOPIC: &str = "Not Found: Non-Existent Topic";
pub const NO_SUCH_USER: &str = "Not Found: Non-Existent Username";
pub const NO_SUCH_REFERENCE: &str = "Not Found: Referenced Resource Does Not Exist";
pub const INTERNAL: &str = "Internal Server Error";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(Cow<'static, str>),
    NotFound(Cow<'static, str>),
    Diesel(DieselError),
    Pool(r2d2::Error),
    Internal,
}

impl ApiError {
    pub fn bad_request<M: Into<Cow<'static, str>>>(message: M) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found<M: Into<Cow<'static, str>>>(message: M) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Status and message this error is rendered with.
    ///
    /// Explicit rejects win, then database errors recognised by SQLSTATE,
    /// and anything left over is a 500.
    pub fn status_and_message(&self) -> (Status, Cow<'static, str>) {
        self.explicit()
            .or_else(|| self.translated())
            .unwrap_or_else(|| self.internal())
    }

    fn explicit(&self) -> Option<(Status, Cow<'static, str>)> {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (Status::BadRequest, message.clone()),
            ApiError::NotFound(message) => (Status::NotFound, message.clone()),
            _ => return None,
        };
        debug!(status = status.code, %message, "request rejected");
        Some((status, message))
    }

    fn translated(&self) -> Option<(Status, Cow<'static, str>)> {
        let ApiError::Diesel(err) = self else {
            return None;
        };
        let translated = translate_database_error(err)?;
        warn!(status = translated.0.code, error = %err, "database error translated");
        Some(translated)
    }

    fn internal(&self) -> (Status, Cow<'static, str>) {
        error!(error = ?self, "unhandled error");
        (Status::InternalServerError, Cow::Borrowed(INTERNAL))
    }
}

impl From<DieselError> for ApiError {
    fn from(err: DieselError) -> ApiError {
        ApiError::Diesel(err)
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(err: r2d2::Error) -> ApiError {
        ApiError::Pool(err)
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub message: &'a str,
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let (status, message) = self.status_and_message();
        try_respond(req, &ErrorBody { message: &message }, status)
    }
}

/// PostgreSQL error codes the API gives a meaning to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PgErrorCode {
    /// 22003
    NumericValueOutOfRange,
    /// 22P02
    InvalidTextRepresentation,
    /// 23502
    NotNullViolation,
    /// 23503
    ForeignKeyViolation,
}

impl PgErrorCode {
    pub fn sqlstate(self) -> &'static str {
        match self {
            PgErrorCode::NumericValueOutOfRange => "22003",
            PgErrorCode::InvalidTextRepresentation => "22P02",
            PgErrorCode::NotNullViolation => "23502",
            PgErrorCode::ForeignKeyViolation => "23503",
        }
    }

    /// Recovers the code from a driver error. Diesel only surfaces a
    /// `DatabaseErrorKind`; 22P02 and 22003 arrive as `Unknown` and are
    /// recognised from the server's message text.
    pub fn of(kind: &DatabaseErrorKind, info: &dyn DatabaseErrorInformation) -> Option<Self> {
        match kind {
            DatabaseErrorKind::NotNullViolation => Some(PgErrorCode::NotNullViolation),
            DatabaseErrorKind::ForeignKeyViolation => Some(PgErrorCode::ForeignKeyViolation),
            _ if info.message().ends_with("out of range") => {
                Some(PgErrorCode::NumericValueOutOfRange)
            }
            _ if info.message().starts_with("invalid input syntax") => {
                Some(PgErrorCode::InvalidTextRepresentation)
            }
            _ => None,
        }
    }
}

/// Maps a database error onto the HTTP error vocabulary, or `None` if it
/// should fall through to a 500.
pub fn translate_database_error(err: &DieselError) -> Option<(Status, Cow<'static, str>)> {
    match err {
        DieselError::NotFound => Some((Status::NotFound, Cow::Borrowed("Not Found"))),
        DieselError::DatabaseError(kind, info) => {
            let code = PgErrorCode::of(kind, info.as_ref())?;
            let message = match code {
                PgErrorCode::NumericValueOutOfRange | PgErrorCode::InvalidTextRepresentation => {
                    INVALID_INPUT
                }
                PgErrorCode::NotNullViolation => MISSING_FIELDS,
                PgErrorCode::ForeignKeyViolation => {
                    return Some((Status::NotFound, Cow::Borrowed(missing_reference(info.constraint_name()))));
                }
            };
            Some((Status::BadRequest, Cow::Borrowed(message)))
        }
        _ => None,
    }
}

fn missing_reference(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("comments_article_id_fkey") => NO_SUCH_ARTICLE,
        Some("comments_author_fkey") => NO_SUCH_USER,
        _ => NO_SUCH_REFERENCE,
    }
}

/// Parses a path id. Anything that is not a plain integer is rejected with
/// `message` before a query is issued.
pub fn parse_id(raw: &str, message: &'static str) -> Result<i32, ApiError> {
    raw.parse::<i32>().map_err(|_| ApiError::bad_request(message))
}

/// Unwraps a decoded JSON body. Bodies that fail to parse, or carry fields of
/// the wrong type, are a 400.
pub fn json_body<T>(body: Result<Json<T>, json::Error<'_>>) -> Result<T, ApiError> {
    body.map(Json::into_inner).map_err(|e| {
        debug!(error = ?e, "undecodable request body");
        ApiError::bad_request(INVALID_BODY)
    })
}
