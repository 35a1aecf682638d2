use crate::StatusCode;
use std::{fmt, io};
use thiserror::Error;

/// Everything that can go wrong while reading a request off the wire.
///
/// Every variant except [`Io`](ErrorKind::Io) is a protocol fault: the
/// connection answers it with `400 Bad Request` and the [`Display`] text
/// as the body.
///
/// [`Display`]: std::fmt::Display
#[derive(Debug, Error, PartialEq)]
pub enum ErrorKind {
    #[error("request line is invalid")]
    InvalidRequestLine,
    #[error("http version is not supported")]
    InvalidHttpVersion,
    #[error("request target is invalid")]
    InvalidRequestTarget,
    #[error("method is invalid")]
    InvalidMethod,

    #[error("invalid field name")]
    InvalidFieldName,
    #[error("invalid field line")]
    InvalidFieldLine,

    #[error("body size isn't the same as content length")]
    ContentLengthMismatch,
    #[error("connection closed before the request was complete")]
    UnexpectedEof,

    #[error("i/o error: {0}")]
    Io(IoError),
}

impl ErrorKind {
    /// `false` for transport failures, which close the connection without
    /// an answer.
    #[inline]
    pub const fn is_protocol(&self) -> bool {
        !matches!(self, ErrorKind::Io(_))
    }
}

impl From<io::Error> for ErrorKind {
    fn from(err: io::Error) -> Self {
        ErrorKind::Io(IoError(err))
    }
}

#[derive(Debug)]
pub struct IoError(pub io::Error);

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq for IoError {
    fn eq(&self, other: &Self) -> bool {
        self.0.kind() == other.0.kind()
    }
}

/// A fault reported by the application handler.
///
/// Not an exception: the handler returns it and the server writes it as
/// the response, with `code` as the status and `message` as a
/// `text/plain` body.
///
/// # Examples
/// ```
/// use craft_http::{HandlerError, StatusCode};
///
/// let err = HandlerError::new(StatusCode::INTERNAL_SERVER_ERROR, "database is down\n");
/// assert_eq!(err.code, StatusCode::INTERNAL_SERVER_ERROR);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct HandlerError {
    pub code: StatusCode,
    pub message: String,
}

impl HandlerError {
    #[inline]
    pub fn new<M: Into<String>>(code: StatusCode, message: M) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[inline]
    pub fn bad_request<M: Into<String>>(message: M) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    #[inline]
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<ErrorKind> for HandlerError {
    fn from(err: ErrorKind) -> Self {
        HandlerError::bad_request(format!("{err}\n"))
    }
}

/// Lets handlers use `?` on [`Writer`](crate::Writer) calls. Only useful
/// while nothing has been written yet; see [`Handler`](crate::Handler).
impl From<io::Error> for HandlerError {
    fn from(err: io::Error) -> Self {
        HandlerError::internal(format!("{err}\n"))
    }
}
