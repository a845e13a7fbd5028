use {
    crate::constants::*,
    http::status::StatusCode,
    scratchstack_errors::ServiceError,
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// The broad class of a [`PresignError`], used by callers to decide how to surface a failure.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// Required configuration (credentials, region, endpoint) is missing or unusable. Maps to a 5xx response.
    Configuration,

    /// The caller supplied malformed or disallowed input. Maps to a 4xx response.
    Validation,

    /// A hashing or keying primitive rejected its input. Not retryable.
    Cryptographic,
}

/// Error returned when a pre-signed URL cannot be produced.
///
/// Every variant other than [`PresignError::CryptographicFailure`] is raised before any hashing takes place.
#[derive(Debug)]
#[non_exhaustive]
pub enum PresignError {
    /// A hashing or keying primitive failed.
    CryptographicFailure(/* message */ String),

    /// A failure returned by a collaborator across a service boundary that is not a `PresignError`.
    InternalServiceError(Box<dyn Error + Send + Sync>),

    /// A configuration value is present but unusable (e.g. a non-numeric expiry or an empty allow-list).
    InvalidConfiguration(/* message */ String),

    /// The content type is empty or not on the caller's allow-list.
    InvalidContentType(/* message */ String),

    /// The endpoint host or scheme is not usable in a URL.
    InvalidEndpoint(/* message */ String),

    /// The expiry is zero, negative, or longer than SigV4 permits.
    InvalidExpiry(/* message */ String),

    /// The object path is empty after slash normalization, or contains segments or characters that cannot be
    /// signed without changing which object the URL refers to.
    InvalidObjectPath(/* message */ String),

    /// A caller-supplied signing instant is not a valid ISO 8601 timestamp.
    InvalidTimestamp(/* message */ String),

    /// A query string could not be decoded.
    /// `Incomplete trailing escape % sequence`
    MalformedQueryString(/* message */ String),

    /// A request omitted a required field.
    MissingParameter(/* message */ String),

    /// A required credential, region, or other configuration value is absent.
    MissingConfiguration(/* message */ String),

    /// The object path is outside the namespace the caller is permitted to write to.
    UnauthorizedPath(/* message */ String),
}

impl PresignError {
    /// The broad class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingConfiguration(_)
            | Self::InvalidConfiguration(_)
            | Self::InvalidEndpoint(_)
            | Self::InternalServiceError(_) => ErrorKind::Configuration,
            Self::CryptographicFailure(_) => ErrorKind::Cryptographic,
            Self::InvalidContentType(_)
            | Self::InvalidExpiry(_)
            | Self::InvalidObjectPath(_)
            | Self::InvalidTimestamp(_)
            | Self::MalformedQueryString(_)
            | Self::MissingParameter(_)
            | Self::UnauthorizedPath(_) => ErrorKind::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CryptographicFailure(_) => ERR_CODE_CRYPTOGRAPHIC_FAILURE,
            Self::InternalServiceError(_) => ERR_CODE_INTERNAL_FAILURE,
            Self::InvalidConfiguration(_) => ERR_CODE_INVALID_CONFIGURATION,
            Self::InvalidContentType(_) => ERR_CODE_INVALID_CONTENT_TYPE,
            Self::InvalidEndpoint(_) => ERR_CODE_INVALID_ENDPOINT,
            Self::InvalidExpiry(_) => ERR_CODE_INVALID_EXPIRY,
            Self::InvalidObjectPath(_) => ERR_CODE_INVALID_OBJECT_PATH,
            Self::InvalidTimestamp(_) => ERR_CODE_INVALID_TIMESTAMP,
            Self::MalformedQueryString(_) => ERR_CODE_MALFORMED_QUERY_STRING,
            Self::MissingConfiguration(_) => ERR_CODE_MISSING_CONFIGURATION,
            Self::MissingParameter(_) => ERR_CODE_MISSING_PARAMETER,
            Self::UnauthorizedPath(_) => ERR_CODE_UNAUTHORIZED_PATH,
        }
    }

    fn http_status(&self) -> StatusCode {
        match self {
            Self::UnauthorizedPath(_) => StatusCode::FORBIDDEN,
            _ => match self.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::Configuration | ErrorKind::Cryptographic => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl ServiceError for PresignError {
    fn error_code(&self) -> &'static str {
        PresignError::error_code(self)
    }

    fn http_status(&self) -> StatusCode {
        PresignError::http_status(self)
    }
}

impl Display for PresignError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::CryptographicFailure(msg) => f.write_str(msg),
            Self::InternalServiceError(ref e) => Display::fmt(e, f),
            Self::InvalidConfiguration(msg) => f.write_str(msg),
            Self::InvalidContentType(msg) => f.write_str(msg),
            Self::InvalidEndpoint(msg) => f.write_str(msg),
            Self::InvalidExpiry(msg) => f.write_str(msg),
            Self::InvalidObjectPath(msg) => f.write_str(msg),
            Self::InvalidTimestamp(msg) => f.write_str(msg),
            Self::MalformedQueryString(msg) => f.write_str(msg),
            Self::MissingConfiguration(msg) => f.write_str(msg),
            Self::MissingParameter(msg) => f.write_str(msg),
            Self::UnauthorizedPath(msg) => f.write_str(msg),
        }
    }
}

impl Error for PresignError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InternalServiceError(ref e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<Box<dyn Error + Send + Sync>> for PresignError {
    fn from(e: Box<dyn Error + Send + Sync>) -> PresignError {
        match e.downcast::<PresignError>() {
            Ok(presign_err) => *presign_err,
            Err(e) => PresignError::InternalServiceError(e),
        }
    }
}
