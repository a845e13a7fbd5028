//! Common constants used throughout the crate.
//!
//! This was consolidated here so the signer, the canonicalizer, and the error types agree on the
//! exact spelling of every protocol string. If a value is spelled incorrectly, at least it can be
//! fixed in one spot.
//!
//! Tests that are testing the content of an error code or message should not use these constants;
//! they should use hard-coded strings so the tests are also testing for misspellings.
//!
//! Please keep this file organized alphabetically. (This can be a bit hard with comments, etc.)

/// Algorithm for AWS SigV4
pub(crate) const AWS4_HMAC_SHA256: &str = "AWS4-HMAC-SHA256";

/// Prefix applied to the raw secret key before the first derivation step.
pub(crate) const AWS4_KEY_PREFIX: &[u8] = b"AWS4";

/// String included at the end of the AWS SigV4 credential scope
pub(crate) const AWS4_REQUEST: &str = "aws4_request";

/// Content types accepted when no allow-list is configured.
pub(crate) const DEFAULT_ALLOWED_CONTENT_TYPES: &str = "image/jpeg,image/png,image/webp,image/gif";

/// Bucket used when none is configured.
pub(crate) const DEFAULT_BUCKET: &str = "boot";

/// Lifetime of an upload URL when none is configured: 15 minutes.
pub(crate) const DEFAULT_EXPIRES_SECONDS: i64 = 900;

/// Namespace root under which each owner may upload.
pub(crate) const DEFAULT_NAMESPACE_ROOT: &str = "profiles";

/// Region used when none is configured. R2 accepts `us-east-1` as an alias of `auto`.
pub(crate) const DEFAULT_REGION: &str = "us-east-1";

/// Environment variable: R2 access key id.
pub(crate) const ENV_ACCESS_KEY_ID: &str = "R2_ACCESS_KEY_ID";

/// Environment variable: R2 account id; used to form the endpoint host.
pub(crate) const ENV_ACCOUNT_ID: &str = "R2_ACCOUNT_ID";

/// Environment variable: comma-separated content type allow-list.
pub(crate) const ENV_ALLOWED_CONTENT_TYPES: &str = "UPLOAD_ALLOWED_CONTENT_TYPES";

/// Environment variable: bucket name.
pub(crate) const ENV_BUCKET: &str = "UPLOAD_BUCKET";

/// Environment variable: explicit endpoint host; overrides `R2_ACCOUNT_ID`.
pub(crate) const ENV_ENDPOINT_HOST: &str = "UPLOAD_ENDPOINT_HOST";

/// Environment variable: URL lifetime in seconds.
pub(crate) const ENV_EXPIRES_SECONDS: &str = "UPLOAD_EXPIRES_SECONDS";

/// Environment variable: namespace root for owner-scoped uploads.
pub(crate) const ENV_NAMESPACE_ROOT: &str = "UPLOAD_NAMESPACE_ROOT";

/// Environment variable: signing region.
pub(crate) const ENV_REGION: &str = "UPLOAD_REGION";

/// Environment variable: R2 secret access key.
pub(crate) const ENV_SECRET_ACCESS_KEY: &str = "R2_SECRET_ACCESS_KEY";

/// Error code: CryptographicFailure
pub(crate) const ERR_CODE_CRYPTOGRAPHIC_FAILURE: &str = "CryptographicFailure";

/// Error code: InternalFailure
pub(crate) const ERR_CODE_INTERNAL_FAILURE: &str = "InternalFailure";

/// Error code: InvalidConfiguration
pub(crate) const ERR_CODE_INVALID_CONFIGURATION: &str = "InvalidConfiguration";

/// Error code: InvalidContentType
pub(crate) const ERR_CODE_INVALID_CONTENT_TYPE: &str = "InvalidContentType";

/// Error code: InvalidEndpoint
pub(crate) const ERR_CODE_INVALID_ENDPOINT: &str = "InvalidEndpoint";

/// Error code: InvalidExpiry
pub(crate) const ERR_CODE_INVALID_EXPIRY: &str = "InvalidExpiry";

/// Error code: InvalidObjectPath
pub(crate) const ERR_CODE_INVALID_OBJECT_PATH: &str = "InvalidObjectPath";

/// Error code: InvalidTimestamp
pub(crate) const ERR_CODE_INVALID_TIMESTAMP: &str = "InvalidTimestamp";

/// Error code: MalformedQueryString
pub(crate) const ERR_CODE_MALFORMED_QUERY_STRING: &str = "MalformedQueryString";

/// Error code: MissingConfiguration
pub(crate) const ERR_CODE_MISSING_CONFIGURATION: &str = "MissingConfiguration";

/// Error code: MissingParameter
pub(crate) const ERR_CODE_MISSING_PARAMETER: &str = "MissingParameter";

/// Error code: UnauthorizedPath
pub(crate) const ERR_CODE_UNAUTHORIZED_PATH: &str = "UnauthorizedPath";

/// Header for `content-type`
pub(crate) const HDR_CONTENT_TYPE: &str = "content-type";

/// Header for `host`
pub(crate) const HDR_HOST: &str = "host";

/// Uppercase hex digits.
pub(crate) const HEX_DIGITS_UPPER: [u8; 16] =
    [b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'A', b'B', b'C', b'D', b'E', b'F'];

/// Compact ISO8601 format used for the string to sign.
pub(crate) const ISO8601_COMPACT_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// ISO8601 date format used in the credential scope.
pub(crate) const ISO8601_DATE_FORMAT: &str = "%Y%m%d";

/// Longest lifetime SigV4 permits for a pre-signed URL: seven days.
pub(crate) const MAX_EXPIRES_SECONDS: i64 = 604_800;

/// Error message: `"Illegal hex character in escape % pattern: %"`
pub(crate) const MSG_ILLEGAL_HEX_CHAR: &str = "Illegal hex character in escape % pattern: %";

/// Error message: `"Incomplete trailing escape % sequence"`
pub(crate) const MSG_INCOMPLETE_TRAILING_ESCAPE: &str = "Incomplete trailing escape % sequence";

/// Error message: `"Object path is empty"`
pub(crate) const MSG_OBJECT_PATH_EMPTY: &str = "Object path is empty";

/// Query parameter for the signature algorithm
pub(crate) const QP_X_AMZ_ALGORITHM: &str = "X-Amz-Algorithm";

/// Query parameter for delivering the access key and credential scope
pub(crate) const QP_X_AMZ_CREDENTIAL: &str = "X-Amz-Credential";

/// Query parameter for delivering the date
pub(crate) const QP_X_AMZ_DATE: &str = "X-Amz-Date";

/// Query parameter for the lifetime of the URL, in seconds
pub(crate) const QP_X_AMZ_EXPIRES: &str = "X-Amz-Expires";

/// Query parameter for delivering the signature
pub(crate) const QP_X_AMZ_SIGNATURE: &str = "X-Amz-Signature";

/// Query parameter specifying the signed headers
pub(crate) const QP_X_AMZ_SIGNED_HEADERS: &str = "X-Amz-SignedHeaders";

/// Host suffix of Cloudflare R2's S3-compatible endpoint; the account id is prepended.
pub(crate) const R2_ENDPOINT_SUFFIX: &str = "r2.cloudflarestorage.com";

/// Service name for S3-compatible object storage.
pub(crate) const S3: &str = "s3";

/// Output length of SHA-256, in bytes.
pub(crate) const SHA256_OUTPUT_LEN: usize = 32;

/// Payload marker for requests whose body is not hashed into the signature.
pub(crate) const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";
