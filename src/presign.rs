//! AWS SigV4 query-string (pre-signed URL) signing.
//!
//! This implements the [query-parameter authentication](https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-query-string-auth.html)
//! variant of SigV4 for a single `PUT`: the resulting URL lets its holder upload exactly one object, at exactly one
//! path, declaring exactly one content type, until the embedded expiry passes. The payload is not hashed
//! (`UNSIGNED-PAYLOAD`).
//!
//! Signing is a pure function of its inputs. No keys are cached between calls.

use {
    crate::{
        canonical::{normalize_object_path, query_string_to_decoded_pairs, uri_encode, CanonicalRequest},
        chronoutil::{FormatSigV4, ParseISO8601},
        constants::*,
        ContentTypeAllowList, CredentialScope, Credentials, KSecretKey, PresignError,
    },
    chrono::{DateTime, Datelike, Duration, Utc},
    derive_builder::Builder,
    http::{
        uri::{Authority, Scheme},
        Method,
    },
    log::{debug, trace},
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// The object storage endpoint URLs are issued for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    scheme: Scheme,
    authority: Authority,
    bucket: Option<String>,
}

impl Endpoint {
    /// Create an endpoint from a scheme (`http` or `https`) and a host (optionally with a port).
    ///
    /// The host becomes the signed `host` header, lower-cased. An empty host is a configuration error; a host that
    /// cannot appear in a URL authority, or one carrying user info, is [`PresignError::InvalidEndpoint`].
    pub fn new(scheme: &str, host: &str) -> Result<Self, PresignError> {
        let scheme = match scheme {
            "https" => Scheme::HTTPS,
            "http" => Scheme::HTTP,
            _ => return Err(PresignError::InvalidEndpoint(format!("Unsupported endpoint scheme: {}", scheme))),
        };

        if host.is_empty() {
            return Err(PresignError::MissingConfiguration("Endpoint host is empty".to_string()));
        }

        let authority = Authority::from_str(&host.to_ascii_lowercase())
            .map_err(|e| PresignError::InvalidEndpoint(format!("Invalid endpoint host {:?}: {}", host, e)))?;
        if authority.as_str().contains('@') {
            return Err(PresignError::InvalidEndpoint(format!("Endpoint host must not contain user info: {}", host)));
        }

        Ok(Self {
            scheme,
            authority,
            bucket: None,
        })
    }

    /// Create an `https` endpoint for the given host.
    pub fn https(host: &str) -> Result<Self, PresignError> {
        Self::new("https", host)
    }

    /// Create the Cloudflare R2 endpoint for an account: `https://{account_id}.r2.cloudflarestorage.com`.
    pub fn r2(account_id: &str) -> Result<Self, PresignError> {
        if account_id.is_empty() {
            return Err(PresignError::MissingConfiguration("R2 account id is empty".to_string()));
        }

        Self::https(&format!("{}.{}", account_id, R2_ENDPOINT_SUFFIX))
    }

    /// Use path-style addressing: object paths are signed and issued as `/{bucket}/{path}`.
    pub fn with_bucket(mut self, bucket: &str) -> Result<Self, PresignError> {
        if bucket.is_empty() || !bucket.bytes().all(crate::canonical::is_rfc3986_unreserved) {
            return Err(PresignError::InvalidEndpoint(format!("Invalid bucket name: {:?}", bucket)));
        }

        self.bucket = Some(bucket.to_string());
        Ok(self)
    }

    /// Retrieve the URL scheme.
    #[inline]
    pub fn scheme(&self) -> &str {
        self.scheme.as_str()
    }

    /// Retrieve the host (and port, if any). This is the value of the signed `host` header.
    #[inline]
    pub fn host(&self) -> &str {
        self.authority.as_str()
    }

    /// Retrieve the bucket used for path-style addressing, if any.
    #[inline]
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// The absolute request path for a normalized object path.
    fn request_path(&self, object_path: &str) -> String {
        match &self.bucket {
            Some(bucket) => format!("/{}/{}", bucket, object_path),
            None => format!("/{}", object_path),
        }
    }
}

/// A request for a pre-signed upload URL.
///
/// PresignRequest structs are immutable. Use [`PresignRequestBuilder`] to programmatically construct a request.
#[derive(Builder, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct PresignRequest {
    /// The object path, relative to the bucket. Slashes are collapsed before signing.
    #[builder(setter(into))]
    object_path: String,

    /// The content type the upload must declare.
    #[builder(setter(into))]
    content_type: String,

    /// How long the URL remains valid, in seconds.
    #[builder(default = "DEFAULT_EXPIRES_SECONDS")]
    expires_in: i64,

    /// The signing instant. Defaults to the current time.
    #[builder(default = "Utc::now()")]
    timestamp: DateTime<Utc>,
}

impl PresignRequest {
    /// Create a [PresignRequestBuilder] to construct a [PresignRequest].
    #[inline]
    pub fn builder() -> PresignRequestBuilder {
        PresignRequestBuilder::default()
    }

    /// Retrieve the object path.
    #[inline]
    pub fn object_path(&self) -> &str {
        &self.object_path
    }

    /// Retrieve the content type.
    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Retrieve the expiry, in seconds.
    #[inline]
    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    /// Retrieve the signing instant.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl PresignRequestBuilder {
    /// Set the signing instant from an ISO 8601 string, e.g. `20240101T000000Z` or `2024-01-01T09:00:00+09:00`.
    pub fn signed_at(&mut self, timestamp: &str) -> Result<&mut Self, PresignError> {
        let timestamp = DateTime::<Utc>::parse_from_iso8601(timestamp)?;
        Ok(self.timestamp(timestamp))
    }
}

/// A pre-signed URL, along with the parameters it was issued for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresignedUrl {
    url: String,
    signature: String,
    content_type: String,
    expires_in: i64,
    timestamp: DateTime<Utc>,
}

impl PresignedUrl {
    /// Retrieve the full URL.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Retrieve the lowercase hex signature carried in `X-Amz-Signature`.
    #[inline]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Retrieve the content type the upload must declare.
    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Retrieve the lifetime of the URL, in seconds.
    #[inline]
    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    /// Retrieve the signing instant, truncated to whole seconds.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The instant after which the storage endpoint will refuse the URL.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.timestamp.checked_add_signed(Duration::seconds(self.expires_in)).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// The decoded query parameters of the URL, in the order they appear.
    pub fn query_parameters(&self) -> Result<Vec<(String, String)>, PresignError> {
        let query = self.url.split_once('?').map(|(_, query)| query).unwrap_or("");
        query_string_to_decoded_pairs(query)
    }
}

impl Display for PresignedUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.url)
    }
}

/// A request signer bound to a set of credentials, an endpoint, and a content type allow-list.
#[derive(Clone, Debug)]
pub struct RequestSigner {
    credentials: Credentials,
    endpoint: Endpoint,
    allowed_content_types: ContentTypeAllowList,
}

impl RequestSigner {
    /// Create a new request signer.
    pub fn new(credentials: Credentials, endpoint: Endpoint, allowed_content_types: ContentTypeAllowList) -> Self {
        Self {
            credentials,
            endpoint,
            allowed_content_types,
        }
    }

    /// Retrieve the credentials' public parts (the secret key is redacted from `Debug`).
    #[inline]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Retrieve the endpoint.
    #[inline]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Retrieve the content type allow-list.
    #[inline]
    pub fn allowed_content_types(&self) -> &ContentTypeAllowList {
        &self.allowed_content_types
    }

    /// Sign a request, rejecting content types outside the allow-list before any other work.
    pub fn sign(&self, request: &PresignRequest) -> Result<PresignedUrl, PresignError> {
        if !self.allowed_content_types.contains(request.content_type()) {
            debug!("sign: content type {:?} is not allowed", request.content_type());
            return Err(PresignError::InvalidContentType(format!("Invalid content type: {}", request.content_type())));
        }

        presign_put(
            &self.credentials,
            &self.endpoint,
            request.object_path(),
            request.content_type(),
            request.expires_in(),
            request.timestamp(),
        )
    }
}

/// Produce a pre-signed URL authorizing a single `PUT` of `content_type` to `object_path` on `endpoint`.
///
/// All inputs are validated before any hashing takes place:
/// * `object_path` is slash-normalized with [`normalize_object_path`]; an empty result, `.`/`..` segments, or
///   characters needing percent-encoding fail with [`PresignError::InvalidObjectPath`].
/// * `content_type` must be non-empty printable ASCII, else [`PresignError::InvalidContentType`].
/// * `expires_in` must be in `1..=604800`, else [`PresignError::InvalidExpiry`].
/// * `now` must fall in years `0..=9999`, the range a compact SigV4 timestamp can express, else
///   [`PresignError::InvalidTimestamp`].
///
/// `now` is truncated to whole seconds. The result is byte-for-byte reproducible for identical inputs.
pub fn presign_put(
    credentials: &Credentials,
    endpoint: &Endpoint,
    object_path: &str,
    content_type: &str,
    expires_in: i64,
    now: DateTime<Utc>,
) -> Result<PresignedUrl, PresignError> {
    let object_path = normalize_object_path(object_path)?;
    validate_content_type(content_type)?;
    validate_expiry(expires_in)?;
    validate_timestamp(&now)?;

    let timestamp = now.truncate_to_seconds();
    let request_path = endpoint.request_path(&object_path);
    let headers = [(HDR_CONTENT_TYPE, content_type), (HDR_HOST, endpoint.host())];
    let (query, signature) = sign_query_request(
        Method::PUT,
        &request_path,
        &headers,
        credentials.access_key_id(),
        credentials.secret_key(),
        &CredentialScope::new(timestamp.date_naive(), credentials.region(), S3),
        timestamp,
        expires_in,
    )?;

    let url = format!(
        "{}://{}{}?{}&{}={}",
        endpoint.scheme(),
        endpoint.host(),
        request_path,
        query,
        QP_X_AMZ_SIGNATURE,
        uri_encode(&signature)
    );

    debug!("Presigned PUT {} (content-type {}, expires in {}s)", request_path, content_type, expires_in);

    Ok(PresignedUrl {
        url,
        signature,
        content_type: content_type.to_string(),
        expires_in,
        timestamp,
    })
}

fn validate_content_type(content_type: &str) -> Result<(), PresignError> {
    if content_type.trim().is_empty() {
        return Err(PresignError::InvalidContentType("Missing content type".to_string()));
    }

    if !content_type.bytes().all(|c| c.is_ascii_graphic() || c == b' ') {
        return Err(PresignError::InvalidContentType(format!(
            "Content type contains characters not allowed in a header value: {}",
            content_type.escape_debug()
        )));
    }

    Ok(())
}

fn validate_expiry(expires_in: i64) -> Result<(), PresignError> {
    if expires_in <= 0 {
        return Err(PresignError::InvalidExpiry(format!("Expiry must be positive: {}", expires_in)));
    }

    if expires_in > MAX_EXPIRES_SECONDS {
        return Err(PresignError::InvalidExpiry(format!(
            "Expiry must not exceed {} seconds: {}",
            MAX_EXPIRES_SECONDS, expires_in
        )));
    }

    Ok(())
}

fn validate_timestamp(now: &DateTime<Utc>) -> Result<(), PresignError> {
    if !(0..=9999).contains(&now.year()) {
        return Err(PresignError::InvalidTimestamp(format!(
            "Signing instant is outside years 0 through 9999: {}",
            now.to_rfc3339()
        )));
    }

    Ok(())
}

/// Return the string to sign: algorithm, timestamp, credential scope, and hex canonical request hash, newline-joined.
fn string_to_sign(timestamp: &str, scope: &CredentialScope, canonical_request: &CanonicalRequest) -> Vec<u8> {
    let hashed_canonical_request = hex::encode(canonical_request.canonical_request_sha256());
    let scope = scope.to_string();

    let mut result = Vec::with_capacity(
        AWS4_HMAC_SHA256.len() + 1 + timestamp.len() + 1 + scope.len() + 1 + hashed_canonical_request.len(),
    );
    result.extend(AWS4_HMAC_SHA256.as_bytes());
    result.push(b'\n');
    result.extend(timestamp.as_bytes());
    result.push(b'\n');
    result.extend(scope.as_bytes());
    result.push(b'\n');
    result.extend(hashed_canonical_request.as_bytes());
    result
}

/// Sign an arbitrary query-string authenticated request. Returns the canonical query string (without the signature)
/// and the hex signature.
#[allow(clippy::too_many_arguments)]
fn sign_query_request(
    method: Method,
    request_path: &str,
    headers: &[(&str, &str)],
    access_key_id: &str,
    secret_key: &KSecretKey,
    scope: &CredentialScope,
    timestamp: DateTime<Utc>,
    expires_in: i64,
) -> Result<(String, String), PresignError> {
    let amz_date = timestamp.to_sigv4_timestamp();
    let credential = format!("{}/{}", access_key_id, scope);
    let expires = expires_in.to_string();

    let mut signed_headers = headers.iter().map(|(name, _)| name.to_ascii_lowercase()).collect::<Vec<String>>();
    signed_headers.sort_unstable();
    signed_headers.dedup();
    let signed_headers = signed_headers.join(";");

    let canonical_request = CanonicalRequest::new(
        method,
        request_path,
        &[
            (QP_X_AMZ_ALGORITHM, AWS4_HMAC_SHA256),
            (QP_X_AMZ_CREDENTIAL, &credential),
            (QP_X_AMZ_DATE, &amz_date),
            (QP_X_AMZ_EXPIRES, &expires),
            (QP_X_AMZ_SIGNED_HEADERS, &signed_headers),
        ],
        headers,
        UNSIGNED_PAYLOAD,
    );

    let string_to_sign = string_to_sign(&amz_date, scope, &canonical_request);
    trace!("String to sign:\n{}", String::from_utf8_lossy(&string_to_sign));

    let signature = secret_key.to_ksigning(scope)?.sign(&string_to_sign)?;
    Ok((canonical_request.canonical_query_string(), signature))
}
