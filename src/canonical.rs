//! Canonicalization functionality for pre-signed URL generation.
//!
//! This includes the strict RFC 3986 percent-encoding used by SigV4, object path and header value
//! normalization, and the ability to build an AWS SigV4 canonical request for a query-string
//! (pre-signed) request.
//!
//! **Stability of this module is not guaranteed except for items exposed at the crate root**.
//! The functions and types are subject to change in minor/patch versions. This is exposed for
//! testing purposes only.

use {
    crate::{constants::*, crypto::sha256, PresignError},
    http::Method,
    lazy_static::lazy_static,
    log::trace,
    qualifier_attr::qualifiers,
    regex::Regex,
    std::{collections::BTreeMap, str::from_utf8},
};

lazy_static! {
    /// Multiple slash pattern for condensing object paths
    static ref MULTISLASH: Regex = Regex::new("//+").unwrap();
}

/// A canonicalized request for AWS SigV4 query-string authentication.
///
/// Query parameters are held already percent-encoded and sorted; headers are held lower-cased, normalized, and
/// sorted by name. The payload is represented only by its marker (e.g. `UNSIGNED-PAYLOAD`).
///
/// **The stability of this struct is not guaranteed.** The fields and methods are subject to
/// change in minor/patch versions.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[derive(Clone, Debug)]
struct CanonicalRequest {
    /// The HTTP method for the request (e.g., "GET", "PUT", etc.)
    request_method: Method,

    /// The canonical path, including the leading slash. This is guaranteed to be ASCII.
    canonical_path: String,

    /// Percent-encoded query parameters, sorted by name and then by value.
    query_parameters: Vec<(String, String)>,

    /// Signed headers, keyed by lower-case name.
    headers: BTreeMap<String, String>,

    /// The payload hash or payload marker.
    payload_hash: String,
}

impl CanonicalRequest {
    /// Create a CanonicalRequest from its unencoded parts.
    ///
    /// Query parameter names and values are percent-encoded here; header names are lower-cased and header values
    /// normalized.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn new(
        request_method: Method,
        canonical_path: &str,
        query_parameters: &[(&str, &str)],
        headers: &[(&str, &str)],
        payload_hash: &str,
    ) -> Self {
        let headers = headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), normalize_header_value(value)))
            .collect::<BTreeMap<String, String>>();

        CanonicalRequest {
            request_method,
            canonical_path: canonical_path.to_string(),
            query_parameters: encode_and_sort_query(query_parameters),
            headers,
            payload_hash: payload_hash.to_string(),
        }
    }

    /// Retrieve the HTTP request method.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn request_method(&self) -> &Method {
        &self.request_method
    }

    /// Retrieve the canonical path.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn canonical_path(&self) -> &str {
        &self.canonical_path
    }

    /// Get the canonical query string: `name=value` pairs joined with `&`, in sorted order.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn canonical_query_string(&self) -> String {
        join_query(&self.query_parameters)
    }

    /// Get the semicolon-separated list of signed header names.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn signed_headers(&self) -> String {
        self.headers.keys().map(String::as_str).collect::<Vec<&str>>().join(";")
    }

    /// Get the [canonical request to hash](https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html)
    /// for the request.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn canonical_request(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(1024);
        result.extend(self.request_method().as_str().as_bytes());
        result.push(b'\n');
        result.extend(self.canonical_path().as_bytes());
        result.push(b'\n');
        result.extend(self.canonical_query_string().as_bytes());
        result.push(b'\n');

        for (name, value) in self.headers.iter() {
            result.extend(name.as_bytes());
            result.push(b':');
            result.extend(value.as_bytes());
            result.push(b'\n');
        }

        result.push(b'\n');
        result.extend(self.signed_headers().as_bytes());
        result.push(b'\n');
        result.extend(self.payload_hash.as_bytes());

        trace!("Canonical request:\n{}", String::from_utf8_lossy(&result));

        result
    }

    /// Get the SHA-256 hash of the [canonical request](https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html).
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn canonical_request_sha256(&self) -> [u8; SHA256_OUTPUT_LEN] {
        sha256(&self.canonical_request())
    }
}

/// Percent-encode each name and value, then sort by encoded name (byte-wise) and then by encoded value.
fn encode_and_sort_query(query_parameters: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut result =
        query_parameters.iter().map(|(name, value)| (uri_encode(name), uri_encode(value))).collect::<Vec<_>>();
    result.sort_unstable();
    result
}

/// Join encoded `(name, value)` pairs into a query string.
fn join_query(pairs: &[(String, String)]) -> String {
    pairs.iter().map(|(name, value)| format!("{}={}", name, value)).collect::<Vec<String>>().join("&")
}

/// Indicates whether the specified byte is RFC3986 unreserved -- i.e., can be represented without being
/// percent-encoded, e.g. '?' -> '%3F'.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[inline(always)]
pub fn is_rfc3986_unreserved(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'.' || c == b'_' || c == b'~'
}

/// Normalizes a header value by trimming whitespace and converting multiple spaces to a single space.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
pub fn normalize_header_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());

    // Remove leading whitespace and reduce multiple spaces to a single space.
    let mut last_was_space = true;

    for c in value.trim().chars() {
        if c == ' ' {
            if !last_was_space {
                result.push(' ');
                last_was_space = true;
            }
        } else {
            result.push(c);
            last_was_space = false;
        }
    }

    result
}

/// Normalize an object path by collapsing slashes: leading, trailing, and repeated slashes are removed.
///
/// No other rewriting is performed. Paths that would need rewriting to be signed unambiguously are rejected
/// instead: `.` and `..` segments, and any byte outside the RFC 3986 unreserved set (other than `/`).
///
/// The result has no leading slash.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
pub fn normalize_object_path(path: &str) -> Result<String, PresignError> {
    let collapsed = MULTISLASH.replace_all(path, "/");
    let collapsed = collapsed.trim_matches('/');

    if collapsed.is_empty() {
        trace!("normalize_object_path: path '{}' is empty after collapsing slashes", path);
        return Err(PresignError::InvalidObjectPath(MSG_OBJECT_PATH_EMPTY.to_string()));
    }

    for segment in collapsed.split('/') {
        if segment == "." || segment == ".." {
            return Err(PresignError::InvalidObjectPath(format!(
                "Relative path entry '{}' is not allowed in object path: {}",
                segment, path
            )));
        }

        if let Some(c) = segment.bytes().find(|c| !is_rfc3986_unreserved(*c)) {
            return Err(PresignError::InvalidObjectPath(format!(
                "Object path contains a character that must be percent-encoded (0x{:02X}): {}",
                c,
                path.escape_debug()
            )));
        }
    }

    Ok(collapsed.to_string())
}

/// Split an encoded query string into decoded `(name, value)` pairs, in the order they appear.
///
/// A parameter without `=` has an empty value. Empty components (`a=1&&b=2`) are skipped.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
pub fn query_string_to_decoded_pairs(query_string: &str) -> Result<Vec<(String, String)>, PresignError> {
    let mut result = Vec::new();

    for component in query_string.split('&') {
        if component.is_empty() {
            continue;
        }

        let (key, value) = component.split_once('=').unwrap_or((component, ""));
        result.push((uri_decode(key)?, uri_decode(value)?));
    }

    Ok(result)
}

/// Convert a byte to uppercase hex representation.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[inline(always)]
pub const fn u8_to_upper_hex(b: u8) -> [u8; 2] {
    let result: [u8; 2] = [HEX_DIGITS_UPPER[((b >> 4) & 0xf) as usize], HEX_DIGITS_UPPER[(b & 0xf) as usize]];
    result
}

/// Decode a percent-encoded string produced by [`uri_encode`] (or any RFC 3986 encoder).
///
/// `+` is not treated as a space. Incomplete or non-hex escapes, and escapes that decode to invalid UTF-8, are
/// rejected with [`PresignError::MalformedQueryString`].
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
pub fn uri_decode(s: &str) -> Result<String, PresignError> {
    let bytes = s.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c == b'%' {
            if i + 2 >= bytes.len() {
                // % encoding would go beyond end of string.
                return Err(PresignError::MalformedQueryString(MSG_INCOMPLETE_TRAILING_ESCAPE.to_string()));
            }

            let hex_digits = &bytes[i + 1..i + 3];
            match hex::decode(hex_digits) {
                Ok(value) => result.push(value[0]),
                Err(_) => {
                    return Err(PresignError::MalformedQueryString(format!(
                        "{}{}{}",
                        MSG_ILLEGAL_HEX_CHAR, hex_digits[0] as char, hex_digits[1] as char
                    )))
                }
            }
            i += 3;
        } else {
            result.push(c);
            i += 1;
        }
    }

    match from_utf8(&result) {
        Ok(s) => Ok(s.to_string()),
        Err(e) => Err(PresignError::MalformedQueryString(format!("Percent-encoded value is not UTF-8: {}", e))),
    }
}

/// Percent-encode a string for use in a SigV4 canonical query string.
///
/// Every byte of the UTF-8 encoding outside the RFC 3986 unreserved set (`A-Z a-z 0-9 - . _ ~`) is written as
/// `%XX` with uppercase hex digits. In particular `! ' ( ) *`, which generic URI component encoders leave alone,
/// are always escaped, as are `/`, `;`, and space (`%20`, never `+`).
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
pub fn uri_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 3);
    for c in s.bytes() {
        if is_rfc3986_unreserved(c) {
            result.push(c as char);
        } else {
            let hex = u8_to_upper_hex(c);
            result.push('%');
            result.push(hex[0] as char);
            result.push(hex[1] as char);
        }
    }

    result
}
