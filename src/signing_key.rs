use {
    crate::{constants::*, crypto::hmac_sha256, PresignError},
    chrono::NaiveDate,
    std::{
        fmt::{Debug, Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// A raw AWS secret key (`kSecret`).
///
/// The key is held with the "AWS4" prefix already applied. It cannot be printed: `Debug` and `Display` write only
/// the type name, and it deliberately implements neither `Serialize` nor `AsRef<str>`.
#[derive(Clone, PartialEq, Eq)]
pub struct KSecretKey {
    /// The secret key, prefixed with "AWS4".
    prefixed_key: Vec<u8>,
}

/// The `kSigning` key: the secret key narrowed through every component of a [`CredentialScope`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KSigningKey {
    /// The resulting raw signing key.
    key: [u8; SHA256_OUTPUT_LEN],
}

/// The credential scope, `YYYYMMDD/region/service/aws4_request`, that a signing key is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialScope {
    date: NaiveDate,
    region: String,
    service: String,
}

impl AsRef<[u8]> for KSecretKey {
    fn as_ref(&self) -> &[u8] {
        // Remove the "AWS4" prefix.
        &self.prefixed_key[AWS4_KEY_PREFIX.len()..]
    }
}

impl AsRef<[u8; SHA256_OUTPUT_LEN]> for KSigningKey {
    fn as_ref(&self) -> &[u8; SHA256_OUTPUT_LEN] {
        &self.key
    }
}

impl Debug for KSecretKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("KSecretKey")
    }
}

impl Debug for KSigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("KSigningKey")
    }
}

impl Display for KSecretKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("KSecretKey")
    }
}

impl Display for KSigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("KSigningKey")
    }
}

impl FromStr for KSecretKey {
    type Err = PresignError;

    /// Create a new `KSecretKey` from a raw AWS secret key. An empty key is a configuration error.
    fn from_str(raw: &str) -> Result<Self, PresignError> {
        if raw.is_empty() {
            return Err(PresignError::MissingConfiguration("Secret access key is empty".to_string()));
        }

        let mut prefixed_key = Vec::with_capacity(AWS4_KEY_PREFIX.len() + raw.len());
        prefixed_key.extend_from_slice(AWS4_KEY_PREFIX);
        prefixed_key.extend_from_slice(raw.as_bytes());
        Ok(Self {
            prefixed_key,
        })
    }
}

impl KSecretKey {
    /// Derive the `kSigning` key for the given scope.
    ///
    /// This is a fold of HMAC-SHA256 over the scope components in order: each stage's raw digest keys the next.
    /// `kDate = HMAC("AWS4" + kSecret, date)`, `kRegion = HMAC(kDate, region)`, `kService = HMAC(kRegion, service)`,
    /// `kSigning = HMAC(kService, "aws4_request")`.
    pub fn to_ksigning(&self, scope: &CredentialScope) -> Result<KSigningKey, PresignError> {
        let date = scope.date_string();

        // The first stage is keyed by the variable-length prefixed secret; every later stage by a digest.
        let [first, rest @ ..] = scope.components(&date);
        let kdate = hmac_sha256(&self.prefixed_key, first.as_bytes())?;
        let key = rest.iter().try_fold(kdate, |key, component| hmac_sha256(&key, component.as_bytes()))?;

        Ok(KSigningKey {
            key,
        })
    }
}

impl KSigningKey {
    /// Sign a string-to-sign with this key, returning the lowercase hex signature.
    pub fn sign(&self, string_to_sign: &[u8]) -> Result<String, PresignError> {
        Ok(hex::encode(hmac_sha256(&self.key, string_to_sign)?))
    }
}

impl CredentialScope {
    /// Create a new credential scope.
    pub fn new(date: NaiveDate, region: &str, service: &str) -> Self {
        Self {
            date,
            region: region.to_string(),
            service: service.to_string(),
        }
    }

    /// Retrieve the date of the scope.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Retrieve the region of the scope.
    #[inline]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Retrieve the service of the scope.
    #[inline]
    pub fn service(&self) -> &str {
        &self.service
    }

    fn date_string(&self) -> String {
        self.date.format(ISO8601_DATE_FORMAT).to_string()
    }

    /// The derivation components, in order. Adding a stage to the protocol means adding an element here.
    fn components<'a>(&'a self, date: &'a str) -> [&'a str; 4] {
        [date, &self.region, &self.service, AWS4_REQUEST]
    }
}

impl Display for CredentialScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let date = self.date_string();
        f.write_str(&self.components(&date).join("/"))
    }
}
