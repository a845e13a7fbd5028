//! Signer configuration read from the process environment.
//!
//! | Variable                       | Required | Default                                   |
//! |--------------------------------|----------|-------------------------------------------|
//! | `R2_ACCOUNT_ID`                | one of   |                                           |
//! | `UPLOAD_ENDPOINT_HOST`         | one of   |                                           |
//! | `R2_ACCESS_KEY_ID`             | yes      |                                           |
//! | `R2_SECRET_ACCESS_KEY`         | yes      |                                           |
//! | `UPLOAD_BUCKET`                | no       | `boot`                                    |
//! | `UPLOAD_REGION`                | no       | `us-east-1`                               |
//! | `UPLOAD_EXPIRES_SECONDS`       | no       | `900`                                     |
//! | `UPLOAD_ALLOWED_CONTENT_TYPES` | no       | `image/jpeg,image/png,image/webp,image/gif` |
//! | `UPLOAD_NAMESPACE_ROOT`        | no       | `profiles`                                |
//!
//! `UPLOAD_ENDPOINT_HOST` takes precedence over `R2_ACCOUNT_ID` when both are set.

use {
    crate::{
        constants::*, ContentTypeAllowList, Credentials, Endpoint, PresignError, RequestSigner, UploadNamespace,
        UploadUrlService,
    },
    log::debug,
    std::{env, str::FromStr, sync::Arc},
};

/// Everything needed to issue upload URLs.
///
/// Error messages produced while loading configuration name the variables involved, never their values.
#[derive(Clone, Debug)]
pub struct SignerConfig {
    credentials: Credentials,
    endpoint: Endpoint,
    allowed_content_types: ContentTypeAllowList,
    expires_in: i64,
    namespace: UploadNamespace,
}

impl SignerConfig {
    /// Create a configuration from its parts.
    pub fn new(
        credentials: Credentials,
        endpoint: Endpoint,
        allowed_content_types: ContentTypeAllowList,
        expires_in: i64,
        namespace: UploadNamespace,
    ) -> Self {
        Self {
            credentials,
            endpoint,
            allowed_content_types,
            expires_in,
            namespace,
        }
    }

    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, PresignError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load the configuration using `lookup` to resolve variable names. Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PresignError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let endpoint = match get(ENV_ENDPOINT_HOST) {
            Some(host) => Some(Endpoint::https(host.trim())),
            None => get(ENV_ACCOUNT_ID).map(|account_id| Endpoint::r2(account_id.trim())),
        };
        let access_key_id = get(ENV_ACCESS_KEY_ID);
        let secret_access_key = get(ENV_SECRET_ACCESS_KEY);

        let mut missing = Vec::new();
        if endpoint.is_none() {
            missing.push(ENV_ACCOUNT_ID);
        }
        if access_key_id.is_none() {
            missing.push(ENV_ACCESS_KEY_ID);
        }
        if secret_access_key.is_none() {
            missing.push(ENV_SECRET_ACCESS_KEY);
        }

        let required = (endpoint, access_key_id, secret_access_key);
        let (Some(endpoint), Some(access_key_id), Some(secret_access_key)) = required else {
            return Err(PresignError::MissingConfiguration(format!(
                "R2 credentials not configured; missing {}",
                missing.join(", ")
            )));
        };

        let region = get(ENV_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string());
        let bucket = get(ENV_BUCKET).unwrap_or_else(|| DEFAULT_BUCKET.to_string());
        let endpoint = endpoint?.with_bucket(bucket.trim())?;

        let credentials = Credentials::new(access_key_id.trim(), secret_access_key.trim(), region.trim())?;

        let expires_in = match get(ENV_EXPIRES_SECONDS) {
            None => DEFAULT_EXPIRES_SECONDS,
            Some(value) => parse_expiry(&value)?,
        };

        let allowed_content_types = match get(ENV_ALLOWED_CONTENT_TYPES) {
            None => ContentTypeAllowList::default(),
            Some(value) => ContentTypeAllowList::from_str(&value)?,
        };

        let namespace = match get(ENV_NAMESPACE_ROOT) {
            None => UploadNamespace::default(),
            Some(value) => UploadNamespace::new(&value)?,
        };

        debug!(
            "Loaded signer configuration: host={} bucket={} region={} expires_in={}",
            endpoint.host(),
            bucket,
            region,
            expires_in
        );

        Ok(Self {
            credentials,
            endpoint,
            allowed_content_types,
            expires_in,
            namespace,
        })
    }

    /// Retrieve the credentials.
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

    /// Retrieve the lifetime of issued URLs, in seconds.
    #[inline]
    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    /// Retrieve the owner namespace.
    #[inline]
    pub fn namespace(&self) -> &UploadNamespace {
        &self.namespace
    }

    /// Create a [`RequestSigner`] from this configuration.
    pub fn signer(&self) -> RequestSigner {
        RequestSigner::new(self.credentials.clone(), self.endpoint.clone(), self.allowed_content_types.clone())
    }

    /// Convert this configuration into an [`UploadUrlService`].
    pub fn into_service(self) -> UploadUrlService {
        let signer = Arc::new(self.signer());
        UploadUrlService::new(signer, self.namespace, self.expires_in)
    }
}

fn parse_expiry(value: &str) -> Result<i64, PresignError> {
    let expires_in = i64::from_str(value.trim())
        .map_err(|_| PresignError::InvalidConfiguration(format!("{} is not an integer", ENV_EXPIRES_SECONDS)))?;

    if expires_in <= 0 || expires_in > MAX_EXPIRES_SECONDS {
        return Err(PresignError::InvalidConfiguration(format!(
            "{} must be between 1 and {}",
            ENV_EXPIRES_SECONDS, MAX_EXPIRES_SECONDS
        )));
    }

    Ok(expires_in)
}
