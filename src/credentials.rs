use {
    crate::{KSecretKey, PresignError},
    std::{
        fmt::{Debug, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// Long-lived signing credentials: an access key id, its secret key, and the region requests are scoped to.
///
/// All three fields are guaranteed non-empty. The secret key is only reachable from inside the crate and is redacted
/// from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_key: KSecretKey,
    region: String,
}

impl Credentials {
    /// Create a new set of credentials.
    ///
    /// Any empty field is a [`PresignError::MissingConfiguration`] error; the message names the field but never
    /// includes a value.
    pub fn new(access_key_id: &str, secret_key: &str, region: &str) -> Result<Self, PresignError> {
        let mut missing = Vec::with_capacity(3);
        if access_key_id.is_empty() {
            missing.push("access key id");
        }
        if secret_key.is_empty() {
            missing.push("secret access key");
        }
        if region.is_empty() {
            missing.push("region");
        }

        if !missing.is_empty() {
            return Err(PresignError::MissingConfiguration(format!(
                "Signing credentials are incomplete; missing {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            access_key_id: access_key_id.to_string(),
            secret_key: KSecretKey::from_str(secret_key)?,
            region: region.to_string(),
        })
    }

    /// Retrieve the access key id.
    #[inline]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Retrieve the region.
    #[inline]
    pub fn region(&self) -> &str {
        &self.region
    }

    #[inline]
    pub(crate) fn secret_key(&self) -> &KSecretKey {
        &self.secret_key
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &self.secret_key)
            .field("region", &self.region)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Credentials, ErrorKind, PresignError};

    #[test_log::test]
    fn test_credentials() {
        let creds = Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY", "us-east-1").unwrap();
        assert_eq!(creds.access_key_id(), "AKIDEXAMPLE");
        assert_eq!(creds.region(), "us-east-1");
        assert_eq!(creds.secret_key().as_ref(), b"wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
        assert_eq!(creds, creds.clone());

        let debug = format!("{:?}", creds);
        assert_eq!(
            debug,
            r#"Credentials { access_key_id: "AKIDEXAMPLE", secret_key: KSecretKey, region: "us-east-1" }"#
        );
        assert!(!debug.contains("wJalrXUtnFEMI"));
    }

    #[test_log::test]
    fn test_credentials_missing() {
        for (access_key_id, secret_key, region, expected) in [
            ("", "secret", "us-east-1", "Signing credentials are incomplete; missing access key id"),
            ("AKIDEXAMPLE", "", "us-east-1", "Signing credentials are incomplete; missing secret access key"),
            ("AKIDEXAMPLE", "secret", "", "Signing credentials are incomplete; missing region"),
            ("", "", "", "Signing credentials are incomplete; missing access key id, secret access key, region"),
        ] {
            let e = Credentials::new(access_key_id, secret_key, region).unwrap_err();
            assert_eq!(e.kind(), ErrorKind::Configuration);
            match e {
                PresignError::MissingConfiguration(msg) => assert_eq!(msg, expected),
                other => panic!("Expected MissingConfiguration; got {:?}", other),
            }
        }
    }
}
