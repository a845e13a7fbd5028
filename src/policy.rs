//! Caller-side upload policy: which content types may be signed, and which object paths an owner may write.

use {
    crate::{canonical::normalize_object_path, constants::*, PresignError},
    log::debug,
    std::str::FromStr,
};

/// The set of content types a [`RequestSigner`][crate::RequestSigner] is willing to sign for.
///
/// Matching is exact: `image/png; charset=binary` is not the same content type as `image/png`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentTypeAllowList {
    content_types: Vec<String>,
}

impl ContentTypeAllowList {
    /// Create an allow-list from the given content types. Empty entries are ignored.
    pub fn new<I, S>(content_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let content_types = content_types
            .into_iter()
            .map(|ct| ct.as_ref().trim().to_string())
            .filter(|ct| !ct.is_empty())
            .collect();
        Self {
            content_types,
        }
    }

    /// Indicates whether the content type is on the allow-list.
    pub fn contains(&self, content_type: &str) -> bool {
        self.content_types.iter().any(|ct| ct == content_type)
    }

    /// Iterate over the allowed content types.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.content_types.iter().map(String::as_str)
    }

    /// Indicates whether the allow-list admits nothing.
    pub fn is_empty(&self) -> bool {
        self.content_types.is_empty()
    }
}

impl Default for ContentTypeAllowList {
    /// `image/jpeg`, `image/png`, `image/webp`, and `image/gif`.
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_CONTENT_TYPES.split(','))
    }
}

impl FromStr for ContentTypeAllowList {
    type Err = PresignError;

    /// Parse a comma-separated list, e.g. `"image/jpeg, image/png"`. A list with no entries is an error, since it
    /// would reject every request.
    fn from_str(s: &str) -> Result<Self, PresignError> {
        let result = Self::new(s.split(','));
        if result.is_empty() {
            return Err(PresignError::InvalidConfiguration("Content type allow-list is empty".to_string()));
        }

        Ok(result)
    }
}

/// An owner-scoped upload namespace: owner `o` may only write beneath `{root}/{o}/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadNamespace {
    root: String,
}

impl UploadNamespace {
    /// Create a namespace rooted at the given path. Surrounding slashes are ignored.
    pub fn new(root: &str) -> Result<Self, PresignError> {
        let root = normalize_object_path(root)
            .map_err(|e| PresignError::InvalidConfiguration(format!("Invalid upload namespace root: {}", e)))?;
        Ok(Self {
            root,
        })
    }

    /// Retrieve the namespace root, without surrounding slashes.
    #[inline]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The path prefix reserved for an owner, including the trailing slash.
    pub fn prefix_for(&self, owner_id: &str) -> String {
        format!("{}/{}/", self.root, owner_id)
    }

    /// Check that `path` names an object inside the owner's namespace, returning the slash-normalized path.
    ///
    /// The check is made against the normalized path, so `profiles//o/x.png` is accepted for owner `o` while
    /// `profiles/o` (the prefix itself) and `profiles/o/../p/x.png` are not.
    pub fn authorize(&self, owner_id: &str, path: &str) -> Result<String, PresignError> {
        if owner_id.is_empty() || owner_id.contains('/') {
            debug!("authorize: rejecting unusable owner id {:?}", owner_id);
            return Err(PresignError::UnauthorizedPath("Invalid upload path".to_string()));
        }

        let normalized = normalize_object_path(path)?;
        if !normalized.starts_with(&self.prefix_for(owner_id)) {
            debug!("authorize: path {:?} is outside {:?}", normalized, self.prefix_for(owner_id));
            return Err(PresignError::UnauthorizedPath("Invalid upload path".to_string()));
        }

        Ok(normalized)
    }
}

impl Default for UploadNamespace {
    /// The `profiles` namespace.
    fn default() -> Self {
        Self {
            root: DEFAULT_NAMESPACE_ROOT.to_string(),
        }
    }
}
