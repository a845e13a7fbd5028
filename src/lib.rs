//! The `sigv4_presign` crate produces AWS SigV4 _pre-signed upload URLs_: time-limited URLs that let a client `PUT`
//! a single object directly to S3-compatible object storage (AWS S3, Cloudflare R2, MinIO, ...) without ever holding
//! the storage credentials.
//!
//! A URL issued here authorizes exactly one method (`PUT`), one object path, and one declared `Content-Type`, and
//! only until its embedded expiry passes. The upload body itself is not hashed (`UNSIGNED-PAYLOAD`), so the client
//! may stream it.
//!
//! # Workflow
//! 1. Load a [`SignerConfig`] from the environment (or build [`Credentials`] and an [`Endpoint`] yourself).
//! 2. Create a [`RequestSigner`] from it.
//! 3. Sign a [`PresignRequest`] to obtain a [`PresignedUrl`].
//!
//! Services that issue URLs on behalf of authenticated users can instead use [`UploadUrlService`], a
//! [`tower::Service`] that also confines each user to their own [`UploadNamespace`].
//!
//! ## Example
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use sigv4_presign::{ContentTypeAllowList, Credentials, Endpoint, PresignRequest, RequestSigner};
//!
//! let credentials = Credentials::new("AKIDEXAMPLE", "secret", "us-east-1").unwrap();
//! let endpoint = Endpoint::https("example.r2.cloudflarestorage.com").unwrap();
//! let signer = RequestSigner::new(credentials, endpoint, ContentTypeAllowList::default());
//!
//! let request = PresignRequest::builder()
//!     .object_path("bucket/file.png")
//!     .content_type("image/png")
//!     .expires_in(900)
//!     .timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let url = signer.sign(&request).unwrap();
//! assert_eq!(url.signature(), "ade1940a6c8157f191624b073b150472a7047ee942c4607fd0fc77d858b93f6b");
//! assert!(url.url().starts_with("https://example.r2.cloudflarestorage.com/bucket/file.png?X-Amz-Algorithm="));
//! ```
//!
//! ## Issuing URLs through a service
//! ```rust
//! use sigv4_presign::{SignerConfig, UploadUrlRequest};
//! use tower::ServiceExt;
//!
//! let env = |name: &str| match name {
//!     "R2_ACCOUNT_ID" => Some("acct".to_string()),
//!     "R2_ACCESS_KEY_ID" => Some("AKIDEXAMPLE".to_string()),
//!     "R2_SECRET_ACCESS_KEY" => Some("secret".to_string()),
//!     _ => None,
//! };
//! let service = SignerConfig::from_lookup(env).unwrap().into_service();
//!
//! # tokio_test::block_on(async {
//! let req = UploadUrlRequest::new("user-1", "profiles/user-1/avatar.png", "image/png");
//! let response = service.oneshot(req).await.unwrap();
//! assert!(response.upload_url.starts_with("https://acct.r2.cloudflarestorage.com/boot/profiles/user-1/avatar.png?"));
//! assert_eq!(response.expires_in, 900);
//! # });
//! ```
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod canonical;
mod chronoutil;
mod config;
mod constants;
mod credentials;
mod crypto;
mod error;
mod policy;
mod presign;
mod service;
mod signing_key;

pub use {
    chronoutil::{FormatSigV4, ParseISO8601},
    config::SignerConfig,
    credentials::Credentials,
    error::{ErrorKind, PresignError},
    policy::{ContentTypeAllowList, UploadNamespace},
    presign::{
        presign_put, Endpoint, PresignRequest, PresignRequestBuilder, PresignRequestBuilderError, PresignedUrl,
        RequestSigner,
    },
    service::{UploadUrlBody, UploadUrlRequest, UploadUrlResponse, UploadUrlService},
    signing_key::{CredentialScope, KSecretKey, KSigningKey},
};
