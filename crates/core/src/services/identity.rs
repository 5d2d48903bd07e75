//! Identity verification.
//!
//! Bearer credentials are validated by the campus identity provider, which
//! this module treats as a black box behind the [`IdentityVerifier`] trait.

use async_trait::async_trait;
use campusflow_common::{AppError, AppResult};
use campusflow_db::entities::user::{self, Role};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Claims returned by the identity provider for a verified credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject id assigned by the provider.
    pub sub: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Role claim; trusted as-is when it says admin.
    #[serde(default)]
    pub role: Option<String>,

    /// Boolean variant of the admin signal.
    #[serde(default)]
    pub admin: Option<bool>,

    /// Expiry (seconds since epoch), checked during verification.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl IdentityClaims {
    /// Whether the claims themselves carry an admin signal.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin") || self.admin == Some(true)
    }
}

/// A verified requester, resolved once per request and cached in request
/// extensions for its duration.
#[derive(Debug, Clone)]
pub struct Actor {
    /// Verified identity claims.
    pub claims: IdentityClaims,

    /// Linked local user record, if one exists.
    pub user: Option<user::Model>,

    /// Effective role: the claims' admin signal wins, the local record is
    /// the fallback, and absent both the requester is a non-admin.
    pub role: Role,
}

/// Validates a bearer credential and returns its claims.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a bearer token.
    ///
    /// Every internal failure is downgraded to [`AppError::Unauthorized`];
    /// nothing else leaks past this boundary.
    async fn verify(&self, token: &str) -> AppResult<IdentityClaims>;
}

/// Verifier for provider-issued JWTs signed with a shared secret.
pub struct JwtIdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    /// Create a verifier for tokens signed with the given secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, token: &str) -> AppResult<IdentityClaims> {
        decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                AppError::Unauthorized
            })
    }
}
