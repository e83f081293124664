//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserRole;

/// Default access token lifetime (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Default refresh token lifetime (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Claims structure for the access-token JWT payload.
///
/// Never persisted; the server holds no copy of an issued access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// User's email at issuance time
    pub email: String,

    /// User's role at issuance time
    pub role: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID: the token identity, unique per issuance, used as the
    /// blacklist key
    pub jti: String,
}

impl Claims {
    /// Creates new claims for an access token.
    ///
    /// Every call produces a fresh `jti`; `exp - iat` equals `lifetime`
    /// for every issuance.
    pub fn new_access_token(
        user_id: Uuid,
        email: String,
        role: UserRole,
        lifetime: Duration,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + lifetime;

        Self {
            sub: user_id.to_string(),
            email,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.exp
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Gets the expiry as a `DateTime`, if the timestamp is representable
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// Refresh token record stored in the database.
///
/// The raw opaque value is handed to the client once; only its SHA-256
/// hash is persisted. A record that has been consumed (exchanged) or
/// revoked (logout) is deleted and never becomes consumable again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the refresh token row
    pub id: Uuid,

    /// User ID this token belongs to
    pub user_id: Uuid,

    /// SHA-256 hash of the opaque token value
    pub token_hash: String,

    /// Device/session label this token is scoped to
    pub device_label: String,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Creates a new refresh token record
    pub fn new(user_id: Uuid, token_hash: String, device_label: String, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            device_label,
            created_at: now,
            expires_at: now + lifetime,
        }
    }

    /// Checks if the refresh token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Blacklist entry for an access token revoked before natural expiry.
///
/// `expires_at` mirrors the revoked token's own expiry, so the entry never
/// outlives its purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    /// The revoked token's identity (`jti` claim)
    pub token_identity: String,

    /// Why the token was revoked
    pub reason: String,

    /// When the entry stops mattering (the token's own expiry)
    pub expires_at: DateTime<Utc>,

    /// Timestamp when the entry was created
    pub created_at: DateTime<Utc>,
}

impl BlacklistEntry {
    /// Creates a new blacklist entry
    pub fn new(token_identity: String, reason: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            token_identity,
            reason,
            expires_at,
            created_at: Utc::now(),
        }
    }

    /// Checks if the entry has outlived the token it blocks
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// Opaque single-use refresh token
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
        }
    }
}
