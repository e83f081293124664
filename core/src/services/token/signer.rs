//! Stateless cryptographic signing and verification of access tokens.

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use mm_shared::config::JwtConfig;

use crate::domain::entities::token::Claims;
use crate::domain::entities::user::UserRole;
use crate::errors::{DomainError, DomainResult, TokenError};

/// Signs and validates the cryptographic envelope of access tokens.
///
/// Holds no state beyond the keys derived from the configured secret.
/// The blacklist is deliberately not consulted here; that is the token
/// service's job.
pub struct JwtSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtSigner {
    /// Creates a new signer from the JWT configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;

        Self {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Signs a fresh access token for the given identity.
    ///
    /// Every call embeds a newly generated `jti` and the configured
    /// lifetime, so two calls with identical inputs produce distinct
    /// tokens.
    pub fn sign(&self, user_id: Uuid, email: &str, role: UserRole) -> DomainResult<String> {
        let claims = Claims::new_access_token(
            user_id,
            email.to_string(),
            role,
            Duration::seconds(self.config.access_token_expiry),
            &self.config.issuer,
            &self.config.audience,
        );

        let header = Header::new(Algorithm::HS256);
        encode(&header, &claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::GenerationFailed))
    }

    /// Verifies signature and expiry only; never consults storage.
    pub fn verify(&self, token: &str) -> DomainResult<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        DomainError::Token(TokenError::Expired)
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        DomainError::Token(TokenError::InvalidSignature)
                    }
                    _ => DomainError::Token(TokenError::Malformed),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Parses the payload without checking the signature or expiry.
    ///
    /// Restricted operation: the result must only be used to read an
    /// identity for revocation bookkeeping (writing to the blacklist),
    /// never to authorize an action.
    pub fn decode_unverified(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .ok()
            .map(|data| data.claims)
    }
}
