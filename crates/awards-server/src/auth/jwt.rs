//! Signing and checking of admin session tokens (HS256).

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use awards_core::db::{new_id, unix_timestamp};

use super::claims::Claims;

/// Default session lifetime: 24 hours.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 24 * 60 * 60;

/// Holds the HMAC keys and the session lifetime.
#[derive(Clone)]
pub struct JwtManager {
    signer: EncodingKey,
    verifier: DecodingKey,
    rules: Validation,
    session_secs: i64,
}

impl JwtManager {
    pub fn new(secret: &[u8], session_secs: i64) -> Self {
        let mut rules = Validation::new(Algorithm::HS256);
        rules.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            signer: EncodingKey::from_secret(secret),
            verifier: DecodingKey::from_secret(secret),
            rules,
            session_secs,
        }
    }

    /// Sign a session for `username` and return it with its lifetime in seconds.
    pub fn issue_access_token(
        &self,
        username: &str,
        role: &str,
    ) -> Result<(String, i64), jsonwebtoken::errors::Error> {
        let issued = unix_timestamp();
        let session = Claims {
            jti: new_id(),
            sub: username.to_owned(),
            role: role.to_owned(),
            iat: issued,
            exp: issued + self.session_secs,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &session, &self.signer)
            .map(|token| (token, self.session_secs))
    }

    /// Check signature, algorithm and expiry; yields the embedded claims.
    pub fn validate(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Claims>(token, &self.verifier, &self.rules).map(|data| data.claims)
    }
}
