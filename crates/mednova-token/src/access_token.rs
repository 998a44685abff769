//! HS256 access tokens for the media platform.
//!
//! Pure construction: no network call and nothing persisted. The api key
//! becomes the issuer, the identity becomes the subject.

use std::time::Duration;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::grants::VideoGrants;

/// Token lifetime when none is given.
pub const DEFAULT_TTL: Duration = Duration::from_secs(6 * 60 * 60);

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("api key and secret are required")]
    MissingCredentials,
    #[error("identity is required for join grants")]
    MissingIdentity,
    #[error("token lifetime of {0:?} does not fit a JWT expiry")]
    InvalidTtl(Duration),
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// JWT claim set as written into the token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub nbf: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoGrants>,
}

/// Builder for a signed access token.
#[derive(Clone)]
pub struct AccessToken {
    api_key: String,
    api_secret: String,
    identity: String,
    name: Option<String>,
    metadata: Option<String>,
    ttl: Duration,
    grants: Option<VideoGrants>,
}

impl AccessToken {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            identity: String::new(),
            name: None,
            metadata: None,
            ttl: DEFAULT_TTL,
            grants: None,
        }
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_grants(mut self, grants: VideoGrants) -> Self {
        self.grants = Some(grants);
        self
    }

    /// Sign the token, valid from now for the configured ttl.
    pub fn to_jwt(&self) -> Result<String, TokenError> {
        self.to_jwt_at(OffsetDateTime::now_utc())
    }

    /// Sign the token as if issued at `now`.
    pub fn to_jwt_at(&self, now: OffsetDateTime) -> Result<String, TokenError> {
        let claims = self.claims_at(now)?;
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.api_secret.as_bytes()),
        )?;
        tracing::debug!(identity = %claims.sub, exp = claims.exp, "access token signed");
        Ok(token)
    }

    fn claims_at(&self, now: OffsetDateTime) -> Result<Claims, TokenError> {
        if self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(TokenError::MissingCredentials);
        }
        if self.identity.is_empty()
            && self.grants.as_ref().is_some_and(VideoGrants::requires_identity)
        {
            return Err(TokenError::MissingIdentity);
        }
        let nbf = now.unix_timestamp();
        let exp = i64::try_from(self.ttl.as_secs())
            .ok()
            .and_then(|secs| nbf.checked_add(secs))
            .ok_or(TokenError::InvalidTtl(self.ttl))?;
        Ok(Claims {
            iss: self.api_key.clone(),
            sub: self.identity.clone(),
            nbf,
            exp,
            name: self.name.clone(),
            metadata: self.metadata.clone(),
            video: self.grants.clone(),
        })
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("identity", &self.identity)
            .field("ttl", &self.ttl)
            .field("grants", &self.grants)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    const KEY: &str = "APItestkey";
    const SECRET: &str = "test-secret-with-enough-entropy-0123456789";

    fn validation() -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        v.set_issuer(&[KEY]);
        v.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);
        v.validate_nbf = true;
        v
    }

    fn agent_token() -> AccessToken {
        AccessToken::new(KEY, SECRET)
            .with_identity("mednova-agent")
            .with_grants(VideoGrants::join("*"))
    }

    #[test]
    fn token_verifies_with_secret() {
        let jwt = agent_token().to_jwt().unwrap();
        assert_eq!(jwt.split('.').count(), 3);

        let data = decode::<Claims>(&jwt, &DecodingKey::from_secret(SECRET.as_bytes()), &validation())
            .unwrap();
        assert_eq!(data.header.alg, Algorithm::HS256);
        assert_eq!(data.claims.iss, KEY);
        assert_eq!(data.claims.sub, "mednova-agent");
        assert_eq!(data.claims.exp - data.claims.nbf, DEFAULT_TTL.as_secs() as i64);
        assert_eq!(data.claims.video, Some(VideoGrants::join("*")));
    }

    #[test]
    fn wrong_secret_rejected() {
        let jwt = agent_token().to_jwt().unwrap();
        let result = decode::<Claims>(
            &jwt,
            &DecodingKey::from_secret(b"some-other-secret"),
            &validation(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn claims_are_deterministic_for_fixed_time() {
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let token = agent_token().with_ttl(Duration::from_secs(600));
        assert_eq!(token.to_jwt_at(now).unwrap(), token.to_jwt_at(now).unwrap());

        let claims = token.claims_at(now).unwrap();
        assert_eq!(claims.nbf, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_600);
    }

    #[test]
    fn video_claim_is_camel_case() {
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let claims = agent_token().with_name("Agent").claims_at(now).unwrap();
        let v = serde_json::to_value(&claims).unwrap();
        assert_eq!(v["video"]["roomJoin"], true);
        assert_eq!(v["video"]["room"], "*");
        assert_eq!(v["name"], "Agent");
        assert!(v.get("metadata").is_none());
    }

    #[test]
    fn join_grant_needs_identity() {
        let err = AccessToken::new(KEY, SECRET)
            .with_grants(VideoGrants::join("*"))
            .to_jwt()
            .unwrap_err();
        assert!(matches!(err, TokenError::MissingIdentity));

        // without a join grant an anonymous token is fine
        AccessToken::new(KEY, SECRET).to_jwt().unwrap();
    }

    #[test]
    fn empty_credentials_rejected() {
        let err = AccessToken::new("", SECRET)
            .with_identity("x")
            .to_jwt()
            .unwrap_err();
        assert!(matches!(err, TokenError::MissingCredentials));
        assert!(AccessToken::new(KEY, "").with_identity("x").to_jwt().is_err());
    }

    #[test]
    fn oversized_ttl_rejected() {
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        for ttl in [Duration::from_secs(u64::MAX), Duration::from_secs(i64::MAX as u64)] {
            let err = agent_token().with_ttl(ttl).to_jwt_at(now).unwrap_err();
            assert!(matches!(err, TokenError::InvalidTtl(d) if d == ttl));
        }
    }

    #[test]
    fn debug_hides_secret() {
        let rendered = format!("{:?}", agent_token());
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains(KEY));
    }
}
