use super::dto::{TOKEN_ISSUER, TokenClaims};
use anyhow::{Result, anyhow};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, get_current_timestamp,
};
use uuid::Uuid;

pub struct AuthService;

impl AuthService {
    /// Signs an HS256 access token for `user_id`.
    pub fn make_jwt(user_id: Uuid, secret: &str, expires_in_secs: u64) -> Result<String> {
        let now = get_current_timestamp();
        let claims = TokenClaims {
            sub: user_id,
            iss: TOKEN_ISSUER.to_string(),
            iat: now as usize,
            exp: (now + expires_in_secs) as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| anyhow!(e.to_string()))
    }

    pub fn validate_jwt(token: &str, secret: &str) -> Result<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);

        let data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|e| anyhow!("Couldn't validate JWT: {}", e))?;

        Ok(data.claims)
    }
}
