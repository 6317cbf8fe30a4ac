//! JWT token generation and validation
//! Implements access token + refresh token pattern

use crate::{config::AppConfig, error::AppError, models::role::Role};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Token kind, embedded in the claims so an access token can never be
/// replayed where a refresh token is expected and vice versa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims
///
/// `sub` carries the user's obfuscated public id, never the internal
/// integer id — the payload of a JWT is readable by the client.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (obfuscated user ID)
    pub sub: String,

    /// Username
    pub username: String,

    /// Token type (access or refresh)
    pub token_type: TokenType,

    /// User roles
    pub roles: Vec<Role>,

    /// Token epoch at issuance. Bumped on password change; tokens with a
    /// stale epoch are rejected even before their natural expiry
    pub epoch: i32,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,

    /// JWT ID (unique token identifier)
    pub jti: String,
}

/// Token validation failure
///
/// Every variant surfaces at the HTTP boundary as a plain authentication
/// failure; the distinction exists for logging and for the refresh flow.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed or its signature does not verify")]
    Malformed,

    #[error("token is expired")]
    Expired,

    #[error("token type does not match the expected kind")]
    WrongTokenType,
}

/// Token pair response
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64, // seconds until access token expires
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_exp_secs: u64,
    refresh_token_exp_secs: u64,
}

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.jwt_secret.expose_secret();

        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_exp_secs: config.security.access_token_exp_secs,
            refresh_token_exp_secs: config.security.refresh_token_exp_secs,
        })
    }

    /// Issue an access token
    pub fn issue_access_token(
        &self,
        subject: &str,
        username: &str,
        roles: Vec<Role>,
        epoch: i32,
    ) -> Result<String, AppError> {
        self.issue(subject, username, roles, epoch, TokenType::Access, self.access_token_exp_secs)
    }

    /// Issue a refresh token
    pub fn issue_refresh_token(
        &self,
        subject: &str,
        username: &str,
        roles: Vec<Role>,
        epoch: i32,
    ) -> Result<String, AppError> {
        self.issue(subject, username, roles, epoch, TokenType::Refresh, self.refresh_token_exp_secs)
    }

    /// Issue an access + refresh token pair
    pub fn issue_token_pair(
        &self,
        subject: &str,
        username: &str,
        roles: Vec<Role>,
        epoch: i32,
    ) -> Result<TokenPair, AppError> {
        let access_token = self.issue_access_token(subject, username, roles.clone(), epoch)?;
        let refresh_token = self.issue_refresh_token(subject, username, roles, epoch)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_token_exp_secs,
        })
    }

    fn issue(
        &self,
        subject: &str,
        username: &str,
        roles: Vec<Role>,
        epoch: i32,
        token_type: TokenType,
        ttl_secs: u64,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::seconds(ttl_secs as i64);

        let claims = Claims {
            sub: subject.to_string(),
            username: username.to_string(),
            token_type,
            roles,
            epoch,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        self.encode_claims(&claims)
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {:?}", e);
            AppError::Internal(format!("Failed to encode token: {}", e))
        })
    }

    /// Validate signature and expiry, returning the decoded claims.
    /// 过期判定精确到 exp 本身，不留时钟容差
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => {
                    tracing::debug!("Token validation failed: {:?}", e);
                    TokenError::Malformed
                }
            })
    }

    /// Validate an access token specifically
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.validate(token)?;

        if claims.token_type != TokenType::Access {
            tracing::debug!("Token type mismatch: expected access token");
            return Err(TokenError::WrongTokenType);
        }

        Ok(claims)
    }

    /// Validate a refresh token specifically
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.validate(token)?;

        if claims.token_type != TokenType::Refresh {
            tracing::debug!("Token type mismatch: expected refresh token");
            return Err(TokenError::WrongTokenType);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests_support::test_config;

    fn service() -> JwtService {
        JwtService::from_config(&test_config()).unwrap()
    }

    #[test]
    fn test_issue_and_validate_access_token() {
        let service = service();

        let token = service
            .issue_access_token("o4kaRaNwQ2", "testuser", vec![Role::Admin], 0)
            .unwrap();

        let claims = service.validate_access_token(&token).unwrap();
        assert_eq!(claims.sub, "o4kaRaNwQ2");
        assert_eq!(claims.username, "testuser");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.epoch, 0);
        assert!(claims.roles.contains(&Role::Admin));
    }

    #[test]
    fn test_issue_and_validate_refresh_token() {
        let service = service();

        let token = service
            .issue_refresh_token("o4kaRaNwQ2", "testuser", vec![Role::User], 3)
            .unwrap();

        let claims = service.validate_refresh_token(&token).unwrap();
        assert_eq!(claims.sub, "o4kaRaNwQ2");
        assert_eq!(claims.token_type, TokenType::Refresh);
        assert_eq!(claims.epoch, 3);
    }

    #[test]
    fn test_token_type_cross_presentation_is_rejected() {
        let service = service();

        let access = service
            .issue_access_token("o4kaRaNwQ2", "testuser", vec![], 0)
            .unwrap();
        assert_eq!(
            service.validate_refresh_token(&access).unwrap_err(),
            TokenError::WrongTokenType
        );

        let refresh = service
            .issue_refresh_token("o4kaRaNwQ2", "testuser", vec![], 0)
            .unwrap();
        assert_eq!(
            service.validate_access_token(&refresh).unwrap_err(),
            TokenError::WrongTokenType
        );
    }

    #[test]
    fn test_expired_token_is_rejected_as_expired() {
        let service = service();

        let now = Utc::now();
        let claims = Claims {
            sub: "o4kaRaNwQ2".to_string(),
            username: "testuser".to_string(),
            token_type: TokenType::Access,
            roles: vec![Role::User],
            epoch: 0,
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        let token = service.encode_claims(&claims).unwrap();

        assert_eq!(service.validate(&token).unwrap_err(), TokenError::Expired);
        assert_eq!(service.validate_access_token(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let service = service();
        assert_eq!(service.validate("invalid_token").unwrap_err(), TokenError::Malformed);
        assert_eq!(service.validate("").unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn test_token_signed_with_other_key_is_malformed() {
        let service = service();

        let mut other_config = test_config();
        other_config.security.jwt_secret =
            secrecy::Secret::new("another_secret_key_32_characters_!!".to_string());
        let other = JwtService::from_config(&other_config).unwrap();

        let token = other
            .issue_access_token("o4kaRaNwQ2", "testuser", vec![], 0)
            .unwrap();

        assert_eq!(service.validate(&token).unwrap_err(), TokenError::Malformed);
    }
}
