//! Verifies bearer tokens issued by the external identity provider and turns
//! them into an [`Identity`] the rest of the application can trust.

use std::str::FromStr;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token format or signature")]
    InvalidToken,

    #[error("Token does not carry a subject")]
    MissingSubject,

    #[error("Failed to load verification key: {0}")]
    KeyLoad(String),
}

/// The authenticated caller, resolved once per request by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl Identity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self { subject: subject.into(), email: None, name: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, bearer_token: &str) -> Result<Identity, VerifyError>;
}

pub struct VerifierConfig {
    pub algorithm: String,
    pub secret: Option<String>,
    pub public_key_pem: Option<String>,
    pub issuer: String,
    pub audience: String,
    pub leeway_secs: u64,
}

pub struct JwtIdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    /// Builds a verifier for HMAC (`HS*`) or RSA (`RS*`) signed tokens.
    pub fn new(config: VerifierConfig) -> Result<Self, VerifyError> {
        let algorithm = Algorithm::from_str(&config.algorithm)
            .map_err(|_| VerifyError::KeyLoad(format!("unsupported algorithm {}", config.algorithm)))?;

        let key = match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                let secret = config.secret.ok_or_else(|| VerifyError::KeyLoad("missing shared secret".to_string()))?;
                DecodingKey::from_secret(secret.as_bytes())
            },
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
                let pem = config
                    .public_key_pem
                    .ok_or_else(|| VerifyError::KeyLoad("missing RSA public key".to_string()))?;
                DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| VerifyError::KeyLoad(e.to_string()))?
            },
            other => return Err(VerifyError::KeyLoad(format!("unsupported algorithm {other:?}"))),
        };

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.leeway = config.leeway_secs;

        Ok(Self { key, validation })
    }
}

impl IdentityVerifier for JwtIdentityVerifier {
    fn verify(&self, bearer_token: &str) -> Result<Identity, VerifyError> {
        let claims = decode::<Claims>(bearer_token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => VerifyError::TokenExpired,
                _ => VerifyError::InvalidToken,
            })?;

        if claims.sub.trim().is_empty() {
            return Err(VerifyError::MissingSubject);
        }

        Ok(Identity { subject: claims.sub, email: claims.email, name: claims.name })
    }
}
