use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ReportError, ReportResult};

const SCOPE: &str = "https://www.googleapis.com/auth/webmasters.readonly";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Service-account key material, as downloaded from the cloud console
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub token_uri: String,
    pub private_key: String,
    pub client_email: String,
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> ReportResult<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            ReportError::Config(format!(
                "invalid service account key at {}: {e}",
                path.display()
            ))
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    /// Claims for a one-hour readonly Search Console grant issued at `now`
    pub fn new(key: &ServiceAccountKey, now: DateTime<Utc>) -> Self {
        Self {
            iss: key.client_email.clone(),
            scope: SCOPE.to_string(),
            aud: key.token_uri.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges long-lived credential material for a bearer access token
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn fetch_token(&self) -> ReportResult<String>;
}

/// JWT-bearer token exchange against the key's own token endpoint
#[derive(Debug, Clone)]
pub struct ServiceAccountTokenProvider {
    client: Client,
    key: ServiceAccountKey,
}

impl ServiceAccountTokenProvider {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            client: Client::new(),
            key,
        }
    }

    fn signed_assertion(&self, now: DateTime<Utc>) -> ReportResult<String> {
        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| ReportError::Authentication(format!("invalid private key: {e}")))?;

        let claims = AssertionClaims::new(&self.key, now);
        encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| ReportError::Authentication(format!("failed to sign assertion: {e}")))
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountTokenProvider {
    async fn fetch_token(&self) -> ReportResult<String> {
        let assertion = self.signed_assertion(Utc::now())?;

        let resp = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", &assertion)])
            .send()
            .await
            .map_err(|e| ReportError::Authentication(format!("token endpoint unreachable: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ReportError::Authentication(format!(
                "token endpoint returned {status}: {}",
                resp.text().await.unwrap_or_default()
            )));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| ReportError::Authentication(format!("bad token response: {e}")))?;

        Ok(token.access_token)
    }
}
