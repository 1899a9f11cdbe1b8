use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::config;

#[derive(Debug, Error)]
pub enum AuthProviderError {
    #[error("auth provider is not configured")]
    NotConfigured,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("unexpected provider response: {0}")]
    UnexpectedResponse(String),
}

/// Session material returned by the provider's password grant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: Option<u64>,
    pub refresh_token: Option<String>,
    pub user: ProviderUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// Thin client for the hosted auth provider (Supabase GoTrue).
///
/// Credential checking stays entirely on the provider side; this service
/// only relays the password grant and hands back the session material.
pub struct AuthProvider {
    http: reqwest::Client,
}

impl AuthProvider {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// POST {SUPABASE_URL}/auth/v1/token?grant_type=password
    pub async fn password_login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, AuthProviderError> {
        let supabase = &config::config().supabase;
        if !supabase.is_configured() {
            return Err(AuthProviderError::NotConfigured);
        }

        let endpoint = format!("{}/auth/v1/token?grant_type=password", supabase.url);
        let response = self
            .http
            .post(&endpoint)
            .header("apikey", &supabase.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => response
                .json::<ProviderSession>()
                .await
                .map_err(|e| AuthProviderError::UnexpectedResponse(e.to_string())),
            // GoTrue reports a failed grant as 400, older deployments as 401
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                Err(AuthProviderError::InvalidCredentials)
            }
            status => Err(AuthProviderError::UnexpectedResponse(format!(
                "status {}",
                status
            ))),
        }
    }
}

impl Default for AuthProvider {
    fn default() -> Self {
        Self::new()
    }
}
