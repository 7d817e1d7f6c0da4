//! OAuth2 client-credentials authentication against the Microsoft identity platform

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::models::{TokenErrorResponse, TokenResponse};
use super::transport::GraphTransport;
use crate::config::{DirectoryConfig, Secret};
use crate::error::UpstreamRequestError;

/// Scope requesting every application permission granted to the app
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Refresh tokens this long before they expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Upper bound on a reported `expires_in`; identity platform tokens last about an hour
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Access token with its local expiry
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub access_token: Secret,
    pub expires_at: Instant,
}

impl TokenInfo {
    /// Token valid for `expires_in_secs` from now, clamped to `MAX_TOKEN_LIFETIME`
    pub fn expiring_in(access_token: Secret, expires_in_secs: u64) -> Self {
        let lifetime = Duration::from_secs(expires_in_secs).min(MAX_TOKEN_LIFETIME);
        Self {
            access_token,
            expires_at: Instant::now() + lifetime,
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.expires_at > Instant::now() + EXPIRY_MARGIN
    }
}

/// Client credentials for one app registration
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: Secret,
    pub authority_host: String,
    pub scope: String,
}

impl ClientCredentials {
    pub fn from_config(config: &DirectoryConfig) -> Self {
        Self {
            tenant_id: config.tenant_id.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            authority_host: config.authority_host.clone(),
            scope: GRAPH_DEFAULT_SCOPE.to_string(),
        }
    }

    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            self.tenant_id
        )
    }
}

/// Acquires and caches one access token for the lifetime of a run
pub struct AuthManager {
    credentials: ClientCredentials,
    token: Mutex<Option<TokenInfo>>,
}

impl AuthManager {
    pub fn new(credentials: ClientCredentials) -> Self {
        Self {
            credentials,
            token: Mutex::new(None),
        }
    }

    /// Return a valid access token, exchanging credentials when needed
    pub async fn access_token(
        &self,
        transport: &dyn GraphTransport,
    ) -> Result<Secret, UpstreamRequestError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.access_token.clone());
        }

        let token = self.request_token(transport).await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn request_token(
        &self,
        transport: &dyn GraphTransport,
    ) -> Result<TokenInfo, UpstreamRequestError> {
        log::info!("Obtaining Azure AD token for client {}", self.credentials.client_id);

        let url = self.credentials.token_url();
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.expose()),
            ("scope", self.credentials.scope.as_str()),
        ];

        let body = transport
            .post_form(&url, &form)
            .await
            .map_err(describe_token_failure)?;

        let response: TokenResponse = serde_json::from_value(body).map_err(|e| {
            UpstreamRequestError::AuthenticationFailed(format!(
                "token response has no access_token: {}",
                e
            ))
        })?;

        log::info!(
            "Obtained {} token, expires in {}s",
            response.token_type.as_deref().unwrap_or("access"),
            response.expires_in
        );

        Ok(TokenInfo::expiring_in(
            Secret::new(response.access_token),
            response.expires_in,
        ))
    }
}

/// Turn a token endpoint failure into an authentication error, using the
/// identity platform's error payload when there is one
fn describe_token_failure(err: UpstreamRequestError) -> UpstreamRequestError {
    match err {
        UpstreamRequestError::Status { status, body, .. } => {
            let detail = serde_json::from_str::<TokenErrorResponse>(&body)
                .map(|e| match e.error_description {
                    Some(description) => format!("{}: {}", e.error, description),
                    None => e.error,
                })
                .unwrap_or(body);
            UpstreamRequestError::AuthenticationFailed(format!("status {}: {}", status, detail))
        }
        UpstreamRequestError::Transport { reason, .. } => {
            UpstreamRequestError::AuthenticationFailed(reason)
        }
        other => other,
    }
}
