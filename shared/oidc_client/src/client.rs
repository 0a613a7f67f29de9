use crate::config::OidcConfig;
use crate::error::{OidcError, Result};
use crate::types::{TokenResponse, UserInfo};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// Federated OIDC ("Keycloak-based") client (spec §4.5.4): authorization
/// code redirect, HTTP-Basic client-credentials code exchange, and
/// `/userinfo` lookup. Unlike a full OIDC relying party this does not
/// validate an ID token — the spec's provider trusts `/userinfo` directly,
/// so there is no JWKS fetch or signature check in this client.
#[async_trait]
pub trait OidcOAuth2Client: Send + Sync {
    fn authorization_url(&self, state: &str) -> Result<Url>;
    async fn exchange_code(&self, code: &str) -> Result<TokenResponse>;
    async fn get_userinfo(&self, access_token: &str) -> Result<UserInfo>;
}

#[derive(Clone)]
pub struct OidcClient {
    config: Arc<OidcConfig>,
    http_client: Client,
}

impl OidcClient {
    pub fn new(config: OidcConfig) -> Result<Self> {
        config.validate()?;

        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| OidcError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config: Arc::new(config), http_client })
    }
}

#[async_trait]
impl OidcOAuth2Client for OidcClient {
    fn authorization_url(&self, state: &str) -> Result<Url> {
        let mut url = self.config.authorization_endpoint()?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("state", state);

        Ok(url)
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let token_url = self.config.token_endpoint()?;

        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.config.redirect_uri),
        ];

        let response = self
            .http_client
            .post(token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&params)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| OidcError::ApiError {
                status: e.status().map(|s| s.as_u16()).unwrap_or(500),
                message: format!("token exchange failed: {}", e),
            })?;

        let token_response: TokenResponse = response.json().await?;
        Ok(token_response)
    }

    async fn get_userinfo(&self, access_token: &str) -> Result<UserInfo> {
        let userinfo_url = self.config.userinfo_endpoint()?;

        let response = self
            .http_client
            .get(userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| OidcError::ApiError {
                status: e.status().map(|s| s.as_u16()).unwrap_or(500),
                message: format!("userinfo request failed: {}", e),
            })?;

        let userinfo: UserInfo = response.json().await?;
        Ok(userinfo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OidcConfig {
        OidcConfig {
            issuer: "http://localhost:8080/realms/tenant-a".to_string(),
            client_id: "identity-core".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:5173/oauth/callback".to_string(),
            scopes: vec!["openid".to_string(), "profile".to_string()],
        }
    }

    #[test]
    fn authorization_url_carries_client_and_state() {
        let client = OidcClient::new(config()).unwrap();
        let auth_url = client.authorization_url("xyz-state").unwrap();

        assert!(auth_url.as_str().contains("client_id=identity-core"));
        assert!(auth_url.as_str().contains("state=xyz-state"));
        assert!(auth_url.as_str().contains("response_type=code"));
    }

    #[tokio::test]
    async fn exchange_code_posts_basic_auth_and_returns_the_access_token() {
        let server = wiremock::MockServer::start().await;
        let mut cfg = config();
        cfg.issuer = server.uri();

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/protocol/openid-connect/token"))
            .and(wiremock::matchers::header(
                "authorization",
                format!("Basic {}", base64_basic(&cfg.client_id, &cfg.client_secret)).as_str(),
            ))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at-123",
                "token_type": "Bearer",
                "expires_in": 300,
            })))
            .mount(&server)
            .await;

        let client = OidcClient::new(cfg).unwrap();
        let token = client.exchange_code("auth-code").await.unwrap();
        assert_eq!(token.access_token, "at-123");
    }

    #[tokio::test]
    async fn get_userinfo_sends_bearer_token_and_parses_claims() {
        let server = wiremock::MockServer::start().await;
        let mut cfg = config();
        cfg.issuer = server.uri();

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/protocol/openid-connect/userinfo"))
            .and(wiremock::matchers::header("authorization", "Bearer at-123"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sub": "user-abc",
                "email": "person@example.com",
            })))
            .mount(&server)
            .await;

        let client = OidcClient::new(cfg).unwrap();
        let info = client.get_userinfo("at-123").await.unwrap();
        assert_eq!(info.sub, "user-abc");
        assert_eq!(info.email.as_deref(), Some("person@example.com"));
    }

    fn base64_basic(client_id: &str, client_secret: &str) -> String {
        use base64::{engine::general_purpose::STANDARD, Engine};
        STANDARD.encode(format!("{client_id}:{client_secret}"))
    }
}
