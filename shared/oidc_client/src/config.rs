use crate::error::{OidcError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for the federated OIDC ("Keycloak-based") provider (spec
/// §4.5.4). `issuer` is the realm base URL; the standard
/// `/protocol/openid-connect/{auth,token,userinfo}` paths are appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OidcConfig {
    pub issuer: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

fn default_scopes() -> Vec<String> {
    vec!["openid".to_string(), "profile".to_string(), "email".to_string()]
}

impl OidcConfig {
    pub fn authorization_endpoint(&self) -> Result<Url> {
        let base = Url::parse(&self.issuer)?;
        base.join("/protocol/openid-connect/auth").map_err(Into::into)
    }

    pub fn token_endpoint(&self) -> Result<Url> {
        let base = Url::parse(&self.issuer)?;
        base.join("/protocol/openid-connect/token").map_err(Into::into)
    }

    pub fn userinfo_endpoint(&self) -> Result<Url> {
        let base = Url::parse(&self.issuer)?;
        base.join("/protocol/openid-connect/userinfo").map_err(Into::into)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.issuer).map_err(|_| OidcError::ConfigError("invalid issuer URL".into()))?;
        Url::parse(&self.redirect_uri)
            .map_err(|_| OidcError::ConfigError("invalid redirect_uri".into()))?;

        if self.client_id.is_empty() {
            return Err(OidcError::ConfigError("client_id cannot be empty".into()));
        }
        if self.client_secret.is_empty() {
            return Err(OidcError::ConfigError("client_secret cannot be empty".into()));
        }
        if self.scopes.is_empty() {
            return Err(OidcError::ConfigError("at least one scope is required".into()));
        }

        Ok(())
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
            scopes: default_scopes(),
        }
    }

    #[test]
    fn validates_a_well_formed_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn rejects_empty_client_secret() {
        let mut c = config();
        c.client_secret.clear();
        assert!(c.validate().is_err());
    }

    #[test]
    fn endpoint_urls_follow_the_standard_layout() {
        let c = config();
        assert_eq!(
            c.authorization_endpoint().unwrap().as_str(),
            "http://localhost:8080/realms/tenant-a/protocol/openid-connect/auth"
        );
        assert_eq!(
            c.token_endpoint().unwrap().as_str(),
            "http://localhost:8080/realms/tenant-a/protocol/openid-connect/token"
        );
        assert_eq!(
            c.userinfo_endpoint().unwrap().as_str(),
            "http://localhost:8080/realms/tenant-a/protocol/openid-connect/userinfo"
        );
    }
}
