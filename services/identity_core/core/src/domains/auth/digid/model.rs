//! BSN/SAML (DigiD-style) Provider data model (spec §3, §4.5.3).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct DigidLogin {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub bsn: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The SOAP `ArtifactResolve` response's status code, already parsed
/// out of the XML by the infra layer's SAML client (spec §4.5.3 step 3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamlStatusCode {
    Success,
    AuthnFailed,
    NoAuthnContext,
    RequestDenied,
    Other(String),
}

/// Everything the business-rule checks in step 4 need, extracted from
/// the resolved SAML assertion by infra (XML-DSig verification already
/// done by the time this reaches core).
#[derive(Debug, Clone)]
pub struct ResolvedAssertion {
    pub status_code: SamlStatusCode,
    pub audience: String,
    pub not_before: DateTime<Utc>,
    pub not_on_or_after: DateTime<Utc>,
    pub name_id: String,
}

/// Strips the `s00000000:` prefix and left-pads to 9 digits (spec
/// §4.5.3 step 4).
pub fn extract_bsn(name_id: &str) -> Option<String> {
    let digits = name_id.strip_prefix("s00000000:")?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!("{digits:0>9}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bsn_is_left_padded_to_nine_digits() {
        assert_eq!(extract_bsn("s00000000:123456"), Some("000123456".to_string()));
    }

    #[test]
    fn bsn_without_prefix_is_rejected() {
        assert_eq!(extract_bsn("123456789"), None);
    }

    #[test]
    fn nine_digit_bsn_is_unchanged() {
        assert_eq!(extract_bsn("s00000000:123456789"), Some("123456789".to_string()));
    }
}
