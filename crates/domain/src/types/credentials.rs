//! Credential records and the resolved authentication context.
//!
//! The host stores credentials and hands a decrypted record to the connector
//! per execution. The two supported schemas (OAuth2 and static admin token)
//! are resolved once into an [`AuthContext`] and threaded into the transport,
//! instead of re-reading an auth-mode parameter on every call.

use serde::{Deserialize, Serialize};

use crate::errors::{AnnyflowError, Result};
use crate::types::region::Region;

/// Token data produced by the host's OAuth2 flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthTokenData {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

/// OAuth2 credential record.
///
/// `organization_id` is populated lazily by the pre-authentication hook and
/// cached by the host. A stale value is tolerated: calls scoped to an
/// organization the token can no longer access fail with a remote 4xx like
/// any other authorization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2Credential {
    #[serde(default)]
    pub region: Region,
    #[serde(default)]
    pub oauth_token_data: OAuthTokenData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

/// Static bearer-token credential record (admin access token).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticTokenCredential {
    #[serde(default)]
    pub region: Region,
    pub access_token: String,
}

/// Authentication context resolved once per execution.
#[derive(Debug, Clone)]
pub enum AuthContext {
    OAuth2(OAuth2Credential),
    StaticToken(StaticTokenCredential),
}

impl AuthContext {
    pub fn region(&self) -> Region {
        match self {
            Self::OAuth2(cred) => cred.region,
            Self::StaticToken(cred) => cred.region,
        }
    }

    /// Bearer token to attach to outbound calls.
    pub fn bearer_token(&self) -> Result<&str> {
        let token = match self {
            Self::OAuth2(cred) => cred.oauth_token_data.access_token.as_str(),
            Self::StaticToken(cred) => cred.access_token.as_str(),
        };
        if token.is_empty() {
            return Err(AnnyflowError::Auth("credential carries no access token".to_string()));
        }
        Ok(token)
    }

    /// Cached organization scope, if the credential carries one.
    ///
    /// Only OAuth2 credentials are organization scoped; an empty cached
    /// value means the pre-auth hook found no active organization.
    pub fn organization_id(&self) -> Option<&str> {
        match self {
            Self::OAuth2(cred) => {
                cred.organization_id.as_deref().filter(|id| !id.is_empty())
            }
            Self::StaticToken(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oauth_context_exposes_token_and_org() {
        let ctx = AuthContext::OAuth2(OAuth2Credential {
            region: Region::Eu,
            oauth_token_data: OAuthTokenData {
                access_token: "tok-123".to_string(),
                ..Default::default()
            },
            organization_id: Some("org-9".to_string()),
            tenant_id: None,
        });

        assert_eq!(ctx.region(), Region::Eu);
        assert_eq!(ctx.bearer_token().unwrap(), "tok-123");
        assert_eq!(ctx.organization_id(), Some("org-9"));
    }

    #[test]
    fn empty_org_id_is_treated_as_unscoped() {
        let ctx = AuthContext::OAuth2(OAuth2Credential {
            organization_id: Some(String::new()),
            oauth_token_data: OAuthTokenData {
                access_token: "tok".to_string(),
                ..Default::default()
            },
            ..Default::default()
        });
        assert_eq!(ctx.organization_id(), None);
    }

    #[test]
    fn static_token_context_has_no_org_scope() {
        let ctx = AuthContext::StaticToken(StaticTokenCredential {
            region: Region::Co,
            access_token: "admin-token".to_string(),
        });
        assert_eq!(ctx.organization_id(), None);
        assert_eq!(ctx.bearer_token().unwrap(), "admin-token");
    }

    #[test]
    fn missing_token_is_an_auth_error() {
        let ctx = AuthContext::StaticToken(StaticTokenCredential::default());
        assert!(matches!(ctx.bearer_token(), Err(AnnyflowError::Auth(_))));
    }
}
