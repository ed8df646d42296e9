//! Region selection and base-URL resolution.
//!
//! Each credential carries a region tag that selects the API origin, the
//! OAuth authorization origin and the pre-registered OAuth client id.

use serde::{Deserialize, Serialize};

/// Deployment region of the remote platform.
///
/// Unknown or missing region tags fall back to [`Region::Co`], the primary
/// commercial domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// anny.co (default commercial domain)
    #[default]
    Co,
    /// anny.eu (EU gov-cloud domain)
    Eu,
    /// Sandbox / staging environment
    Staging,
    /// Local development environment
    Local,
}

impl Region {
    /// API origin for this region.
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Co => "https://b.anny.co",
            Self::Eu => "https://b.anny.eu",
            Self::Staging => "https://b.staging.anny.co",
            Self::Local => "https://anny.test",
        }
    }

    /// OAuth authorization-server origin for this region.
    pub fn auth_base_url(self) -> &'static str {
        match self {
            Self::Co => "https://auth.anny.co",
            Self::Eu => "https://auth.anny.eu",
            Self::Staging => "https://auth.staging.anny.co",
            Self::Local => "https://auth.anny.test",
        }
    }

    /// Authorization endpoint (`authorization_code` grant).
    pub fn authorize_url(self) -> String {
        format!("{}/oauth/authorize", self.auth_base_url())
    }

    /// Token endpoint.
    pub fn token_url(self) -> String {
        format!("{}/oauth/token", self.auth_base_url())
    }

    /// Pre-registered OAuth client id for this region.
    pub fn oauth_client_id(self) -> &'static str {
        match self {
            Self::Co => "a087a0ba-46c7-4221-8472-8fc16702f84a",
            Self::Eu => "a087a108-0c7b-4c09-963d-6e51defeac16",
            Self::Staging => "a087a050-ae57-4f29-923c-efb296462024",
            Self::Local => "a087a15e-6337-48a9-b126-eb861ef48486",
        }
    }

    /// Parse a region tag, falling back to the primary domain for anything
    /// unrecognized. This mirrors the remote platform's own behavior and
    /// keeps stale credential records usable.
    pub fn parse_lenient(tag: &str) -> Self {
        match tag {
            "eu" => Self::Eu,
            "staging" => Self::Staging,
            "local" => Self::Local,
            _ => Self::Co,
        }
    }
}
