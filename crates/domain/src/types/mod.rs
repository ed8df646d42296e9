//! Domain data types.

pub mod catalog;
pub mod credentials;
pub mod region;
pub mod webhook;

pub use catalog::ResourceKind;
pub use credentials::{AuthContext, OAuth2Credential, OAuthTokenData, StaticTokenCredential};
pub use region::Region;
pub use webhook::WebhookEvent;
