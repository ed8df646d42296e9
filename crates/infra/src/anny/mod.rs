//! anny booking-platform integration.
//!
//! Host-facing surface: the authenticated [`transport::AnnyClient`], the
//! resource operation handlers under [`resources`], typeahead
//! [`list_search`] providers, the [`webhook`] subscription lifecycle and
//! the OAuth2 [`auth`] pre-authentication hook.

pub mod auth;
pub mod list_search;
pub mod resources;
pub mod transport;
pub mod webhook;

pub use auth::resolve_organization_id;
pub use list_search::{list_search, ListSearchItem, ListSearchResult};
pub use resources::{execute, run_items, ExecutionItem, Operation};
pub use transport::{AnnyClient, MediaType, RequestOptions};
pub use webhook::{normalize_delivery, WebhookLifecycle};
