//! Domain-wide constants.

/// Prefix for all versioned API paths.
pub const API_PREFIX: &str = "/api/v1";

/// Hard server-side ceiling for `page[size]`; larger requests are clamped.
pub const MAX_PAGE_SIZE: u32 = 30;

/// Page size used when the caller does not specify one (list search uses
/// the maximum so typeahead pickers fill quickly).
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// JSON:API media type used for write payloads.
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Plain JSON media type.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Header carrying the event name on inbound webhook deliveries.
pub const EVENT_HEADER: &str = "x-anny-event";

/// Header carrying the delivery timestamp on inbound webhook deliveries.
pub const TIMESTAMP_HEADER: &str = "x-anny-timestamp";

/// OAuth scope requested for connector credentials.
pub const OAUTH_SCOPE: &str = "user:read b.* b.webhook-subscriptions:*";
