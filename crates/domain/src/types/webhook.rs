//! Webhook event names the remote platform can deliver.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Event names accepted by webhook subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "bookings.created")]
    BookingCreated,
    #[serde(rename = "bookings.updated")]
    BookingUpdated,
    #[serde(rename = "bookings.deleted")]
    BookingDeleted,
    #[serde(rename = "bookings.started")]
    BookingStarted,
    #[serde(rename = "bookings.ended")]
    BookingEnded,
    #[serde(rename = "bookings.checked-in")]
    BookingCheckedIn,
    #[serde(rename = "bookings.checked-out")]
    BookingCheckedOut,
    #[serde(rename = "customers.created")]
    CustomerCreated,
    #[serde(rename = "customers.updated")]
    CustomerUpdated,
    #[serde(rename = "customers.deleted")]
    CustomerDeleted,
}

impl WebhookEvent {
    /// Wire name of the event as sent in subscription payloads and the
    /// delivery event header.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BookingCreated => "bookings.created",
            Self::BookingUpdated => "bookings.updated",
            Self::BookingDeleted => "bookings.deleted",
            Self::BookingStarted => "bookings.started",
            Self::BookingEnded => "bookings.ended",
            Self::BookingCheckedIn => "bookings.checked-in",
            Self::BookingCheckedOut => "bookings.checked-out",
            Self::CustomerCreated => "customers.created",
            Self::CustomerUpdated => "customers.updated",
            Self::CustomerDeleted => "customers.deleted",
        }
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
