//! Catalog of remote resource types the connector operates on.

use serde::{Deserialize, Serialize};

use crate::constants::API_PREFIX;

/// Domain resource exposed by the remote booking platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Booking,
    Customer,
    Order,
    Invoice,
    Service,
    Resource,
    PlanSubscription,
}

impl ResourceKind {
    /// Collection path under the versioned API prefix.
    pub fn collection_path(self) -> String {
        format!("{}/{}", API_PREFIX, self.path_segment())
    }

    /// Path for a single record.
    pub fn record_path(self, id: &str) -> String {
        format!("{}/{}/{}", API_PREFIX, self.path_segment(), id)
    }

    fn path_segment(self) -> &'static str {
        match self {
            Self::Booking => "bookings",
            Self::Customer => "customers",
            Self::Order => "orders",
            Self::Invoice => "invoices",
            Self::Service => "services",
            Self::Resource => "resources",
            Self::PlanSubscription => "plan-subscriptions",
        }
    }

    /// JSON:API `type` value for write payloads.
    pub fn jsonapi_type(self) -> &'static str {
        self.path_segment()
    }

    /// Relation expansion applied when the caller leaves the include field
    /// blank.
    pub fn default_include(self) -> &'static str {
        match self {
            Self::Booking => "resource,service,customer",
            Self::Customer => "address",
            Self::Order => "customer.address,bookings.resource,bookings.service,invoice.items",
            Self::Invoice => "items",
            Self::Service => "group",
            Self::Resource => "category,group,location",
            Self::PlanSubscription => "customer,plan",
        }
    }
}
