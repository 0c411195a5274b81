//! Order payloads for the `/test-orders` endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Delivery order status understood by the order service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Newly created order.
    #[default]
    Open,
    /// Order being worked on.
    Processing,
}

/// A delivery order as sent to the create and update endpoints.
///
/// # Example
///
/// ```
/// use loan_fixtures::Order;
///
/// let json = serde_json::to_value(Order::processing_update()).expect("serialise");
/// assert_eq!(json["status"], "PROCESSING");
/// assert!(json.get("id").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Current order status.
    pub status: OrderStatus,
    /// Assigned courier; zero means unassigned.
    pub courier_id: u64,
    /// Customer display name.
    pub customer_name: String,
    /// Customer phone number.
    pub customer_phone: String,
    /// Free-form delivery comment.
    pub comment: String,
    /// Order identifier, omitted when the server assigns it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl Order {
    /// A valid, unassigned order for the create endpoint.
    #[must_use]
    pub fn new_open() -> Self {
        Self {
            status: OrderStatus::Open,
            courier_id: 0,
            customer_name: "John Doe".to_owned(),
            customer_phone: "+123456789".to_owned(),
            comment: "Low Priority".to_owned(),
            id: Some(7),
        }
    }

    /// A valid full update for order `id`.
    #[must_use]
    pub fn update(id: u64) -> Self {
        Self {
            status: OrderStatus::Open,
            courier_id: 1,
            customer_name: "Updated Customer".to_owned(),
            customer_phone: "123456789".to_owned(),
            comment: "Updated comment".to_owned(),
            id: Some(id),
        }
    }

    /// An update moving an order to processing, without an embedded id.
    #[must_use]
    pub fn processing_update() -> Self {
        Self {
            status: OrderStatus::Processing,
            id: None,
            ..Self::update(0)
        }
    }
}

/// An update body whose fields have the wrong types and formats.
#[must_use]
pub fn malformed_order_update() -> Value {
    json!({
        "status": "INVALID_STATUS",
        "courierId": "invalid",
        "customerName": "",
        "customerPhone": "invalid-phone",
    })
}

/// A create body that cannot be read as an [`Order`].
#[must_use]
pub fn malformed_order() -> Value {
    json!({
        "status": 42,
        "courierId": "none",
        "customerName": null,
    })
}
