//! In-memory order store behind the fake `/test-orders` endpoints.
//!
//! Orders 1 to 10 exist from the start. Deletes are acknowledged without
//! removing the record, matching the shared practice backend, so scenarios
//! that read and delete the same order can run in any order.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use loan_fixtures::Order;
use serde_json::Value;

use crate::domain::ports::TransportResponse;

/// Highest id seeded into a new store.
pub(super) const SEEDED_ORDER_COUNT: u64 = 10;

/// Outcome of checking the `api_key` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum KeyCheck {
    Missing,
    Invalid,
    Valid,
}

#[derive(Debug)]
pub(super) struct OrderStore {
    orders: Mutex<BTreeMap<u64, Order>>,
    next_id: AtomicU64,
}

impl Default for OrderStore {
    fn default() -> Self {
        let orders = (1..=SEEDED_ORDER_COUNT)
            .map(|id| {
                (
                    id,
                    Order {
                        id: Some(id),
                        ..Order::new_open()
                    },
                )
            })
            .collect();
        Self {
            orders: Mutex::new(orders),
            next_id: AtomicU64::new(SEEDED_ORDER_COUNT + 1),
        }
    }
}

impl OrderStore {
    fn lock(&self) -> MutexGuard<'_, BTreeMap<u64, Order>> {
        self.orders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn create(&self, body: Option<&Value>) -> TransportResponse {
        let Some(mut order) = parse_order(body) else {
            return bad_request("order body is invalid");
        };
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        order.id = Some(id);
        self.lock().insert(id, order.clone());
        order_response(&order)
    }

    pub(super) fn get(&self, raw_id: &str) -> TransportResponse {
        let Some(id) = parse_id(raw_id) else {
            return bad_request("order id must be a positive integer");
        };
        match self.lock().get(&id) {
            Some(order) => order_response(order),
            None => bad_request("order not found"),
        }
    }

    pub(super) fn update(
        &self,
        raw_id: &str,
        key: KeyCheck,
        body: Option<&Value>,
    ) -> TransportResponse {
        if key != KeyCheck::Valid {
            return bad_request("a valid api_key header is required");
        }
        let Some(id) = parse_id(raw_id) else {
            return bad_request("order id must be a positive integer");
        };
        let Some(mut order) = parse_order(body) else {
            return bad_request("order body is invalid");
        };

        let mut orders = self.lock();
        let Some(slot) = orders.get_mut(&id) else {
            return bad_request("order not found");
        };
        order.id = Some(id);
        slot.clone_from(&order);
        order_response(&order)
    }

    pub(super) fn delete(&self, raw_id: &str, key: KeyCheck) -> TransportResponse {
        match key {
            KeyCheck::Missing => return bad_request("api_key header is required"),
            KeyCheck::Invalid => return TransportResponse::new(401, "api_key is not valid"),
            KeyCheck::Valid => {}
        }
        let Some(id) = parse_id(raw_id) else {
            return bad_request("order id must be a positive integer");
        };
        if self.lock().contains_key(&id) {
            TransportResponse::empty(204)
        } else {
            bad_request("order not found")
        }
    }
}

fn parse_id(raw_id: &str) -> Option<u64> {
    raw_id.parse::<u64>().ok().filter(|id| *id > 0)
}

fn parse_order(body: Option<&Value>) -> Option<Order> {
    let order: Order = serde_json::from_value(body?.clone()).ok()?;
    let valid = !order.customer_name.trim().is_empty() && is_phone_number(&order.customer_phone);
    valid.then_some(order)
}

fn is_phone_number(raw: &str) -> bool {
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    (6..=15).contains(&digits.len()) && digits.bytes().all(|byte| byte.is_ascii_digit())
}

fn order_response(order: &Order) -> TransportResponse {
    match serde_json::to_value(order) {
        Ok(body) => TransportResponse::json(200, &body),
        Err(error) => TransportResponse::new(500, error.to_string()),
    }
}

fn bad_request(message: &str) -> TransportResponse {
    TransportResponse::new(400, message)
}
