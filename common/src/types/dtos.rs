use crate::types::order_status::OrderStatus;
use crate::types::role::Role;
use actix::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// One line of an order. Owned exclusively by its order and immutable after
/// creation; quantity edits happen in the pre-order cart, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItemDTO {
    /// Catalog ID of the dish.
    pub food_id: String,
    /// Display name snapshotted at order time.
    pub food_name: String,
    /// ID of the store the dish belongs to (promotions are scoped per store).
    pub store_id: String,
    /// Chosen size or option label, if the dish has one.
    pub size: Option<String>,
    /// Units ordered, 1..=99.
    pub quantity: u32,
    /// Unit price snapshot at order time, size surcharge included.
    /// Never recomputed from the current catalog price.
    pub unit_price: i64,
}

/// A promotion as applied at order-creation time. Eligibility is checked once
/// against the minimum-order threshold; the resulting discount is frozen into
/// the order and never recalculated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromotionDTO {
    /// Unique promotion ID.
    pub promo_id: String,
    /// Store the promotion is scoped to; `None` means system-wide.
    pub store_id: Option<String>,
    /// Minimum subtotal (store-scoped or full-cart, per `store_id`) required.
    pub minimum_order: i64,
    /// Flat discount granted when the minimum is met.
    pub discount_amount: i64,
}

/// A shipper known to the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipperDTO {
    /// Unique shipper ID.
    pub shipper_id: String,
    /// Full name.
    pub fullname: String,
    /// Contact phone.
    pub phone: String,
    /// The order currently assigned, if any. A busy shipper cannot claim
    /// a second order.
    pub current_order: Option<u64>,
}

/// The central aggregate: one customer order, from placement to a terminal
/// status. Mutated only through the lifecycle engine.
#[derive(Debug, Clone, Serialize, Deserialize, Message)]
#[rtype(result = "()")]
pub struct OrderDTO {
    /// Unique order ID, storage-assigned, immutable.
    pub order_id: u64,
    /// ID of the customer who placed the order.
    pub customer_id: String,
    /// ID of the store preparing the order.
    pub store_id: String,
    /// Assigned shipper, set exactly once per delivery attempt by the claim;
    /// cleared only on cancellation before pickup.
    pub shipper_id: Option<String>,
    /// The ordered items, immutable after creation.
    pub items: Vec<OrderItemDTO>,
    /// Customer/store/admin-facing lifecycle field.
    pub order_status: OrderStatus,
    /// Shipper-facing lifecycle field, same vocabulary.
    pub delivery_status: OrderStatus,
    /// Sum of unit-price snapshots times quantities.
    pub subtotal: i64,
    /// Shipping fee fixed at order time.
    pub shipping_fee: i64,
    /// Frozen discount from promotions that passed validation.
    pub discount_amount: i64,
    /// subtotal + shipping_fee - discount_amount, never negative.
    pub total: i64,
    /// Why the order was cancelled; set together with `cancelled_by_role`,
    /// only on the transition to Cancelled, immutable afterward.
    pub cancel_reason: Option<String>,
    /// Which role cancelled the order.
    pub cancelled_by_role: Option<Role>,
    /// Delivery destination snapshot, mutable only by an explicit address
    /// correction before the store confirms.
    pub receiver_name: String,
    /// Destination street address.
    pub ship_address: String,
    /// Receiver contact phone.
    pub phone_number: String,
    /// When the order was placed.
    pub created_date: SystemTime,
    /// When the store confirmed it.
    pub confirmed_date: Option<SystemTime>,
    /// When the kitchen started on it.
    pub preparing_date: Option<SystemTime>,
    /// When it became ready for pickup.
    pub ready_date: Option<SystemTime>,
    /// When the shipper picked it up.
    pub picked_up_date: Option<SystemTime>,
    /// When the shipper started the trip to the customer.
    pub delivering_date: Option<SystemTime>,
    /// When it reached the customer.
    pub delivered_date: Option<SystemTime>,
    /// When it was cancelled.
    pub cancelled_date: Option<SystemTime>,
}

impl OrderDTO {
    /// A terminal order accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        self.order_status.is_terminal()
    }

    /// Whether the shipper already has the goods. Decides if cancellation
    /// unbinds the shipper.
    pub fn is_picked_up(&self) -> bool {
        self.picked_up_date.is_some()
    }

    /// Records the milestone timestamp for `status`. Each milestone is set
    /// at most once; later transitions through the same status keep the
    /// first timestamp.
    pub fn stamp(&mut self, status: OrderStatus, at: SystemTime) {
        let slot = match status {
            OrderStatus::Pending => return,
            OrderStatus::Confirmed => &mut self.confirmed_date,
            OrderStatus::Preparing => &mut self.preparing_date,
            OrderStatus::Ready => &mut self.ready_date,
            OrderStatus::PickedUp => &mut self.picked_up_date,
            OrderStatus::Delivering => &mut self.delivering_date,
            OrderStatus::Delivered => &mut self.delivered_date,
            OrderStatus::Cancelled => &mut self.cancelled_date,
        };
        if slot.is_none() {
            *slot = Some(at);
        }
    }
}

impl Eq for OrderDTO {}

impl PartialEq for OrderDTO {
    fn eq(&self, other: &Self) -> bool {
        self.order_id == other.order_id
    }
}

impl std::hash::Hash for OrderDTO {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.order_id.hash(state);
    }
}
