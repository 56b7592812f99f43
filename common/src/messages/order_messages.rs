use crate::errors::TransitionError;
use crate::types::dtos::{OrderDTO, OrderItemDTO, PromotionDTO};
use crate::types::order_status::OrderStatus;
use crate::types::role::Role;
use actix::Message;
use serde::{Deserialize, Serialize};

/// Message to create an order from a cart snapshot plus applied promotions.
///
/// ## Purpose
/// The `POST /orders` surface: validates the cart, computes frozen totals and
/// stores the order as `(Pending, Pending, no shipper)`.
///
/// ## Contents
/// - `customer_id` / `store_id`: who ordered, who prepares.
/// - `items`: the item snapshots (unit price frozen at order time).
/// - `shipping_fee`: the fee fixed for this delivery.
/// - `promotions`: candidate promotions; ineligible ones are silently dropped.
/// - `receiver_name` / `ship_address` / `phone_number`: destination snapshot.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Result<OrderDTO, TransitionError>")]
pub struct PlaceOrder {
    pub customer_id: String,
    pub store_id: String,
    pub items: Vec<OrderItemDTO>,
    pub shipping_fee: i64,
    pub promotions: Vec<PromotionDTO>,
    pub receiver_name: String,
    pub ship_address: String,
    pub phone_number: String,
}

/// Message to request a status transition on one order.
///
/// ## Purpose
/// The single mutation entry point of the lifecycle engine: covers store
/// progress, shipper progress and cancellation by any role. The acting role
/// is explicit here, never read from an ambient current-user side channel.
///
/// ## Contents
/// - `order_id`: the order to transition.
/// - `role`: the acting role.
/// - `actor_id`: the caller's own ID; for shippers it must match the
///   order's assigned shipper.
/// - `target`: the requested status.
/// - `reason`: required when `target` is `Cancelled`.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Result<OrderDTO, TransitionError>")]
pub struct RequestTransition {
    pub order_id: u64,
    pub role: Role,
    pub actor_id: String,
    pub target: OrderStatus,
    pub reason: Option<String>,
}

/// Message to correct the delivery destination of a not-yet-confirmed order.
///
/// ## Purpose
/// The one legal edit of the destination snapshot, allowed only while the
/// order is still `Pending`.
///
/// ## Contents
/// - `order_id`: the order to correct.
/// - `receiver_name` / `ship_address` / `phone_number`: the new snapshot.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Result<OrderDTO, TransitionError>")]
pub struct CorrectAddress {
    pub order_id: u64,
    pub receiver_name: String,
    pub ship_address: String,
    pub phone_number: String,
}

/// Message to fetch one order by ID.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Option<OrderDTO>")]
pub struct GetOrder {
    pub order_id: u64,
}
