use crate::errors::TransitionError;
use crate::types::dtos::{OrderDTO, ShipperDTO};
use actix::Message;
use serde::{Deserialize, Serialize};

/// Message to claim an unassigned order for a shipper.
///
/// ## Purpose
/// The at-most-one-winner assignment: when several shippers race for the same
/// order, exactly one claim succeeds and the rest get `AlreadyClaimed`.
///
/// ## Contents
/// - `order_id`: the order to claim.
/// - `shipper_id`: the claiming shipper.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Result<OrderDTO, TransitionError>")]
pub struct ClaimOrder {
    pub order_id: u64,
    pub shipper_id: String,
}

/// Message to list the claimable pool: orders with no shipper and
/// `delivery_status` still `Pending`.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Vec<OrderDTO>")]
pub struct GetAvailableOrders;

/// Message to register a shipper with the platform.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct RegisterShipper {
    pub shipper: ShipperDTO,
}

/// Message to fetch one shipper by ID.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Option<ShipperDTO>")]
pub struct GetShipper {
    pub shipper_id: String,
}
