use crate::types::dtos::OrderDTO;
use actix::prelude::*;
use serde::{Deserialize, Serialize};

/////////////////////////////////////////////////////////////////////
// Storage messages
/////////////////////////////////////////////////////////////////////

/// Message to insert a freshly built order into storage.
///
/// ## Purpose
/// Storage owns ID assignment: the inserted order gets the next ID and the
/// handler returns it.
///
/// ## Contents
/// - `order`: the order to insert; its `order_id` is overwritten.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "u64")]
pub struct InsertOrder {
    pub order: OrderDTO,
}

/////////////////////////////////////////////////////////////////////
// Notification hooks
/////////////////////////////////////////////////////////////////////

/// Fire-and-forget signal that an order changed, sent to every subscriber
/// after each committed mutation. UI layers use it to refresh lists and
/// badge counts; the engine never waits on it.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct OrderUpdated {
    pub order: OrderDTO,
}

/// Message to subscribe a recipient to [`OrderUpdated`] notifications.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Subscribe {
    pub recipient: Recipient<OrderUpdated>,
}
