use common::errors::TransitionError;
use common::types::dtos::OrderDTO;
use common::types::order_status::OrderStatus;
use common::types::role::Role;

/// Decides whether `role` (identified by `actor_id`) may move `order` to
/// `target`. Pure policy: no mutation, no side effects. The engine applies
/// the transition only after this returns `Ok`.
pub fn can_transition(
    order: &OrderDTO,
    role: Role,
    actor_id: &str,
    target: OrderStatus,
) -> Result<(), TransitionError> {
    if order.is_terminal() {
        return Err(TransitionError::TerminalStateViolation);
    }
    match role {
        Role::Customer => customer_rules(order, target),
        Role::Store => store_rules(order, target),
        Role::Shipper => shipper_rules(order, actor_id, target),
        Role::Admin => admin_rules(target),
    }
}

/// Customers may only cancel, and only before the store hands the order on:
/// Pending, Confirmed or Preparing.
fn customer_rules(order: &OrderDTO, target: OrderStatus) -> Result<(), TransitionError> {
    if target != OrderStatus::Cancelled {
        return Err(TransitionError::InvalidTransition(format!(
            "customers may only cancel an order, not set it to {}",
            target
        )));
    }
    match order.order_status {
        OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Preparing => Ok(()),
        current => Err(TransitionError::InvalidTransition(format!(
            "customers can no longer cancel once the order is {}",
            current
        ))),
    }
}

/// Stores advance `order_status` one happy-path step at a time and never set
/// Delivered; they may cancel anything that is not yet Delivering.
fn store_rules(order: &OrderDTO, target: OrderStatus) -> Result<(), TransitionError> {
    let current = order.order_status;
    if target == OrderStatus::Cancelled {
        // Anything strictly before Delivering is still the store's to cancel.
        return if OrderStatus::is_forward_transition(current, OrderStatus::Delivering) {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition(format!(
                "the store can no longer cancel once the order is {}",
                current
            )))
        };
    }
    if target == OrderStatus::Delivered {
        return Err(TransitionError::InvalidTransition(
            "only the shipper may mark an order delivered".to_string(),
        ));
    }
    match current.next_happy_path() {
        Some(next) if next == target => Ok(()),
        Some(next) if OrderStatus::is_forward_transition(current, target) => {
            Err(TransitionError::InvalidTransition(format!(
                "skipping steps is not allowed: {} must come before {}",
                next, target
            )))
        }
        _ => Err(TransitionError::InvalidTransition(format!(
            "the order cannot move from {} to {}",
            current, target
        ))),
    }
}

/// The shipper-facing walk over the vocabulary: claim leaves the order at
/// Confirmed, then PickedUp, Delivering, Delivered in that order. Store-side
/// stages (Preparing, Ready) never appear in `delivery_status`, so the first
/// shipper step is always PickedUp.
fn next_shipper_step(delivery_status: OrderStatus) -> Option<OrderStatus> {
    match delivery_status {
        OrderStatus::PickedUp => Some(OrderStatus::Delivering),
        OrderStatus::Delivering => Some(OrderStatus::Delivered),
        OrderStatus::Delivered | OrderStatus::Cancelled => None,
        _ => Some(OrderStatus::PickedUp),
    }
}

/// Only the assigned shipper drives `delivery_status`, forward only; they
/// may cancel any time before Delivered.
fn shipper_rules(
    order: &OrderDTO,
    actor_id: &str,
    target: OrderStatus,
) -> Result<(), TransitionError> {
    match order.shipper_id.as_deref() {
        Some(assigned) if assigned == actor_id => {}
        _ => {
            return Err(TransitionError::InvalidTransition(
                "only the assigned shipper may update this order".to_string(),
            ));
        }
    }
    if target == OrderStatus::Cancelled {
        return Ok(());
    }
    match next_shipper_step(order.delivery_status) {
        Some(next) if next == target => Ok(()),
        _ => Err(TransitionError::InvalidTransition(format!(
            "the delivery cannot move from {} to {}",
            order.delivery_status, target
        ))),
    }
}

/// Admins hold an oversight power only: cancellation. Forward progress
/// belongs to the store and the shipper.
fn admin_rules(target: OrderStatus) -> Result<(), TransitionError> {
    if target == OrderStatus::Cancelled {
        Ok(())
    } else {
        Err(TransitionError::InvalidTransition(
            "admins may only cancel orders".to_string(),
        ))
    }
}
