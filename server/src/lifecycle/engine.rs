use crate::lifecycle::gate;
use common::errors::TransitionError;
use common::types::dtos::OrderDTO;
use common::types::order_status::OrderStatus;
use common::types::role::Role;
use std::time::SystemTime;

/// Outcome of a transition request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The order changed and must be persisted.
    Mutated,
    /// Duplicate cancel of an already-cancelled order: accepted, nothing to
    /// persist. A second actor who clicked Cancel a moment late must not see
    /// an error.
    NoOp,
}

/// Applies one requested transition to `order` in place. On any error the
/// order is untouched. Covers the full contract of the lifecycle engine:
/// terminal check, gate check, cancellation side effects, role-owned field
/// writes, sync-point mirroring and set-once timestamp stamping.
pub fn apply_transition(
    order: &mut OrderDTO,
    role: Role,
    actor_id: &str,
    target: OrderStatus,
    reason: Option<&str>,
    now: SystemTime,
) -> Result<Applied, TransitionError> {
    // Cancellation is idempotent across racing actors.
    if target == OrderStatus::Cancelled && order.order_status == OrderStatus::Cancelled {
        return Ok(Applied::NoOp);
    }

    gate::can_transition(order, role, actor_id, target)?;

    if target == OrderStatus::Cancelled {
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| {
                TransitionError::ValidationError("a cancellation reason is required".to_string())
            })?;
        // Before pickup the shipper is unbound; the order itself stays
        // cancelled for good, it does not return to the pool.
        if !order.is_picked_up() {
            order.shipper_id = None;
        }
        order.order_status = OrderStatus::Cancelled;
        order.delivery_status = OrderStatus::Cancelled;
        order.cancel_reason = Some(reason.to_string());
        order.cancelled_by_role = Some(role);
        order.stamp(OrderStatus::Cancelled, now);
        return Ok(Applied::Mutated);
    }

    // Forward progress lands in the field the role owns.
    match role {
        Role::Store => order.order_status = target,
        Role::Shipper => order.delivery_status = target,
        // The gate only lets customers and admins cancel.
        Role::Customer | Role::Admin => {
            return Err(TransitionError::InvalidTransition(format!(
                "{} may not advance an order",
                role
            )));
        }
    }
    // PickedUp and Delivered are sync points: both fields must agree there.
    if matches!(target, OrderStatus::PickedUp | OrderStatus::Delivered) {
        order.order_status = target;
        order.delivery_status = target;
    }
    order.stamp(target, now);
    Ok(Applied::Mutated)
}

/// The one legal edit of the destination snapshot: before the store confirms,
/// and only to non-blank values.
pub fn correct_address(
    order: &mut OrderDTO,
    receiver_name: &str,
    ship_address: &str,
    phone_number: &str,
) -> Result<(), TransitionError> {
    if order.is_terminal() {
        return Err(TransitionError::TerminalStateViolation);
    }
    if order.order_status != OrderStatus::Pending {
        return Err(TransitionError::InvalidTransition(
            "the destination can only be corrected before the store confirms".to_string(),
        ));
    }
    if receiver_name.trim().is_empty()
        || ship_address.trim().is_empty()
        || phone_number.trim().is_empty()
    {
        return Err(TransitionError::ValidationError(
            "receiver name, address and phone must not be blank".to_string(),
        ));
    }
    order.receiver_name = receiver_name.to_string();
    order.ship_address = ship_address.to_string();
    order.phone_number = phone_number.to_string();
    Ok(())
}
