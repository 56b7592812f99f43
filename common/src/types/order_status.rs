use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed status vocabulary shared by `order_status` and `delivery_status`.
///
/// The happy path is totally ordered: Pending < Confirmed < Preparing < Ready
/// < PickedUp < Delivering < Delivered. `Cancelled` sits outside that order:
/// it is reachable from any non-terminal status and absorbs everything after.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Placed by the customer, not yet confirmed by the store
    Pending,
    /// Accepted by the store
    Confirmed,
    /// The store kitchen is working on it
    Preparing,
    /// Ready for a shipper to pick up
    Ready,
    /// In the shipper's hands
    PickedUp,
    /// On the way to the customer
    Delivering,
    /// Handed to the customer (terminal)
    Delivered,
    /// Cancelled by any role (terminal, absorbing)
    Cancelled,
}

impl OrderStatus {
    /// No transition may leave a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Position in the happy-path order. `Cancelled` has no position.
    pub fn happy_path_rank(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Confirmed => Some(1),
            OrderStatus::Preparing => Some(2),
            OrderStatus::Ready => Some(3),
            OrderStatus::PickedUp => Some(4),
            OrderStatus::Delivering => Some(5),
            OrderStatus::Delivered => Some(6),
            OrderStatus::Cancelled => None,
        }
    }

    /// The single next step along the happy path, if any.
    pub fn next_happy_path(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::PickedUp),
            OrderStatus::PickedUp => Some(OrderStatus::Delivering),
            OrderStatus::Delivering => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// True iff `to` is `Cancelled` (from a non-terminal state) or strictly
    /// later than `from` on the happy path. Step skipping is judged by the
    /// permission gate, not here.
    pub fn is_forward_transition(from: OrderStatus, to: OrderStatus) -> bool {
        if to == OrderStatus::Cancelled {
            return !from.is_terminal();
        }
        match (from.happy_path_rank(), to.happy_path_rank()) {
            (Some(f), Some(t)) => t > f,
            _ => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "Pending"),
            OrderStatus::Confirmed => write!(f, "Confirmed"),
            OrderStatus::Preparing => write!(f, "Preparing"),
            OrderStatus::Ready => write!(f, "Ready"),
            OrderStatus::PickedUp => write!(f, "Picked up"),
            OrderStatus::Delivering => write!(f, "Delivering"),
            OrderStatus::Delivered => write!(f, "Delivered"),
            OrderStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OrderStatus::*;
    use super::*;

    #[test]
    fn only_delivered_and_cancelled_are_terminal() {
        for status in [Pending, Confirmed, Preparing, Ready, PickedUp, Delivering] {
            assert!(!status.is_terminal());
        }
        assert!(Delivered.is_terminal());
        assert!(Cancelled.is_terminal());
    }

    #[test]
    fn next_happy_path_walks_the_whole_chain() {
        let mut status = Pending;
        let mut visited = vec![status];
        while let Some(next) = status.next_happy_path() {
            visited.push(next);
            status = next;
        }
        assert_eq!(
            visited,
            vec![Pending, Confirmed, Preparing, Ready, PickedUp, Delivering, Delivered]
        );
    }

    #[test]
    fn cancelled_has_no_successor() {
        assert_eq!(Cancelled.next_happy_path(), None);
    }

    #[test]
    fn forward_means_strictly_later_or_cancel() {
        assert!(OrderStatus::is_forward_transition(Pending, Confirmed));
        assert!(OrderStatus::is_forward_transition(Pending, Delivered));
        assert!(OrderStatus::is_forward_transition(Preparing, Cancelled));
        assert!(!OrderStatus::is_forward_transition(Confirmed, Confirmed));
        assert!(!OrderStatus::is_forward_transition(Ready, Pending));
        // Cancelled absorbs: nothing leaves it.
        assert!(!OrderStatus::is_forward_transition(Cancelled, Delivering));
        assert!(!OrderStatus::is_forward_transition(Cancelled, Cancelled));
        assert!(!OrderStatus::is_forward_transition(Delivered, Cancelled));
    }
}
