use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every failure in the lifecycle subsystem is a rejected operation, never a
/// corrupted state: all variants are recoverable and carried back to the
/// caller in the message result.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransitionError {
    /// Role/state mismatch: the actor may not drive this transition from the
    /// order's current status.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    /// The claim race was lost; the caller should refresh the available pool.
    #[error("order already claimed by another shipper")]
    AlreadyClaimed,
    /// Attempted mutation of a Delivered or Cancelled order.
    #[error("order already closed")]
    TerminalStateViolation,
    /// Malformed request, e.g. cancelling without a reason.
    #[error("validation error: {0}")]
    ValidationError(String),
}
