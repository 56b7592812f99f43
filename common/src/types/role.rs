use serde::{Deserialize, Serialize};
use std::fmt;

/// The four independent actors that drive an order's lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    /// Places the order and may cancel it early
    Customer,
    /// Confirms and prepares the order, owns `order_status`
    Store,
    /// Claims, picks up and delivers, owns `delivery_status`
    Shipper,
    /// Oversight: may cancel any live order, never advances it
    Admin,
}

impl Role {
    /// The string recorded in `cancelled_by_role`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Store => "store",
            Role::Shipper => "shipper",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
