/// Minimum units of a single item per order line.
pub const MIN_ITEM_QUANTITY: u32 = 1;
/// Maximum units of a single item per order line.
pub const MAX_ITEM_QUANTITY: u32 = 99;

/// Flat shipping fee used by the demo flow.
pub const DEMO_SHIPPING_FEE: i64 = 15_000;
