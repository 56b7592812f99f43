pub mod internal_messages;
pub mod order_messages;
pub mod shipper_messages;

// Reexport all together for `use common::messages::*`
pub use internal_messages::*;
pub use order_messages::*;
pub use shipper_messages::*;
