pub mod engine;
pub mod gate;
pub mod pricing;
