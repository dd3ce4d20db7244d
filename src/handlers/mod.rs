//! HTTP handlers.

pub mod product_handlers;
pub mod system_handlers;
