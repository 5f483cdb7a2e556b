// Adapters layer: concrete implementations for external systems.

pub mod apollo;
pub mod dashboard;
pub mod webhook;
