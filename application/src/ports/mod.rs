//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod feedback_gateway;
pub mod progress;
pub mod session_store;
