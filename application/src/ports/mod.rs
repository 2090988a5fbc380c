//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod chat_transport;
pub mod governance_logger;
pub mod persistence;
pub mod rules_source;
