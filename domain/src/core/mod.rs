//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`nick`]: IRC nickname comparison
//! - [`string`]: one-line excerpts of chat text

pub mod error;
pub mod nick;
pub mod string;
