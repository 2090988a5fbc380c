//! Bounded, ordered window of recent channel activity.
//!
//! - [`entry::BacklogEntry`]: one formatted, timestamped line
//! - [`store::Backlog`]: capacity-bounded sequence, oldest first

pub mod entry;
pub mod store;

pub use entry::BacklogEntry;
pub use store::{Backlog, DEFAULT_BACKLOG_CAPACITY};
