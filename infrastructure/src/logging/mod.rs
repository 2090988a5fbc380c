//! Logging infrastructure: persistent channel history and governance records.
//!
//! - [`ChannelFileLog`]: every backlog line, one file per channel per day
//! - [`ProposalFileLog`]: legislation records, implements
//!   [`ProposalRecorder`](eunomia_application::ProposalRecorder)
//! - [`JsonlGovernanceLogger`]: machine-readable event history

mod jsonl_logger;
mod log_files;

pub use jsonl_logger::JsonlGovernanceLogger;
pub use log_files::{ChannelFileLog, ProposalFileLog};
