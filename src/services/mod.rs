pub mod aggregator;
pub mod sync_service;

pub use aggregator::Aggregator;
pub use sync_service::{SyncOutcome, SyncService};
