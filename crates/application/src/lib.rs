//! Application layer - Use cases and business workflows

pub mod opus;
pub mod production;
pub mod search;
pub mod semen;
pub mod session;

pub use opus::{OpusRecordReconciler, SaveSummary};
pub use production::ProductionWorkflow;
pub use search::{ClientSearch, Debouncer, SearchState};
pub use semen::{SemenAllocationLedger, WithdrawalRequest};
pub use session::SessionContext;
