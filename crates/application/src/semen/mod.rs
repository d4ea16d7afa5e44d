pub mod ledger;

pub use ledger::{Balance, PendingEdit, RowOutcome, SemenAllocationLedger, WithdrawalRequest};
