pub mod reconciler;

pub use reconciler::{OpusRecordReconciler, SaveSummary};
