//! Embryo-production batches (one OPU session for a client on a date).

pub mod batch;
pub mod repository;

pub use batch::{ProductionBatch, ProductionDraft};
pub use repository::ProductionRepository;

#[cfg(any(test, feature = "mocks"))]
pub use repository::MockProductionRepository;
