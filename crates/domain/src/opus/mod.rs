//! OPU (oocyte pick-up) rows belonging to one embryo-production batch.

pub mod field;
pub mod metrics;
pub mod payload;
pub mod record;
pub mod repository;

pub use field::OpusField;
pub use payload::{BatchContext, OpusPayload};
pub use record::{OpusRecord, WatchedFields};
pub use repository::OpusRepository;

#[cfg(any(test, feature = "mocks"))]
pub use repository::MockOpusRepository;
