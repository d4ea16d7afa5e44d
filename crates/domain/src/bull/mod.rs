pub mod entity;
pub mod repository;

pub use entity::Bull;
pub use repository::BullRepository;

#[cfg(any(test, feature = "mocks"))]
pub use repository::MockBullRepository;
