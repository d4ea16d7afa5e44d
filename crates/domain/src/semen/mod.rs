//! Bull semen inventory: received lots (inputs) and withdrawals (outputs).

pub mod input;
pub mod output;
pub mod repository;

pub use input::SemenInput;
pub use output::{NewSemenOutput, REMARK_AUTOMATIC, REMARK_MANUAL, SemenOutput};
pub use repository::{SemenInputRepository, SemenOutputRepository};

#[cfg(any(test, feature = "mocks"))]
pub use repository::{MockSemenInputRepository, MockSemenOutputRepository};
