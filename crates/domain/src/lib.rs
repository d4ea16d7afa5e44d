//! Domain layer - Pure business logic with no external dependencies
//!
//! This crate contains:
//! - Entities (OpusRecord, ProductionBatch, SemenInput, SemenOutput, Bull, Client)
//! - Derived metric rules (oocyte counts, yield percentages)
//! - Repository interfaces (traits) describing the REST backend
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Business rules enforced at domain level
//! - Testable in isolation

pub mod bull;
pub mod client;
pub mod error;
pub mod opus;
pub mod page;
pub mod production;
pub mod semen;
pub mod serde_util;

// Re-export commonly used types
pub use bull::{Bull, BullRepository};
pub use client::{Client, ClientRepository};
pub use error::{DomainError, Result};
pub use opus::{OpusField, OpusPayload, OpusRecord, OpusRepository, WatchedFields};
pub use page::{Page, PageRequest};
pub use production::{ProductionBatch, ProductionDraft, ProductionRepository};
pub use semen::{NewSemenOutput, SemenInput, SemenInputRepository, SemenOutput, SemenOutputRepository};
