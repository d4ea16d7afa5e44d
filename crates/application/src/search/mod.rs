pub mod client_search;
pub mod debounce;

pub use client_search::{ClientSearch, SearchState};
pub use debounce::Debouncer;
