//! Search orchestration for the dealmatch system.
//!
//! This crate provides:
//! - The listing provider seam for the two retrieval collaborators
//! - Concurrent retrieval on a fixed two-worker pool
//! - The full pipeline from raw listings to search results

pub mod provider;
pub mod pipeline;
pub mod service;

pub use provider::{JsonFileProvider, ListingProvider, StaticProvider};
pub use pipeline::build_results;
pub use service::SearchService;
