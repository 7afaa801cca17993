//! `stocksync-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};

#[doc(hidden)]
pub mod __private {
    pub use uuid::Uuid;
}
