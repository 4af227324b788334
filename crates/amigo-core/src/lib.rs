//! # Amigo Core
//!
//! The domain layer of the Amigo social feed.
//! This crate contains the block document model, the post composer and
//! renderer, and the port traits for the external collaborators
//! (persistence, object storage, change feed, sessions). It has zero
//! infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::DomainError;
