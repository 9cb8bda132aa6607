//! # Postbox Core
//!
//! The domain layer of the Postbox API.
//! This crate contains the Post model and the ports infrastructure must implement.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::RepoError;
