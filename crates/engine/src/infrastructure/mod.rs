//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod catalog_client;
pub mod clock;
pub mod config;
pub mod locks;
pub mod memory;
pub mod notifications;
pub mod ports;
pub mod seed;
