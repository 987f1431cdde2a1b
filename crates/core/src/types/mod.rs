//! Core types for the multiservice site.
//!
//! This module provides type-safe wrappers for ids and the collection namespace.

pub mod id;
pub mod namespace;

pub use id::*;
pub use namespace::{Collection, Namespace};
