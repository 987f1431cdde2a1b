//! Multiservice Core - Shared domain library.
//!
//! This crate provides the domain model used by the marketing site:
//! - `storefront` - Server-rendered public site and its backend adapters
//! - `integration-tests` - End-to-end checks against the running router
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no clocks beyond what callers pass in. Everything here is safe to
//! recompute on every request.
//!
//! # Modules
//!
//! - [`catalog`] - Static service catalog, categories and search filtering
//! - [`testimonial`] - Customer testimonials and their display ordering
//! - [`contact`] - Contact form validation
//! - [`chat`] - Assistant chat transcript
//! - [`assistant`] - Prompt construction and generation presets for AI features
//! - [`types`] - Newtype wrappers for ids and the application namespace

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod assistant;
pub mod catalog;
pub mod chat;
pub mod contact;
pub mod testimonial;
pub mod types;

pub use assistant::{AiFeature, ComparisonError, GenerationConfig};
pub use catalog::{ALL_CATEGORIES, Catalog, CategoryFilter, Service};
pub use chat::{ChatRole, ChatTranscript, ChatTurn};
pub use contact::{ContactError, ContactForm, ContactSubmission};
pub use testimonial::Testimonial;
pub use types::*;
