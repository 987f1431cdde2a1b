//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `assistant` - The four AI features and their reply mapping
//! - `chat` - Per-visitor assistant transcripts
//! - `contact` - Contact form submission to the document store
//! - `inflight` - One running AI request per visitor and feature
//! - `testimonials` - Live testimonial list fed by the store listener

pub mod assistant;
pub mod chat;
pub mod contact;
pub mod inflight;
pub mod testimonials;

pub use assistant::{AiFeatures, AiReply, ReplyKind};
pub use chat::ChatSessions;
pub use contact::ContactOutcome;
pub use inflight::{InFlightGuard, InFlightRequests};
pub use testimonials::TestimonialFeed;
