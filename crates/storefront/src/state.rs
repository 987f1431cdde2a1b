//! Application state shared across handlers.

use std::sync::Arc;

use multiservice_core::Catalog;

use crate::backend::SessionContext;
use crate::config::StorefrontConfig;
use crate::gemini::{GeminiClient, GeminiError};
use crate::services::{AiFeatures, ChatSessions, InFlightRequests, TestimonialFeed};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// process-wide session context, the live testimonial feed and the AI client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    session: SessionContext,
    testimonials: TestimonialFeed,
    ai: AiFeatures,
    chats: ChatSessions,
    inflight: InFlightRequests,
}

impl AppState {
    /// Create a new application state with the built-in catalog.
    ///
    /// The session context starts empty; identity bootstrap fills it in later.
    ///
    /// # Errors
    ///
    /// Returns an error if the Gemini endpoint URL is invalid or the HTTP
    /// client fails to build.
    pub fn new(config: StorefrontConfig) -> Result<Self, GeminiError> {
        Self::with_catalog(config, Catalog::builtin())
    }

    /// Create a new application state with an explicit catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the Gemini client cannot be created.
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Result<Self, GeminiError> {
        let ai = AiFeatures::new(GeminiClient::new(&config.gemini)?);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                session: SessionContext::new(),
                testimonials: TestimonialFeed::new(),
                ai,
                chats: ChatSessions::new(),
                inflight: InFlightRequests::new(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the service catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the process-wide session context.
    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.inner.session
    }

    /// Get a reference to the live testimonial feed.
    #[must_use]
    pub fn testimonials(&self) -> &TestimonialFeed {
        &self.inner.testimonials
    }

    /// Get a reference to the AI features.
    #[must_use]
    pub fn ai(&self) -> &AiFeatures {
        &self.inner.ai
    }

    /// Get a reference to the assistant transcripts.
    #[must_use]
    pub fn chats(&self) -> &ChatSessions {
        &self.inner.chats
    }

    /// Get a reference to the in-flight AI request registry.
    #[must_use]
    pub fn inflight(&self) -> &InFlightRequests {
        &self.inner.inflight
    }
}
