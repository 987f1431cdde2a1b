//! Integration tests for site-wide behavior: health checks, live
//! testimonials and response headers.

use chrono::DateTime;
use reqwest::StatusCode;

use multiservice_core::{Collection, DocumentId};
use multiservice_integration_tests::TestContext;
use multiservice_storefront::backend::{Document, FieldValue, Fields};
use multiservice_storefront::messages;

fn testimonial(id: &str, name: &str, quote: &str, seconds: Option<i64>) -> Document {
    let mut fields = Fields::new();
    fields.insert("customerName".to_string(), name.into());
    fields.insert("title".to_string(), "Chủ cửa hàng".into());
    fields.insert("quote".to_string(), quote.into());
    if let Some(seconds) = seconds {
        let ts = DateTime::from_timestamp(seconds, 0).expect("valid timestamp");
        fields.insert("timestamp".to_string(), FieldValue::Timestamp(ts));
    }
    Document {
        id: DocumentId::new(id),
        fields,
    }
}

// ============================================================================
// Health checks
// ============================================================================

#[tokio::test]
async fn test_health_is_always_ok() {
    let ctx = TestContext::unstarted().await;

    let (status, body) = ctx.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_readiness_follows_bootstrap() {
    let ctx = TestContext::unstarted().await;

    let (status, _) = ctx.get("/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    // No backend config: bootstrap falls back to the in-memory store.
    multiservice_storefront::start_session(ctx.state.clone()).await;

    let (status, _) = ctx.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);

    let (_, home) = ctx.get("/").await;
    let session_id = ctx.session_id();
    assert!(home.contains(&session_id));

    multiservice_storefront::shutdown(&ctx.state);
}

// ============================================================================
// Testimonials
// ============================================================================

#[tokio::test]
async fn test_testimonials_empty_shows_loading_message() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/testimonials").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(messages::TESTIMONIALS_LOADING));
}

#[tokio::test]
async fn test_testimonials_render_newest_first() {
    let ctx = TestContext::new().await;
    let path = ctx.collection_path(Collection::Testimonials);

    ctx.store.insert(
        &path,
        testimonial("old", "Lê Văn Cường", "Dịch vụ tốt", Some(1_600_000_000)),
    );
    ctx.store.insert(
        &path,
        testimonial("undated", "Phạm Thu Dung", "Rất hài lòng", None),
    );
    ctx.store.insert(
        &path,
        testimonial("new", "Hoàng Minh Em", "Nhanh và tiện", Some(1_700_000_000)),
    );
    ctx.wait_for_testimonials(3).await;

    let (status, body) = ctx.get("/testimonials").await;
    assert_eq!(status, StatusCode::OK);

    let newest = body.find("Hoàng Minh Em").expect("newest rendered");
    let older = body.find("Lê Văn Cường").expect("older rendered");
    let undated = body.find("Phạm Thu Dung").expect("undated rendered");
    assert!(newest < older);
    assert!(older < undated);

    // The home page renders the same live list.
    let (_, home) = ctx.get("/").await;
    assert!(home.contains("Nhanh và tiện"));
}

// ============================================================================
// Response headers
// ============================================================================

#[tokio::test]
async fn test_security_headers_present() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(ctx.url("/"))
        .send()
        .await
        .expect("Failed to get home page");

    let headers = resp.headers();
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(headers.contains_key("content-security-policy"));
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(ctx.url("/health"))
        .header("x-request-id", "trace-abc-123")
        .send()
        .await
        .expect("Failed to get health");

    assert_eq!(resp.headers()["x-request-id"], "trace-abc-123");
}
