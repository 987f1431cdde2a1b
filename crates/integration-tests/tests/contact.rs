//! Integration tests for the contact form.

use reqwest::StatusCode;

use multiservice_core::Collection;
use multiservice_integration_tests::TestContext;
use multiservice_storefront::backend::FieldValue;
use multiservice_storefront::messages;

#[tokio::test]
async fn test_missing_fields_are_rejected_without_write() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .post_form(
            "/contact",
            &[
                ("name", "Nguyễn Văn An"),
                ("email", ""),
                ("phone", "0901234567"),
                ("message", "Tôi cần tư vấn máy POS"),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(messages::CONTACT_MISSING_FIELDS));
    // Entered values are kept for a retry.
    assert!(body.contains("Nguyễn Văn An"));
    assert!(ctx.documents(Collection::ContactForms).is_empty());
}

#[tokio::test]
async fn test_valid_submission_writes_one_document() {
    let ctx = TestContext::new().await;
    let session_id = ctx.session_id();

    let (status, body) = ctx
        .post_form(
            "/contact",
            &[
                ("name", "  Trần Thị Bình "),
                ("email", "binh@example.com"),
                ("phone", ""),
                ("message", "Tư vấn vay tiêu dùng"),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(messages::CONTACT_SUCCESS));
    // The form is cleared after success.
    assert!(!body.contains("binh@example.com"));

    let documents = ctx.documents(Collection::ContactForms);
    assert_eq!(documents.len(), 1);

    let document = documents.first().expect("document written");
    assert_eq!(document.string("userId"), session_id);
    assert_eq!(document.string("name"), "Trần Thị Bình");
    assert_eq!(document.string("email"), "binh@example.com");
    assert_eq!(document.string("phone"), "");
    assert_eq!(document.string("message"), "Tư vấn vay tiêu dùng");
    assert!(matches!(
        document.fields.get("timestamp"),
        Some(FieldValue::Timestamp(_))
    ));
}

#[tokio::test]
async fn test_submission_before_bootstrap_reports_not_ready() {
    let ctx = TestContext::unstarted().await;

    let (status, body) = ctx
        .post_form(
            "/contact",
            &[
                ("name", "An"),
                ("email", "an@example.com"),
                ("message", "Xin chào"),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(messages::CONTACT_NOT_READY));
    assert!(ctx.documents(Collection::ContactForms).is_empty());
}
