//! User-facing Vietnamese messages.

use multiservice_core::{AiFeature, ComparisonError, ContactError};

// Contact form
pub const CONTACT_NOT_READY: &str = "Lỗi: Hệ thống chưa sẵn sàng. Vui lòng thử lại sau.";
pub const CONTACT_MISSING_FIELDS: &str = "Vui lòng điền đầy đủ Họ và Tên, Email, và Tin nhắn.";
pub const CONTACT_SUCCESS: &str =
    "Yêu cầu của bạn đã được gửi thành công! Chúng tôi sẽ liên hệ lại sớm nhất.";
pub const CONTACT_FAILURE: &str = "Đã xảy ra lỗi khi gửi yêu cầu. Vui lòng thử lại.";

// AI features
pub const QUESTION_EMPTY: &str = "Vui lòng nhập câu hỏi của bạn.";
pub const AI_BUSY: &str = "Yêu cầu trước vẫn đang được xử lý. Vui lòng đợi trong giây lát.";

// Catalog
pub const NO_MATCHING_SERVICES: &str = "Không tìm thấy dịch vụ nào phù hợp với tìm kiếm của bạn.";
pub const TESTIMONIALS_LOADING: &str = "Đang tải đánh giá khách hàng...";

/// Shown when the model returned no usable text.
#[must_use]
pub const fn ai_fallback(feature: AiFeature) -> &'static str {
    match feature {
        AiFeature::Recommendation => {
            "Xin lỗi, tôi không thể tạo ra gợi ý lúc này. Vui lòng thử lại sau."
        }
        AiFeature::Comparison => "Không thể tạo so sánh lúc này. Vui lòng thử lại sau.",
        AiFeature::Benefits => "Không thể tạo lợi ích chính lúc này. Vui lòng thử lại.",
        AiFeature::Question => "Không thể trả lời câu hỏi của bạn lúc này. Vui lòng thử lại.",
    }
}

/// Shown when the request itself failed.
#[must_use]
pub const fn ai_error(feature: AiFeature) -> &'static str {
    match feature {
        AiFeature::Recommendation | AiFeature::Comparison => {
            "Đã xảy ra lỗi khi kết nối với AI. Vui lòng thử lại."
        }
        AiFeature::Benefits => "Đã xảy ra lỗi khi tạo lợi ích. Vui lòng thử lại.",
        AiFeature::Question => "Đã xảy ra lỗi khi xử lý câu hỏi. Vui lòng thử lại.",
    }
}

#[must_use]
pub const fn comparison_error(error: ComparisonError) -> &'static str {
    match error {
        ComparisonError::MissingSelection => "Vui lòng chọn cả hai dịch vụ để so sánh.",
        ComparisonError::SameService => "Vui lòng chọn hai dịch vụ khác nhau để so sánh.",
        ComparisonError::UnknownService => {
            "Không tìm thấy thông tin chi tiết cho một hoặc cả hai dịch vụ đã chọn."
        }
    }
}

#[must_use]
pub const fn contact_error(error: ContactError) -> &'static str {
    match error {
        ContactError::MissingRequiredFields => CONTACT_MISSING_FIELDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_and_error_differ_per_feature() {
        for feature in [
            AiFeature::Recommendation,
            AiFeature::Comparison,
            AiFeature::Benefits,
            AiFeature::Question,
        ] {
            assert_ne!(ai_fallback(feature), ai_error(feature));
        }
    }

    #[test]
    fn test_chat_and_comparison_share_connect_error() {
        assert_eq!(
            ai_error(AiFeature::Recommendation),
            ai_error(AiFeature::Comparison)
        );
    }
}
