//! Prompt construction and generation presets for the AI features.
//!
//! The site uses one text-generation endpoint for four features. Each feature
//! builds its own prompt from catalog data and picks its own sampling
//! parameters; the network contract is shared and lives in the storefront.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, Service};

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

/// The AI-assisted features of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiFeature {
    /// Chat assistant recommending services for a free-form need.
    Recommendation,
    /// Compare and contrast two services.
    Comparison,
    /// Summarise the key benefits of one service.
    Benefits,
    /// Answer a question strictly from one service's description.
    Question,
}

impl AiFeature {
    /// Sampling preset for the feature.
    ///
    /// Factual features run cooler and with a narrower `top_k`.
    #[must_use]
    pub const fn generation_config(self) -> GenerationConfig {
        match self {
            Self::Recommendation => GenerationConfig {
                temperature: 0.7,
                top_p: 0.95,
                top_k: 40,
            },
            Self::Comparison => GenerationConfig {
                temperature: 0.6,
                top_p: 0.9,
                top_k: 40,
            },
            Self::Benefits => GenerationConfig {
                temperature: 0.5,
                top_p: 0.9,
                top_k: 20,
            },
            Self::Question => GenerationConfig {
                temperature: 0.2,
                top_p: 0.8,
                top_k: 10,
            },
        }
    }

    /// Short stable name used in logs and in-flight keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recommendation => "recommendation",
            Self::Comparison => "comparison",
            Self::Benefits => "benefits",
            Self::Question => "question",
        }
    }
}

/// Prompt asking for service recommendations matching a visitor's need.
#[must_use]
pub fn recommendation_prompt(catalog: &Catalog, need: &str) -> String {
    let services = catalog
        .services()
        .iter()
        .map(|s| {
            format!(
                "- Tên: {}, Mô tả: {}, Danh mục: {}",
                s.name, s.description, s.category
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Bạn là một trợ lý ảo am hiểu về các dịch vụ sau đây. Dựa trên mô tả của người dùng, \
hãy gợi ý các dịch vụ phù hợp nhất và giải thích ngắn gọn tại sao. Nếu không có dịch vụ nào \
phù hợp, hãy thông báo cho người dùng.\n\
Các dịch vụ của chúng tôi:\n\
{services}\n\n\
Nhu cầu của người dùng: \"{need}\"\n\
Gợi ý của bạn:\n"
    )
}

/// Prompt comparing two services by their long descriptions.
#[must_use]
pub fn comparison_prompt(first: &Service, second: &Service) -> String {
    format!(
        "Hãy so sánh hai dịch vụ sau đây, làm nổi bật điểm giống, khác nhau và đối tượng khách \
hàng/lợi ích chính của mỗi dịch vụ. Trình bày dưới dạng dễ hiểu, có thể sử dụng gạch đầu dòng \
hoặc bảng nếu phù hợp.\n\n\
Dịch vụ 1: {}\n\
Mô tả: {}\n\n\
Dịch vụ 2: {}\n\
Mô tả: {}\n\n\
So sánh:\n",
        first.name, first.long_description, second.name, second.long_description
    )
}

/// Prompt listing three to five key benefits of a service.
#[must_use]
pub fn benefits_prompt(service: &Service) -> String {
    format!(
        "Dựa trên mô tả dịch vụ sau, hãy liệt kê 3 đến 5 lợi ích chính của dịch vụ này, dưới \
dạng danh sách gạch đầu dòng (bullet points). Chỉ bao gồm các lợi ích và không thêm bất kỳ văn \
bản giới thiệu hay kết luận nào.\n\
Mô tả dịch vụ:\n\
\"{}\"\n",
        service.long_description
    )
}

/// Prompt answering a question using only the service description.
///
/// The model is told to say so explicitly when the description does not
/// contain the answer.
#[must_use]
pub fn question_prompt(service: &Service, question: &str) -> String {
    format!(
        "Dựa trên mô tả dịch vụ sau, hãy trả lời câu hỏi của người dùng. Nếu thông tin không có \
trong mô tả, hãy nói rõ rằng bạn không tìm thấy thông tin này trong văn bản cung cấp.\n\n\
Mô tả dịch vụ:\n\
\"{}\"\n\n\
Câu hỏi của người dùng: \"{question}\"\n\n\
Trả lời:\n",
        service.long_description
    )
}

/// Reasons a comparison cannot be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ComparisonError {
    /// One or both selections are empty.
    #[error("two services must be selected")]
    MissingSelection,
    /// Both selections name the same service.
    #[error("the two selected services must differ")]
    SameService,
    /// A selection does not name a catalog service.
    #[error("selected service not found in catalog")]
    UnknownService,
}

/// Resolve two comparison selections against the catalog.
///
/// # Errors
///
/// - [`ComparisonError::MissingSelection`] if either id is blank
/// - [`ComparisonError::SameService`] if both ids are equal
/// - [`ComparisonError::UnknownService`] if either id is not in the catalog
pub fn select_pair<'a>(
    catalog: &'a Catalog,
    first: &str,
    second: &str,
) -> Result<(&'a Service, &'a Service), ComparisonError> {
    let (first, second) = (first.trim(), second.trim());

    if first.is_empty() || second.is_empty() {
        return Err(ComparisonError::MissingSelection);
    }
    if first == second {
        return Err(ComparisonError::SameService);
    }

    match (catalog.find(first), catalog.find(second)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(ComparisonError::UnknownService),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let chat = AiFeature::Recommendation.generation_config();
        assert!((chat.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(chat.top_k, 40);

        let question = AiFeature::Question.generation_config();
        assert!((question.top_p - 0.8).abs() < f32::EPSILON);
        assert_eq!(question.top_k, 10);

        assert_eq!(AiFeature::Benefits.generation_config().top_k, 20);
    }

    #[test]
    fn test_generation_config_wire_names() {
        let json = serde_json::to_value(AiFeature::Comparison.generation_config()).unwrap();
        assert!(json.get("topP").is_some());
        assert_eq!(json["topK"], 40);
    }

    #[test]
    fn test_recommendation_prompt_lists_every_service() {
        let catalog = Catalog::builtin();
        let prompt = recommendation_prompt(&catalog, "tôi cần vay tiền mua nhà");
        for service in catalog.services() {
            assert!(prompt.contains(service.name));
            assert!(prompt.contains(service.category));
        }
        assert!(prompt.contains("\"tôi cần vay tiền mua nhà\""));
    }

    #[test]
    fn test_comparison_prompt_embeds_both_long_descriptions() {
        let catalog = Catalog::builtin();
        let (a, b) = select_pair(&catalog, "laptops", "smartphones").unwrap();
        let prompt = comparison_prompt(a, b);
        assert!(prompt.contains(a.long_description));
        assert!(prompt.contains(b.long_description));
        assert!(prompt.find(a.name) < prompt.find(b.name));
    }

    #[test]
    fn test_question_prompt_contains_question_and_description() {
        let catalog = Catalog::builtin();
        let service = catalog.find("sim-card").unwrap();
        let prompt = question_prompt(service, "Có hỗ trợ trả góp không?");
        assert!(prompt.contains(service.long_description));
        assert!(prompt.contains("Có hỗ trợ trả góp không?"));
    }

    #[test]
    fn test_benefits_prompt_quotes_description() {
        let catalog = Catalog::builtin();
        let service = catalog.find("tingbox").unwrap();
        assert!(benefits_prompt(service).contains(&format!("\"{}\"", service.long_description)));
    }

    #[test]
    fn test_select_pair_validation() {
        let catalog = Catalog::builtin();
        assert_eq!(
            select_pair(&catalog, "", "laptops"),
            Err(ComparisonError::MissingSelection)
        );
        assert_eq!(
            select_pair(&catalog, "laptops", "laptops"),
            Err(ComparisonError::SameService)
        );
        assert_eq!(
            select_pair(&catalog, "laptops", "unknown"),
            Err(ComparisonError::UnknownService)
        );
        assert!(select_pair(&catalog, "laptops", "car-sales").is_ok());
    }
}
