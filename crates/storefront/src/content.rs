//! Static page content: hero, about, process steps, FAQ, banners and contact
//! details.
//!
//! Also renders AI-generated answers, which arrive as Markdown.

use comrak::{Options, markdown_to_html};

/// Placeholder host used for banners and image fallbacks.
const PLACEHOLDER_HOST: &str = "https://placehold.co";

/// Hero section copy.
pub struct Hero {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub cta_label: &'static str,
    pub cta_href: &'static str,
}

pub const HERO: Hero = Hero {
    title: "Giải Pháp Toàn Diện Cho Tương Lai Của Bạn",
    subtitle: "Chúng tôi cung cấp các dịch vụ tài chính và công nghệ tiên tiến để hỗ trợ cá nhân và doanh nghiệp phát triển bền vững.",
    cta_label: "Liên Hệ Ngay",
    cta_href: "#contact-form",
};

/// "About us" section.
pub struct About {
    pub heading: &'static str,
    pub image_url: &'static str,
    pub image_fallback_url: &'static str,
    pub image_alt: &'static str,
    pub paragraphs: [&'static str; 2],
}

pub const ABOUT: About = About {
    heading: "Về Chúng Tôi",
    image_url: "https://placehold.co/600x400/9ca3af/ffffff?text=Our+Team",
    image_fallback_url: "https://placehold.co/600x400/cccccc/333333?text=Anh+Gioi+Thieu",
    image_alt: "Đội ngũ của chúng tôi",
    paragraphs: [
        "Chúng tôi là một đội ngũ chuyên nghiệp, tận tâm mang đến những giải pháp tài chính và công nghệ tiên tiến, toàn diện nhất cho khách hàng tại Việt Nam. Với nhiều năm kinh nghiệm, chúng tôi tự hào là đối tác đáng tin cậy, luôn lắng nghe và đáp ứng mọi nhu cầu của bạn, từ giải pháp kinh doanh, dịch vụ tài chính cá nhân đến các thiết bị công nghệ hiện đại.",
        "Mục tiêu của chúng tôi là giúp bạn đạt được hiệu quả tối đa trong công việc và cuộc sống, thông qua các sản phẩm và dịch vụ chất lượng cao cùng sự hỗ trợ chuyên nghiệp, nhanh chóng. Chúng tôi không ngừng cải tiến để mang lại giá trị vượt trội.",
    ],
};

/// One step of the "how we work" section.
pub struct ProcessStep {
    pub number: u8,
    pub title: &'static str,
    pub description: &'static str,
}

pub const PROCESS_STEPS: [ProcessStep; 3] = [
    ProcessStep {
        number: 1,
        title: "Bước 1: Liên hệ & Tư vấn",
        description: "Quý khách liên hệ qua hotline hoặc form, chúng tôi sẽ lắng nghe nhu cầu và đưa ra tư vấn phù hợp.",
    },
    ProcessStep {
        number: 2,
        title: "Bước 2: Giải pháp & Đề xuất",
        description: "Chúng tôi đề xuất các sản phẩm/dịch vụ tối ưu, kèm theo báo giá và thông tin chi tiết.",
    },
    ProcessStep {
        number: 3,
        title: "Bước 3: Triển khai & Hỗ trợ",
        description: "Tiến hành triển khai dịch vụ/giao sản phẩm và luôn đồng hành hỗ trợ quý khách trong suốt quá trình sử dụng.",
    },
];

/// A frequently asked question.
pub struct Faq {
    pub id: &'static str,
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQS: [Faq; 4] = [
    Faq {
        id: "faq1",
        question: "Thời gian làm việc của các bạn là khi nào?",
        answer: "Chúng tôi hoạt động từ Thứ Hai đến Thứ Bảy, từ 8:00 sáng đến 17:00 chiều. Vui lòng liên hệ để đặt lịch hẹn ngoài giờ nếu cần.",
    },
    Faq {
        id: "faq2",
        question: "Tôi có thể thanh toán bằng những hình thức nào?",
        answer: "Chúng tôi chấp nhận thanh toán bằng tiền mặt, chuyển khoản ngân hàng, và thanh toán qua máy POS bằng thẻ tín dụng/ghi nợ.",
    },
    Faq {
        id: "faq3",
        question: "Chính sách bảo hành và đổi trả dịch vụ/sản phẩm như thế nào?",
        answer: "Mỗi dịch vụ và sản phẩm sẽ có chính sách bảo hành/đổi trả riêng biệt, được tư vấn chi tiết khi quý khách sử dụng dịch vụ hoặc mua sản phẩm. Chúng tôi cam kết hỗ trợ tốt nhất cho khách hàng.",
    },
    Faq {
        id: "faq4",
        question: "Làm thế nào để được tư vấn về khoản vay tiêu dùng?",
        answer: "Quý khách có thể liên hệ trực tiếp qua số điện thoại 0363.79.89.89 (gặp Hiếu) hoặc điền vào form liên hệ trên trang web để nhận được tư vấn chi tiết từ chuyên viên của chúng tôi.",
    },
];

/// Footer contact details.
pub struct ContactInfo {
    pub phone_display: &'static str,
    pub phone_href: &'static str,
    pub contact_person: &'static str,
    pub facebook_url: &'static str,
    pub zalo_url: &'static str,
}

pub const CONTACT_INFO: ContactInfo = ContactInfo {
    phone_display: "0363.79.89.89",
    phone_href: "tel:0363798989",
    contact_person: "Hiếu",
    facebook_url: "https://facebook.com",
    zalo_url: "https://zalo.me/0363798989",
};

/// Banner image shown above the grid for a category.
#[must_use]
pub fn category_banner(category: &str) -> Option<&'static str> {
    let url = match category {
        "Tất cả" => "https://placehold.co/1920x600/a3e635/1c1c1c?text=Dich+Vu+Tong+Hop",
        "Giải pháp kinh doanh" => {
            "https://placehold.co/1920x600/fcd34d/1c1c1c?text=Giai+Phap+Kinh+Doanh"
        }
        "Dịch vụ tài chính" => "https://placehold.co/1920x600/60a5fa/1c1c1c?text=Dich+Vu+Tai+Chinh",
        "Viễn thông & Ngân hàng" => {
            "https://placehold.co/1920x600/8b5cf6/1c1c1c?text=Vien+Thong+Ngan+Hang"
        }
        "Thiết bị điện tử" => "https://placehold.co/1920x600/ef4444/1c1c1c?text=Thiet+Bi+Dien+Tu",
        "Khác" => "https://placehold.co/1920x600/34d399/1c1c1c?text=Dich+Vu+Khac",
        _ => return None,
    };
    Some(url)
}

/// Banner shown when a category banner fails to load.
pub const BANNER_FALLBACK_URL: &str =
    "https://placehold.co/1920x600/cccccc/333333?text=Kh%C3%B4ng+T%E1%BA%A3i+%C4%90%C6%B0%E1%BB%A3c+%E1%BA%A2nh";

/// Grey placeholder image labelled with `label`.
///
/// `size` is `WIDTHxHEIGHT`, e.g. `600x400`.
#[must_use]
pub fn placeholder_image(size: &str, label: &str) -> String {
    format!(
        "{PLACEHOLDER_HOST}/{size}/cccccc/333333?text={}",
        urlencoding::encode(label)
    )
}

/// Render AI-generated Markdown to HTML.
///
/// Raw HTML in the input is not passed through.
#[must_use]
pub fn render_markdown(text: &str) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    markdown_to_html(text, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_a_banner() {
        for category in multiservice_core::Catalog::builtin().categories() {
            assert!(category_banner(category).is_some(), "no banner for {category}");
        }
        assert!(category_banner("Không có").is_none());
    }

    #[test]
    fn test_placeholder_image_encodes_label() {
        assert_eq!(
            placeholder_image("600x400", "SIM số"),
            "https://placehold.co/600x400/cccccc/333333?text=SIM%20s%E1%BB%91"
        );
    }

    #[test]
    fn test_render_markdown_lists_and_tables() {
        let html = render_markdown("* Nhanh\n* An toàn\n");
        assert!(html.contains("<li>Nhanh</li>"));

        let html = render_markdown("| A | B |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_render_markdown_drops_raw_html() {
        let html = render_markdown("<script>alert(1)</script>\n\n**ok**");
        assert!(!html.contains("<script>"));
        assert!(html.contains("<strong>ok</strong>"));
    }

    #[test]
    fn test_static_sections() {
        assert_eq!(FAQS.len(), 4);
        assert_eq!(PROCESS_STEPS.map(|s| s.number), [1, 2, 3]);
        assert!(HERO.cta_href.starts_with('#'));
    }
}
