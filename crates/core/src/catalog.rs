//! Static service catalog and search filtering.
//!
//! The catalog is defined at build time and never changes at runtime. Filtering
//! is a pure function over it, cheap enough to recompute on every keystroke.

use serde::Serialize;

/// Category label that selects every service.
pub const ALL_CATEGORIES: &str = "Tất cả";

/// A single catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Service {
    /// Stable slug used in URLs and comparison selections.
    pub id: &'static str,
    pub name: &'static str,
    /// Short description shown on the catalog card.
    pub description: &'static str,
    /// Full description shown in the detail modal and fed to the AI features.
    pub long_description: &'static str,
    pub image_url: &'static str,
    pub category: &'static str,
}

impl Service {
    /// Case-insensitive substring match against name, short and long description.
    ///
    /// `needle` must already be lowercased.
    fn matches_lowercase(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.long_description.to_lowercase().contains(needle)
    }
}

/// Category selection for the catalog grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// The [`ALL_CATEGORIES`] sentinel.
    #[default]
    All,
    /// Exactly one category label.
    Only(String),
}

impl CategoryFilter {
    /// Parse a category label, mapping the sentinel and blank input to `All`.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(label.to_owned())
        }
    }

    /// Display label of the selection.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Only(label) => label,
        }
    }

    fn admits(&self, service: &Service) -> bool {
        match self {
            Self::All => true,
            Self::Only(label) => service.category == label,
        }
    }
}

/// The catalog of services offered on the site.
#[derive(Debug, Clone)]
pub struct Catalog {
    services: Vec<Service>,
}

impl Catalog {
    /// Build a catalog from an explicit list of services.
    #[must_use]
    pub const fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    /// The catalog shipped with the site.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(BUILTIN_SERVICES.to_vec())
    }

    /// All services in catalog order.
    #[must_use]
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Look up a service by its id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Category labels for the navigation bar.
    ///
    /// Starts with [`ALL_CATEGORIES`], followed by each distinct category in
    /// order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&'static str> {
        let mut labels = vec![ALL_CATEGORIES];
        for service in &self.services {
            if !labels.contains(&service.category) {
                labels.push(service.category);
            }
        }
        labels
    }

    /// Services admitted by `category` whose text contains `term`.
    ///
    /// Matching is a case-insensitive substring search over the name, short
    /// description and long description. Catalog order is preserved.
    #[must_use]
    pub fn filter(&self, category: &CategoryFilter, term: &str) -> Vec<&Service> {
        let needle = term.to_lowercase();
        self.services
            .iter()
            .filter(|s| category.admits(s) && s.matches_lowercase(&needle))
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

const BUILTIN_SERVICES: &[Service] = &[
    Service {
        id: "pos-machine",
        name: "Máy POS",
        description: "Giải pháp thanh toán hiện đại, giúp bạn dễ dàng quản lý giao dịch và tối ưu hóa quy trình bán hàng.",
        long_description: "Máy POS (Point of Sale) của chúng tôi là thiết bị thanh toán tiên tiến, cho phép bạn chấp nhận thanh toán qua thẻ tín dụng/ghi nợ, ví điện tử một cách nhanh chóng và an toàn. Tích hợp phần mềm quản lý bán hàng, máy POS giúp bạn theo dõi doanh thu, quản lý kho hàng và in hóa đơn tức thì, tối ưu hóa quy trình vận hành cho mọi loại hình kinh doanh từ cửa hàng nhỏ đến chuỗi siêu thị. Các tính năng nổi bật: Quản lý giao dịch, báo cáo doanh thu, tích hợp tồn kho, hỗ trợ đa dạng phương thức thanh toán.",
        image_url: "http://googleusercontent.com/image_generation_content/4",
        category: "Giải pháp kinh doanh",
    },
    Service {
        id: "tingbox",
        name: "Tingbox",
        description: "Nâng tầm trải nghiệm kinh doanh của bạn với thiết bị đa năng này.",
        long_description: "Tingbox là một giải pháp tổng hợp, cung cấp các tính năng quản lý khách hàng (CRM), tự động hóa marketing, và phân tích dữ liệu hiệu quả. Nó giúp doanh nghiệp nhỏ và vừa dễ dàng tiếp cận công nghệ để nâng cao tương tác với khách hàng, tối ưu hóa chiến dịch quảng cáo, và đưa ra quyết định kinh doanh dựa trên dữ liệu chính xác, từ đó thúc đẩy tăng trưởng doanh thu. Lợi ích: Tăng hiệu suất, quản lý thông minh, tiết kiệm chi phí, hỗ trợ đa nền tảng.",
        image_url: "https://placehold.co/600x400/543d6b/fff?text=Tingbox",
        category: "Giải pháp kinh doanh",
    },
    Service {
        id: "credit-withdrawal",
        name: "Rút tiền tín dụng",
        description: "Đáp ứng nhu cầu tài chính cấp bách của bạn một cách nhanh chóng và an toàn.",
        long_description: "Dịch vụ rút tiền tín dụng của chúng tôi cho phép bạn nhanh chóng chuyển đổi hạn mức tín dụng từ thẻ của mình thành tiền mặt, đáp ứng các nhu cầu chi tiêu khẩn cấp. Với quy trình đơn giản, bảo mật cao và mức phí cạnh tranh, chúng tôi đảm bảo bạn có thể tiếp cận nguồn vốn cần thiết mà không gặp trở ngại. Đặc điểm: Thủ tục đơn giản, giải ngân nhanh chóng, bảo mật thông tin, hỗ trợ 24/7.",
        image_url: "http://googleusercontent.com/image_generation_content/6",
        category: "Dịch vụ tài chính",
    },
    Service {
        id: "consumer-loan-collateral",
        name: "Khoản vay tiêu dùng + thế chấp tài sản",
        description: "Giải pháp tài chính linh hoạt, giúp bạn thực hiện các kế hoạch cá nhân hoặc kinh doanh với sự hỗ trợ từ tài sản thế chấp.",
        long_description: "Chúng tôi cung cấp các gói vay tiêu dùng linh hoạt, có hoặc không có tài sản thế chấp, phù hợp với mọi nhu cầu từ mua sắm, học tập, đến khởi nghiệp. Đặc biệt, với các khoản vay thế chấp tài sản (như nhà đất, xe hơi), bạn có thể tiếp cận hạn mức vay lớn hơn với lãi suất ưu đãi, giúp bạn hiện thực hóa các kế hoạch tài chính lớn của mình. Ưu điểm: Lãi suất cạnh tranh, duyệt hồ sơ nhanh, hạn mức vay cao, thời gian trả nợ linh hoạt.",
        image_url: "http://googleusercontent.com/image_generation_content/7",
        category: "Dịch vụ tài chính",
    },
    Service {
        id: "sim-card",
        name: "SIM số",
        description: "Lựa chọn SIM số phù hợp với phong thủy, cá tính hoặc nhu cầu kinh doanh của bạn.",
        long_description: "Kho SIM số đa dạng của chúng tôi bao gồm các loại SIM số đẹp, SIM phong thủy, SIM tứ quý, ngũ quý, lộc phát, thần tài và nhiều loại khác, phù hợp với mọi nhu cầu cá nhân hay kinh doanh. Chúng tôi cam kết cung cấp SIM chính chủ, thủ tục nhanh gọn, giúp bạn sở hữu số điện thoại ưng ý và may mắn. Lựa chọn: SIM VIP, SIM phong thủy, SIM theo yêu cầu, hỗ trợ đăng ký chính chủ.",
        image_url: "http://googleusercontent.com/image_generation_content/8",
        category: "Viễn thông & Ngân hàng",
    },
    Service {
        id: "bank-accounts",
        name: "Tài khoản ngân hàng OCB, BIDV",
        description: "Mở tài khoản ngân hàng dễ dàng tại các ngân hàng uy tín hàng đầu như OCB, BIDV và nhiều ngân hàng khác.",
        long_description: "Chúng tôi hỗ trợ khách hàng mở tài khoản ngân hàng tại các tổ chức tài chính hàng đầu như OCB, BIDV và nhiều ngân hàng uy tín khác. Dịch vụ bao gồm tư vấn chọn gói tài khoản phù hợp (tiết kiệm, thanh toán, ưu đãi), hỗ trợ thủ tục nhanh gọn, và cung cấp thông tin chi tiết về các tiện ích như internet banking, mobile banking, thẻ thanh toán, đảm bảo sự tiện lợi tối đa cho bạn. Tiện ích: Internet Banking, Mobile Banking, Thẻ ATM/Visa/MasterCard, ưu đãi phí giao dịch.",
        image_url: "http://googleusercontent.com/image_generation_content/0",
        category: "Viễn thông & Ngân hàng",
    },
    Service {
        id: "phone-accessories",
        name: "Phụ kiện điện thoại",
        description: "Đa dạng phụ kiện chất lượng cao, bảo vệ và nâng cao trải nghiệm sử dụng điện thoại của bạn.",
        long_description: "Chúng tôi cung cấp đầy đủ các loại phụ kiện điện thoại chính hãng và chất lượng cao như ốp lưng, kính cường lực, sạc dự phòng, tai nghe, cáp sạc, gậy selfie... Các sản phẩm được lựa chọn kỹ lưỡng, đảm bảo độ bền và tính tương thích cao, giúp bảo vệ thiết bị và tối ưu hóa trải nghiệm sử dụng của bạn. Sản phẩm: Ốp lưng, kính cường lực, sạc dự phòng, tai nghe, cáp sạc, thiết bị Bluetooth.",
        image_url: "http://googleusercontent.com/image_generation_content/2",
        category: "Thiết bị điện tử",
    },
    Service {
        id: "smartphones",
        name: "Điện thoại",
        description: "Cung cấp các dòng điện thoại mới nhất, đáp ứng mọi nhu cầu từ học tập, làm việc đến giải trí.",
        long_description: "Chúng tôi là đối tác của các thương hiệu điện thoại hàng đầu thế giới, mang đến cho bạn những mẫu smartphone mới nhất với đa dạng cấu hình, tính năng và mức giá. Từ điện thoại phổ thông đến các dòng cao cấp, chúng tôi đảm bảo cung cấp sản phẩm chính hãng, bảo hành uy tín và dịch vụ hậu mãi chu đáo. Thương hiệu: Samsung, iPhone, Oppo, Xiaomi, Vivo. Mẫu mã đa dạng, bảo hành chính hãng.",
        image_url: "http://googleusercontent.com/image_generation_content/9",
        category: "Thiết bị điện tử",
    },
    Service {
        id: "laptops",
        name: "Laptop",
        description: "Cung cấp các dòng laptop mới nhất, đáp ứng mọi nhu cầu từ học tập, làm việc đến giải trí.",
        long_description: "Cửa hàng chúng tôi chuyên cung cấp các loại laptop từ văn phòng, học tập đến gaming, đồ họa, từ các thương hiệu uy tín. Mỗi chiếc laptop đều được kiểm tra kỹ lưỡng về chất lượng, hiệu năng và được bảo hành chính hãng. Chúng tôi cam kết mang đến cho bạn sản phẩm phù hợp nhất với nhu cầu và ngân sách, cùng với dịch vụ hỗ trợ kỹ thuật tận tình. Loại hình: Laptop văn phòng, gaming, đồ họa, siêu mỏng nhẹ. Cấu hình đa dạng, bảo hành dài hạn.",
        image_url: "http://googleusercontent.com/image_generation_content/10",
        category: "Thiết bị điện tử",
    },
    Service {
        id: "car-sales",
        name: "Bán Xe Hơi",
        description: "Hỗ trợ tìm kiếm và sở hữu chiếc xe hơi ưng ý.",
        long_description: "Dịch vụ bán xe hơi của chúng tôi bao gồm tư vấn lựa chọn xe phù hợp với nhu cầu và ngân sách, hỗ trợ thủ tục mua bán, đăng ký xe, và các dịch vụ hậu mãi. Chúng tôi cung cấp đa dạng các dòng xe từ xe đã qua sử dụng đến xe mới, đảm bảo nguồn gốc rõ ràng, chất lượng được kiểm định, giúp bạn an tâm sở hữu chiếc xe mơ ước. Dịch vụ: Tư vấn mua xe, hỗ trợ vay mua xe, đăng ký, đăng kiểm, bảo dưỡng sau bán.",
        image_url: "http://googleusercontent.com/image_generation_content/1",
        category: "Khác",
    },
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(services: &[&Service]) -> Vec<&'static str> {
        services.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_categories_start_with_sentinel_in_first_seen_order() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.categories(),
            vec![
                ALL_CATEGORIES,
                "Giải pháp kinh doanh",
                "Dịch vụ tài chính",
                "Viễn thông & Ngân hàng",
                "Thiết bị điện tử",
                "Khác",
            ]
        );
    }

    #[test]
    fn test_empty_term_with_all_returns_whole_catalog() {
        let catalog = Catalog::builtin();
        let all = catalog.filter(&CategoryFilter::All, "");
        assert_eq!(all.len(), catalog.services().len());
        assert_eq!(
            ids(&all),
            catalog.services().iter().map(|s| s.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_pos_search_in_all_categories() {
        let catalog = Catalog::builtin();
        let found = catalog.filter(&CategoryFilter::parse(ALL_CATEGORIES), "pos");
        assert_eq!(ids(&found), vec!["pos-machine"]);
    }

    #[test]
    fn test_pos_search_in_financial_category_is_empty() {
        let catalog = Catalog::builtin();
        let found = catalog.filter(&CategoryFilter::parse("Dịch vụ tài chính"), "pos");
        assert!(found.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_for_vietnamese() {
        let catalog = Catalog::builtin();
        let found = catalog.filter(&CategoryFilter::All, "ĐIỆN THOẠI");
        assert!(found.iter().any(|s| s.id == "smartphones"));
        assert!(found.iter().any(|s| s.id == "phone-accessories"));
    }

    #[test]
    fn test_search_matches_long_description_only() {
        let catalog = Catalog::builtin();
        // "Samsung" only appears in the smartphone long description.
        let found = catalog.filter(&CategoryFilter::All, "samsung");
        assert_eq!(ids(&found), vec!["smartphones"]);
    }

    #[test]
    fn test_category_filter_preserves_catalog_order() {
        let catalog = Catalog::builtin();
        let found = catalog.filter(&CategoryFilter::parse("Thiết bị điện tử"), "");
        assert_eq!(
            ids(&found),
            vec!["phone-accessories", "smartphones", "laptops"]
        );
    }

    #[test]
    fn test_filter_is_subset_matching_both_predicates() {
        let catalog = Catalog::builtin();
        for category in catalog.categories() {
            for term in ["", "a", "SIM", "vay", "xyz-not-there"] {
                let filter = CategoryFilter::parse(category);
                let found = catalog.filter(&filter, term);
                let needle = term.to_lowercase();
                let expected: Vec<&Service> = catalog
                    .services()
                    .iter()
                    .filter(|s| category == ALL_CATEGORIES || s.category == category)
                    .filter(|s| {
                        s.name.to_lowercase().contains(&needle)
                            || s.description.to_lowercase().contains(&needle)
                            || s.long_description.to_lowercase().contains(&needle)
                    })
                    .collect();
                assert_eq!(found, expected, "category={category} term={term}");
            }
        }
    }

    #[test]
    fn test_unknown_category_matches_nothing() {
        let catalog = Catalog::builtin();
        assert!(catalog.filter(&CategoryFilter::parse("Nope"), "").is_empty());
    }

    #[test]
    fn test_parse_blank_is_all() {
        assert_eq!(CategoryFilter::parse("  "), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("Khác").label(), "Khác");
        assert_eq!(CategoryFilter::All.label(), ALL_CATEGORIES);
    }

    #[test]
    fn test_find() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.find("laptops").unwrap().name, "Laptop");
        assert!(catalog.find("missing").is_none());
    }

    #[test]
    fn test_service_serializes_for_templates() {
        let catalog = Catalog::builtin();
        let json = serde_json::to_value(catalog.find("tingbox").unwrap()).unwrap();
        assert_eq!(json["category"], "Giải pháp kinh doanh");
    }
}
