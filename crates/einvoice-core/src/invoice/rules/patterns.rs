//! Regex and phrase tables for the bilingual invoice template family.
//!
//! All phrase matching is declared here so new template variants can be added
//! without touching the extractor control flow.

use lazy_static::lazy_static;
use regex::Regex;

/// Lower-cased phrases that mark the document as a sale invoice.
pub const SALES_INVOICE_PHRASES: &[&str] = &["sales invoice", "hóa đơn bán hàng", "đơn bán hàng"];

/// Lower-cased phrase marking the electronic-display format variant.
pub const ELECTRONIC_DISPLAY_PHRASE: &str = "electronic invoice display";

/// Value recorded when the electronic-display phrase is present.
pub const ELECTRONIC_DISPLAY_FORMAT: &str = "ELECTRONIC_INVOICE_DISPLAY";

/// Lower-cased key fragments that carry the tax agency code.
pub const TAX_AGENT_KEY_PHRASES: &[&str] = &["mã của cơ quan thuế", "mã cơ quan thuế"];

/// Lower-cased prefix of the invoice-partner lookup block
/// ("Tra cứu hóa đơn" = invoice lookup).
pub const PARTNER_LOOKUP_PREFIX: &str = "tra cứu hóa đơn";

/// Vietnamese fragments rewritten to English tokens inside the lookup blob,
/// applied in order so "mã số thuế" wins over the bare "mst" abbreviation.
pub const PARTNER_LOOKUP_REWRITES: &[(&str, &str)] = &[
    ("mã tra cứu", "search_keyword_id"),
    ("mã số thuế", "tax_code"),
    ("mst", "tax_code"),
];

/// Line-item table phrase sets. First-cell checks, `starts_with` unless the
/// name says contains.
pub const TOTAL_FIGURE_PREFIXES: &[&str] = &["Tổng tiền thanh toán", "Cộng tiền hàng"];
pub const TOTAL_FIGURE_CONTAINS: &str = "Total amount";
pub const TOTAL_IN_WORDS_PREFIX: &str = "Số tiền viết bằng chữ";
pub const TOTAL_IN_WORDS_CONTAINS: &str = "In words";

lazy_static! {
    // Whitespace canonicalization
    pub static ref MULTI_SPACE: Regex = Regex::new(r"  +").unwrap();
    pub static ref TRAILING_SPACE_BEFORE_NEWLINE: Regex = Regex::new(r"[ \t]+\n").unwrap();

    // Issue-date markers: "Ngày (date) 28 tháng (month) 08 năm (year) 2025".
    // The digit follows the closing parenthesis of the English marker.
    pub static ref DAY_AFTER_DATE: Regex = Regex::new(r"date\)\s?(\d+)").unwrap();
    pub static ref DAY_AFTER_DAY: Regex = Regex::new(r"day\)\s?(\d+)").unwrap();
    pub static ref MONTH_MARKER: Regex = Regex::new(r"month\)\s?(\d+)").unwrap();
    pub static ref YEAR_MARKER: Regex = Regex::new(r"year\)\s?(\d+)").unwrap();

    // Bare-year fallback: the template sometimes wraps the year onto its own
    // line. Only 2xxx years qualify.
    pub static ref BARE_YEAR: Regex = Regex::new(r"^2\d{3}$").unwrap();

    // Invoice-partner lookup blob, after the Vietnamese fragments have been
    // rewritten to English tokens.
    pub static ref PARTNER_KEYWORD_ID: Regex =
        Regex::new(r"search_keyword_id:\s?(\w+)").unwrap();
    pub static ref PARTNER_ENDPOINT: Regex =
        Regex::new(r"\bhttps?://(?:[\w-]+\.)+[\w-]+\b").unwrap();
    pub static ref PARTNER_TAX_CODE: Regex = Regex::new(r"tax_code:\s?(\w+)").unwrap();
}
