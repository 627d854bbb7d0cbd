//! Document-profile extraction from the first page's text.
//!
//! The template prints all document metadata and both party blocks on the
//! first page, so the extractor walks its lines once, with one line of
//! lookahead, carrying the current party scope as an explicit accumulator.

use chrono::NaiveDate;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::models::invoice::{
    BuyerInformation, DocumentAttribute, DocumentType, InvoicePartnerInformation, InvoiceProfile,
    SellerInformation,
};

use super::normalize::normalize_str;
use super::rules::patterns::*;

/// Party block the scanner is currently inside. Switches on a line containing
/// "seller" or "buyer" and persists until the next switch; party details are
/// emitted across consecutive lines in the source template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    None,
    Seller,
    Buyer,
}

/// Extract the document profile (attributes, seller, buyer, invoice partner)
/// from the normalized first-page text. Permissive by design: fields that do
/// not match any rule simply stay unset.
pub fn extract_profile(first_page_text: &str) -> InvoiceProfile {
    let mut attribute = DocumentAttribute::default();
    let mut seller = SellerInformation::default();
    let mut buyer = BuyerInformation::default();
    let mut invoice_partner = InvoicePartnerInformation::default();

    // Format cannot be pinned to a single line; checked once over the page.
    if first_page_text
        .to_lowercase()
        .contains(ELECTRONIC_DISPLAY_PHRASE)
    {
        attribute.display_format = Some(ELECTRONIC_DISPLAY_FORMAT.to_string());
    }

    let lines: Vec<String> = first_page_text.split('\n').map(normalize_str).collect();
    let mut scope = Scope::None;

    for (index, line) in lines.iter().enumerate() {
        let next_line = lines.get(index + 1).map(String::as_str);
        let lower = line.to_lowercase();

        if SALES_INVOICE_PHRASES.iter().any(|p| lower.contains(p)) {
            attribute.document_type = DocumentType::SalesInvoice;
        }

        // Issue date line: "Ngày (date) 25 tháng (month) 09 năm (year) 2025".
        if (lower.contains("date") || lower.contains("day"))
            && lower.contains("month")
            && lower.contains("year")
        {
            attribute.issue_date = extract_issue_date(line, &lines[index + 1..]);
        }

        // Key:value attribute lines, split at the first colon.
        if let Some((key, value)) = line.split_once(':') {
            let value: String = value.trim().nfkc().collect();

            if key.contains("Serial No") {
                attribute.serial_no = Some(value);
            } else if key.contains("No.") {
                attribute.invoice_number = Some(value);
            } else if TAX_AGENT_KEY_PHRASES
                .iter()
                .any(|p| key.to_lowercase().contains(p))
            {
                attribute.tax_agent_code = Some(value);
            }
        }

        // Invoice-partner lookup block spans this line and the next.
        if lower.starts_with(PARTNER_LOOKUP_PREFIX) {
            extract_partner_block(line, next_line, &mut invoice_partner);
        }

        if lower.contains("seller") {
            scope = Scope::Seller;
        } else if lower.contains("buyer") {
            scope = Scope::Buyer;
        }

        match scope {
            Scope::Seller => assign_seller_field(&lower, line, &mut seller),
            Scope::Buyer => assign_buyer_field(&lower, line, &mut buyer),
            Scope::None => {}
        }
    }

    debug!(
        document_type = ?attribute.document_type,
        issue_date = ?attribute.issue_date,
        "extracted document profile"
    );

    InvoiceProfile {
        attribute,
        seller,
        buyer,
        invoice_partner,
    }
}

/// Resolve the issue date from the marker line. The year is sometimes broken
/// onto a later line, in which case the first subsequent bare `2xxx` token
/// wins. Partial matches leave the date unset.
fn extract_issue_date(line: &str, following_lines: &[String]) -> Option<NaiveDate> {
    let day = DAY_AFTER_DATE
        .captures(line)
        .or_else(|| DAY_AFTER_DAY.captures(line))
        .and_then(|c| c[1].parse::<u32>().ok());
    let month = MONTH_MARKER
        .captures(line)
        .and_then(|c| c[1].parse::<u32>().ok());
    let mut year = YEAR_MARKER
        .captures(line)
        .and_then(|c| c[1].parse::<i32>().ok());

    if day.is_some() && month.is_some() && year.is_none() {
        year = following_lines
            .iter()
            .find_map(|l| BARE_YEAR.find(l.trim()))
            .and_then(|m| m.as_str().parse::<i32>().ok());
    }

    NaiveDate::from_ymd_opt(year?, month?, day?)
}

/// Turn the two-line lookup blob into a semi-structured string and pull the
/// keyword id, endpoint URL, and tax code out of it.
fn extract_partner_block(
    line: &str,
    next_line: Option<&str>,
    partner: &mut InvoicePartnerInformation,
) {
    let mut blob = format!("{} {}", line, next_line.unwrap_or("")).to_lowercase();
    for (from, to) in PARTNER_LOOKUP_REWRITES {
        blob = blob.replace(from, to);
    }

    if let Some(caps) = PARTNER_KEYWORD_ID.captures(&blob) {
        partner.search_keyword_id = Some(caps[1].to_uppercase());
    }
    if let Some(m) = PARTNER_ENDPOINT.find(&blob) {
        partner.endpoint_search_invoice = Some(m.as_str().trim().to_string());
    }
    if let Some(caps) = PARTNER_TAX_CODE.captures(&blob) {
        partner.tax_code = Some(caps[1].trim().to_string());
    }
}

/// Value of a `key: value` party line: the NFC-recomposed, trimmed text after
/// the first colon. `None` when the line has no colon — the assignment still
/// happens, matching the template's behavior for bare marker lines.
fn colon_value(line: &str) -> Option<String> {
    line.split_once(':')
        .map(|(_, value)| value.trim().nfc().collect())
}

fn assign_seller_field(lower: &str, line: &str, seller: &mut SellerInformation) {
    let value = colon_value(line);

    // First match wins; exactly one field per line.
    if lower.contains("seller") {
        seller.name = value;
    } else if lower.contains("tax code") {
        seller.tax_code = value;
    } else if lower.contains("address") {
        seller.address = value;
    } else if lower.contains("tel") {
        seller.tel = value;
    } else if lower.contains("email") {
        seller.email = value;
    } else if lower.contains("fax") {
        seller.fax = value;
    } else if lower.contains("a/c no") {
        seller.account_number = value;
    }
}

fn assign_buyer_field(lower: &str, line: &str, buyer: &mut BuyerInformation) {
    let value = colon_value(line);

    if lower.contains("buyer") {
        buyer.name = value;
    } else if lower.contains("company's name") {
        buyer.company = value;
    } else if lower.contains("tax code") {
        buyer.tax_code = value;
    } else if lower.contains("address") {
        buyer.address = value;
    } else if lower.contains("tel") {
        buyer.tel = value;
    } else if lower.contains("email") {
        buyer.email = value;
    } else if lower.contains("fax") {
        buyer.fax = value;
    } else if lower.contains("a/c no") {
        buyer.account_number = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIRST_PAGE: &str = "\
HÓA ĐƠN BÁN HÀNG\n\
(Bản thể hiện của hóa đơn điện tử - Electronic invoice display)\n\
(SALES INVOICE)\n\
Ngày (date) 28 tháng (month) 08 năm (year) 2025\n\
Mã của cơ quan thuế: 09DOFI999FDEEE921399FFFAKS29FF9A\n\
Ký hiệu (Serial No): 3C35OKP\n\
Số (No.): 123\n\
Đơn vị bán hàng (Seller): HỘ KINH DOANH VĨNH LONG 999\n\
Mã số thuế (Tax code): 0301118723-001\n\
Địa chỉ (Address): Phường Chợ Lớn, TP Hồ Chí Minh\n\
Họ tên người mua hàng (Buyer): Lê Hoàng Minh Phương\n\
Tên đơn vị (Company's name): HỘ KINH DOANH CHÍ VỸ 102\n\
Mã số thuế (Tax code): 7000999999\n\
Địa chỉ (Address): 999 Lý Thường Kiệt, Phường Buôn Ma Thuột, Tỉnh Đắk Lắk, Việt Nam\n\
Số tài khoản (A/C No):\n\
Tra cứu hóa đơn tại Website: http://tracuu.hoadon.com\n\
Mã tra cứu: hd123456 - MST: 0401486901\n";

    #[test]
    fn test_document_type_and_display_format() {
        let profile = extract_profile(FIRST_PAGE);
        assert_eq!(profile.attribute.document_type, DocumentType::SalesInvoice);
        assert_eq!(
            profile.attribute.display_format.as_deref(),
            Some("ELECTRONIC_INVOICE_DISPLAY")
        );
    }

    #[test]
    fn test_issue_date_on_single_line() {
        let profile = extract_profile(FIRST_PAGE);
        assert_eq!(
            profile.attribute.issue_date,
            NaiveDate::from_ymd_opt(2025, 8, 28)
        );
    }

    #[test]
    fn test_issue_date_year_wrapped_onto_next_line() {
        let text = "Ngày (date) 25 tháng (month) 09 năm (year)\nsomething else\n2025\n";
        let profile = extract_profile(text);
        assert_eq!(
            profile.attribute.issue_date,
            NaiveDate::from_ymd_opt(2025, 9, 25)
        );
    }

    #[test]
    fn test_issue_date_partial_match_stays_unset() {
        let text = "Ngày (date) 25 tháng (month) 09 năm (year)\nno year here\n";
        let profile = extract_profile(text);
        assert_eq!(profile.attribute.issue_date, None);
    }

    #[test]
    fn test_serial_and_invoice_number() {
        let profile = extract_profile(FIRST_PAGE);
        assert_eq!(profile.attribute.serial_no.as_deref(), Some("3C35OKP"));
        assert_eq!(profile.attribute.invoice_number.as_deref(), Some("123"));
    }

    #[test]
    fn test_tax_agent_code() {
        let profile = extract_profile(FIRST_PAGE);
        assert_eq!(
            profile.attribute.tax_agent_code.as_deref(),
            Some("09DOFI999FDEEE921399FFFAKS29FF9A")
        );
    }

    #[test]
    fn test_seller_block() {
        let profile = extract_profile(FIRST_PAGE);
        assert_eq!(
            profile.seller.name.as_deref(),
            Some("HỘ KINH DOANH VĨNH LONG 999")
        );
        assert_eq!(profile.seller.tax_code.as_deref(), Some("0301118723-001"));
        assert_eq!(
            profile.seller.address.as_deref(),
            Some("Phường Chợ Lớn, TP Hồ Chí Minh")
        );
    }

    #[test]
    fn test_buyer_block_scope_persists_after_switch() {
        let profile = extract_profile(FIRST_PAGE);
        assert_eq!(profile.buyer.name.as_deref(), Some("Lê Hoàng Minh Phương"));
        assert_eq!(
            profile.buyer.company.as_deref(),
            Some("HỘ KINH DOANH CHÍ VỸ 102")
        );
        assert_eq!(profile.buyer.tax_code.as_deref(), Some("7000999999"));
        // Empty value after the colon is present-but-empty, not unset.
        assert_eq!(profile.buyer.account_number.as_deref(), Some(""));
    }

    #[test]
    fn test_buyer_tax_code_does_not_clobber_seller() {
        let profile = extract_profile(FIRST_PAGE);
        assert_eq!(profile.seller.tax_code.as_deref(), Some("0301118723-001"));
        assert_eq!(profile.buyer.tax_code.as_deref(), Some("7000999999"));
    }

    #[test]
    fn test_invoice_partner_lookup_block() {
        let profile = extract_profile(FIRST_PAGE);
        assert_eq!(
            profile.invoice_partner.endpoint_search_invoice.as_deref(),
            Some("http://tracuu.hoadon.com")
        );
        assert_eq!(
            profile.invoice_partner.search_keyword_id.as_deref(),
            Some("HD123456")
        );
        assert_eq!(
            profile.invoice_partner.tax_code.as_deref(),
            Some("0401486901")
        );
    }

    #[test]
    fn test_unmatched_fields_stay_unset() {
        let profile = extract_profile("just an ordinary line\n");
        assert_eq!(profile.attribute.document_type, DocumentType::Unknown);
        assert!(profile.seller.name.is_none());
        assert!(profile.buyer.name.is_none());
        assert!(profile.invoice_partner.endpoint_search_invoice.is_none());
        assert!(profile.attribute.digital_signature.is_none());
    }
}
