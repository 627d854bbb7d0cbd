//! Invoice data models for the bilingual (Vietnamese/English) sale-invoice
//! template family.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Type of the source document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    /// Sale invoice (hóa đơn bán hàng).
    #[serde(rename = "SALES_INVOICE")]
    SalesInvoice,

    /// No recognized document-type phrase on the first page.
    #[default]
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

/// Document-level metadata extracted from the first page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentAttribute {
    /// Document type, `Unknown` unless a sale-invoice phrase was seen.
    pub document_type: DocumentType,

    /// Display format marker (e.g. `ELECTRONIC_INVOICE_DISPLAY`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_format: Option<String>,

    /// Issue date assembled from the bilingual day/month/year line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,

    /// Tax agency authentication code (mã của cơ quan thuế).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_agent_code: Option<String>,

    /// Invoice serial (Serial No / Ký hiệu).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_no: Option<String>,

    /// Invoice number (No. / Số).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Digital signature. Extraction is unimplemented (the signature is an
    /// image bounding box, not text); always `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digital_signature: Option<String>,
}

/// Seller party block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SellerInformation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
}

/// Buyer party block. Same shape as the seller plus the company name line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuyerInformation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
}

/// The third-party e-invoice verification service printed on the document
/// (lookup URL, lookup keyword, tax code).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoicePartnerInformation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_search_invoice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_keyword_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// Everything extracted from the document profile (first page).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceProfile {
    pub attribute: DocumentAttribute,
    pub seller: SellerInformation,
    pub buyer: BuyerInformation,
    pub invoice_partner: InvoicePartnerInformation,
}

/// A single line item from the invoice table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Row ordinal, unique within the dataset; the dataset is sorted
    /// ascending by this value.
    pub no: u32,

    /// Product/service description, embedded newlines flattened to spaces.
    pub product_description: String,

    /// Unit of measure, lower-cased.
    pub unit: String,

    pub quantity: f64,
    pub unit_price: f64,
    pub amount: f64,
}

/// Wall-clock bounds of a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineMetadata {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub processing_in_seconds: f64,
}

/// Runtime information about the source file and the run itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeMetadata {
    /// Source path, normalized to forward slashes.
    pub source_path: String,

    /// CRC32C content hash of the source file, lowercase hex.
    pub checksum_crc32c: String,

    pub total_pages: u32,

    /// File size in megabytes, rounded to 2 decimal places.
    pub file_size_mb: f64,

    pub pipeline: PipelineMetadata,
}

/// Final result of one extraction invocation. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceResult {
    pub runtime_metadata: RuntimeMetadata,
    pub profile: InvoiceProfile,
    pub dataset: Vec<LineItem>,
}
