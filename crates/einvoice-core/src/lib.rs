//! Core library for Vietnamese/English commercial invoice extraction.
//!
//! This crate provides:
//! - PDF access (page text and positioned table recovery)
//! - Bilingual text normalization for the invoice template
//! - Document attribute, party and line-item extraction
//! - Result models with runtime and pipeline metadata

pub mod error;
pub mod invoice;
pub mod models;
pub mod pdf;

pub use error::{InputError, LensError, NumberError, PdfError, Result};
pub use invoice::{
    extract_document, normalize, normalize_str, parse_amount, parse_commercial_invoice,
    TableAssembler, TableDataset,
};
pub use models::invoice::{
    BuyerInformation, DocumentAttribute, DocumentType, InvoicePartnerInformation, InvoiceProfile,
    InvoiceResult, LineItem, PipelineMetadata, RuntimeMetadata, SellerInformation,
};
pub use pdf::{DocumentSource, PdfSource};
