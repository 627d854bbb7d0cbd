//! Data models for extraction results.

pub mod invoice;

pub use invoice::{
    BuyerInformation, DocumentAttribute, DocumentType, InvoicePartnerInformation, InvoiceProfile,
    InvoiceResult, LineItem, PipelineMetadata, RuntimeMetadata, SellerInformation,
};
