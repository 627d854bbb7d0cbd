//! Invoice extraction engine: text normalization, attribute rules, table
//! classification and the pipeline that ties them to a PDF source.

pub mod attribute;
pub mod normalize;
pub mod number;
pub mod parser;
pub mod rules;
pub mod table;

pub use attribute::extract_profile;
pub use normalize::{normalize, normalize_str};
pub use number::parse_amount;
pub use parser::{extract_document, parse_commercial_invoice};
pub use table::{TableAssembler, TableDataset};
