//! Top-level extraction pipeline: input validation, checksum, PDF access,
//! profile and dataset extraction, and result composition.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{InputError, Result};
use crate::models::invoice::{InvoiceProfile, InvoiceResult, PipelineMetadata, RuntimeMetadata};
use crate::pdf::{DocumentSource, PdfSource};

use super::attribute::extract_profile;
use super::normalize::normalize_str;
use super::table::{TableAssembler, TableDataset};

/// Parse a commercial invoice PDF into a structured result.
///
/// Fails fast with [`InputError`] when the path does not exist or does not
/// end with `.pdf`, before any checksum or PDF work. The document handle is
/// scoped to this call and released on every exit path.
pub fn parse_commercial_invoice<P: AsRef<Path>>(path: P) -> Result<InvoiceResult> {
    let start = Utc::now();
    let path = path.as_ref();

    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()).into());
    }
    if path.extension().and_then(|e| e.to_str()) != Some("pdf") {
        return Err(InputError::InvalidExtension {
            path: path.to_path_buf(),
            got: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string(),
        }
        .into());
    }

    info!(path = %path.display(), "parsing commercial invoice");

    let checksum_crc32c = file_checksum_crc32c(path)?;
    let file_size_mb = round2(std::fs::metadata(path)?.len() as f64 / 1e6);

    let source = PdfSource::load(std::fs::read(path)?)?;
    let total_pages = source.page_count();
    let (profile, dataset) = extract_document(&source)?;
    drop(source);

    let end = Utc::now();
    let processing_in_seconds = (end - start).num_microseconds().unwrap_or(0) as f64 / 1e6;

    info!(
        total_pages,
        items = dataset.items.len(),
        processing_in_seconds,
        "finished parsing"
    );

    Ok(InvoiceResult {
        runtime_metadata: RuntimeMetadata {
            source_path: path.to_string_lossy().replace('\\', "/"),
            checksum_crc32c,
            total_pages,
            file_size_mb,
            pipeline: PipelineMetadata {
                start,
                end,
                processing_in_seconds,
            },
        },
        profile,
        dataset: dataset.items,
    })
}

/// Run profile and dataset extraction against any document source. Exposed
/// separately so fixtures can drive the engine without a real PDF.
pub fn extract_document<S: DocumentSource>(
    source: &S,
) -> Result<(InvoiceProfile, TableDataset)> {
    // The template repeats its layout on every page; document attributes and
    // party blocks live on the first page only.
    let first_page_text = normalize_str(&source.page_text(1)?);
    let profile = extract_profile(&first_page_text);

    let mut assembler = TableAssembler::new();
    for page in 1..=source.page_count() {
        for table in source.page_tables(page)? {
            debug!(page, rows = table.len(), "classifying table rows");
            assembler.push_table(&table);
        }
    }

    Ok((profile, assembler.finish()))
}

/// Streaming CRC32C over the file contents, 8 KiB at a time.
fn file_checksum_crc32c(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut buffer = [0u8; 8192];
    let mut crc: u32 = 0;

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        crc = crc32c::crc32c_append(crc, &buffer[..read]);
    }

    Ok(format!("{crc:08x}"))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
