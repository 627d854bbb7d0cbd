//! lopdf/pdf-extract backed [`DocumentSource`] implementation.
//!
//! Text comes from pdf-extract. Candidate table rows come from a positioned
//! walk of the page content stream: text items are grouped into rows by Y
//! position, column boundaries are clustered from the X positions of
//! multi-cell rows, and each row is materialized as a fixed-width list of
//! optional cells.

use lopdf::{Document, Object, ObjectId};
use tracing::{debug, trace};

use super::{DocumentSource, Result, Table};
use crate::error::PdfError;

/// Same-row Y tolerance for grouping text items into table rows.
const ROW_Y_TOLERANCE: f32 = 3.0;
/// X gap starting a new cell within a row.
const CELL_X_GAP: f32 = 18.0;
/// Tolerance when merging cell start positions into column boundaries.
const COLUMN_X_TOLERANCE: f32 = 10.0;
/// Y gap that terminates the table region below the last multi-cell row.
const REGION_Y_GAP: f32 = 30.0;

/// A positioned text fragment from a page content stream.
#[derive(Debug, Clone)]
struct TextItem {
    text: String,
    x: f32,
    y: f32,
}

/// PDF-backed document source.
pub struct PdfSource {
    document: Document,
    raw_data: Vec<u8>,
}

impl PdfSource {
    /// Load a PDF from raw bytes. Attempts an empty-password decrypt for
    /// nominally encrypted files; rejects documents with no pages.
    pub fn load(data: Vec<u8>) -> Result<Self> {
        let mut document = Document::load_mem(&data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw_data = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("decrypted PDF with empty password");
            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(e.to_string()))?;
            decrypted
        } else {
            data
        };

        if document.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        Ok(Self { document, raw_data })
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.document
            .get_pages()
            .get(&page)
            .copied()
            .ok_or(PdfError::InvalidPage(page))
    }

    /// Positioned text items for one page, in content-stream order.
    fn page_text_items(&self, page_id: ObjectId) -> Result<Vec<TextItem>> {
        use lopdf::content::Content;

        let fonts = self.document.get_page_fonts(page_id).unwrap_or_default();
        let content_data = self
            .document
            .get_page_content(page_id)
            .map_err(|e| PdfError::Parse(e.to_string()))?;
        let content =
            Content::decode(&content_data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let mut items = Vec::new();
        let mut current_font = String::new();
        let mut current_font_size: f32 = 12.0;
        let mut text_matrix = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
        let mut line_matrix = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
        let mut in_text_block = false;

        let mut push_item = |text: String, matrix: &[f32; 6]| {
            if !text.trim().is_empty() {
                items.push(TextItem {
                    text,
                    x: matrix[4],
                    y: matrix[5],
                });
            }
        };

        for op in &content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    text_matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
                    line_matrix = text_matrix;
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Ok(name) = op.operands[0].as_name() {
                            current_font = String::from_utf8_lossy(name).to_string();
                        }
                        if let Some(size) = object_number(&op.operands[1]) {
                            current_font_size = size;
                        }
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        line_matrix[4] += object_number(&op.operands[0]).unwrap_or(0.0);
                        line_matrix[5] += object_number(&op.operands[1]).unwrap_or(0.0);
                        text_matrix = line_matrix;
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        for (i, operand) in op.operands.iter().take(6).enumerate() {
                            text_matrix[i] = object_number(operand)
                                .unwrap_or(if i == 0 || i == 3 { 1.0 } else { 0.0 });
                        }
                        line_matrix = text_matrix;
                    }
                }
                "T*" => {
                    line_matrix[5] -= current_font_size * 1.2;
                    text_matrix = line_matrix;
                }
                "Tj" => {
                    if in_text_block && !op.operands.is_empty() {
                        if let Some(text) = self.decode_operand(&op.operands[0], &fonts, &current_font)
                        {
                            push_item(text, &text_matrix);
                        }
                    }
                }
                "TJ" => {
                    if in_text_block && !op.operands.is_empty() {
                        if let Ok(array) = op.operands[0].as_array() {
                            let mut combined = String::new();
                            for element in array {
                                if let Some(text) =
                                    self.decode_operand(element, &fonts, &current_font)
                                {
                                    combined.push_str(&text);
                                }
                            }
                            push_item(combined, &text_matrix);
                        }
                    }
                }
                "'" => {
                    line_matrix[5] -= current_font_size * 1.2;
                    text_matrix = line_matrix;
                    if !op.operands.is_empty() {
                        if let Some(text) = self.decode_operand(&op.operands[0], &fonts, &current_font)
                        {
                            push_item(text, &text_matrix);
                        }
                    }
                }
                _ => {}
            }
        }

        trace!(count = items.len(), "extracted positioned text items");
        Ok(items)
    }

    /// Decode one text-show operand through the current font's encoding,
    /// falling back to UTF-16BE, then Latin-1.
    fn decode_operand(
        &self,
        obj: &Object,
        fonts: &std::collections::BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        current_font: &str,
    ) -> Option<String> {
        let Object::String(bytes, _) = obj else {
            return None;
        };

        if let Some(font_dict) = fonts.get(current_font.as_bytes()) {
            if let Ok(encoding) = font_dict.get_font_encoding(&self.document) {
                if let Ok(text) = Document::decode_text(&encoding, bytes) {
                    return Some(text);
                }
            }
        }

        if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
            let utf16: Vec<u16> = bytes[2..]
                .chunks_exact(2)
                .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                .collect();
            return Some(String::from_utf16_lossy(&utf16));
        }

        Some(bytes.iter().map(|&b| b as char).collect())
    }
}

fn object_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Group positioned items into visual rows, top of page first.
fn group_rows(mut items: Vec<TextItem>) -> Vec<Vec<TextItem>> {
    // PDF origin is bottom-left: descending Y is top-to-bottom reading order.
    items.sort_by(|a, b| b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal));

    let mut rows: Vec<Vec<TextItem>> = Vec::new();
    for item in items {
        if let Some(row) = rows.last_mut() {
            if (row[0].y - item.y).abs() < ROW_Y_TOLERANCE {
                row.push(item);
                continue;
            }
        }
        rows.push(vec![item]);
    }

    for row in &mut rows {
        row.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
    }
    rows
}

/// Start X positions of the cells within one row.
fn row_cell_starts(row: &[TextItem]) -> Vec<f32> {
    let mut starts = Vec::new();
    let mut last_x = f32::NEG_INFINITY;
    for item in row {
        if item.x - last_x > CELL_X_GAP {
            starts.push(item.x);
        }
        last_x = item.x;
    }
    starts
}

/// Merge per-row cell starts into global column boundaries.
fn cluster_columns(rows: &[Vec<TextItem>]) -> Vec<f32> {
    let mut starts: Vec<f32> = rows.iter().flat_map(|r| row_cell_starts(r)).collect();
    starts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut columns: Vec<f32> = Vec::new();
    for x in starts {
        match columns.last() {
            Some(&last) if x - last < COLUMN_X_TOLERANCE => {}
            _ => columns.push(x),
        }
    }
    columns
}

/// Materialize one row against the global columns: each item lands in the
/// column whose start is nearest its X; untouched columns stay `None`.
fn materialize_row(row: &[TextItem], columns: &[f32]) -> Vec<Option<String>> {
    let mut cells: Vec<Option<String>> = vec![None; columns.len()];
    for item in row {
        let column = columns
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (item.x - **a)
                    .abs()
                    .partial_cmp(&(item.x - **b).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
            .unwrap_or(0);

        match &mut cells[column] {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(item.text.trim());
            }
            cell => *cell = Some(item.text.trim().to_string()),
        }
    }
    cells
}

impl DocumentSource for PdfSource {
    fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    fn page_text(&self, page: u32) -> Result<String> {
        let full_text = pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        let page_count = self.page_count() as usize;
        if page_count <= 1 {
            return Ok(full_text);
        }

        // pdf-extract yields one undifferentiated stream; split it evenly by
        // line count across pages.
        let lines: Vec<&str> = full_text.lines().collect();
        let lines_per_page = lines.len() / page_count;
        let start = ((page - 1) as usize) * lines_per_page;
        let end = (page as usize) * lines_per_page;

        Ok(lines[start.min(lines.len())..end.min(lines.len())].join("\n"))
    }

    fn page_tables(&self, page: u32) -> Result<Vec<Table>> {
        let page_id = self.page_id(page)?;
        let items = self.page_text_items(page_id)?;
        let rows = group_rows(items);

        // The table region starts at the first multi-cell row and extends
        // down through adjacent rows, including single-cell footer rows.
        let first = rows.iter().position(|r| row_cell_starts(r).len() >= 3);
        let Some(first) = first else {
            return Ok(Vec::new());
        };

        let mut region: Vec<&Vec<TextItem>> = vec![&rows[first]];
        for row in &rows[first + 1..] {
            let previous_y = region.last().map(|r| r[0].y).unwrap_or(0.0);
            if previous_y - row[0].y > REGION_Y_GAP {
                break;
            }
            region.push(row);
        }

        let region_rows: Vec<Vec<TextItem>> = region.into_iter().cloned().collect();
        let columns = cluster_columns(&region_rows);
        if columns.len() < 2 {
            return Ok(Vec::new());
        }

        let table: Table = region_rows
            .iter()
            .map(|row| materialize_row(row, &columns))
            .collect();

        debug!(
            page,
            rows = table.len(),
            columns = columns.len(),
            "detected candidate table"
        );
        Ok(vec![table])
    }
}
