//! Table-row classification and line-item dataset assembly.
//!
//! The table-geometry collaborator repeats header and footer rows on every
//! page and is known to emit the same logical row more than once across page
//! boundaries, so the assembler classifies each row, captures each
//! header/footer category once, and deduplicates data rows by first-cell
//! value before building the dataset.

use std::collections::HashSet;

use tracing::debug;

use crate::models::invoice::LineItem;

use super::normalize::normalize_str;
use super::number::parse_amount;
use super::rules::patterns::{
    TOTAL_FIGURE_CONTAINS, TOTAL_FIGURE_PREFIXES, TOTAL_IN_WORDS_CONTAINS, TOTAL_IN_WORDS_PREFIX,
};

/// A raw table row as delivered by the PDF access layer: an ordered list of
/// cells, `None` where the grid detector found an empty cell.
pub type RawRow = Vec<Option<String>>;

/// Classification of a normalized table row. First match wins, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    MainHeader,
    SubHeader,
    TotalFigure,
    TotalInWords,
    Malformed,
    Data,
}

/// Output of table assembly over all pages.
#[derive(Debug, Default)]
pub struct TableDataset {
    /// Line items, sorted ascending by `no`.
    pub items: Vec<LineItem>,
    /// Column-title row ("STT (No.)", "Description", ...), captured once.
    pub main_header: Option<Vec<Option<String>>>,
    /// Column-numbering row ("(1)", "(2)", ...), captured once.
    pub sub_header: Option<Vec<Option<String>>>,
    /// Footer row carrying the total as a figure, captured once.
    pub total_amount_figure: Option<Vec<Option<String>>>,
    /// Footer row carrying the total in words, captured once.
    pub total_amount_in_words: Option<Vec<Option<String>>>,
    /// Rows that could not be classified or parsed. Diagnostics only; never
    /// part of the dataset.
    pub malformed: Vec<Vec<Option<String>>>,
}

/// Accumulator state for one document's worth of table rows. Feed rows in
/// page, then table, then row order and call [`TableAssembler::finish`].
#[derive(Debug, Default)]
pub struct TableAssembler {
    dataset: TableDataset,
    /// Row width established by the main header row; rows of any other width
    /// are malformed.
    expected_width: Option<usize>,
    /// First-cell values already seen, across the whole document.
    seen_first_cells: HashSet<String>,
}

impl TableAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify and accumulate a single raw row.
    pub fn push_row(&mut self, raw: &[Option<String>]) {
        // Blank separator rows are artifacts of the grid detector.
        if raw.iter().all(|c| matches!(c, Some(s) if s.is_empty())) {
            return;
        }

        let row: RawRow = raw
            .iter()
            .map(|cell| {
                cell.as_deref()
                    .map(|s| normalize_str(s).replace('\n', " "))
            })
            .collect();

        // Dedup by first-cell identity (the row ordinal or label). The
        // geometry detector re-emits rows across page boundaries; a content
        // hash would be overkill for this template.
        if let Some(first) = row.first().and_then(|c| c.clone()) {
            if !self.seen_first_cells.insert(first) {
                return;
            }
        }

        match self.classify(&row) {
            RowKind::MainHeader => {
                if self.dataset.main_header.is_none() {
                    self.expected_width = Some(row.len());
                    self.dataset.main_header = Some(row);
                }
            }
            RowKind::SubHeader => {
                if self.dataset.sub_header.is_none() {
                    self.dataset.sub_header = Some(row);
                }
            }
            RowKind::TotalFigure => {
                if self.dataset.total_amount_figure.is_none() {
                    self.dataset.total_amount_figure = Some(row);
                }
            }
            RowKind::TotalInWords => {
                if self.dataset.total_amount_in_words.is_none() {
                    self.dataset.total_amount_in_words = Some(row);
                }
            }
            RowKind::Malformed => {
                debug!(?row, "discarding malformed table row");
                self.dataset.malformed.push(row);
            }
            RowKind::Data => match parse_line_item(&row) {
                Some(item) => self.dataset.items.push(item),
                None => {
                    // A cell that cannot be parsed fails the whole row; it
                    // must never leak a zero into downstream sums.
                    debug!(?row, "discarding unparseable data row");
                    self.dataset.malformed.push(row);
                }
            },
        }
    }

    /// Convenience wrapper for a whole table.
    pub fn push_table(&mut self, table: &[RawRow]) {
        for row in table {
            self.push_row(row);
        }
    }

    /// Finish assembly: sort the dataset ascending by row ordinal.
    pub fn finish(mut self) -> TableDataset {
        self.dataset.items.sort_by_key(|item| item.no);
        debug!(
            items = self.dataset.items.len(),
            malformed = self.dataset.malformed.len(),
            "table assembly finished"
        );
        self.dataset
    }

    fn classify(&self, row: &[Option<String>]) -> RowKind {
        let first = row.first().and_then(|c| c.as_deref()).unwrap_or("");

        // Header: "STT\n(No.)" style column titles.
        if first.to_lowercase().starts_with("stt") || first.contains("No.") {
            return RowKind::MainHeader;
        }

        // Sub-header: "(1)", "(2)", ... column numbering.
        let second = row.get(1).and_then(|c| c.as_deref()).unwrap_or("");
        if first == "(1)" && second == "(2)" {
            return RowKind::SubHeader;
        }

        if TOTAL_FIGURE_PREFIXES.iter().any(|p| first.starts_with(p))
            || first.contains(TOTAL_FIGURE_CONTAINS)
        {
            return RowKind::TotalFigure;
        }

        if first.starts_with(TOTAL_IN_WORDS_PREFIX) || first.contains(TOTAL_IN_WORDS_CONTAINS) {
            return RowKind::TotalInWords;
        }

        // Width is undefined until a main header has been seen.
        match self.expected_width {
            Some(width) if row.len() == width => {}
            _ => return RowKind::Malformed,
        }

        // Residual junk guard: a data row's ordinal cell is all digits.
        if !first.is_empty() && first.chars().all(|c| c.is_ascii_digit()) {
            RowKind::Data
        } else {
            RowKind::Malformed
        }
    }
}

/// Parse a classified data row into a line item. Any missing cell or numeric
/// conversion failure rejects the row.
fn parse_line_item(row: &[Option<String>]) -> Option<LineItem> {
    let cell = |i: usize| row.get(i).and_then(|c: &Option<String>| c.as_deref());

    let no: u32 = cell(0)?.parse().ok()?;
    let product_description = cell(1)?.to_string();
    let unit = cell(2)?.to_lowercase();
    let quantity = parse_amount(cell(3)?).ok()?;
    let unit_price = parse_amount(cell(4)?).ok()?;
    let amount = parse_amount(cell(5)?).ok()?;

    Some(LineItem {
        no,
        product_description,
        unit,
        quantity,
        unit_price,
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().map(|c| Some(c.to_string())).collect()
    }

    fn header_row() -> RawRow {
        row(&[
            "STT\n(No.)",
            "Tên hàng hóa, dịch vụ\n(Description)",
            "Đơn vị tính\n(Unit)",
            "Số lượng\n(Quantity)",
            "Đơn giá\n(Unit price)",
            "Thành tiền\n(Amount)",
        ])
    }

    fn data_row(no: &str, desc: &str, qty: &str, price: &str, amount: &str) -> RawRow {
        row(&[no, desc, "Chiếc", qty, price, amount])
    }

    #[test]
    fn test_header_captured_once_and_sets_width() {
        let mut assembler = TableAssembler::new();
        assembler.push_row(&header_row());
        assembler.push_row(&row(&["STT (No.)", "x", "y", "z", "u", "v"]));
        let dataset = assembler.finish();

        let header = dataset.main_header.unwrap();
        assert_eq!(header.len(), 6);
        // Embedded newlines flattened by normalization.
        assert_eq!(header[0].as_deref(), Some("STT (No.)"));
    }

    #[test]
    fn test_sub_header_and_totals_captured_once() {
        let mut assembler = TableAssembler::new();
        assembler.push_row(&header_row());
        assembler.push_row(&row(&["(1)", "(2)", "(3)", "(4)", "(5)", "(6) = (4) x (5)"]));
        assembler.push_row(&vec![
            Some("Tổng tiền thanh toán(Total amount): 2.680.000".to_string()),
            None,
            None,
            None,
            None,
            None,
        ]);
        assembler.push_row(&vec![
            Some("Số tiền viết bằng chữ(In words):Hai triệu sáu trăm tám mươi nghìn đồng".to_string()),
            None,
            None,
            None,
            None,
            None,
        ]);
        let dataset = assembler.finish();

        assert!(dataset.sub_header.is_some());
        assert!(dataset.total_amount_figure.is_some());
        assert!(dataset.total_amount_in_words.is_some());
        assert!(dataset.items.is_empty());
        assert!(dataset.malformed.is_empty());
    }

    #[test]
    fn test_data_rows_parsed_and_sorted() {
        let mut assembler = TableAssembler::new();
        assembler.push_row(&header_row());
        assembler.push_row(&data_row("2", "Xe rác SH", "20", "40.000", "800.000"));
        assembler.push_row(&data_row("1", "Xe cảnh sát SH", "40", "37.000", "1.480.000"));
        assembler.push_row(&data_row("3", "Xe chở hàng SH", "10", "40.000", "400.000"));
        let dataset = assembler.finish();

        let nos: Vec<u32> = dataset.items.iter().map(|i| i.no).collect();
        assert_eq!(nos, vec![1, 2, 3]);
        assert_eq!(dataset.items[0].unit, "chiếc");
        assert_eq!(dataset.items[0].quantity, 40.0);
        assert_eq!(dataset.items[0].unit_price, 37_000.0);
        let total: f64 = dataset.items.iter().map(|i| i.amount).sum();
        assert!((total - 2_680_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_duplicate_rows_across_tables_kept_once() {
        let mut assembler = TableAssembler::new();
        // Same logical rows delivered by two per-page table extractions.
        assembler.push_table(&[
            header_row(),
            data_row("1", "Xe cảnh sát SH", "40", "37.000", "1.480.000"),
        ]);
        assembler.push_table(&[
            header_row(),
            data_row("1", "Xe cảnh sát SH", "40", "37.000", "1.480.000"),
            data_row("2", "Xe rác SH", "20", "40.000", "800.000"),
        ]);
        let dataset = assembler.finish();

        assert_eq!(dataset.items.len(), 2);
        let nos: Vec<u32> = dataset.items.iter().map(|i| i.no).collect();
        assert_eq!(nos, vec![1, 2]);
    }

    #[test]
    fn test_blank_separator_rows_skipped() {
        let mut assembler = TableAssembler::new();
        assembler.push_row(&row(&["", "", "", "", "", ""]));
        let dataset = assembler.finish();
        assert!(dataset.malformed.is_empty());
        assert!(dataset.items.is_empty());
    }

    #[test]
    fn test_wrong_width_row_is_malformed() {
        let mut assembler = TableAssembler::new();
        assembler.push_row(&header_row());
        assembler.push_row(&row(&["4", "truncated row", "chiếc"]));
        let dataset = assembler.finish();
        assert_eq!(dataset.malformed.len(), 1);
        assert!(dataset.items.is_empty());
    }

    #[test]
    fn test_row_before_header_is_malformed() {
        let mut assembler = TableAssembler::new();
        assembler.push_row(&data_row("1", "early", "1", "1", "1"));
        let dataset = assembler.finish();
        assert_eq!(dataset.malformed.len(), 1);
    }

    #[test]
    fn test_unparseable_amount_fails_row_not_zero() {
        let mut assembler = TableAssembler::new();
        assembler.push_row(&header_row());
        assembler.push_row(&data_row("1", "ok", "40", "37.000", "1.480.000"));
        assembler.push_row(&data_row("2", "broken", "n/a", "40.000", "800.000"));
        let dataset = assembler.finish();

        assert_eq!(dataset.items.len(), 1);
        assert_eq!(dataset.malformed.len(), 1);
        let total: f64 = dataset.items.iter().map(|i| i.amount).sum();
        assert_eq!(total, 1_480_000.0);
    }

    #[test]
    fn test_missing_cell_fails_row() {
        let mut assembler = TableAssembler::new();
        assembler.push_row(&header_row());
        assembler.push_row(&vec![
            Some("1".to_string()),
            Some("desc".to_string()),
            Some("chiếc".to_string()),
            None,
            Some("40.000".to_string()),
            Some("800.000".to_string()),
        ]);
        let dataset = assembler.finish();
        assert!(dataset.items.is_empty());
        assert_eq!(dataset.malformed.len(), 1);
    }

    #[test]
    fn test_junk_row_with_matching_width_is_malformed() {
        let mut assembler = TableAssembler::new();
        assembler.push_row(&header_row());
        assembler.push_row(&row(&["note", "free text", "-", "-", "-", "-"]));
        let dataset = assembler.finish();
        assert!(dataset.items.is_empty());
        assert_eq!(dataset.malformed.len(), 1);
    }
}
