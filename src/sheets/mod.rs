mod auth;
mod client;
mod formatting;
mod layout;

pub use client::SheetsClient;
pub use formatting::{format_amount, format_opening_amount};
pub use layout::{CELLS_PER_ACCOUNT, write_accounts, write_metadata};

use crate::error::Result;
use async_trait::async_trait;

/// A worksheet (tab) inside the target spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worksheet {
    pub sheet_id: i32,
    pub title: String,
}

/// Rectangular cell range, 1-based and inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub first_row: u32,
    pub last_row: u32,
    pub first_col: u32,
    pub last_col: u32,
}

impl CellRange {
    pub const fn new(first_row: u32, last_row: u32, first_col: u32, last_col: u32) -> Self {
        Self {
            first_row,
            last_row,
            first_col,
            last_col,
        }
    }

    pub fn rows(&self) -> usize {
        (self.last_row + 1).saturating_sub(self.first_row) as usize
    }

    pub fn cols(&self) -> usize {
        (self.last_col + 1).saturating_sub(self.first_col) as usize
    }

    pub fn len(&self) -> usize {
        self.rows() * self.cols()
    }

    /// A1 notation qualified with the sheet title, e.g. `'Balance'!A2:D150`.
    pub fn to_a1(&self, sheet_title: &str) -> String {
        format!(
            "'{}'!{}{}:{}{}",
            sheet_title.replace('\'', "''"),
            column_letter(self.first_col),
            self.first_row,
            column_letter(self.last_col),
            self.last_row
        )
    }
}

fn column_letter(mut col: u32) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        col = (col - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Contents of a [`CellRange`] in row-major order, one entry per cell
/// including empty ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellBlock {
    range: CellRange,
    cells: Vec<String>,
}

impl CellBlock {
    pub fn empty(range: CellRange) -> Self {
        Self {
            range,
            cells: vec![String::new(); range.len()],
        }
    }

    /// Build a block from API rows, which omit trailing empty cells and rows.
    pub fn from_rows(range: CellRange, rows: Vec<Vec<String>>) -> Self {
        let mut block = Self::empty(range);
        let cols = range.cols();

        for (r, row) in rows.into_iter().take(range.rows()).enumerate() {
            for (c, value) in row.into_iter().take(cols).enumerate() {
                block.cells[r * cols + c] = value;
            }
        }

        block
    }

    pub fn range(&self) -> &CellRange {
        &self.range
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Set a cell's value. Returns false when `index` is outside the block.
    pub fn set(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.cells.get_mut(index) {
            Some(cell) => {
                *cell = value.into();
                true
            }
            None => false,
        }
    }

    /// The leading rows of the block that hold its first `cells` cells, or
    /// `None` when `cells` is zero. Rows past that point are left out so an
    /// update never rewrites cells it did not change.
    pub fn leading(&self, cells: usize) -> Option<CellBlock> {
        let cols = self.range.cols().max(1);
        let rows = cells.min(self.cells.len()).div_ceil(cols);
        if rows == 0 {
            return None;
        }

        let range = CellRange {
            last_row: self.range.first_row + rows as u32 - 1,
            ..self.range
        };
        Some(Self {
            range,
            cells: self.cells[..rows * cols].to_vec(),
        })
    }

    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.cells
            .chunks(self.range.cols().max(1))
            .map(<[String]>::to_vec)
            .collect()
    }
}

#[async_trait]
pub trait SheetOperations {
    /// Obtain an access token for the spreadsheet service.
    async fn authenticate(&self) -> Result<()>;

    async fn worksheet(&self, index: usize) -> Result<Worksheet>;

    async fn read_cells(&self, worksheet: &Worksheet, range: &CellRange) -> Result<CellBlock>;

    /// Commit the block's range in a single update call. Values are entered as
    /// if typed, so only hand it cells that should be rewritten.
    async fn write_cells(&self, worksheet: &Worksheet, block: &CellBlock) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_dimensions() {
        let range = CellRange::new(2, 150, 1, 4);
        assert_eq!(range.rows(), 149);
        assert_eq!(range.cols(), 4);
        assert_eq!(range.len(), 596);

        let meta = CellRange::new(4, 5, 6, 6);
        assert_eq!(meta.len(), 2);
    }

    #[test]
    fn test_range_to_a1() {
        assert_eq!(
            CellRange::new(2, 150, 1, 4).to_a1("Balance"),
            "'Balance'!A2:D150"
        );
        assert_eq!(
            CellRange::new(4, 5, 6, 6).to_a1("Kunde's ark"),
            "'Kunde''s ark'!F4:F5"
        );
        assert_eq!(CellRange::new(1, 1, 27, 53).to_a1("S"), "'S'!AA1:BA1");
    }

    #[test]
    fn test_block_from_ragged_rows() {
        let range = CellRange::new(1, 3, 1, 2);
        let rows = vec![
            vec!["a".to_string()],
            vec![],
            vec!["e".to_string(), "f".to_string(), "ignored".to_string()],
        ];

        let block = CellBlock::from_rows(range, rows);

        assert_eq!(block.len(), 6);
        assert_eq!(
            block.to_rows(),
            vec![
                vec!["a".to_string(), String::new()],
                vec![String::new(), String::new()],
                vec!["e".to_string(), "f".to_string()],
            ]
        );
    }

    #[test]
    fn test_block_leading_rows() {
        let rows = vec![
            vec!["1000".to_string(), "Sales".to_string()],
            vec!["00123".to_string(), "text".to_string()],
            vec!["x".to_string(), "y".to_string()],
        ];
        let block = CellBlock::from_rows(CellRange::new(2, 4, 1, 2), rows);

        let head = block.leading(3).unwrap();
        assert_eq!(head.range(), &CellRange::new(2, 3, 1, 2));
        assert_eq!(head.get(2), Some("00123"));
        assert_eq!(head.len(), 4);

        assert_eq!(block.leading(2).unwrap().range(), &CellRange::new(2, 2, 1, 2));
        assert_eq!(block.leading(100).unwrap(), block);
        assert_eq!(block.leading(0), None);
    }

    #[test]
    fn test_block_set_out_of_range() {
        let mut block = CellBlock::empty(CellRange::new(4, 5, 6, 6));

        assert!(block.set(1, "x"));
        assert!(!block.set(2, "y"));
        assert_eq!(block.get(1), Some("x"));
        assert_eq!(block.get(2), None);
    }
}
