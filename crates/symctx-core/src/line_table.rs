//! # Line Table
//!
//! Ordered address → (file, line, column) mapping for one compile unit.
//!
//! Rows are grouped into sequences of increasing addresses; each sequence
//! ends with a *terminal* row marking the first address past its last
//! instruction. A row's address range extends up to the next row's address.
//!
//! The searches here are the primitives the resolver is built on: "find the
//! next row at or after index N whose file is one of these support-file
//! indices and whose line satisfies this query".

use std::sync::Arc;

use crate::files::{FileSpec, SupportFileList};
use crate::source_location::SourceLocationSpec;
use crate::types::{Address, AddressRange};

/// One raw row of a line table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRow
{
    /// File address of the first instruction of the row
    pub address: Address,
    /// Index into the owning unit's support-file list
    pub file_idx: u32,
    /// 1-based line, 0 when unknown
    pub line: u32,
    /// 1-based column, 0 when unknown
    pub column: u16,
    /// Row is a recommended breakpoint location
    pub is_statement: bool,
    /// Row terminates its sequence (its address is one past the end)
    pub is_terminal: bool,
}

impl LineRow
{
    /// A statement row.
    #[must_use]
    pub const fn new(address: u64, file_idx: u32, line: u32, column: u16) -> Self
    {
        Self {
            address: Address::new(address),
            file_idx,
            line,
            column,
            is_statement: true,
            is_terminal: false,
        }
    }

    /// The end-of-sequence row.
    #[must_use]
    pub const fn terminal(address: u64) -> Self
    {
        Self {
            address: Address::new(address),
            file_idx: 0,
            line: 0,
            column: 0,
            is_statement: false,
            is_terminal: true,
        }
    }
}

/// A line-table row resolved into a range and a file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineEntry
{
    /// Addresses covered by the row
    pub range: AddressRange,
    /// Index into the owning unit's support-file list
    pub file_idx: u32,
    /// File the row belongs to
    pub file: FileSpec,
    /// 1-based line, 0 when unknown
    pub line: u32,
    /// 1-based column, 0 when unknown
    pub column: u16,
    /// Row is a recommended breakpoint location
    pub is_statement: bool,
}

impl LineEntry
{
    /// Whether this entry refers to a real source line.
    #[must_use]
    pub fn is_valid(&self) -> bool
    {
        self.line != 0
    }
}

/// Line table of a single compile unit.
///
/// Tables are immutable once built: a unit replaces its table wholesale.
#[derive(Debug, Clone, Default)]
pub struct LineTable
{
    files: Arc<SupportFileList>,
    rows: Vec<LineRow>,
}

impl LineTable
{
    /// Build a table over `rows`, resolving file indices through `files`.
    #[must_use]
    pub fn new(files: Arc<SupportFileList>, rows: Vec<LineRow>) -> Self
    {
        Self { files, rows }
    }

    /// Number of rows, terminal rows included.
    #[must_use]
    pub fn len(&self) -> usize
    {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.rows.is_empty()
    }

    /// Raw rows.
    #[must_use]
    pub fn rows(&self) -> &[LineRow]
    {
        &self.rows
    }

    /// Resolve the row at `idx` into a line entry.
    ///
    /// Terminal rows have no entry.
    #[must_use]
    pub fn entry_at(&self, idx: usize) -> Option<LineEntry>
    {
        let row = self.rows.get(idx)?;
        if row.is_terminal {
            return None;
        }

        let size = self
            .rows
            .get(idx + 1)
            .map_or(0, |next| next.address.value().saturating_sub(row.address.value()));

        Some(LineEntry {
            range: AddressRange::new(row.address, size),
            file_idx: row.file_idx,
            file: self.files.get(row.file_idx).cloned().unwrap_or_default(),
            line: row.line,
            column: row.column,
            is_statement: row.is_statement,
        })
    }

    /// First matching row at or after `start_idx` for a single file index.
    #[must_use]
    pub fn find_line_entry_index_by_file_index(
        &self,
        start_idx: usize,
        file_idx: u32,
        spec: &SourceLocationSpec,
    ) -> Option<(usize, LineEntry)>
    {
        self.find_line_entry_index_impl(start_idx, spec, |row_file| row_file == file_idx)
    }

    /// First matching row at or after `start_idx` for any of `file_indexes`.
    #[must_use]
    pub fn find_line_entry_index_by_file_indexes(
        &self,
        start_idx: usize,
        file_indexes: &[u32],
        spec: &SourceLocationSpec,
    ) -> Option<(usize, LineEntry)>
    {
        self.find_line_entry_index_impl(start_idx, spec, |row_file| file_indexes.contains(&row_file))
    }

    /// Row covering `address`.
    #[must_use]
    pub fn find_line_entry_by_address(&self, address: Address) -> Option<(usize, LineEntry)>
    {
        self.rows.windows(2).enumerate().find_map(|(idx, pair)| {
            let (row, next) = (&pair[0], &pair[1]);
            let covers = !row.is_terminal && address >= row.address && address < next.address;
            if covers {
                self.entry_at(idx).map(|entry| (idx, entry))
            } else {
                None
            }
        })
    }

    // A row on the query's line (and column, when given) wins immediately.
    // Without `exact`, the row nearest after the query position is kept as a
    // fallback: smallest (line, column) that is strictly greater.
    fn find_line_entry_index_impl<F>(
        &self,
        start_idx: usize,
        spec: &SourceLocationSpec,
        file_matches: F,
    ) -> Option<(usize, LineEntry)>
    where
        F: Fn(u32) -> bool,
    {
        let line = spec.line()?;
        let column = spec.column();
        let mut best: Option<(usize, (u32, u16))> = None;

        for (idx, row) in self.rows.iter().enumerate().skip(start_idx) {
            if row.is_terminal || !file_matches(row.file_idx) {
                continue;
            }

            if row.line == line && column.map_or(true, |column| row.column == column) {
                return self.entry_at(idx).map(|entry| (idx, entry));
            }

            if spec.exact_match() {
                continue;
            }

            let position = (row.line, row.column);
            let follows = row.line > line || column.is_some_and(|column| row.line == line && row.column > column);
            if follows && best.map_or(true, |(_, best_position)| position < best_position) {
                best = Some((idx, position));
            }
        }

        best.and_then(|(idx, _)| self.entry_at(idx).map(|entry| (idx, entry)))
    }
}
