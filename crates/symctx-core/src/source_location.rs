//! # Source Location Query
//!
//! Describes "file:line:column" searches plus the flags that control how
//! strictly they match.
//!
//! ## Example
//!
//! ```rust
//! use symctx_core::files::FileSpec;
//! use symctx_core::source_location::SourceLocationSpec;
//!
//! let spec = SourceLocationSpec::builder(FileSpec::new("main.c"))
//!     .line(42)
//!     .column(5)
//!     .check_inlines(true)
//!     .build();
//! assert_eq!(spec.line(), Some(42));
//! assert!(!spec.exact_match());
//! ```

use std::fmt;

use crate::files::FileSpec;

/// A file/line/column search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocationSpec
{
    file: FileSpec,
    line: Option<u32>,
    column: Option<u16>,
    check_inlines: bool,
    exact_match: bool,
}

impl SourceLocationSpec
{
    /// Create a query directly.
    ///
    /// A line or column of `0` means "not specified".
    #[must_use]
    pub fn new(file: FileSpec, line: Option<u32>, column: Option<u16>, check_inlines: bool, exact_match: bool) -> Self
    {
        Self {
            file,
            line: line.filter(|line| *line != 0),
            column: column.filter(|column| *column != 0),
            check_inlines,
            exact_match,
        }
    }

    /// Start building a query for `file`.
    #[must_use]
    pub fn builder(file: FileSpec) -> SourceLocationSpecBuilder
    {
        SourceLocationSpecBuilder {
            spec: Self::new(file, None, None, false, false),
        }
    }

    /// File being searched for.
    #[must_use]
    pub fn file(&self) -> &FileSpec
    {
        &self.file
    }

    /// Requested line.
    #[must_use]
    pub fn line(&self) -> Option<u32>
    {
        self.line
    }

    /// Requested column.
    #[must_use]
    pub fn column(&self) -> Option<u16>
    {
        self.column
    }

    /// Whether inline call sites should be considered.
    #[must_use]
    pub fn check_inlines(&self) -> bool
    {
        self.check_inlines
    }

    /// Whether the line must match exactly (otherwise the nearest following
    /// line is accepted).
    #[must_use]
    pub fn exact_match(&self) -> bool
    {
        self.exact_match
    }
}

impl fmt::Display for SourceLocationSpec
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.file)?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
            if let Some(column) = self.column {
                write!(f, ":{column}")?;
            }
        }
        write!(
            f,
            " (check_inlines = {}, exact = {})",
            self.check_inlines, self.exact_match
        )
    }
}

/// Fluent builder for [`SourceLocationSpec`].
#[derive(Debug, Clone)]
pub struct SourceLocationSpecBuilder
{
    spec: SourceLocationSpec,
}

impl SourceLocationSpecBuilder
{
    /// Set the line; `0` clears it.
    #[must_use]
    pub fn line(mut self, line: u32) -> Self
    {
        self.spec.line = Some(line).filter(|line| *line != 0);
        self
    }

    /// Set the column; `0` clears it.
    #[must_use]
    pub fn column(mut self, column: u16) -> Self
    {
        self.spec.column = Some(column).filter(|column| *column != 0);
        self
    }

    /// Consider inline call sites.
    #[must_use]
    pub fn check_inlines(mut self, check_inlines: bool) -> Self
    {
        self.spec.check_inlines = check_inlines;
        self
    }

    /// Require an exact line match.
    #[must_use]
    pub fn exact(mut self, exact: bool) -> Self
    {
        self.spec.exact_match = exact;
        self
    }

    /// Finish the query.
    #[must_use]
    pub fn build(self) -> SourceLocationSpec
    {
        self.spec
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_zero_line_and_column_mean_unspecified()
    {
        let spec = SourceLocationSpec::new(FileSpec::new("a.c"), Some(0), Some(0), false, true);
        assert_eq!(spec.line(), None);
        assert_eq!(spec.column(), None);
    }

    #[test]
    fn test_display()
    {
        let spec = SourceLocationSpec::builder(FileSpec::new("/src/a.c"))
            .line(3)
            .column(9)
            .exact(true)
            .build();
        assert_eq!(spec.to_string(), "/src/a.c:3:9 (check_inlines = false, exact = true)");
    }
}
