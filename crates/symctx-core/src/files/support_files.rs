//! The per-unit list of source files a line table can refer to.

use smallvec::SmallVec;

use super::{FileSpec, RealpathPrefixes};

/// Support-file indices compatible with a query, in ascending order.
pub type FileIndexes = SmallVec<[u32; 4]>;

/// Ordered list of source files referenced by a compile unit.
///
/// Line-table rows refer to files by their index in this list, so entries are
/// only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportFileList
{
    files: Vec<FileSpec>,
}

impl SupportFileList
{
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Append a file and return its index.
    pub fn append(&mut self, file: FileSpec) -> u32
    {
        let index = u32::try_from(self.files.len()).unwrap_or(u32::MAX);
        self.files.push(file);
        index
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize
    {
        self.files.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.files.is_empty()
    }

    /// File at `index`.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<&FileSpec>
    {
        self.files.get(index as usize)
    }

    /// Iterate over the files in index order.
    pub fn iter(&self) -> impl Iterator<Item = &FileSpec>
    {
        self.files.iter()
    }

    /// First index at or after `start` whose file is compatible with `file`.
    ///
    /// Compatibility rules, in order:
    /// 1. the file names must be equal;
    /// 2. if `file` has a directory, the paths must be equal; otherwise the
    ///    file name alone is enough;
    /// 3. if either side is relative, a list entry without a directory
    ///    matches, and directories match when one ends with the other on a
    ///    component boundary (`foo/bar.c` matches `/src/foo/bar.c`, `oo/bar.c`
    ///    does not);
    /// 4. otherwise, if the entry lies below one of `realpath_prefixes`, its
    ///    resolved real path is compared.
    #[must_use]
    pub fn find_compatible_index(
        &self,
        start: usize,
        file: &FileSpec,
        realpath_prefixes: Option<&RealpathPrefixes>,
    ) -> Option<usize>
    {
        let full = file.has_directory();
        for (idx, current) in self.files.iter().enumerate().skip(start) {
            if !current.file_equals(file) {
                continue;
            }

            if FileSpec::equal(current, file, full) {
                return Some(idx);
            }

            if current.is_relative() || file.is_relative() {
                let Some(current_dir) = current.directory() else {
                    return Some(idx);
                };
                if let Some(file_dir) = file.directory() {
                    if file_dir.ends_with(current_dir) || current_dir.ends_with(file_dir) {
                        return Some(idx);
                    }
                }
            } else if let Some(resolved) = realpath_prefixes.and_then(|prefixes| prefixes.resolve_symlinks(current)) {
                if FileSpec::equal(&resolved, file, full) {
                    return Some(idx);
                }
            }
        }
        None
    }

    /// Every index compatible with `file`, ascending.
    #[must_use]
    pub fn find_file_indexes(&self, file: &FileSpec, realpath_prefixes: Option<&RealpathPrefixes>) -> FileIndexes
    {
        let mut indexes = FileIndexes::new();
        let mut start = 0;
        while let Some(idx) = self.find_compatible_index(start, file, realpath_prefixes) {
            if let Ok(idx32) = u32::try_from(idx) {
                indexes.push(idx32);
            }
            start = idx + 1;
        }
        indexes
    }
}

impl FromIterator<FileSpec> for SupportFileList
{
    fn from_iter<T: IntoIterator<Item = FileSpec>>(iter: T) -> Self
    {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests
{
    use std::path::{Path, PathBuf};

    use super::*;

    fn list(paths: &[&str]) -> SupportFileList
    {
        paths.iter().map(|path| FileSpec::new(path)).collect()
    }

    #[test]
    fn test_basename_query_matches_every_same_named_file()
    {
        let files = list(&["/src/a.c", "/src/b.c", "/inc/a.c"]);
        let indexes = files.find_file_indexes(&FileSpec::new("a.c"), None);
        assert_eq!(indexes.as_slice(), &[0, 2]);
    }

    #[test]
    fn test_full_path_query_requires_equal_path()
    {
        let files = list(&["/src/a.c", "/inc/a.c"]);
        let indexes = files.find_file_indexes(&FileSpec::new("/inc/a.c"), None);
        assert_eq!(indexes.as_slice(), &[1]);
    }

    #[test]
    fn test_relative_entry_matches_on_component_suffix()
    {
        let files = list(&["foo/bar.c", "oo/bar.c"]);
        let indexes = files.find_file_indexes(&FileSpec::new("/src/foo/bar.c"), None);
        assert_eq!(indexes.as_slice(), &[0]);
    }

    #[test]
    fn test_relative_query_matches_absolute_entry()
    {
        let files = list(&["/src/foo/bar.c"]);
        assert_eq!(files.find_compatible_index(0, &FileSpec::new("foo/bar.c"), None), Some(0));
        assert_eq!(files.find_compatible_index(0, &FileSpec::new("baz/bar.c"), None), None);
    }

    #[test]
    fn test_entry_without_directory_matches_relative_query()
    {
        let files = list(&["bar.c"]);
        assert_eq!(files.find_compatible_index(0, &FileSpec::new("foo/bar.c"), None), Some(0));
    }

    #[test]
    fn test_realpath_prefix_resolves_symlinked_entry()
    {
        let files = list(&["/build/src/a.c", "/elsewhere/a.c"]);
        let prefixes = RealpathPrefixes::with_resolver(["/build"], |path: &Path| {
            path.strip_prefix("/build").ok().map(|rest| PathBuf::from("/home/me").join(rest))
        });

        let query = FileSpec::new("/home/me/src/a.c");
        assert_eq!(files.find_file_indexes(&query, None).len(), 0);
        assert_eq!(files.find_file_indexes(&query, Some(&prefixes)).as_slice(), &[0]);
        // Only the entry under the prefix went through the resolver
        assert_eq!(prefixes.resolved_count(), 1);
    }

    #[test]
    fn test_start_index_skips_earlier_entries()
    {
        let files = list(&["/src/a.c", "/src/a.c"]);
        assert_eq!(files.find_compatible_index(1, &FileSpec::new("a.c"), None), Some(1));
        assert_eq!(files.find_compatible_index(2, &FileSpec::new("a.c"), None), None);
    }
}
