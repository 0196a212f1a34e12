//! Source file specifications and path matching.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A source file path as recorded in debug info or typed by a user.
///
/// The path is normalised lexically on construction (`.` components are
/// dropped and `dir/..` pairs collapse); the filesystem is never touched.
/// A spec without a directory component (`main.c`) is a *basename* spec and
/// matches any file with that name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FileSpec
{
    path: PathBuf,
}

impl FileSpec
{
    /// Create a file spec from a path, normalising it lexically.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use symctx_core::files::FileSpec;
    ///
    /// let spec = FileSpec::new("/src/./lib/../main.c");
    /// assert_eq!(spec.path().to_str(), Some("/src/main.c"));
    /// assert!(spec.has_directory());
    /// ```
    pub fn new(path: impl AsRef<Path>) -> Self
    {
        Self {
            path: normalize(path.as_ref()),
        }
    }

    /// The normalised path.
    #[must_use]
    pub fn path(&self) -> &Path
    {
        &self.path
    }

    /// Final path component, if any.
    #[must_use]
    pub fn filename(&self) -> Option<&OsStr>
    {
        self.path.file_name()
    }

    /// Directory part, `None` for a bare file name.
    #[must_use]
    pub fn directory(&self) -> Option<&Path>
    {
        self.path.parent().filter(|parent| !parent.as_os_str().is_empty())
    }

    /// Whether the path names a directory as well as a file.
    #[must_use]
    pub fn has_directory(&self) -> bool
    {
        self.directory().is_some()
    }

    /// Whether the path is relative.
    #[must_use]
    pub fn is_relative(&self) -> bool
    {
        self.path.is_relative()
    }

    /// Whether the path is empty (matches everything as a pattern).
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.path.as_os_str().is_empty()
    }

    /// Compare only the file names.
    #[must_use]
    pub fn file_equals(&self, other: &FileSpec) -> bool
    {
        self.filename() == other.filename()
    }

    /// Compare two specs.
    ///
    /// With `full == false`, a side without a directory degrades the
    /// comparison to file names only.
    #[must_use]
    pub fn equal(a: &FileSpec, b: &FileSpec, full: bool) -> bool
    {
        if !full && (!a.has_directory() || !b.has_directory()) {
            return a.file_equals(b);
        }
        a == b
    }

    /// Match `file` against a user-provided `pattern`.
    ///
    /// A pattern with a directory must equal the file exactly; a bare file
    /// name compares basenames; an empty pattern matches everything.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use symctx_core::files::FileSpec;
    ///
    /// let file = FileSpec::new("/src/main.c");
    /// assert!(FileSpec::matches(&FileSpec::new("main.c"), &file));
    /// assert!(FileSpec::matches(&FileSpec::new("/src/main.c"), &file));
    /// assert!(!FileSpec::matches(&FileSpec::new("/other/main.c"), &file));
    /// ```
    #[must_use]
    pub fn matches(pattern: &FileSpec, file: &FileSpec) -> bool
    {
        if pattern.has_directory() {
            return pattern == file;
        }
        if pattern.filename().is_some() {
            return pattern.file_equals(file);
        }
        true
    }
}

impl From<&str> for FileSpec
{
    fn from(path: &str) -> Self
    {
        FileSpec::new(path)
    }
}

impl From<PathBuf> for FileSpec
{
    fn from(path: PathBuf) -> Self
    {
        FileSpec::new(path)
    }
}

impl fmt::Display for FileSpec
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.path.display())
    }
}

fn normalize(path: &Path) -> PathBuf
{
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal = matches!(normalized.components().next_back(), Some(Component::Normal(_)));
                if last_is_normal {
                    normalized.pop();
                } else {
                    normalized.push(component.as_os_str());
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_normalize_keeps_leading_parent_dirs()
    {
        assert_eq!(FileSpec::new("../src/a.c").path(), Path::new("../src/a.c"));
        assert_eq!(FileSpec::new("src/../../a.c").path(), Path::new("../a.c"));
        assert_eq!(FileSpec::new("./a.c").path(), Path::new("a.c"));
    }

    #[test]
    fn test_bare_name_has_no_directory()
    {
        let spec = FileSpec::new("a.c");
        assert!(!spec.has_directory());
        assert_eq!(spec.directory(), None);
        assert_eq!(spec.filename(), Some(OsStr::new("a.c")));
    }

    #[test]
    fn test_equal_degrades_to_basename_when_not_full()
    {
        let full = FileSpec::new("/src/a.c");
        let bare = FileSpec::new("a.c");
        assert!(FileSpec::equal(&full, &bare, false));
        assert!(!FileSpec::equal(&full, &bare, true));
        assert!(!FileSpec::equal(&full, &FileSpec::new("/other/a.c"), false));
    }

    #[test]
    fn test_empty_pattern_matches_everything()
    {
        assert!(FileSpec::matches(&FileSpec::default(), &FileSpec::new("/src/a.c")));
    }
}
