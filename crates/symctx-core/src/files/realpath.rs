//! Symlink normalisation for support files under known prefixes.
//!
//! Build systems often compile through a symlinked tree (`/build/src` →
//! `/home/me/project/src`) while users set breakpoints with the real path.
//! Resolving every support file through the filesystem would be slow, so only
//! files below one of the configured prefixes are resolved.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::FileSpec;

/// Function that maps a path to its real (symlink-free) location.
pub type RealpathResolver = Box<dyn Fn(&Path) -> Option<PathBuf> + Send + Sync>;

/// Prefixes under which support files get their symlinks resolved.
pub struct RealpathPrefixes
{
    prefixes: Vec<PathBuf>,
    resolver: RealpathResolver,
    resolved: AtomicUsize,
}

impl fmt::Debug for RealpathPrefixes
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("RealpathPrefixes")
            .field("prefixes", &self.prefixes)
            .field("resolved", &self.resolved_count())
            .finish_non_exhaustive()
    }
}

impl RealpathPrefixes
{
    /// Resolve through the real filesystem (`std::fs::canonicalize`).
    pub fn new<I, P>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::with_resolver(prefixes, |path| fs::canonicalize(path).ok())
    }

    /// Resolve through a caller-provided function.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use std::path::{Path, PathBuf};
    ///
    /// use symctx_core::files::{FileSpec, RealpathPrefixes};
    ///
    /// let prefixes = RealpathPrefixes::with_resolver(["/build"], |path: &Path| {
    ///     path.strip_prefix("/build").ok().map(|rest| PathBuf::from("/home/me").join(rest))
    /// });
    /// let resolved = prefixes.resolve_symlinks(&FileSpec::new("/build/a.c"));
    /// assert_eq!(resolved, Some(FileSpec::new("/home/me/a.c")));
    /// ```
    pub fn with_resolver<I, P, F>(prefixes: I, resolver: F) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
        F: Fn(&Path) -> Option<PathBuf> + Send + Sync + 'static,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            resolver: Box::new(resolver),
            resolved: AtomicUsize::new(0),
        }
    }

    /// Configured prefixes.
    #[must_use]
    pub fn prefixes(&self) -> &[PathBuf]
    {
        &self.prefixes
    }

    /// Whether `file` lives below one of the prefixes.
    #[must_use]
    pub fn is_prefix_match(&self, file: &FileSpec) -> bool
    {
        self.prefixes.iter().any(|prefix| file.path().starts_with(prefix))
    }

    /// Real location of `file`, or `None` when it is outside every prefix or
    /// the resolver fails.
    #[must_use]
    pub fn resolve_symlinks(&self, file: &FileSpec) -> Option<FileSpec>
    {
        if !self.is_prefix_match(file) {
            return None;
        }
        self.resolved.fetch_add(1, Ordering::Relaxed);
        let resolved = (self.resolver)(file.path()).map(FileSpec::new);
        tracing::trace!("realpath {} -> {:?}", file, resolved.as_ref().map(ToString::to_string));
        resolved
    }

    /// Number of files handed to the resolver so far.
    #[must_use]
    pub fn resolved_count(&self) -> usize
    {
        self.resolved.load(Ordering::Relaxed)
    }
}
