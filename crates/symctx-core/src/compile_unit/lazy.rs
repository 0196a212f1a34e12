//! Per-field lazy state for the compile-unit cache.

/// Whether a lazily-resolved field has been requested from the backend.
///
/// Independent of whether a value is present: `Loaded` with no value means
/// "asked, the backend had nothing", and the backend is not asked again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState
{
    /// Never requested.
    #[default]
    Unloaded,
    /// Requested (the value may still be absent).
    Loaded,
}

/// An optional cached value together with its [`LoadState`].
#[derive(Debug, Clone)]
pub struct LazyField<T>
{
    value: Option<T>,
    state: LoadState,
}

impl<T> Default for LazyField<T>
{
    fn default() -> Self
    {
        Self::unloaded()
    }
}

impl<T> LazyField<T>
{
    /// Nothing cached, never requested.
    #[must_use]
    pub const fn unloaded() -> Self
    {
        Self {
            value: None,
            state: LoadState::Unloaded,
        }
    }

    /// Seeded at construction; a present value counts as already loaded.
    #[must_use]
    pub fn seeded(value: Option<T>) -> Self
    {
        let state = if value.is_some() {
            LoadState::Loaded
        } else {
            LoadState::Unloaded
        };
        Self { value, state }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LoadState
    {
        self.state
    }

    /// Whether a value is cached.
    #[must_use]
    pub fn is_present(&self) -> bool
    {
        self.value.is_some()
    }

    /// Claim the one backend request for this field.
    ///
    /// Returns `true` (and flips the state to `Loaded`) only when no value is
    /// cached and the field was never requested.
    pub fn begin_fetch(&mut self) -> bool
    {
        if self.value.is_none() && self.state == LoadState::Unloaded {
            self.state = LoadState::Loaded;
            return true;
        }
        false
    }

    /// Store a value fetched from the backend without touching the state.
    pub fn store(&mut self, value: T)
    {
        self.value = Some(value);
    }

    /// Explicit replacement: a value marks the field loaded, `None` re-arms
    /// the backend request.
    pub fn replace(&mut self, value: Option<T>) -> Option<T>
    {
        self.state = if value.is_some() {
            LoadState::Loaded
        } else {
            LoadState::Unloaded
        };
        std::mem::replace(&mut self.value, value)
    }
}

impl<T: Clone> LazyField<T>
{
    /// Clone of the cached value.
    #[must_use]
    pub fn get(&self) -> Option<T>
    {
        self.value.clone()
    }
}

/// Tri-state for facts that are computed once on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LazyBool
{
    /// Not computed yet.
    #[default]
    Calculate,
    /// Known true.
    Yes,
    /// Known false.
    No,
}

impl From<bool> for LazyBool
{
    fn from(value: bool) -> Self
    {
        if value {
            LazyBool::Yes
        } else {
            LazyBool::No
        }
    }
}

impl From<Option<bool>> for LazyBool
{
    fn from(value: Option<bool>) -> Self
    {
        value.map_or(LazyBool::Calculate, LazyBool::from)
    }
}
