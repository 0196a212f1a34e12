//! Function registry of a compile unit.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::Arc;

use crate::function::Function;
use crate::types::FunctionId;

/// Functions of one compile unit, keyed by id.
///
/// Backends register functions incrementally while parsing lazily, so
/// insertion order is meaningless. Every enumeration is sorted by id to keep
/// output deterministic.
#[derive(Debug, Default, Clone)]
pub struct FunctionRegistry
{
    functions: HashMap<FunctionId, Arc<Function>>,
}

impl FunctionRegistry
{
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Insert or overwrite by id.
    pub fn register(&mut self, function: Arc<Function>)
    {
        self.functions.insert(function.id(), function);
    }

    /// Function with `id`.
    #[must_use]
    pub fn lookup_by_id(&self, id: FunctionId) -> Option<Arc<Function>>
    {
        self.functions.get(&id).cloned()
    }

    /// Number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize
    {
        self.functions.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.functions.is_empty()
    }

    /// All functions, ascending by id.
    #[must_use]
    pub fn sorted(&self) -> Vec<Arc<Function>>
    {
        let mut sorted: Vec<Arc<Function>> = self.functions.values().cloned().collect();
        sorted.sort_by_key(|function| function.id());
        sorted
    }

    /// Visit every function in ascending id order until the visitor breaks.
    pub fn for_each<F>(&self, visitor: F)
    where
        F: FnMut(&Arc<Function>) -> ControlFlow<()>,
    {
        visit_sorted(&self.sorted(), visitor);
    }

    /// First function, in ascending id order, matching `predicate`.
    #[must_use]
    pub fn find<P>(&self, mut predicate: P) -> Option<Arc<Function>>
    where
        P: FnMut(&Function) -> bool,
    {
        self.sorted().into_iter().find(|function| predicate(function))
    }
}

pub(crate) fn visit_sorted<F>(functions: &[Arc<Function>], mut visitor: F)
where
    F: FnMut(&Arc<Function>) -> ControlFlow<()>,
{
    for function in functions {
        if visitor(function).is_break() {
            return;
        }
    }
}
