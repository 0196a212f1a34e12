//! Symbol contexts: "what is at this address / line".

use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

use crate::compile_unit::CompileUnit;
use crate::function::{BlockId, Function};
use crate::line_table::LineEntry;
use crate::module::Module;
use crate::types::SymbolName;

/// Which parts of a [`SymbolContext`] a lookup should fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SymbolContextScope(u32);

impl SymbolContextScope
{
    /// Nothing.
    pub const NONE: Self = Self(0);
    /// Owning module.
    pub const MODULE: Self = Self(1 << 0);
    /// Compile unit.
    pub const COMP_UNIT: Self = Self(1 << 1);
    /// Function.
    pub const FUNCTION: Self = Self(1 << 2);
    /// Innermost block.
    pub const BLOCK: Self = Self(1 << 3);
    /// Line-table entry.
    pub const LINE_ENTRY: Self = Self(1 << 4);
    /// Symbol name.
    pub const SYMBOL: Self = Self(1 << 5);
    /// Every part.
    pub const EVERYTHING: Self = Self(0b11_1111);

    /// Whether every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool
    {
        self.0 & other.0 == other.0
    }

    /// Whether any bit of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool
    {
        self.0 & other.0 != 0
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u32
    {
        self.0
    }
}

impl BitOr for SymbolContextScope
{
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output
    {
        Self(self.0 | rhs.0)
    }
}

/// Resolved description of a code location.
///
/// Every part is optional: a context may name only a module and compile unit
/// (a file matched but has no line table), or carry everything down to the
/// innermost block.
#[derive(Clone, Default)]
pub struct SymbolContext
{
    /// Owning module
    pub module: Option<Arc<Module>>,
    /// Compile unit
    pub comp_unit: Option<Arc<CompileUnit>>,
    /// Function containing the location
    pub function: Option<Arc<Function>>,
    /// Innermost block of `function`
    pub block: Option<BlockId>,
    /// Line-table entry
    pub line_entry: Option<LineEntry>,
    /// Symbol name
    pub symbol: Option<SymbolName>,
}

impl SymbolContext
{
    /// Context naming only a module.
    #[must_use]
    pub fn for_module(module: Arc<Module>) -> Self
    {
        Self {
            module: Some(module),
            ..Self::default()
        }
    }

    /// Whether the context's compile unit is `unit`.
    #[must_use]
    pub fn is_comp_unit(&self, unit: &CompileUnit) -> bool
    {
        self.comp_unit.as_deref().is_some_and(|cu| std::ptr::eq(cu, unit))
    }
}

fn same_arc<T>(a: Option<&Arc<T>>, b: Option<&Arc<T>>) -> bool
{
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for SymbolContext
{
    fn eq(&self, other: &Self) -> bool
    {
        same_arc(self.module.as_ref(), other.module.as_ref())
            && same_arc(self.comp_unit.as_ref(), other.comp_unit.as_ref())
            && self.function.as_ref().map(|f| f.id()) == other.function.as_ref().map(|f| f.id())
            && self.block == other.block
            && self.line_entry == other.line_entry
            && self.symbol == other.symbol
    }
}

impl fmt::Debug for SymbolContext
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("SymbolContext")
            .field("module", &self.module.as_ref().map(|module| module.name().to_string()))
            .field("comp_unit", &self.comp_unit.as_ref().map(|unit| unit.id()))
            .field("function", &self.function.as_ref().map(|function| function.id()))
            .field("block", &self.block)
            .field("line_entry", &self.line_entry)
            .field("symbol", &self.symbol)
            .finish()
    }
}

impl fmt::Display for SymbolContext
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        if let Some(module) = &self.module {
            write!(f, "{}", module.name())?;
        }
        if let Some(unit) = &self.comp_unit {
            write!(f, " CompileUnit{}", unit.id())?;
        }
        if let Some(function) = &self.function {
            write!(f, " {}", function.name())?;
        }
        if let Some(entry) = &self.line_entry {
            write!(f, " {} {}:{}", entry.range, entry.file, entry.line)?;
            if entry.column != 0 {
                write!(f, ":{}", entry.column)?;
            }
        }
        Ok(())
    }
}

/// Caller-owned list of resolution results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolContextList
{
    contexts: Vec<SymbolContext>,
}

impl SymbolContextList
{
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Append a context.
    pub fn append(&mut self, context: SymbolContext)
    {
        self.contexts.push(context);
    }

    /// Number of contexts.
    #[must_use]
    pub fn len(&self) -> usize
    {
        self.contexts.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.contexts.is_empty()
    }

    /// Context at `idx`.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&SymbolContext>
    {
        self.contexts.get(idx)
    }

    /// Iterate over the contexts in append order.
    pub fn iter(&self) -> std::slice::Iter<'_, SymbolContext>
    {
        self.contexts.iter()
    }
}

impl IntoIterator for SymbolContextList
{
    type Item = SymbolContext;
    type IntoIter = std::vec::IntoIter<SymbolContext>;

    fn into_iter(self) -> Self::IntoIter
    {
        self.contexts.into_iter()
    }
}

impl<'a> IntoIterator for &'a SymbolContextList
{
    type Item = &'a SymbolContext;
    type IntoIter = std::slice::Iter<'a, SymbolContext>;

    fn into_iter(self) -> Self::IntoIter
    {
        self.contexts.iter()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_scope_bits()
    {
        let scope = SymbolContextScope::LINE_ENTRY | SymbolContextScope::FUNCTION;
        assert!(scope.contains(SymbolContextScope::LINE_ENTRY));
        assert!(!scope.contains(SymbolContextScope::BLOCK));
        assert!(scope.intersects(SymbolContextScope::FUNCTION | SymbolContextScope::BLOCK));
        assert!(SymbolContextScope::EVERYTHING.contains(scope | SymbolContextScope::SYMBOL));
        assert_ne!(scope, SymbolContextScope::LINE_ENTRY);
    }

    #[test]
    fn test_empty_contexts_are_equal()
    {
        assert_eq!(SymbolContext::default(), SymbolContext::default());
        assert!(SymbolContextList::new().is_empty());
    }
}
