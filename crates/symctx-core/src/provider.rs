//! # Debug-Info Providers
//!
//! The seam between the format-independent symbol layer and a concrete
//! debug-info parser (DWARF, PDB, a test fixture, ...).
//!
//! A provider is injected once per [`Module`] and consulted lazily by every
//! [`CompileUnit`] of that module. Methods that fill a large structure do so
//! through the unit's setters instead of returning it:
//!
//! - [`DebugInfoProvider::parse_line_table`] calls [`CompileUnit::set_line_table`]
//! - [`DebugInfoProvider::parse_functions`] calls [`CompileUnit::add_function`]
//! - [`DebugInfoProvider::parse_variables_for_context`] calls
//!   [`CompileUnit::set_variable_list`]
//!
//! Units never hold a lock while calling into a provider, so these re-entrant
//! calls are safe.
//!
//! Every method has a default that reports "nothing here", so a provider only
//! implements what its format actually carries.

use std::collections::HashSet;
use std::sync::Arc;

use crate::compile_unit::CompileUnit;
use crate::files::SupportFileList;
use crate::module::{Module, ModuleId};
use crate::symbols::{SymbolContext, SymbolContextScope};
use crate::types::{Address, Language};
use crate::unit_data::{DebugMacros, SourceModule};

/// Format-specific debug-info backend.
pub trait DebugInfoProvider: Send + Sync
{
    /// Source language of `unit`.
    fn parse_language(&self, _unit: &CompileUnit) -> Language
    {
        Language::Unknown
    }

    /// Parse the line table of `unit` and store it with
    /// [`CompileUnit::set_line_table`].
    fn parse_line_table(&self, _unit: &CompileUnit) {}

    /// Preprocessor macros of `unit`.
    fn parse_debug_macros(&self, _unit: &CompileUnit) -> Option<Arc<DebugMacros>>
    {
        None
    }

    /// Modules imported by the unit in `context`.
    fn parse_imported_modules(&self, _context: &SymbolContext) -> Vec<SourceModule>
    {
        Vec::new()
    }

    /// Support files of `unit`.
    fn parse_support_files(&self, _unit: &CompileUnit) -> SupportFileList
    {
        SupportFileList::new()
    }

    /// Whether `unit` was compiled with optimization.
    fn parse_is_optimized(&self, _unit: &CompileUnit) -> bool
    {
        false
    }

    /// Parse the variables for `context` and store unit-level ones with
    /// [`CompileUnit::set_variable_list`].
    fn parse_variables_for_context(&self, _context: &SymbolContext) {}

    /// Register every function of `unit` with [`CompileUnit::add_function`].
    ///
    /// May be called repeatedly; re-registering a function is harmless.
    fn parse_functions(&self, _unit: &CompileUnit) {}

    /// Visit modules holding debug info referenced by `unit`, skipping those
    /// already in `visited`. Returns `true` if the visitor asked to stop.
    fn for_each_external_module(
        &self,
        _unit: &CompileUnit,
        _visited: &mut HashSet<ModuleId>,
        _visitor: &mut dyn FnMut(&Module) -> bool,
    ) -> bool
    {
        false
    }

    /// Stop deferring work: debug info is about to be needed in full.
    fn set_load_debug_info_enabled(&self) {}

    /// What is at `address`, filled in as far as `scope` asks.
    fn resolve_symbol_context(&self, module: &Arc<Module>, address: Address, scope: SymbolContextScope) -> SymbolContext
    {
        module.lookup_address(address, scope)
    }
}
