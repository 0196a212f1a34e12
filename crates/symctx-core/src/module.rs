//! # Modules
//!
//! A module is one binary image's worth of debug info: its compile units,
//! the [`DebugInfoProvider`] that parses them, and a diagnostics sink.
//!
//! Compile units keep only a weak back-reference to their module; the module
//! owns the units.
//!
//! ## Address lookup
//!
//! [`Module::resolve_symbol_context_for_address`] goes through the provider,
//! whose default is [`Module::lookup_address`]: a scan over the compile units
//! using their line tables and registered functions.

use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace};

use crate::compile_unit::{CompileUnit, CompileUnitBuilder};
use crate::diagnostics::{Diagnostic, Diagnostics, Severity};
use crate::error::{Result, SymctxError};
use crate::files::RealpathPrefixes;
use crate::provider::DebugInfoProvider;
use crate::source_location::SourceLocationSpec;
use crate::symbols::{SymbolContext, SymbolContextList, SymbolContextScope};
use crate::types::{Address, CompileUnitId};

/// Stable identity of a module, derived from its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(u64);

impl ModuleId
{
    /// Identity of the module at `path`.
    #[must_use]
    pub fn from_path(path: &Path) -> Self
    {
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        ModuleId(hasher.finish())
    }

    /// Raw hash value.
    #[must_use]
    pub fn as_u64(self) -> u64
    {
        self.0
    }
}

/// Debug info of one binary image.
pub struct Module
{
    id: ModuleId,
    path: PathBuf,
    name: String,
    provider: Option<Box<dyn DebugInfoProvider>>,
    compile_units: RwLock<BTreeMap<CompileUnitId, Arc<CompileUnit>>>,
    diagnostics: Diagnostics,
}

impl Module
{
    /// Create a module, optionally backed by a provider.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, provider: Option<Box<dyn DebugInfoProvider>>) -> Arc<Self>
    {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());

        Arc::new(Self {
            id: ModuleId::from_path(&path),
            path,
            name,
            provider,
            compile_units: RwLock::new(BTreeMap::new()),
            diagnostics: Diagnostics::new(),
        })
    }

    /// Create a module backed by `provider`.
    #[must_use]
    pub fn with_provider<P>(path: impl Into<PathBuf>, provider: P) -> Arc<Self>
    where
        P: DebugInfoProvider + 'static,
    {
        Self::new(path, Some(Box::new(provider)))
    }

    /// Create a module with no debug-info backend.
    #[must_use]
    pub fn without_symbols(path: impl Into<PathBuf>) -> Arc<Self>
    {
        Self::new(path, None)
    }

    /// Module identity.
    #[must_use]
    pub fn id(&self) -> ModuleId
    {
        self.id
    }

    /// Path of the image.
    #[must_use]
    pub fn path(&self) -> &Path
    {
        &self.path
    }

    /// File name of the image.
    #[must_use]
    pub fn name(&self) -> &str
    {
        &self.name
    }

    /// The debug-info backend, if any.
    #[must_use]
    pub fn provider(&self) -> Option<&dyn DebugInfoProvider>
    {
        self.provider.as_deref()
    }

    /// Create and register a compile unit.
    ///
    /// ## Errors
    ///
    /// - [`SymctxError::DuplicateCompileUnit`] if the id is already taken
    pub fn add_compile_unit(self: &Arc<Self>, builder: CompileUnitBuilder) -> Result<Arc<CompileUnit>>
    {
        let mut units = self.compile_units.write().unwrap_or_else(PoisonError::into_inner);
        let id = builder.id();
        if units.contains_key(&id) {
            return Err(SymctxError::DuplicateCompileUnit(id));
        }

        let unit = Arc::new(builder.build(Arc::downgrade(self)));
        units.insert(id, Arc::clone(&unit));
        debug!("module {}: added compile unit {id}", self.name);
        Ok(unit)
    }

    /// Compile unit by id.
    #[must_use]
    pub fn compile_unit(&self, id: CompileUnitId) -> Option<Arc<CompileUnit>>
    {
        self.compile_units
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// All compile units, ascending by id.
    #[must_use]
    pub fn compile_units(&self) -> Vec<Arc<CompileUnit>>
    {
        self.compile_units
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// What is at `address`, through the provider.
    ///
    /// Without a provider this is [`Module::lookup_address`].
    #[must_use]
    pub fn resolve_symbol_context_for_address(self: &Arc<Self>, address: Address, scope: SymbolContextScope) -> SymbolContext
    {
        match self.provider() {
            Some(provider) => provider.resolve_symbol_context(self, address, scope),
            None => self.lookup_address(address, scope),
        }
    }

    /// Find the compile unit, function, block and line entry at `address`.
    ///
    /// A unit owns the address when its line table has a row covering it or
    /// one of its functions contains it. The module is always filled in;
    /// the other parts only as far as `scope` asks.
    #[must_use]
    pub fn lookup_address(self: &Arc<Self>, address: Address, scope: SymbolContextScope) -> SymbolContext
    {
        let mut context = SymbolContext::for_module(Arc::clone(self));
        let wants_unit = scope.intersects(
            SymbolContextScope::COMP_UNIT
                | SymbolContextScope::FUNCTION
                | SymbolContextScope::BLOCK
                | SymbolContextScope::LINE_ENTRY
                | SymbolContextScope::SYMBOL,
        );
        if !wants_unit {
            return context;
        }

        for unit in self.compile_units() {
            let line_entry = unit
                .line_table()
                .and_then(|table| table.find_line_entry_by_address(address))
                .map(|(_, entry)| entry);
            let function = unit.find_function(|function| function.contains(address));

            if line_entry.is_none() && function.is_none() {
                continue;
            }

            trace!("module {}: {address} is in compile unit {}", self.name, unit.id());
            context.comp_unit = Some(Arc::clone(&unit));
            if scope.contains(SymbolContextScope::LINE_ENTRY) {
                context.line_entry = line_entry;
            }
            if let Some(function) = function {
                if scope.contains(SymbolContextScope::BLOCK) {
                    context.block = function.innermost_block_containing(address);
                }
                if scope.contains(SymbolContextScope::SYMBOL) {
                    context.symbol = Some(function.name().clone());
                }
                if scope.intersects(SymbolContextScope::FUNCTION | SymbolContextScope::BLOCK) {
                    context.function = Some(function);
                }
            }
            break;
        }
        context
    }

    /// Resolve `query` against every compile unit, in id order.
    #[must_use]
    pub fn resolve_source_location(
        self: &Arc<Self>,
        query: &SourceLocationSpec,
        scope: SymbolContextScope,
        realpath_prefixes: Option<&RealpathPrefixes>,
    ) -> SymbolContextList
    {
        let mut contexts = SymbolContextList::new();
        for unit in self.compile_units() {
            for context in unit.resolve_symbol_context(query, scope, realpath_prefixes) {
                contexts.append(context);
            }
        }
        contexts
    }

    /// Record an inconsistency in this module's debug info.
    pub fn report_error(&self, message: impl Into<String>)
    {
        self.diagnostics.report(Severity::Error, message, &self.name);
    }

    /// Record a suspicious but usable finding.
    pub fn report_warning(&self, message: impl Into<String>)
    {
        self.diagnostics.report(Severity::Warning, message, &self.name);
    }

    /// Diagnostics recorded so far, oldest first.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic>
    {
        self.diagnostics.snapshot()
    }
}

impl fmt::Debug for Module
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("Module")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("has_provider", &self.provider.is_some())
            .field("compile_units", &self.compile_units().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::files::FileSpec;

    #[test]
    fn test_duplicate_compile_unit_is_rejected()
    {
        let module = Module::without_symbols("/usr/lib/libfoo.so");
        let id = CompileUnitId::from_raw(7);
        module
            .add_compile_unit(CompileUnitBuilder::new(id, FileSpec::new("/src/foo.c")))
            .unwrap();

        let err = module
            .add_compile_unit(CompileUnitBuilder::new(id, FileSpec::new("/src/bar.c")))
            .unwrap_err();
        assert!(matches!(err, SymctxError::DuplicateCompileUnit(dup) if dup == id));
        assert_eq!(module.compile_units().len(), 1);
    }

    #[test]
    fn test_name_and_id()
    {
        let module = Module::without_symbols("/usr/lib/libfoo.so");
        assert_eq!(module.name(), "libfoo.so");
        assert_eq!(module.id(), ModuleId::from_path(Path::new("/usr/lib/libfoo.so")));
        assert!(module.provider().is_none());
    }

    #[test]
    fn test_unit_keeps_weak_back_reference()
    {
        let module = Module::without_symbols("/bin/app");
        let unit = module
            .add_compile_unit(CompileUnitBuilder::new(CompileUnitId::from_raw(1), FileSpec::new("main.c")))
            .unwrap();
        assert!(Arc::ptr_eq(&unit.module().unwrap(), &module));

        drop(module);
        assert!(unit.module().is_none());
    }

    #[test]
    fn test_report_error_is_recorded()
    {
        let module = Module::without_symbols("/bin/app");
        module.report_error("bad line table");
        let diagnostics = module.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }
}
