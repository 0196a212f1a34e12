//! # Compile Units
//!
//! The debug-info record of one translation unit, and the lazy cache in
//! front of the backend that parses it.
//!
//! Every expensive piece of a unit (language, line table, support files,
//! macros, imported modules, optimization state) is fetched from the owning
//! module's [`DebugInfoProvider`] the first time someone asks for it, and
//! never again. "Asked, but the backend had nothing" is remembered as well,
//! so a unit without a line table doesn't hit the backend on every query.
//!
//! ## Locking
//!
//! Cached state sits behind `RwLock`s, but no lock is held while the backend
//! runs: backends populate the unit through its setters
//! ([`CompileUnit::set_line_table`], [`CompileUnit::add_function`],
//! [`CompileUnit::set_variable_list`]) from inside the fetch.
//!
//! ## Usage
//!
//! ```rust
//! use symctx_core::compile_unit::CompileUnitBuilder;
//! use symctx_core::files::FileSpec;
//! use symctx_core::module::Module;
//! use symctx_core::types::{CompileUnitId, Language};
//!
//! let module = Module::without_symbols("/bin/app");
//! let unit = module
//!     .add_compile_unit(CompileUnitBuilder::new(CompileUnitId::from_raw(1), FileSpec::new("/src/main.c")))
//!     .unwrap();
//!
//! // No backend: the language stays unknown and nothing is fetched
//! assert_eq!(unit.language(), Language::Unknown);
//! assert!(unit.line_table().is_none());
//! ```
//!
//! [`DebugInfoProvider`]: crate::provider::DebugInfoProvider

mod functions;
mod lazy;
mod resolve;

use std::any::Any;
use std::collections::HashSet;
use std::fmt::{self, Write as _};
use std::ops::ControlFlow;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

pub use functions::FunctionRegistry;
pub use lazy::{LazyBool, LazyField, LoadState};
use tracing::debug;

use crate::files::{FileSpec, SupportFileList};
use crate::function::Function;
use crate::line_table::LineTable;
use crate::module::{Module, ModuleId};
use crate::provider::DebugInfoProvider;
use crate::symbols::SymbolContext;
use crate::types::{CompileUnitId, FunctionId, Language};
use crate::unit_data::{DebugMacros, SourceModule, VariableList};

/// Opaque backend token attached to a unit.
pub type UserData = Arc<dyn Any + Send + Sync>;

/// Construction parameters for a [`CompileUnit`].
///
/// Units are created through [`Module::add_compile_unit`], which supplies the
/// back-reference to the module.
#[derive(Clone)]
pub struct CompileUnitBuilder
{
    id: CompileUnitId,
    primary_file: FileSpec,
    language: Language,
    is_optimized: LazyBool,
    support_files: SupportFileList,
    user_data: Option<UserData>,
}

impl fmt::Debug for CompileUnitBuilder
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("CompileUnitBuilder")
            .field("id", &self.id)
            .field("primary_file", &self.primary_file)
            .field("language", &self.language)
            .field("is_optimized", &self.is_optimized)
            .field("support_files", &self.support_files.len())
            .field("user_data", &self.user_data.is_some())
            .finish()
    }
}

impl CompileUnitBuilder
{
    /// Start a unit with everything left to the backend.
    #[must_use]
    pub fn new(id: CompileUnitId, primary_file: FileSpec) -> Self
    {
        Self {
            id,
            primary_file,
            language: Language::Unknown,
            is_optimized: LazyBool::Calculate,
            support_files: SupportFileList::new(),
            user_data: None,
        }
    }

    /// Known language; a known language is never requested from the backend.
    #[must_use]
    pub fn language(mut self, language: Language) -> Self
    {
        self.language = language;
        self
    }

    /// Known optimization state.
    #[must_use]
    pub fn optimized(mut self, is_optimized: impl Into<LazyBool>) -> Self
    {
        self.is_optimized = is_optimized.into();
        self
    }

    /// Initial support files; a non-empty list is never requested from the
    /// backend.
    #[must_use]
    pub fn support_files(mut self, support_files: SupportFileList) -> Self
    {
        self.support_files = support_files;
        self
    }

    /// Opaque backend token.
    #[must_use]
    pub fn user_data(mut self, user_data: UserData) -> Self
    {
        self.user_data = Some(user_data);
        self
    }

    /// Id the unit will get.
    #[must_use]
    pub fn id(&self) -> CompileUnitId
    {
        self.id
    }

    pub(crate) fn build(self, module: Weak<Module>) -> CompileUnit
    {
        let support_files = Some(self.support_files)
            .filter(|files| !files.is_empty())
            .map(Arc::new);

        CompileUnit {
            id: self.id,
            module,
            primary_file: self.primary_file,
            user_data: self.user_data,
            state: RwLock::new(LazyState {
                language: LazyField::seeded(Some(self.language).filter(|language| language.is_known())),
                is_optimized: self.is_optimized,
                line_table: LazyField::unloaded(),
                support_files: LazyField::seeded(support_files),
                debug_macros: LazyField::unloaded(),
                imported_modules: LazyField::unloaded(),
                variables: None,
            }),
            functions: RwLock::new(FunctionRegistry::new()),
        }
    }
}

#[derive(Debug)]
struct LazyState
{
    language: LazyField<Language>,
    is_optimized: LazyBool,
    line_table: LazyField<Arc<LineTable>>,
    support_files: LazyField<Arc<SupportFileList>>,
    debug_macros: LazyField<Arc<DebugMacros>>,
    imported_modules: LazyField<Arc<[SourceModule]>>,
    variables: Option<Arc<VariableList>>,
}

/// Debug information for one translation unit.
pub struct CompileUnit
{
    id: CompileUnitId,
    module: Weak<Module>,
    primary_file: FileSpec,
    user_data: Option<UserData>,
    state: RwLock<LazyState>,
    functions: RwLock<FunctionRegistry>,
}

impl CompileUnit
{
    /// Unit id, unique within the module.
    #[must_use]
    pub fn id(&self) -> CompileUnitId
    {
        self.id
    }

    /// Canonical source file of the unit.
    #[must_use]
    pub fn primary_file(&self) -> &FileSpec
    {
        &self.primary_file
    }

    /// Opaque backend token.
    #[must_use]
    pub fn user_data(&self) -> Option<&UserData>
    {
        self.user_data.as_ref()
    }

    /// Owning module, if it is still alive.
    #[must_use]
    pub fn module(&self) -> Option<Arc<Module>>
    {
        self.module.upgrade()
    }

    /// Context naming the owning module and this unit.
    #[must_use]
    pub fn calculate_symbol_context(self: &Arc<Self>) -> SymbolContext
    {
        SymbolContext {
            module: self.module(),
            comp_unit: Some(Arc::clone(self)),
            ..SymbolContext::default()
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, LazyState>
    {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, LazyState>
    {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_functions(&self) -> RwLockReadGuard<'_, FunctionRegistry>
    {
        self.functions.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `fetch` against the backend if `field` claims its one request.
    ///
    /// A value returned by `fetch` is cached; backends that populate the unit
    /// through a setter return `None` instead.
    fn fetch_once<T, S, F>(&self, what: &'static str, select: S, fetch: F) -> Option<T>
    where
        T: Clone,
        S: Fn(&mut LazyState) -> &mut LazyField<T>,
        F: FnOnce(&dyn DebugInfoProvider) -> Option<T>,
    {
        let claimed = select(&mut self.write_state()).begin_fetch();
        if claimed {
            if let Some(module) = self.module() {
                if let Some(provider) = module.provider() {
                    debug!("compile unit {}: fetching {what}", self.id);
                    if let Some(value) = fetch(provider) {
                        select(&mut self.write_state()).store(value);
                    }
                }
            }
        }
        select(&mut self.write_state()).get()
    }

    /// Source language, resolved on first use.
    pub fn language(&self) -> Language
    {
        self.fetch_once(
            "language",
            |state| &mut state.language,
            |provider| Some(provider.parse_language(self)).filter(|language| language.is_known()),
        )
        .unwrap_or_default()
    }

    /// Language name without triggering a fetch; `"<not loaded>"` when the
    /// language was never requested.
    #[must_use]
    pub fn cached_language_name(&self) -> &'static str
    {
        let state = self.read_state();
        match state.language.get() {
            Some(language) => language.name(),
            None if state.language.state() == LoadState::Unloaded => "<not loaded>",
            None => Language::Unknown.name(),
        }
    }

    /// Line table, parsed on first use.
    ///
    /// The returned table is an immutable snapshot; replacing the unit's
    /// table later does not affect it.
    pub fn line_table(&self) -> Option<Arc<LineTable>>
    {
        self.fetch_once(
            "line table",
            |state| &mut state.line_table,
            |provider| {
                provider.parse_line_table(self);
                None
            },
        )
    }

    /// Replace the line table wholesale.
    ///
    /// `None` discards the table and re-arms the backend request, so the next
    /// [`CompileUnit::line_table`] call asks the backend again.
    pub fn set_line_table(&self, line_table: Option<LineTable>)
    {
        self.write_state().line_table.replace(line_table.map(Arc::new));
    }

    /// Preprocessor macros, parsed on first use.
    pub fn debug_macros(&self) -> Option<Arc<DebugMacros>>
    {
        self.fetch_once(
            "debug macros",
            |state| &mut state.debug_macros,
            |provider| provider.parse_debug_macros(self),
        )
    }

    /// Replace the macros; `None` re-arms the backend request.
    pub fn set_debug_macros(&self, debug_macros: Option<Arc<DebugMacros>>)
    {
        self.write_state().debug_macros.replace(debug_macros);
    }

    /// Support files, parsed on first use. Empty when the backend has none.
    pub fn support_files(&self) -> Arc<SupportFileList>
    {
        self.fetch_once(
            "support files",
            |state| &mut state.support_files,
            |provider| {
                let files = provider.parse_support_files(self);
                (!files.is_empty()).then(|| Arc::new(files))
            },
        )
        .unwrap_or_default()
    }

    /// Modules imported by the unit, parsed on first use.
    pub fn imported_modules(self: &Arc<Self>) -> Arc<[SourceModule]>
    {
        self.fetch_once(
            "imported modules",
            |state| &mut state.imported_modules,
            |provider| {
                let modules = provider.parse_imported_modules(&self.calculate_symbol_context());
                (!modules.is_empty()).then(|| Arc::from(modules))
            },
        )
        .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    /// Whether the unit was compiled with optimization.
    ///
    /// Computed once; without a backend (or when the backend says no) the
    /// answer is `false`.
    pub fn is_optimized(&self) -> bool
    {
        let calculate = {
            let mut state = self.write_state();
            if state.is_optimized == LazyBool::Calculate {
                state.is_optimized = LazyBool::No;
                true
            } else {
                false
            }
        };

        if calculate {
            if let Some(module) = self.module() {
                if let Some(provider) = module.provider() {
                    debug!("compile unit {}: fetching optimization state", self.id);
                    if provider.parse_is_optimized(self) {
                        self.write_state().is_optimized = LazyBool::Yes;
                    }
                }
            }
        }

        self.read_state().is_optimized == LazyBool::Yes
    }

    /// Unit-level variables.
    ///
    /// With `can_create`, the backend is asked every time nothing is cached
    /// yet; variables can be discovered incrementally, so there is no
    /// "already requested" gate here.
    pub fn variable_list(self: &Arc<Self>, can_create: bool) -> Option<Arc<VariableList>>
    {
        let missing = self.read_state().variables.is_none();
        if missing && can_create {
            if let Some(module) = self.module() {
                if let Some(provider) = module.provider() {
                    debug!("compile unit {}: fetching variables", self.id);
                    provider.parse_variables_for_context(&self.calculate_symbol_context());
                }
            }
        }
        self.read_state().variables.clone()
    }

    /// Store the unit-level variables.
    pub fn set_variable_list(&self, variables: Arc<VariableList>)
    {
        self.write_state().variables = Some(variables);
    }

    /// Register a function; overwrites any function with the same id.
    pub fn add_function(&self, function: Arc<Function>)
    {
        self.functions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(function);
    }

    /// Function with `id`, among those parsed so far.
    #[must_use]
    pub fn find_function_by_id(&self, id: FunctionId) -> Option<Arc<Function>>
    {
        self.read_functions().lookup_by_id(id)
    }

    /// Visit the functions parsed so far in ascending id order, until the
    /// visitor breaks.
    pub fn for_each_function<F>(&self, visitor: F)
    where
        F: FnMut(&Arc<Function>) -> ControlFlow<()>,
    {
        let sorted = self.read_functions().sorted();
        functions::visit_sorted(&sorted, visitor);
    }

    /// First function matching `predicate`, after making the backend parse
    /// every function of the unit.
    pub fn find_function<P>(&self, predicate: P) -> Option<Arc<Function>>
    where
        P: FnMut(&Function) -> bool,
    {
        let span = tracing::debug_span!("find_function", unit = self.id.raw());
        let _enter = span.enter();

        // Functions are registered lazily; a search needs all of them.
        if let Some(module) = self.module() {
            if let Some(provider) = module.provider() {
                provider.parse_functions(self);
            }
        }

        let snapshot = self.read_functions().clone();
        snapshot.find(predicate)
    }

    /// Visit modules this unit's debug info lives in or refers to (e.g.
    /// split DWARF or Clang modules). Returns the visitor's early-exit result;
    /// `false` without a backend.
    pub fn for_each_external_module(&self, visited: &mut HashSet<ModuleId>, visitor: &mut dyn FnMut(&Module) -> bool) -> bool
    {
        let Some(module) = self.module() else {
            return false;
        };
        let Some(provider) = module.provider() else {
            return false;
        };
        provider.for_each_external_module(self, visited, visitor)
    }

    /// Write the cached contents of the unit.
    ///
    /// Nothing is parsed on demand, so this shows exactly what has been
    /// loaded so far.
    ///
    /// ## Errors
    ///
    /// Propagates errors from the writer.
    pub fn dump(&self, out: &mut dyn fmt::Write, show_context: bool) -> fmt::Result
    {
        if show_context {
            if let Some(module) = self.module() {
                write!(out, "{}: ", module.name())?;
            }
        }
        writeln!(
            out,
            "CompileUnit{}, language = \"{}\", file = '{}'",
            self.id,
            self.cached_language_name(),
            self.primary_file
        )?;

        let variables = self.read_state().variables.clone();
        if let Some(variables) = variables {
            for variable in variables.iter() {
                writeln!(out, "  Variable{{0x{:08x}}}: {}", variable.id, variable.name)?;
            }
        }

        let functions = self.read_functions().sorted();
        for function in &functions {
            writeln!(
                out,
                "  Function{}: {} {}",
                function.id(),
                function.name(),
                function.range()
            )?;
        }
        Ok(())
    }

    /// [`CompileUnit::dump`] into a `String`.
    #[must_use]
    pub fn dump_to_string(&self, show_context: bool) -> String
    {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.dump(&mut out, show_context);
        out
    }
}

impl fmt::Display for CompileUnit
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(
            f,
            "id = {}, file = \"{}\", language = \"{}\"",
            self.id,
            self.primary_file,
            self.cached_language_name()
        )
    }
}

impl fmt::Debug for CompileUnit
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("CompileUnit")
            .field("id", &self.id)
            .field("primary_file", &self.primary_file)
            .field("language", &self.cached_language_name())
            .finish_non_exhaustive()
    }
}

#[allow(dead_code)]
fn assert_send_sync()
{
    fn check<T: Send + Sync>() {}
    check::<CompileUnit>();
}
