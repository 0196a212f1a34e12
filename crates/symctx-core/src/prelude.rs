//! Common module for library exports

pub use crate::compile_unit::{CompileUnit, CompileUnitBuilder, LazyBool};
pub use crate::diagnostics::{Diagnostic, Severity};
pub use crate::error::{Result, SymctxError};
pub use crate::files::{FileSpec, RealpathPrefixes, SupportFileList};
pub use crate::function::{Block, BlockId, Declaration, Function, InlineFunctionInfo};
pub use crate::line_table::{LineEntry, LineRow, LineTable};
pub use crate::module::{Module, ModuleId};
pub use crate::provider::DebugInfoProvider;
pub use crate::source_location::SourceLocationSpec;
pub use crate::symbols::{SymbolContext, SymbolContextList, SymbolContextScope};
pub use crate::types::{Address, AddressRange, CompileUnitId, FunctionId, Language, SymbolName};
pub use crate::unit_data::{DebugMacros, SourceModule, Variable, VariableList};
