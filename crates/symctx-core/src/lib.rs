//! # symctx-core
//!
//! The compile-unit layer of a debugger's symbol engine.
//!
//! This crate answers "which code implements `file:line:column`?" for one
//! module's debug info, including:
//! - A lazy, memoized cache of per-unit debug data (line tables, support
//!   files, macros, variables, imported modules, language, optimization)
//! - A function registry with deterministic, id-ordered enumeration
//! - A resolver that reconciles near-miss line-table matches with exact
//!   inline call sites
//!
//! ## Backends
//!
//! Nothing here parses a real debug-info format. Parsing is delegated to a
//! [`DebugInfoProvider`] injected per [`Module`]; units ask it for data the
//! first time that data is needed.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use symctx_core::prelude::*;
//!
//! let module = Module::without_symbols("/bin/app");
//! let files: SupportFileList = [FileSpec::new("/src/main.c")].into_iter().collect();
//! let unit = module
//!     .add_compile_unit(
//!         CompileUnitBuilder::new(CompileUnitId::from_raw(1), FileSpec::new("/src/main.c")).support_files(files.clone()),
//!     )
//!     .unwrap();
//! unit.set_line_table(Some(LineTable::new(
//!     Arc::new(files),
//!     vec![LineRow::new(0x1000, 0, 10, 0), LineRow::terminal(0x1010)],
//! )));
//!
//! let query = SourceLocationSpec::builder(FileSpec::new("main.c")).line(10).exact(true).build();
//! let contexts = unit.resolve_symbol_context(&query, SymbolContextScope::LINE_ENTRY, None);
//! assert_eq!(contexts.len(), 1);
//! ```

pub mod compile_unit;
pub mod diagnostics;
pub mod error;
pub mod files;
pub mod function;
pub mod line_table;
pub mod module;
pub mod prelude;
pub mod provider;
pub mod source_location;
pub mod symbols;
pub mod types;
pub mod unit_data;

pub use compile_unit::{CompileUnit, CompileUnitBuilder};
// Re-export commonly used types
pub use error::{Result, SymctxError};
pub use module::Module;
pub use provider::DebugInfoProvider;
