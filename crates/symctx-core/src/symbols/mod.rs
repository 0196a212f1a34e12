//! # Symbols
//!
//! Symbol names and symbol contexts.
//!
//! A [`SymbolContext`] is the answer to "what is here?": module, compile
//! unit, function, block, line entry and symbol, each present only when the
//! lookup was asked for it (see [`SymbolContextScope`]) and could find it.

pub mod context;
pub mod demangle;

pub use context::{SymbolContext, SymbolContextList, SymbolContextScope};
pub use demangle::make_symbol_name;
