//! Symbol demangling utilities.
//!
//! Backends hand function names to the symbol layer in their linkage
//! (mangled) form. This module turns them into a [`SymbolName`] carrying the
//! demangled spelling and a language guess.
//!
//! ## Language Detection
//!
//! - Rust symbols: Start with `_R` or `_ZN`, or contain `::`
//! - C++ symbols: Start with `_Z` (Itanium mangling)
//! - Everything else stays `Unknown`; plain C names carry no mangling to
//!   classify by

use rustc_demangle::try_demangle;

use crate::types::{Language, SymbolName};

/// Create a `SymbolName` from a raw mangled symbol string.
///
/// Demangling uses `rustc_demangle`; names it cannot decode keep only their
/// raw spelling.
///
/// ## Example
///
/// ```rust
/// use symctx_core::symbols::make_symbol_name;
/// use symctx_core::types::Language;
///
/// let name = make_symbol_name("_ZN4core3ptr13drop_in_place17h0123456789abcdefE");
/// assert_eq!(name.language(), Language::Rust);
/// assert_eq!(name.display_name(), "core::ptr::drop_in_place");
/// ```
pub fn make_symbol_name(raw: impl Into<String>) -> SymbolName
{
    let raw = raw.into();
    let demangled = try_demangle(&raw).ok().map(|d| format!("{d:#}"));
    let language = if raw.starts_with("_R") || raw.starts_with("_ZN") || raw.contains("::") {
        Language::Rust
    } else if raw.starts_with("_Z") {
        Language::Cpp
    } else {
        Language::Unknown
    };

    SymbolName::new(raw, demangled, language)
}
