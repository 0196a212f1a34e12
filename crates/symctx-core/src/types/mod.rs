//! # Types
//!
//! Small value types used throughout the symbol layer.
//!
//! These are deliberately free of any debug-info format: addresses are plain
//! file addresses, languages are a closed enum, and ids are opaque numbers
//! handed out by whichever backend parsed the debug info.

pub mod address;
pub mod ids;
pub mod symbols;

// Re-export all public types
pub use address::{Address, AddressRange};
pub use ids::{CompileUnitId, FunctionId};
pub use symbols::{Language, SymbolName};
