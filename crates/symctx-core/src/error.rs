//! # Error Types
//!
//! Error handling for the fallible construction paths of the symbol layer.
//!
//! Resolution itself never fails: missing debug data is reported as an empty
//! list, `None` or `Language::Unknown`. The errors here cover building the
//! object model (modules, compile units, functions) with inconsistent input.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use thiserror::Error;

use crate::function::BlockId;
use crate::types::{CompileUnitId, FunctionId};

/// Main error type for symbol-layer operations
///
/// ## Error Categories
///
/// 1. **Identity errors**: DuplicateCompileUnit
/// 2. **Structure errors**: UnknownBlock
/// 3. **Argument errors**: InvalidArgument
#[derive(Error, Debug)]
pub enum SymctxError
{
    /// A compile unit with this id is already registered in the module
    ///
    /// Compile unit ids must be unique within their owning module because
    /// symbol contexts and address lookups compare units by id.
    #[error("Compile unit {0} already exists in module")]
    DuplicateCompileUnit(CompileUnitId),

    /// A block was added under a parent that doesn't exist in the function
    #[error("Function {function} has no block {block}")]
    UnknownBlock
    {
        /// Function being built
        function: FunctionId,
        /// Parent block that was requested
        block: BlockId,
    },

    /// Invalid argument passed to a symbol-layer function
    ///
    /// Raised when a function grows more blocks than a [`BlockId`] can index.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for `Result<T, SymctxError>`
///
/// ```rust
/// use symctx_core::error::Result;
/// fn foo() -> Result<()>
/// {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, SymctxError>;
