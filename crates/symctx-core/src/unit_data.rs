//! Auxiliary per-unit debug data: variables, macros and imported modules.
//!
//! The symbol layer only caches these; their contents come from the backend
//! and are never interpreted here.

use crate::function::Declaration;

/// A unit-level (global or static) variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable
{
    /// Backend-assigned id
    pub id: u64,
    /// Source name
    pub name: String,
    /// Where the variable was declared, if known
    pub declaration: Option<Declaration>,
}

/// Variables of a compile unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableList
{
    variables: Vec<Variable>,
}

impl VariableList
{
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Add a variable.
    pub fn push(&mut self, variable: Variable)
    {
        self.variables.push(variable);
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize
    {
        self.variables.len()
    }

    /// Whether there are no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.variables.is_empty()
    }

    /// Iterate over the variables.
    pub fn iter(&self) -> impl Iterator<Item = &Variable>
    {
        self.variables.iter()
    }

    /// Variable by name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Variable>
    {
        self.variables.iter().find(|variable| variable.name == name)
    }
}

impl FromIterator<Variable> for VariableList
{
    fn from_iter<T: IntoIterator<Item = Variable>>(iter: T) -> Self
    {
        Self {
            variables: iter.into_iter().collect(),
        }
    }
}

/// Kind of a preprocessor macro record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugMacroKind
{
    /// `#define`
    Define,
    /// `#undef`
    Undefine,
    /// Entering an included file
    StartFile,
    /// Leaving an included file
    EndFile,
}

/// One macro record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugMacroEntry
{
    /// Record kind
    pub kind: DebugMacroKind,
    /// Line the record applies to
    pub line: u32,
    /// Macro text (`NAME value`), or the file path for start-file records
    pub text: String,
}

/// Macro records of a compile unit, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugMacros
{
    entries: Vec<DebugMacroEntry>,
}

impl DebugMacros
{
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, entry: DebugMacroEntry)
    {
        self.entries.push(entry);
    }

    /// Records in emission order.
    #[must_use]
    pub fn entries(&self) -> &[DebugMacroEntry]
    {
        &self.entries
    }
}

/// A module (Clang module, Swift module, ...) imported by a compile unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceModule
{
    /// Module path components, outermost first (`["std", "io"]`)
    pub path: Vec<String>,
    /// SDK or sysroot the module was found in
    pub sysroot: Option<String>,
}

impl SourceModule
{
    /// Dotted module name.
    #[must_use]
    pub fn name(&self) -> String
    {
        self.path.join(".")
    }
}
