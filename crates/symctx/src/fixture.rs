//! JSON fixtures standing in for real debug info.
//!
//! A fixture describes one module: its compile units, their support files,
//! line tables and functions (with nested, possibly inlined, blocks). It is
//! served through [`FixtureProvider`], so every piece is parsed lazily by the
//! compile units exactly as a real backend would be consulted.
//!
//! ```json
//! {
//!   "module": "/bin/app",
//!   "units": [{
//!     "id": 1,
//!     "primary_file": "/src/a.c",
//!     "language": "c99",
//!     "support_files": ["/src/a.c"],
//!     "line_table": [
//!       { "address": 4096, "file": 0, "line": 10 },
//!       { "address": 4128, "end_sequence": true }
//!     ],
//!     "functions": [{ "id": 1, "name": "main", "low_pc": 4096, "high_pc": 4128 }]
//!   }]
//! }
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use symctx_core::compile_unit::{CompileUnit, CompileUnitBuilder};
use symctx_core::files::{FileSpec, SupportFileList};
use symctx_core::function::{BlockId, Declaration, Function, InlineFunctionInfo};
use symctx_core::line_table::{LineRow, LineTable};
use symctx_core::module::Module;
use symctx_core::provider::DebugInfoProvider;
use symctx_core::types::{AddressRange, CompileUnitId, FunctionId, Language};
use tracing::debug;

use crate::error::{CliError, Result};

/// Top-level fixture document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture
{
    pub module: PathBuf,
    #[serde(default)]
    pub units: Vec<UnitSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitSpec
{
    pub id: u64,
    pub primary_file: PathBuf,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub optimized: bool,
    #[serde(default)]
    pub support_files: Vec<PathBuf>,
    #[serde(default)]
    pub line_table: Option<Vec<RowSpec>>,
    #[serde(default)]
    pub functions: Vec<FunctionSpec>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RowSpec
{
    pub address: u64,
    #[serde(default)]
    pub file: u32,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u16,
    #[serde(default)]
    pub end_sequence: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionSpec
{
    pub id: u64,
    pub name: String,
    pub low_pc: u64,
    pub high_pc: u64,
    #[serde(default)]
    pub blocks: Vec<BlockSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockSpec
{
    /// `[start, end)` pairs
    pub ranges: Vec<(u64, u64)>,
    #[serde(default)]
    pub inline: Option<InlineSpec>,
    #[serde(default)]
    pub children: Vec<BlockSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InlineSpec
{
    pub name: String,
    pub call_file: PathBuf,
    pub call_line: u32,
    #[serde(default)]
    pub call_column: Option<u16>,
}

impl Fixture
{
    /// Parse a fixture document.
    pub fn from_json(text: &str) -> Result<Self>
    {
        Ok(serde_json::from_str(text)?)
    }

    /// Build the module, with a [`FixtureProvider`] serving the units' data.
    pub fn into_module(self) -> Result<Arc<Module>>
    {
        let mut units = HashMap::new();
        let mut builders = Vec::new();

        for spec in self.units {
            let id = CompileUnitId::from_raw(spec.id);
            builders.push(CompileUnitBuilder::new(id, FileSpec::new(&spec.primary_file)));
            units.insert(id, UnitData::try_from(spec)?);
        }

        let module = Module::with_provider(self.module, FixtureProvider { units });
        for builder in builders {
            module.add_compile_unit(builder)?;
        }
        debug!("loaded fixture module {} with {} compile units", module.name(), module.compile_units().len());
        Ok(module)
    }
}

#[derive(Debug)]
struct UnitData
{
    language: Language,
    optimized: bool,
    support_files: SupportFileList,
    rows: Option<Vec<LineRow>>,
    functions: Vec<Arc<Function>>,
}

impl TryFrom<UnitSpec> for UnitData
{
    type Error = CliError;

    fn try_from(spec: UnitSpec) -> Result<Self>
    {
        let language = match &spec.language {
            Some(name) => name
                .parse::<Language>()
                .map_err(|err: String| CliError::InvalidFixture(format!("compile unit {}: {err}", spec.id)))?,
            None => Language::Unknown,
        };

        let support_files: SupportFileList = spec.support_files.iter().map(FileSpec::new).collect();
        let rows = spec.line_table.map(|rows| {
            rows.into_iter()
                .map(|row| {
                    if row.end_sequence {
                        LineRow::terminal(row.address)
                    } else {
                        LineRow::new(row.address, row.file, row.line, row.column)
                    }
                })
                .collect()
        });

        let functions = spec
            .functions
            .iter()
            .map(build_function)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            language,
            optimized: spec.optimized,
            support_files,
            rows,
            functions,
        })
    }
}

fn build_function(spec: &FunctionSpec) -> Result<Arc<Function>>
{
    if spec.high_pc < spec.low_pc {
        return Err(CliError::InvalidFixture(format!(
            "function {} ends before it starts",
            spec.name
        )));
    }

    let mut function = Function::new(
        FunctionId::from_raw(spec.id),
        spec.name.clone(),
        AddressRange::from_bounds(spec.low_pc, spec.high_pc),
    );

    // (parent, block) pairs, children pushed in reverse to keep sibling order
    let mut pending: Vec<(BlockId, &BlockSpec)> = spec.blocks.iter().rev().map(|block| (BlockId::ROOT, block)).collect();
    while let Some((parent, block)) = pending.pop() {
        let ranges = block
            .ranges
            .iter()
            .map(|&(start, end)| AddressRange::from_bounds(start, end))
            .collect();
        let inline_info = block.inline.as_ref().map(|inline| InlineFunctionInfo {
            name: inline.name.clone(),
            call_site: Declaration::new(FileSpec::new(&inline.call_file), inline.call_line, inline.call_column),
        });

        let id = function.add_block(parent, ranges, inline_info)?;
        pending.extend(block.children.iter().rev().map(|child| (id, child)));
    }

    Ok(Arc::new(function))
}

/// Debug-info backend over a parsed [`Fixture`].
#[derive(Debug)]
pub struct FixtureProvider
{
    units: HashMap<CompileUnitId, UnitData>,
}

impl FixtureProvider
{
    fn unit(&self, unit: &CompileUnit) -> Option<&UnitData>
    {
        self.units.get(&unit.id())
    }
}

impl DebugInfoProvider for FixtureProvider
{
    fn parse_language(&self, unit: &CompileUnit) -> Language
    {
        self.unit(unit).map_or(Language::Unknown, |data| data.language)
    }

    fn parse_line_table(&self, unit: &CompileUnit)
    {
        let Some(data) = self.unit(unit) else {
            return;
        };
        if let Some(rows) = &data.rows {
            unit.set_line_table(Some(LineTable::new(Arc::new(data.support_files.clone()), rows.clone())));
        }
    }

    fn parse_support_files(&self, unit: &CompileUnit) -> SupportFileList
    {
        self.unit(unit).map(|data| data.support_files.clone()).unwrap_or_default()
    }

    fn parse_is_optimized(&self, unit: &CompileUnit) -> bool
    {
        self.unit(unit).is_some_and(|data| data.optimized)
    }

    fn parse_functions(&self, unit: &CompileUnit)
    {
        if let Some(data) = self.unit(unit) {
            for function in &data.functions {
                unit.add_function(Arc::clone(function));
            }
        }
    }
}
