//! Shared fixtures for the integration tests: a debug-info provider that
//! serves canned per-unit data and counts how often it is asked.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use symctx_core::compile_unit::CompileUnit;
use symctx_core::prelude::*;
pub use symctx_core::source_location::SourceLocationSpecBuilder;

/// Provider entry points, for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call
{
    Language,
    LineTable,
    DebugMacros,
    ImportedModules,
    SupportFiles,
    IsOptimized,
    Variables,
    Functions,
    ExternalModules,
    LoadDebugInfo,
    ResolveAddress,
}

#[derive(Debug, Default)]
pub struct CallCounter
{
    counts: Mutex<HashMap<Call, usize>>,
}

impl CallCounter
{
    fn record(&self, call: Call)
    {
        *self.counts.lock().unwrap().entry(call).or_default() += 1;
    }

    pub fn count(&self, call: Call) -> usize
    {
        self.counts.lock().unwrap().get(&call).copied().unwrap_or(0)
    }
}

/// How the provider answers address lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressLookup
{
    /// `Module::lookup_address`
    Default,
    /// Only the module, as if the address belonged to no unit
    NoUnit,
    /// Always the given unit
    Unit(CompileUnitId),
}

/// Canned debug data for one unit.
#[derive(Debug, Clone, Default)]
pub struct UnitFixture
{
    pub language: Language,
    pub optimized: bool,
    pub support_files: Vec<FileSpec>,
    pub rows: Option<Vec<LineRow>>,
    pub macros: Option<Arc<DebugMacros>>,
    pub imported: Vec<SourceModule>,
    pub variables: Option<VariableList>,
    pub functions: Vec<Arc<Function>>,
}

pub struct MockProvider
{
    calls: Arc<CallCounter>,
    units: HashMap<CompileUnitId, UnitFixture>,
    address_lookup: AddressLookup,
}

impl MockProvider
{
    fn fixture(&self, unit: &CompileUnit) -> Option<&UnitFixture>
    {
        self.units.get(&unit.id())
    }
}

impl DebugInfoProvider for MockProvider
{
    fn parse_language(&self, unit: &CompileUnit) -> Language
    {
        self.calls.record(Call::Language);
        self.fixture(unit).map(|fixture| fixture.language).unwrap_or_default()
    }

    fn parse_line_table(&self, unit: &CompileUnit)
    {
        self.calls.record(Call::LineTable);
        if let Some(fixture) = self.fixture(unit) {
            if let Some(rows) = &fixture.rows {
                let files: SupportFileList = fixture.support_files.iter().cloned().collect();
                unit.set_line_table(Some(LineTable::new(Arc::new(files), rows.clone())));
            }
        }
    }

    fn parse_debug_macros(&self, unit: &CompileUnit) -> Option<Arc<DebugMacros>>
    {
        self.calls.record(Call::DebugMacros);
        self.fixture(unit).and_then(|fixture| fixture.macros.clone())
    }

    fn parse_imported_modules(&self, context: &SymbolContext) -> Vec<SourceModule>
    {
        self.calls.record(Call::ImportedModules);
        context
            .comp_unit
            .as_deref()
            .and_then(|unit| self.fixture(unit))
            .map(|fixture| fixture.imported.clone())
            .unwrap_or_default()
    }

    fn parse_support_files(&self, unit: &CompileUnit) -> SupportFileList
    {
        self.calls.record(Call::SupportFiles);
        self.fixture(unit)
            .map(|fixture| fixture.support_files.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn parse_is_optimized(&self, unit: &CompileUnit) -> bool
    {
        self.calls.record(Call::IsOptimized);
        self.fixture(unit).is_some_and(|fixture| fixture.optimized)
    }

    fn parse_variables_for_context(&self, context: &SymbolContext)
    {
        self.calls.record(Call::Variables);
        if let Some(unit) = context.comp_unit.as_deref() {
            if let Some(variables) = self.fixture(unit).and_then(|fixture| fixture.variables.clone()) {
                unit.set_variable_list(Arc::new(variables));
            }
        }
    }

    fn parse_functions(&self, unit: &CompileUnit)
    {
        self.calls.record(Call::Functions);
        if let Some(fixture) = self.fixture(unit) {
            for function in &fixture.functions {
                unit.add_function(Arc::clone(function));
            }
        }
    }

    fn for_each_external_module(
        &self,
        _unit: &CompileUnit,
        _visited: &mut HashSet<ModuleId>,
        _visitor: &mut dyn FnMut(&Module) -> bool,
    ) -> bool
    {
        self.calls.record(Call::ExternalModules);
        false
    }

    fn set_load_debug_info_enabled(&self)
    {
        self.calls.record(Call::LoadDebugInfo);
    }

    fn resolve_symbol_context(&self, module: &Arc<Module>, address: Address, scope: SymbolContextScope) -> SymbolContext
    {
        self.calls.record(Call::ResolveAddress);
        match self.address_lookup {
            AddressLookup::Default => module.lookup_address(address, scope),
            AddressLookup::NoUnit => SymbolContext::for_module(Arc::clone(module)),
            AddressLookup::Unit(id) => SymbolContext {
                module: Some(Arc::clone(module)),
                comp_unit: module.compile_unit(id),
                ..SymbolContext::default()
            },
        }
    }
}

/// A module backed by a [`MockProvider`] serving `units`.
pub fn mock_module(
    units: Vec<(CompileUnitBuilder, UnitFixture)>,
    address_lookup: AddressLookup,
) -> (Arc<Module>, Vec<Arc<CompileUnit>>, Arc<CallCounter>)
{
    let calls = Arc::new(CallCounter::default());
    let provider = MockProvider {
        calls: Arc::clone(&calls),
        units: units
            .iter()
            .map(|(builder, fixture)| (builder.id(), fixture.clone()))
            .collect(),
        address_lookup,
    };

    let module = Module::with_provider("/bin/app", provider);
    let compile_units = units
        .into_iter()
        .map(|(builder, _)| module.add_compile_unit(builder).unwrap())
        .collect();
    (module, compile_units, calls)
}

pub fn unit_builder(id: u64, primary_file: &str) -> CompileUnitBuilder
{
    CompileUnitBuilder::new(CompileUnitId::from_raw(id), FileSpec::new(primary_file))
}

/// `/src/a.c` with rows (line 10 @ 0x1000) and (line 20 @ 0x1010).
pub fn two_line_fixture() -> UnitFixture
{
    UnitFixture {
        support_files: vec![FileSpec::new("/src/a.c")],
        rows: Some(vec![
            LineRow::new(0x1000, 0, 10, 0),
            LineRow::new(0x1010, 0, 20, 0),
            LineRow::terminal(0x1020),
        ]),
        ..UnitFixture::default()
    }
}

/// [`two_line_fixture`] plus `main` over `[0x1000, 0x1020)`, which inlines
/// `helper` at `[0x1010, 0x1018)` from call site `/src/a.c:15:5`.
pub fn inline_fixture() -> UnitFixture
{
    let mut main = Function::new(FunctionId::from_raw(1), "main", AddressRange::from_bounds(0x1000, 0x1020));
    main.add_block(
        BlockId::ROOT,
        vec![AddressRange::from_bounds(0x1010, 0x1018)],
        Some(InlineFunctionInfo {
            name: "helper".to_string(),
            call_site: Declaration::new(FileSpec::new("/src/a.c"), 15, Some(5)),
        }),
    )
    .unwrap();

    UnitFixture {
        functions: vec![Arc::new(main)],
        ..two_line_fixture()
    }
}

pub fn query(file: &str, line: u32) -> SourceLocationSpecBuilder
{
    SourceLocationSpec::builder(FileSpec::new(file)).line(line)
}
