//! Tests for resolving source locations against a compile unit

mod common;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::{AddressLookup, Call, UnitFixture, inline_fixture, mock_module, query, two_line_fixture, unit_builder};
use symctx_core::prelude::*;

fn addresses(contexts: &SymbolContextList) -> Vec<u64>
{
    contexts
        .iter()
        .map(|context| context.line_entry.as_ref().unwrap().range.base.value())
        .collect()
}

#[test]
fn test_mismatched_file_without_inlines_is_empty()
{
    let (_module, units, calls) = mock_module(vec![(unit_builder(1, "/src/a.c"), two_line_fixture())], AddressLookup::Default);
    let unit = &units[0];

    for line in [0, 1, 10, 20] {
        for column in [0, 3] {
            let spec = SourceLocationSpec::new(FileSpec::new("/src/b.c"), Some(line), Some(column), false, false);
            assert!(unit.resolve_symbol_context(&spec, SymbolContextScope::EVERYTHING, None).is_empty());
        }
    }
    assert_eq!(calls.count(Call::SupportFiles), 0);
    assert_eq!(calls.count(Call::LineTable), 0);
}

#[test]
fn test_query_without_line_returns_unit_context()
{
    let (module, units, _calls) = mock_module(vec![(unit_builder(1, "/src/a.c"), two_line_fixture())], AddressLookup::Default);
    let unit = &units[0];

    let spec = SourceLocationSpec::builder(FileSpec::new("a.c")).build();
    let contexts = unit.resolve_symbol_context(&spec, SymbolContextScope::EVERYTHING, None);
    assert_eq!(contexts.len(), 1);

    let context = contexts.get(0).unwrap();
    assert!(Arc::ptr_eq(context.module.as_ref().unwrap(), &module));
    assert!(context.is_comp_unit(unit));
    assert!(context.line_entry.is_none());

    // Looking for call sites never yields a bare unit
    let spec = SourceLocationSpec::builder(FileSpec::new("a.c")).check_inlines(true).build();
    assert!(unit.resolve_symbol_context(&spec, SymbolContextScope::EVERYTHING, None).is_empty());
}

#[test]
fn test_exact_line_match()
{
    let (_module, units, calls) = mock_module(vec![(unit_builder(1, "/src/a.c"), two_line_fixture())], AddressLookup::Default);
    let unit = &units[0];

    let spec = query("/src/a.c", 10).exact(true).build();
    let contexts = unit.resolve_symbol_context(&spec, SymbolContextScope::LINE_ENTRY, None);
    assert_eq!(addresses(&contexts), vec![0x1000]);
    assert_eq!(contexts.get(0).unwrap().line_entry.as_ref().unwrap().line, 10);
    assert_eq!(calls.count(Call::LoadDebugInfo), 1);

    let spec = query("/src/a.c", 15).exact(true).build();
    assert!(unit.resolve_symbol_context(&spec, SymbolContextScope::LINE_ENTRY, None).is_empty());
}

#[test]
fn test_exact_line_match_with_full_scope_resolves_address()
{
    let (_module, units, _calls) = mock_module(vec![(unit_builder(1, "/src/a.c"), inline_fixture())], AddressLookup::Default);
    let unit = &units[0];

    let spec = query("a.c", 10).exact(true).build();
    let contexts = unit.resolve_symbol_context(&spec, SymbolContextScope::EVERYTHING, None);
    assert_eq!(contexts.len(), 1);

    let context = contexts.get(0).unwrap();
    assert!(context.is_comp_unit(unit));
    assert_eq!(context.function.as_ref().unwrap().name().raw(), "main");
    assert_eq!(context.block, Some(BlockId::ROOT));
    assert_eq!(context.line_entry.as_ref().unwrap().range.base.value(), 0x1000);
    assert_eq!(context.symbol.as_ref().unwrap().raw(), "main");
}

#[test]
fn test_inline_call_site_beats_nearby_line_entry()
{
    let (_module, units, _calls) = mock_module(vec![(unit_builder(1, "/src/a.c"), inline_fixture())], AddressLookup::Default);
    let unit = &units[0];

    let spec = query("/src/a.c", 15).column(5).check_inlines(true).build();
    let contexts = unit.resolve_symbol_context(&spec, SymbolContextScope::EVERYTHING, None);
    assert_eq!(contexts.len(), 1);

    let context = contexts.get(0).unwrap();
    let entry = context.line_entry.as_ref().unwrap();
    assert_eq!(entry.line, 15);
    assert_eq!(entry.column, 5);
    // The range is the inlining (parent) block's, here the function body
    assert_eq!(entry.range, AddressRange::from_bounds(0x1000, 0x1020));
    assert_eq!(context.function.as_ref().unwrap().name().raw(), "main");
    assert_eq!(context.block, Some(BlockId::ROOT));
    assert!(contexts.iter().all(|context| context.line_entry.as_ref().unwrap().line != 20));
}

#[test]
fn test_inline_fallback_needs_line_entry_scope_and_check_inlines()
{
    let (_module, units, _calls) = mock_module(vec![(unit_builder(1, "/src/a.c"), inline_fixture())], AddressLookup::Default);
    let unit = &units[0];

    // No LINE_ENTRY in scope: the nearby row's address is resolved instead
    let spec = query("/src/a.c", 15).column(5).check_inlines(true).build();
    let scope = SymbolContextScope::COMP_UNIT | SymbolContextScope::FUNCTION;
    let contexts = unit.resolve_symbol_context(&spec, scope, None);
    assert_eq!(contexts.len(), 1);
    let context = contexts.get(0).unwrap();
    assert!(context.is_comp_unit(unit));
    assert_eq!(context.function.as_ref().unwrap().name().raw(), "main");
    assert!(context.line_entry.is_none());

    // No check_inlines: the nearby row is returned
    let spec = query("/src/a.c", 15).column(5).build();
    let contexts = unit.resolve_symbol_context(&spec, SymbolContextScope::EVERYTHING, None);
    assert_eq!(addresses(&contexts), vec![0x1010]);
}

#[test]
fn test_inline_call_site_column_must_match()
{
    let (_module, units, _calls) = mock_module(vec![(unit_builder(1, "/src/a.c"), inline_fixture())], AddressLookup::Default);
    let unit = &units[0];

    let spec = query("/src/a.c", 15).column(9).check_inlines(true).build();
    let contexts = unit.resolve_symbol_context(&spec, SymbolContextScope::EVERYTHING, None);
    assert_eq!(addresses(&contexts), vec![0x1010]);
    assert_eq!(contexts.get(0).unwrap().line_entry.as_ref().unwrap().line, 20);
}

#[test]
fn test_forward_scan_is_anchored_on_first_found_line()
{
    let fixture = UnitFixture {
        support_files: vec![FileSpec::new("/src/a.c")],
        rows: Some(vec![
            LineRow::new(0x1000, 0, 10, 0),
            LineRow::new(0x1010, 0, 20, 0),
            LineRow::new(0x1018, 0, 25, 0),
            LineRow::new(0x1020, 0, 20, 0),
            LineRow::new(0x1028, 0, 30, 0),
            LineRow::terminal(0x1030),
        ]),
        ..UnitFixture::default()
    };
    let (_module, units, _calls) = mock_module(vec![(unit_builder(1, "/src/a.c"), fixture)], AddressLookup::Default);
    let unit = &units[0];

    let spec = query("a.c", 12).build();
    let contexts = unit.resolve_symbol_context(&spec, SymbolContextScope::LINE_ENTRY, None);
    assert_eq!(addresses(&contexts), vec![0x1010, 0x1020]);
    assert!(contexts.iter().all(|context| context.line_entry.as_ref().unwrap().line == 20));
}

#[test]
fn test_multiple_compatible_support_files()
{
    let fixture = UnitFixture {
        support_files: vec![FileSpec::new("/src/a.c"), FileSpec::new("/gen/a.c"), FileSpec::new("/src/b.c")],
        rows: Some(vec![
            LineRow::new(0x1000, 0, 10, 0),
            LineRow::new(0x1008, 2, 10, 0),
            LineRow::new(0x1010, 1, 10, 0),
            LineRow::terminal(0x1020),
        ]),
        ..UnitFixture::default()
    };
    let (_module, units, _calls) = mock_module(vec![(unit_builder(1, "/src/a.c"), fixture)], AddressLookup::Default);

    let spec = query("a.c", 10).exact(true).build();
    let contexts = units[0].resolve_symbol_context(&spec, SymbolContextScope::LINE_ENTRY, None);
    assert_eq!(addresses(&contexts), vec![0x1000, 0x1010]);
}

#[test]
fn test_no_compatible_support_file_skips_loading()
{
    let fixture = UnitFixture {
        support_files: vec![FileSpec::new("/src/b.c")],
        ..two_line_fixture()
    };
    let (_module, units, calls) = mock_module(vec![(unit_builder(1, "/src/a.c"), fixture)], AddressLookup::Default);

    let spec = query("/src/a.c", 10).build();
    assert!(units[0].resolve_symbol_context(&spec, SymbolContextScope::EVERYTHING, None).is_empty());
    assert_eq!(calls.count(Call::LoadDebugInfo), 0);
    assert_eq!(calls.count(Call::LineTable), 0);
}

#[test]
fn test_missing_line_table_returns_unit_context()
{
    let fixture = UnitFixture {
        support_files: vec![FileSpec::new("/src/a.c")],
        ..UnitFixture::default()
    };
    let (_module, units, calls) = mock_module(vec![(unit_builder(1, "/src/a.c"), fixture)], AddressLookup::Default);
    let unit = &units[0];

    let spec = query("/src/a.c", 10).build();
    let contexts = unit.resolve_symbol_context(&spec, SymbolContextScope::EVERYTHING, None);
    assert_eq!(contexts.len(), 1);
    assert!(contexts.get(0).unwrap().line_entry.is_none());

    let spec = query("/src/a.c", 10).check_inlines(true).build();
    assert!(unit.resolve_symbol_context(&spec, SymbolContextScope::EVERYTHING, None).is_empty());
    assert_eq!(calls.count(Call::LineTable), 1);
}

#[test]
fn test_address_in_other_unit_keeps_bare_context()
{
    let (module, units, _calls) = mock_module(
        vec![
            (unit_builder(1, "/src/a.c"), two_line_fixture()),
            (unit_builder(2, "/src/b.c"), UnitFixture::default()),
        ],
        AddressLookup::Unit(CompileUnitId::from_raw(2)),
    );
    let unit = &units[0];

    let spec = query("/src/a.c", 10).exact(true).build();
    let contexts = unit.resolve_symbol_context(&spec, SymbolContextScope::EVERYTHING, None);

    let expected = SymbolContext {
        module: Some(Arc::clone(&module)),
        comp_unit: Some(Arc::clone(unit)),
        line_entry: unit.line_table().unwrap().entry_at(0),
        ..SymbolContext::default()
    };
    assert_eq!(contexts.len(), 1);
    assert_eq!(contexts.get(0).unwrap(), &expected);
    assert!(module.diagnostics().is_empty());
}

#[test]
fn test_address_in_no_unit_reports_once_per_entry()
{
    let (module, units, _calls) = mock_module(vec![(unit_builder(1, "/src/a.c"), two_line_fixture())], AddressLookup::NoUnit);
    let unit = &units[0];

    let spec = query("/src/a.c", 10).exact(true).build();
    let contexts = unit.resolve_symbol_context(&spec, SymbolContextScope::EVERYTHING, None);
    assert_eq!(addresses(&contexts), vec![0x1000]);
    assert!(contexts.get(0).unwrap().is_comp_unit(unit));
    assert!(contexts.get(0).unwrap().function.is_none());

    let diagnostics = module.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert!(
        diagnostics[0]
            .message
            .starts_with("unable to resolve a line table file address 0x0000000000001000 back to a compile unit")
    );
}

#[test]
fn test_line_entry_scope_skips_address_lookup()
{
    let (module, units, calls) = mock_module(vec![(unit_builder(1, "/src/a.c"), two_line_fixture())], AddressLookup::NoUnit);

    let spec = query("/src/a.c", 20).exact(true).build();
    let contexts = units[0].resolve_symbol_context(&spec, SymbolContextScope::LINE_ENTRY, None);
    assert_eq!(addresses(&contexts), vec![0x1010]);
    assert_eq!(calls.count(Call::ResolveAddress), 0);
    assert!(module.diagnostics().is_empty());
}

#[test]
fn test_realpath_prefixes_match_symlinked_support_file()
{
    let fixture = UnitFixture {
        support_files: vec![FileSpec::new("/link/src/a.c")],
        rows: Some(vec![LineRow::new(0x1000, 0, 10, 0), LineRow::terminal(0x1010)]),
        ..UnitFixture::default()
    };
    let (_module, units, _calls) = mock_module(vec![(unit_builder(1, "/link/src/a.c"), fixture)], AddressLookup::Default);
    let prefixes = RealpathPrefixes::with_resolver(["/link"], |path: &Path| {
        path.strip_prefix("/link").ok().map(|rest| PathBuf::from("/real").join(rest))
    });

    // The primary file doesn't match the real path, so only inline-aware
    // queries get as far as the support files.
    let spec = query("/real/src/a.c", 10).exact(true).check_inlines(true).build();
    assert!(units[0].resolve_symbol_context(&spec, SymbolContextScope::LINE_ENTRY, None).is_empty());

    let contexts = units[0].resolve_symbol_context(&spec, SymbolContextScope::LINE_ENTRY, Some(&prefixes));
    assert_eq!(addresses(&contexts), vec![0x1000]);
    assert_eq!(prefixes.resolved_count(), 1);
}

#[test]
fn test_find_line_entry()
{
    let (_module, units, _calls) = mock_module(vec![(unit_builder(1, "/src/a.c"), two_line_fixture())], AddressLookup::Default);
    let unit = &units[0];

    let (idx, entry) = unit.find_line_entry(0, 20, None, true).unwrap();
    assert_eq!(idx, 1);
    assert_eq!(entry.range.base.value(), 0x1010);

    assert!(unit.find_line_entry(0, 15, None, true).is_none());
    assert_eq!(unit.find_line_entry(0, 15, None, false).map(|(idx, _)| idx), Some(1));
    assert!(unit.find_line_entry(2, 20, None, true).is_none());
    assert!(unit.find_line_entry(0, 10, Some(&FileSpec::new("/src/other.c")), false).is_none());
}

#[test]
fn test_module_resolves_across_units()
{
    let other = UnitFixture {
        support_files: vec![FileSpec::new("/src/b.c")],
        rows: Some(vec![LineRow::new(0x2000, 0, 5, 0), LineRow::terminal(0x2010)]),
        ..UnitFixture::default()
    };
    let (module, units, _calls) = mock_module(
        vec![(unit_builder(1, "/src/a.c"), two_line_fixture()), (unit_builder(2, "/src/b.c"), other)],
        AddressLookup::Default,
    );

    let spec = query("b.c", 5).exact(true).build();
    let contexts = module.resolve_source_location(&spec, SymbolContextScope::EVERYTHING, None);
    assert_eq!(contexts.len(), 1);
    assert!(contexts.get(0).unwrap().is_comp_unit(&units[1]));
    assert_eq!(addresses(&contexts), vec![0x2000]);
}
