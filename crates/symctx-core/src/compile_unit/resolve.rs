//! Source-location resolution for a single compile unit.
//!
//! Given "file, line, optional column", find the line-table entries of this
//! unit that implement it. A near miss in the line table may really be an
//! inlined call site, so when asked to, the function around the near miss
//! is searched for inline blocks whose call site is the queried line.

use std::sync::Arc;

use tracing::trace;

use super::CompileUnit;
use crate::files::{FileIndexes, FileSpec, RealpathPrefixes};
use crate::line_table::{LineEntry, LineTable};
use crate::module::Module;
use crate::source_location::SourceLocationSpec;
use crate::symbols::{SymbolContext, SymbolContextList, SymbolContextScope};

impl CompileUnit
{
    /// Every location in this unit matching `query`.
    ///
    /// Each result carries at least the module, this unit and a line entry;
    /// the rest is filled by address lookup as far as `resolve_scope` asks.
    /// When the file matches but there is nothing line-specific to report
    /// (no line in the query, or no line table) a single unit-level context
    /// is returned instead.
    ///
    /// An exact inline call-site match beats a nearby line-table entry: if
    /// one is found, only call sites are returned.
    pub fn resolve_symbol_context(
        self: &Arc<Self>,
        query: &SourceLocationSpec,
        resolve_scope: SymbolContextScope,
        realpath_prefixes: Option<&RealpathPrefixes>,
    ) -> SymbolContextList
    {
        let mut contexts = SymbolContextList::new();
        let file = query.file();
        let check_inlines = query.check_inlines();

        let file_matches_unit = FileSpec::matches(file, self.primary_file());
        if !file_matches_unit && !check_inlines {
            return contexts;
        }

        let unit_context = self.calculate_symbol_context();

        let Some(line) = query.line() else {
            if file_matches_unit && !check_inlines {
                contexts.append(unit_context);
            }
            return contexts;
        };

        let file_indexes = self.support_files().find_file_indexes(file, realpath_prefixes);
        if file_indexes.is_empty() {
            trace!("compile unit {}: no support file compatible with {file}", self.id());
            return contexts;
        }

        let module = self.module();
        if let Some(provider) = module.as_deref().and_then(Module::provider) {
            provider.set_load_debug_info_enabled();
        }

        let Some(line_table) = self.line_table() else {
            if file_matches_unit && !check_inlines {
                contexts.append(unit_context);
            }
            return contexts;
        };

        let Some((mut line_idx, mut line_entry)) = search(&line_table, 0, &file_indexes, query) else {
            return contexts;
        };
        trace!(
            "compile unit {}: {query} first matched row {line_idx} ({}:{})",
            self.id(),
            line_entry.line,
            line_entry.column
        );

        let near_miss =
            line_entry.line != line || query.column().is_some_and(|column| line_entry.column != column);
        if line_entry.is_valid()
            && near_miss
            && resolve_scope.contains(SymbolContextScope::LINE_ENTRY)
            && check_inlines
        {
            if let Some(module) = &module {
                self.append_inline_call_sites(module, query, &line_entry, resolve_scope, &mut contexts);
            }
            if !contexts.is_empty() {
                return contexts;
            }
        }

        // Without `exact`, the first row found may be on a later line than
        // asked for; every further row is collected for that line.
        let found_entry = SourceLocationSpec::new(
            line_entry.file.clone(),
            Some(line_entry.line),
            query.column().map(|_| line_entry.column),
            false,
            true,
        );

        loop {
            let mut candidate = unit_context.clone();
            candidate.line_entry = Some(line_entry.clone());

            if resolve_scope == SymbolContextScope::LINE_ENTRY {
                contexts.append(candidate);
            } else {
                contexts.append(self.resolve_line_entry(module.as_ref(), &line_entry, resolve_scope, candidate));
            }

            match search(&line_table, line_idx + 1, &file_indexes, &found_entry) {
                Some((next_idx, next_entry)) => {
                    line_idx = next_idx;
                    line_entry = next_entry;
                }
                None => break,
            }
        }

        contexts
    }

    /// First line entry at or after `start_idx` on `line` of `file` (the
    /// primary file when `None`).
    pub fn find_line_entry(
        &self,
        start_idx: usize,
        line: u32,
        file: Option<&FileSpec>,
        exact: bool,
    ) -> Option<(usize, LineEntry)>
    {
        let file = file.unwrap_or(self.primary_file());
        let file_indexes = self.support_files().find_file_indexes(file, None);
        let line_table = self.line_table()?;

        let query = SourceLocationSpec::new(file.clone(), Some(line), None, false, exact);
        line_table.find_line_entry_index_by_file_indexes(start_idx, &file_indexes, &query)
    }

    // Resolve the entry's address and keep the result only if it maps back
    // to this unit; otherwise fall back to the bare candidate.
    fn resolve_line_entry(
        self: &Arc<Self>,
        module: Option<&Arc<Module>>,
        line_entry: &LineEntry,
        resolve_scope: SymbolContextScope,
        candidate: SymbolContext,
    ) -> SymbolContext
    {
        let Some(module) = module else {
            return candidate;
        };

        let address = line_entry.range.base;
        let resolved = module.resolve_symbol_context_for_address(address, resolve_scope);
        if resolved.is_comp_unit(self) {
            return resolved;
        }

        match (&resolved.comp_unit, &resolved.module) {
            (None, Some(owner)) => owner.report_error(format!(
                "unable to resolve a line table file address {:#018x} back to a compile unit, please file a bug and \
                 attach the address and file.",
                address.value()
            )),
            (Some(other), _) => trace!(
                "compile unit {}: {address} resolved to compile unit {}, keeping the line entry only",
                self.id(),
                other.id()
            ),
            (None, None) => {}
        }
        candidate
    }

    fn append_inline_call_sites(
        &self,
        module: &Arc<Module>,
        query: &SourceLocationSpec,
        found: &LineEntry,
        resolve_scope: SymbolContextScope,
        contexts: &mut SymbolContextList,
    )
    {
        let owner = module.resolve_symbol_context_for_address(found.range.base, SymbolContextScope::FUNCTION);
        let Some(function) = owner.function else {
            return;
        };
        let Some(line) = query.line() else {
            return;
        };

        // The root block is the function body; it can't be an inline site.
        for block in function.walk_blocks() {
            let Some(inline_info) = block.inline_info() else {
                continue;
            };
            let call_site = &inline_info.call_site;
            let same_column = query.column().map_or(true, |column| call_site.column == Some(column));
            if call_site.line != line || !FileSpec::equal(&call_site.file, query.file(), false) || !same_column {
                continue;
            }

            // The call site belongs to the block that did the inlining.
            let Some(parent) = block.parent().and_then(|id| function.block(id)) else {
                continue;
            };
            let Some(parent_start) = parent.start_address() else {
                continue;
            };
            let Some(parent_range) = parent.range_at(0) else {
                continue;
            };

            let mut context = module.resolve_symbol_context_for_address(parent_start, resolve_scope);
            let mut call_site_entry = context.line_entry.take().unwrap_or_default();
            if call_site_entry.file.is_empty() {
                call_site_entry.file = call_site.file.clone();
            }
            call_site_entry.line = call_site.line;
            call_site_entry.column = call_site.column.unwrap_or(0);
            call_site_entry.range = parent_range;

            if query.exact_match() {
                let exact = FileSpec::matches(query.file(), &call_site_entry.file)
                    && query.line() == Some(call_site_entry.line)
                    && query.column() == Some(call_site_entry.column);
                if !exact {
                    continue;
                }
            }

            if block.range_at(0).is_none() {
                continue;
            }

            trace!(
                "{}: inline call site of {} at {}:{}",
                function.name(),
                inline_info.name,
                call_site.line,
                call_site_entry.column
            );
            context.line_entry = Some(call_site_entry);
            contexts.append(context);
        }
    }
}

fn search(
    line_table: &LineTable,
    start_idx: usize,
    file_indexes: &FileIndexes,
    query: &SourceLocationSpec,
) -> Option<(usize, LineEntry)>
{
    match file_indexes.as_slice() {
        [single] => line_table.find_line_entry_index_by_file_index(start_idx, *single, query),
        many => line_table.find_line_entry_index_by_file_indexes(start_idx, many, query),
    }
}
