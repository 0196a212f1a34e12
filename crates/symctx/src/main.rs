mod error;
mod fixture;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use symctx_core::compile_unit::CompileUnit;
use symctx_core::files::{FileSpec, RealpathPrefixes};
use symctx_core::module::Module;
use symctx_core::source_location::SourceLocationSpec;
use symctx_core::symbols::{SymbolContextList, SymbolContextScope};
use symctx_core::types::CompileUnitId;
use symctx_utils::{LogLevel, LoggingConfig, info, init_logging};

use crate::error::{CliError, Result};
use crate::fixture::Fixture;

/// Resolve source locations against debug info described by a JSON fixture.
#[derive(Parser, Debug)]
#[command(name = "symctx")]
#[command(version)]
#[command(about = "Resolve file:line:column to code locations and symbol contexts", long_about = None)]
struct Cli
{
    /// Log level (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Find the code implementing a source location
    Resolve
    {
        /// Fixture describing the module
        fixture: PathBuf,
        /// Source file (a bare name matches any directory)
        #[arg(long)]
        file: PathBuf,
        /// 1-based line
        #[arg(long)]
        line: Option<u32>,
        /// 1-based column
        #[arg(long)]
        column: Option<u16>,
        /// Only accept the exact line (and column)
        #[arg(long, default_value_t = false)]
        exact: bool,
        /// Also match inlined call sites
        #[arg(long, default_value_t = false)]
        check_inlines: bool,
        /// Parts of each result to fill in
        #[arg(long, value_enum, value_delimiter = ',', default_value = "everything")]
        scope: Vec<ScopeArg>,
        /// Directories under which support files are resolved through symlinks
        #[arg(long)]
        realpath_prefix: Vec<PathBuf>,
        /// Only search this compile unit
        #[arg(long)]
        unit: Option<u64>,
    },
    /// Print what each compile unit has cached
    Dump
    {
        /// Fixture describing the module
        fixture: PathBuf,
        /// Only dump this compile unit
        #[arg(long)]
        unit: Option<u64>,
        /// Parse language, line table and functions before dumping
        #[arg(long, default_value_t = false)]
        parse: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeArg
{
    Module,
    CompUnit,
    Function,
    Block,
    LineEntry,
    Symbol,
    Everything,
}

impl From<ScopeArg> for SymbolContextScope
{
    fn from(arg: ScopeArg) -> Self
    {
        match arg {
            ScopeArg::Module => SymbolContextScope::MODULE,
            ScopeArg::CompUnit => SymbolContextScope::COMP_UNIT,
            ScopeArg::Function => SymbolContextScope::FUNCTION,
            ScopeArg::Block => SymbolContextScope::BLOCK,
            ScopeArg::LineEntry => SymbolContextScope::LINE_ENTRY,
            ScopeArg::Symbol => SymbolContextScope::SYMBOL,
            ScopeArg::Everything => SymbolContextScope::EVERYTHING,
        }
    }
}

fn combine_scope(args: &[ScopeArg]) -> SymbolContextScope
{
    args.iter()
        .fold(SymbolContextScope::NONE, |scope, arg| scope | SymbolContextScope::from(*arg))
}

fn main()
{
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()>
{
    let config = LoggingConfig::from_env().with_level(cli.log_level);
    let _guard = init_logging(&config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let output = runtime.block_on(run_command(cli.command))?;
    print!("{output}");
    Ok(())
}

// Lazy fetches may block on parsing, so all symbol work happens on a
// blocking worker.
async fn run_command(command: Commands) -> Result<String>
{
    tokio::task::spawn_blocking(move || match command {
        Commands::Resolve {
            fixture,
            file,
            line,
            column,
            exact,
            check_inlines,
            scope,
            realpath_prefix,
            unit,
        } => {
            let module = load_module(&fixture)?;
            let query = SourceLocationSpec::new(FileSpec::new(file), line, column, check_inlines, exact);
            let prefixes = (!realpath_prefix.is_empty()).then(|| RealpathPrefixes::new(realpath_prefix));
            info!("resolving {query}");

            let contexts = match unit {
                Some(id) => select_unit(&module, id)?.resolve_symbol_context(&query, combine_scope(&scope), prefixes.as_ref()),
                None => module.resolve_source_location(&query, combine_scope(&scope), prefixes.as_ref()),
            };
            Ok(render_contexts(&module, &contexts))
        }
        Commands::Dump { fixture, unit, parse } => {
            let module = load_module(&fixture)?;
            let units = match unit {
                Some(id) => vec![select_unit(&module, id)?],
                None => module.compile_units(),
            };

            let mut output = String::new();
            for unit in units {
                if parse {
                    let _ = unit.language();
                    let _ = unit.line_table();
                    let _ = unit.find_function(|_| false);
                }
                output.push_str(&unit.dump_to_string(true));
            }
            Ok(output)
        }
    })
    .await?
}

fn load_module(path: &Path) -> Result<Arc<Module>>
{
    let text = std::fs::read_to_string(path)?;
    Fixture::from_json(&text)?.into_module()
}

fn select_unit(module: &Module, id: u64) -> Result<Arc<CompileUnit>>
{
    module
        .compile_unit(CompileUnitId::from_raw(id))
        .ok_or(CliError::UnknownCompileUnit(id))
}

fn render_contexts(module: &Module, contexts: &SymbolContextList) -> String
{
    let mut output = String::new();
    if contexts.is_empty() {
        output.push_str("no matching locations\n");
    }
    for (idx, context) in contexts.iter().enumerate() {
        output.push_str(&format!("[{idx}] {context}\n"));
    }
    for diagnostic in module.diagnostics() {
        output.push_str(&format!("{diagnostic}\n"));
    }
    output
}
