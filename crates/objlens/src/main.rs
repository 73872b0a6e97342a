use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use objlens_core::commands;
use objlens_core::prelude::*;
use objlens_utils::{debug, info, init_logging, init_logging_for_session, LogLevel};

/// Render managed-runtime objects from a captured debugger stop point.
#[derive(Parser, Debug)]
#[command(name = "objlens")]
#[command(version)]
#[command(about = "Render managed-runtime objects from a captured debugger stop point", long_about = None)]
struct Cli
{
    /// JSON snapshot of the stop point (expressions, strings, symbols, settings)
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Nesting limit for full renderings (0 = unbounded; default from OBJLENS_MAX_DEPTH or 8)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Log to ~/.objlens/<date>-objlens-session.log instead of stderr, at this level
    #[arg(long, value_name = "LEVEL")]
    session_log: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Render the object at an address
    Render
    {
        /// Object address (hex format: 0x1000 or decimal)
        address: String,
        /// Render children recursively instead of the short summary
        #[arg(long, default_value_t = false)]
        full: bool,
        /// Declared type of the handle (anything but the object header type renders natively)
        #[arg(long = "type", value_name = "TYPE")]
        type_name: Option<String>,
    },
    /// List the synthetic children of the object at an address
    Children
    {
        /// Object address (hex format: 0x1000 or decimal)
        address: String,
    },
    /// Print the runtime type name of an object expression
    TypeName
    {
        expression: String,
    },
    /// List the symbols loaded at an address
    TypeByAddress
    {
        address: String,
    },
    /// List symbols whose name matches a regex, anchored at the start
    SymbolByName
    {
        pattern: String,
    },
    /// Print every top-level property
    Globals,
}

fn main()
{
    let cli = Cli::parse();

    let logging = match cli.session_log {
        Some(level) => init_logging_for_session(Some(level)).map(|path| eprintln!("Logging to {}", path.display())),
        None => init_logging(),
    };
    if let Err(e) = logging {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(1);
    }

    if let Err(e) = run_command(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(cli: Cli) -> InspectResult<()>
{
    let mut config = InspectorConfig::from_env();
    if let Some(depth) = cli.max_depth {
        config.max_depth = (depth > 0).then_some(depth);
    }

    info!("Loading snapshot {}", cli.snapshot.display());
    let bridge = SnapshotBridge::from_path(&cli.snapshot)?;
    let inspector = Inspector::new(bridge, config);
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Render {
            address,
            full,
            type_name,
        } => {
            let type_name = type_name.unwrap_or_else(|| inspector.config().object_type_name.clone());
            let handle = ObjectRef::new("", type_name, parse_address(&address)?);
            let mode = if full { RenderMode::Full } else { RenderMode::Short };
            writeln!(out, "{}", inspector.render(&handle, mode)?)?;
        }
        Commands::Children { address } => {
            let handle = ObjectRef::new("", inspector.config().object_type_name.clone(), parse_address(&address)?);
            print_children(&inspector, &handle, &mut out)?;
        }
        Commands::TypeName { expression } => commands::type_name(&inspector, &expression, &mut out)?,
        Commands::TypeByAddress { address } => commands::type_by_address(&inspector, &address, &mut out)?,
        Commands::SymbolByName { pattern } => commands::symbol_by_name(&inspector, &pattern, &mut out)?,
        Commands::Globals => commands::globals(&inspector, "", &mut out)?,
    }

    debug!(
        evaluations = inspector.bridge().evaluation_count(),
        reads = inspector.bridge().read_count(),
        "done"
    );
    Ok(())
}

fn parse_address(text: &str) -> InspectResult<Address>
{
    Address::parse(text).ok_or_else(|| InspectError::InvalidArgument(format!("not an address: {text}")))
}

fn print_children<W: Write>(inspector: &Inspector<SnapshotBridge>, handle: &ObjectRef, out: &mut W) -> InspectResult<()>
{
    let provider = inspector.provider(handle)?;
    let header_type = &inspector.config().object_type_name;

    for index in 0..provider.num_children() {
        let Some(child) = provider.child_at_index(index)? else {
            writeln!(out, "[{index}] <unavailable>")?;
            continue;
        };
        let value = if child.code.is_reference() {
            inspector.summary(&child.to_object_ref(header_type))
        } else {
            child.result.display_value()
        };
        writeln!(out, "[{index}] {} = {value}", child.name)?;
    }
    Ok(())
}
