//! # Diagnostic Commands
//!
//! Text commands a debugger front end can register next to the formatters.
//! Each takes the raw argument string typed by the user and writes plain text
//! lines to `out`.
//!
//! | command | argument | output |
//! |---------|----------|--------|
//! | [`type_name`] | object expression | runtime type name |
//! | [`type_by_address`] | address | symbols loaded exactly at that address |
//! | [`symbol_by_name`] | regex | matching symbols and their load addresses |
//! | [`globals`] | none | current value of every top-level property |

use std::collections::HashSet;
use std::io::Write;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::bridge::InspectionBridge;
use crate::error::{InspectError, InspectResult};
use crate::expr;
use crate::inspector::Inspector;
use crate::types::{Address, EvalValue, ObjectRef, Symbol};

/// Backing-field symbol of a top-level property: `kvar:<name>#internal`
static GLOBAL_VARIABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^kvar:(.*)#internal").expect("valid regex"));

/// Getter symbol of a top-level property: `kfun:<get-<name>>()<Type>`
static GLOBAL_GETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^kfun:<get-(.*)>\(\)(.*)$").expect("valid regex"));

/// How a primitive getter result is read back
#[derive(Debug, Clone, Copy)]
enum Extract
{
    Signed,
    Unsigned,
    Text,
}

/// Runtime primitive types, the C type their getters return, and extraction.
const PRIMITIVE_TYPES: &[(&str, &str, Extract)] = &[
    ("kotlin.Byte", "int8_t", Extract::Signed),
    ("kotlin.Short", "short", Extract::Signed),
    ("kotlin.Int", "int", Extract::Signed),
    ("kotlin.Long", "long", Extract::Signed),
    ("kotlin.UByte", "int8_t", Extract::Unsigned),
    ("kotlin.UShort", "short", Extract::Unsigned),
    ("kotlin.UInt", "int", Extract::Unsigned),
    ("kotlin.ULong", "long", Extract::Unsigned),
    ("kotlin.Char", "short", Extract::Signed),
    ("kotlin.Boolean", "bool", Extract::Signed),
    ("kotlin.Float", "float", Extract::Text),
    ("kotlin.Double", "double", Extract::Text),
];

fn first_token(args: &str, what: &str) -> InspectResult<String>
{
    args.split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or_else(|| InspectError::InvalidArgument(format!("missing {what}")))
}

/// Print the runtime type name of the object designated by `args`.
///
/// ## Errors
///
/// `InvalidArgument` for an empty argument, bridge failures otherwise.
pub fn type_name<B, W>(inspector: &Inspector<B>, args: &str, out: &mut W) -> InspectResult<()>
where
    B: InspectionBridge,
    W: Write,
{
    let object = args.trim();
    if object.is_empty() {
        return Err(InspectError::InvalidArgument("missing object expression".to_string()));
    }

    let expr = expr::type_name(&inspector.config().helpers, object);
    let result = inspector.bridge().evaluate(&expr)?;
    if !result.is_valid || result.as_address().is_null() {
        return Err(InspectError::evaluation(expr, "no type name returned"));
    }
    let name = inspector
        .bridge()
        .read_c_string(result.as_address(), inspector.config().string_read_limit)?;
    writeln!(out, "{name}")?;
    Ok(())
}

/// List the symbols whose load address is exactly the given address.
///
/// ## Errors
///
/// `InvalidArgument` if the first token is not an address.
pub fn type_by_address<B, W>(inspector: &Inspector<B>, args: &str, out: &mut W) -> InspectResult<()>
where
    B: InspectionBridge,
    W: Write,
{
    let token = first_token(args, "address")?;
    let address =
        Address::parse(&token).ok_or_else(|| InspectError::InvalidArgument(format!("not an address: {token}")))?;

    for symbol in inspector.bridge().module_symbols()? {
        if symbol.load_address == address {
            writeln!(out, "{}: {:#x}", symbol.name, symbol.load_address)?;
        }
    }
    Ok(())
}

/// List symbols whose name matches the pattern (anchored at the start),
/// once per name.
///
/// ## Errors
///
/// `InvalidArgument` if the pattern is missing or not a valid regex.
pub fn symbol_by_name<B, W>(inspector: &Inspector<B>, args: &str, out: &mut W) -> InspectResult<()>
where
    B: InspectionBridge,
    W: Write,
{
    let pattern = first_token(args, "symbol pattern")?;
    let mask = Regex::new(&pattern).map_err(|err| InspectError::InvalidArgument(format!("bad pattern: {err}")))?;

    let mut visited = HashSet::new();
    for symbol in inspector.bridge().module_symbols()? {
        let matches_at_start = mask.find(&symbol.name).is_some_and(|m| m.start() == 0);
        if !matches_at_start || !visited.insert(symbol.name.clone()) {
            continue;
        }
        writeln!(out, "{}: {:#x}", symbol.name, symbol.load_address)?;
    }
    Ok(())
}

/// Print every top-level property by calling its generated getter.
///
/// Primitive getters are read back as numbers; anything else is an object
/// and rendered with the short summary. A getter that cannot be called only
/// marks its own line; the listing goes on.
///
/// ## Errors
///
/// Bridge failures while listing symbols, or a failed write to `out`.
pub fn globals<B, W>(inspector: &Inspector<B>, _args: &str, out: &mut W) -> InspectResult<()>
where
    B: InspectionBridge,
    W: Write,
{
    let symbols = inspector.bridge().module_symbols()?;
    let mut visited = HashSet::new();

    for symbol in &symbols {
        let Some(name) = GLOBAL_VARIABLE.captures(&symbol.name).and_then(|c| c.get(1)) else {
            continue;
        };
        let name = name.as_str();
        if !visited.insert(name.to_string()) {
            continue;
        }

        let Some((getter, type_name)) = find_getter(&symbols, name) else {
            writeln!(out, "storage not found for name:{name}")?;
            continue;
        };

        match global_value(inspector, getter.load_address, &type_name) {
            Ok(value) => writeln!(out, "{type_name} {name}: {value}")?,
            Err(err) => {
                warn!(name, %type_name, "global getter failed: {err}");
                writeln!(out, "{type_name} {name}: <error: {err}>")?;
            }
        }
    }
    Ok(())
}

/// The getter symbol of property `name` and the type it returns.
fn find_getter<'s>(symbols: &'s [Symbol], name: &str) -> Option<(&'s Symbol, String)>
{
    let prefix = format!("kfun:<get-{name}>()");
    symbols.iter().find_map(|symbol| {
        if !symbol.name.starts_with(&prefix) {
            return None;
        }
        let captures = GLOBAL_GETTER.captures(&symbol.name)?;
        Some((symbol, captures.get(2)?.as_str().to_string()))
    })
}

fn global_value<B: InspectionBridge>(inspector: &Inspector<B>, getter: Address, type_name: &str) -> InspectResult<String>
{
    let primitive = PRIMITIVE_TYPES.iter().find(|(runtime, _, _)| *runtime == type_name);
    let object_type = inspector.config().object_type_name.clone();
    let c_type = primitive.map_or(object_type.as_str(), |(_, c_type, _)| *c_type);

    let result: EvalValue = inspector.bridge().evaluate(&expr::call_getter(c_type, getter))?;
    debug!(type_name, %getter, "called global getter");

    let value = match primitive {
        Some((_, _, Extract::Signed)) => result.signed.to_string(),
        Some((_, _, Extract::Unsigned)) => result.unsigned.to_string(),
        Some((_, _, Extract::Text)) => result.display_value(),
        None => inspector.summary(&ObjectRef {
            name: String::new(),
            type_name: object_type.clone(),
            address: result.as_address(),
            value: result.value.clone(),
        }),
    };
    Ok(value)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::bridge::SnapshotBridge;
    use crate::config::InspectorConfig;

    fn run<F>(inspector: &Inspector<SnapshotBridge>, command: F, args: &str) -> InspectResult<Vec<String>>
    where
        F: Fn(&Inspector<SnapshotBridge>, &str, &mut Vec<u8>) -> InspectResult<()>,
    {
        let mut out = Vec::new();
        command(inspector, args, &mut out)?;
        Ok(String::from_utf8_lossy(&out).lines().map(str::to_string).collect())
    }

    fn symbols() -> SnapshotBridge
    {
        SnapshotBridge::default()
            .with_symbol("kclass:kotlin.String", 0x1000u64)
            .with_symbol("kclass:kotlin.String", 0x1000u64)
            .with_symbol("kclass:kotlin.Int", 0x1040u64)
            .with_symbol("kfun:main()", 0x2000u64)
            .with_symbol("alias:kotlin.String", 0x1000u64)
    }

    #[test]
    fn test_symbol_by_name_is_anchored_and_deduplicated()
    {
        let inspector = Inspector::new(symbols(), InspectorConfig::default());
        let lines = run(&inspector, symbol_by_name, "kclass:").unwrap();
        assert_eq!(lines, vec!["kclass:kotlin.String: 0x1000", "kclass:kotlin.Int: 0x1040"]);
    }

    #[test]
    fn test_symbol_by_name_rejects_bad_pattern()
    {
        let inspector = Inspector::new(symbols(), InspectorConfig::default());
        assert!(matches!(run(&inspector, symbol_by_name, "(["), Err(InspectError::InvalidArgument(_))));
        assert!(matches!(run(&inspector, symbol_by_name, "  "), Err(InspectError::InvalidArgument(_))));
    }

    #[test]
    fn test_type_by_address_lists_all_symbols_at_address()
    {
        let inspector = Inspector::new(symbols(), InspectorConfig::default());
        let lines = run(&inspector, type_by_address, "0x1000").unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line.ends_with(": 0x1000")));
        assert!(matches!(run(&inspector, type_by_address, "here"), Err(InspectError::InvalidArgument(_))));
    }

    #[test]
    fn test_type_name_reads_helper_string()
    {
        let bridge = SnapshotBridge::default()
            .with_expression("(char *)Konan_DebugGetTypeName(0x100)", EvalValue::address(0x5000u64))
            .with_string(0x5000u64, "kotlin.collections.ArrayList");
        let inspector = Inspector::new(bridge, InspectorConfig::default());
        let lines = run(&inspector, type_name, "0x100").unwrap();
        assert_eq!(lines, vec!["kotlin.collections.ArrayList"]);
    }

    #[test]
    fn test_globals_prints_primitives_objects_and_missing_getters()
    {
        let bridge = SnapshotBridge::default()
            .with_setting("target.max-children-count", 16)
            .with_symbol("kvar:counter#internal", 0x100u64)
            .with_symbol("kfun:<get-counter>()kotlin.Int", 0x400u64)
            .with_symbol("kvar:flags#internal", 0x108u64)
            .with_symbol("kfun:<get-flags>()kotlin.UByte", 0x440u64)
            .with_symbol("kvar:nothing#internal", 0x110u64)
            .with_symbol("kvar:empty#internal", 0x118u64)
            .with_symbol("kfun:<get-empty>()kotlin.Any", 0x480u64)
            .with_expression("((int (*)())0x400)()", EvalValue::integer(-7))
            .with_expression("((int8_t (*)())0x440)()", EvalValue::integer(200))
            .with_expression("((ObjHeader * (*)())0x480)()", EvalValue::address(0u64));
        let inspector = Inspector::new(bridge, InspectorConfig::default());

        let lines = run(&inspector, globals, "").unwrap();
        assert_eq!(
            lines,
            vec![
                "kotlin.Int counter: -7",
                "kotlin.UByte flags: 200",
                "storage not found for name:nothing",
                "kotlin.Any empty: null",
            ]
        );
    }

    #[test]
    fn test_globals_keeps_going_after_failed_getter()
    {
        let bridge = SnapshotBridge::default()
            .with_symbol("kvar:broken#internal", 0x100u64)
            .with_symbol("kfun:<get-broken>()kotlin.Int", 0x400u64)
            .with_symbol("kvar:ok#internal", 0x108u64)
            .with_symbol("kfun:<get-ok>()kotlin.Int", 0x440u64)
            .with_expression("((int (*)())0x440)()", EvalValue::integer(5));
        let inspector = Inspector::new(bridge, InspectorConfig::default());

        let lines = run(&inspector, globals, "").unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("kotlin.Int broken: <error: Evaluation failed for `((int (*)())0x400)()`"));
        assert_eq!(lines[1], "kotlin.Int ok: 5");
    }
}
