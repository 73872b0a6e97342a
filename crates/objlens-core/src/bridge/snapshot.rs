//! Replay of a captured stop point.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::InspectionBridge;
use crate::error::{InspectError, InspectResult};
use crate::types::{Address, EvalValue, Symbol};

/// Everything the engine may ask the host at one stop point
///
/// Serialized as JSON:
///
/// ```json
/// {
///   "expressions": { "*(int32_t *)0x2000": { "signed": 42, "unsigned": 42, "value": "42" } },
///   "strings": { "4096": "hello" },
///   "symbols": [ { "name": "kclass:kotlin.String", "load_address": 65536 } ],
///   "settings": { "target.max-children-count": 256 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot
{
    /// Results keyed by exact expression text
    pub expressions: HashMap<String, EvalValue>,
    /// C-strings keyed by their (decimal) start address
    pub strings: BTreeMap<Address, String>,
    pub symbols: Vec<Symbol>,
    pub settings: HashMap<String, i64>,
}

/// An [`InspectionBridge`] answering from a [`Snapshot`]
///
/// Counts every round trip so callers can see what the caches saved.
#[derive(Debug, Default)]
pub struct SnapshotBridge
{
    snapshot: Snapshot,
    evaluations: RefCell<Vec<String>>,
    reads: Cell<usize>,
}

impl SnapshotBridge
{
    pub fn new(snapshot: Snapshot) -> Self
    {
        Self {
            snapshot,
            ..Self::default()
        }
    }

    /// Decode a JSON snapshot.
    ///
    /// ## Errors
    ///
    /// `Snapshot` if the text is not a valid snapshot document.
    pub fn from_json(json: &str) -> InspectResult<Self>
    {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Load a JSON snapshot file.
    ///
    /// ## Errors
    ///
    /// `Io` if the file cannot be read, `Snapshot` if it cannot be decoded.
    pub fn from_path(path: impl AsRef<Path>) -> InspectResult<Self>
    {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    #[must_use]
    pub fn with_expression(mut self, expr: impl Into<String>, result: EvalValue) -> Self
    {
        self.snapshot.expressions.insert(expr.into(), result);
        self
    }

    #[must_use]
    pub fn with_string(mut self, address: impl Into<Address>, text: impl Into<String>) -> Self
    {
        self.snapshot.strings.insert(address.into(), text.into());
        self
    }

    #[must_use]
    pub fn with_symbol(mut self, name: impl Into<String>, load_address: impl Into<Address>) -> Self
    {
        self.snapshot.symbols.push(Symbol::new(name, load_address));
        self
    }

    #[must_use]
    pub fn with_setting(mut self, name: impl Into<String>, value: i64) -> Self
    {
        self.snapshot.settings.insert(name.into(), value);
        self
    }

    pub fn snapshot(&self) -> &Snapshot
    {
        &self.snapshot
    }

    /// Total number of expressions evaluated so far.
    pub fn evaluation_count(&self) -> usize
    {
        self.evaluations.borrow().len()
    }

    /// How many times `expr` was evaluated.
    pub fn evaluations_of(&self, expr: &str) -> usize
    {
        self.evaluations.borrow().iter().filter(|e| e.as_str() == expr).count()
    }

    /// Total number of C-string reads so far.
    pub fn read_count(&self) -> usize
    {
        self.reads.get()
    }
}

impl InspectionBridge for SnapshotBridge
{
    fn evaluate(&self, expr: &str) -> InspectResult<EvalValue>
    {
        self.evaluations.borrow_mut().push(expr.to_string());
        trace!(expr, "snapshot evaluate");
        self.snapshot
            .expressions
            .get(expr)
            .cloned()
            .ok_or_else(|| InspectError::evaluation(expr, "expression not captured in snapshot"))
    }

    fn read_c_string(&self, address: Address, max_len: usize) -> InspectResult<String>
    {
        self.reads.set(self.reads.get() + 1);
        let text = self
            .snapshot
            .strings
            .get(&address)
            .ok_or_else(|| InspectError::memory_read(address.value(), "address not mapped in snapshot"))?;

        let bytes = text.as_bytes();
        let end = bytes
            .iter()
            .take(max_len)
            .position(|&b| b == 0)
            .unwrap_or_else(|| bytes.len().min(max_len));
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    fn module_symbols(&self) -> InspectResult<Vec<Symbol>>
    {
        Ok(self.snapshot.symbols.clone())
    }

    fn int_setting(&self, name: &str) -> InspectResult<i64>
    {
        self.snapshot
            .settings
            .get(name)
            .copied()
            .ok_or_else(|| InspectError::evaluation(format!("settings show {name}"), "setting not captured in snapshot"))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_read_c_string_truncates_and_stops_at_nul()
    {
        let bridge = SnapshotBridge::default().with_string(0x10u64, "hello\0world");
        assert_eq!(bridge.read_c_string(Address::new(0x10), 3).unwrap(), "hel");
        assert_eq!(bridge.read_c_string(Address::new(0x10), 0x1000).unwrap(), "hello");
        assert_eq!(bridge.read_count(), 2);
    }

    #[test]
    fn test_unmapped_read_fails()
    {
        let bridge = SnapshotBridge::default();
        let err = bridge.read_c_string(Address::new(0x20), 8).unwrap_err();
        assert!(matches!(err, InspectError::MemoryRead { address: 0x20, .. }));
    }

    #[test]
    fn test_unknown_expression_fails_and_is_counted()
    {
        let bridge = SnapshotBridge::default().with_expression("1 + 1", EvalValue::integer(2));
        assert_eq!(bridge.evaluate("1 + 1").unwrap().signed, 2);
        assert!(matches!(bridge.evaluate("nope"), Err(InspectError::Evaluation { .. })));
        assert_eq!(bridge.evaluation_count(), 2);
        assert_eq!(bridge.evaluations_of("1 + 1"), 1);
    }

    #[test]
    fn test_snapshot_decodes_from_json()
    {
        let json = r#"{
            "expressions": { "x": { "unsigned": 7, "signed": 7, "value": "7" } },
            "strings": { "4096": "hello" },
            "symbols": [ { "name": "kclass:kotlin.String", "load_address": 65536 } ],
            "settings": { "target.max-children-count": 3 }
        }"#;
        let bridge = SnapshotBridge::from_json(json).unwrap();
        assert_eq!(bridge.evaluate("x").unwrap().signed, 7);
        assert_eq!(bridge.read_c_string(Address::new(4096), 16).unwrap(), "hello");
        assert_eq!(bridge.module_symbols().unwrap()[0].load_address, Address::new(65536));
        assert_eq!(bridge.int_setting("target.max-children-count").unwrap(), 3);
    }
}
