//! # Inspection Bridge
//!
//! The interface between the engine and the host debugger.
//!
//! Everything the engine learns about the target process goes through the
//! [`InspectionBridge`] trait: evaluating an expression in the stopped
//! process, reading a C-string out of its memory, listing the symbols of the
//! selected frame's module and querying a debugger setting. No call ever
//! writes to the target.
//!
//! ## Why use a trait?
//!
//! The real host is an embedded debugger (LLDB's script bridge, a DAP
//! adapter, ...). Keeping it behind a trait lets the engine run against a
//! captured [`SnapshotBridge`] in tests and in the `objlens` CLI.
//!
//! ## Cost model
//!
//! Every call is a round trip into the target and should be treated as
//! expensive. Callers cache results in the
//! [`ResolutionCache`](crate::cache::ResolutionCache).

mod snapshot;

pub use snapshot::{Snapshot, SnapshotBridge};

use crate::error::InspectResult;
use crate::types::{Address, EvalValue, Symbol};

/// Host debugger operations the engine depends on
///
/// Implementations must only be used while the target is stopped; all calls
/// block until the host answers.
pub trait InspectionBridge
{
    /// Evaluate `expr` in the context of the selected frame
    ///
    /// ## Errors
    ///
    /// - `Evaluation`: the process is not stopped, the expression is
    ///   malformed, or the host cancelled the evaluation
    fn evaluate(&self, expr: &str) -> InspectResult<EvalValue>;

    /// Read a NUL-terminated string of at most `max_len` bytes at `address`
    ///
    /// ## Errors
    ///
    /// - `MemoryRead`: the address is unmapped or the process is running
    fn read_c_string(&self, address: Address, max_len: usize) -> InspectResult<String>;

    /// Symbols of the module containing the selected frame
    ///
    /// ## Errors
    ///
    /// - `Evaluation`: there is no selected frame
    fn module_symbols(&self) -> InspectResult<Vec<Symbol>>;

    /// Integer value of a host debugger setting
    ///
    /// ## Errors
    ///
    /// - `Evaluation`: the setting does not exist or is not an integer
    fn int_setting(&self, name: &str) -> InspectResult<i64>;
}

impl<B: InspectionBridge + ?Sized> InspectionBridge for &B
{
    fn evaluate(&self, expr: &str) -> InspectResult<EvalValue>
    {
        (**self).evaluate(expr)
    }

    fn read_c_string(&self, address: Address, max_len: usize) -> InspectResult<String>
    {
        (**self).read_c_string(address, max_len)
    }

    fn module_symbols(&self) -> InspectResult<Vec<Symbol>>
    {
        (**self).module_symbols()
    }

    fn int_setting(&self, name: &str) -> InspectResult<i64>
    {
        (**self).int_setting(name)
    }
}
