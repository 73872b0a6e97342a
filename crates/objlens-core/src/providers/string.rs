//! Provider for boxed strings.

use tracing::trace;

use super::SyntheticProvider;
use crate::bridge::InspectionBridge;
use crate::error::InspectResult;
use crate::inspector::Inspector;
use crate::types::{Address, ObjectRef, ValueHandle};

/// A runtime string, read once at construction
#[derive(Debug, Clone)]
pub struct StringProvider
{
    representation: String,
}

impl StringProvider
{
    /// Read `length` bytes of the string buffer at `buffer`
    ///
    /// An empty buffer falls back to the handle's native rendering.
    ///
    /// ## Errors
    ///
    /// `MemoryRead` if the buffer cannot be read.
    pub fn new<B: InspectionBridge>(
        inspector: &Inspector<B>,
        handle: &ObjectRef,
        buffer: Address,
        length: usize,
    ) -> InspectResult<Self>
    {
        if length == 0 {
            return Ok(Self {
                representation: handle.native_value(),
            });
        }

        let representation = inspector.bridge().read_c_string(buffer, length)?;
        trace!(address = %handle.address, %buffer, length, "read string buffer");
        Ok(Self { representation })
    }
}

impl SyntheticProvider for StringProvider
{
    fn num_children(&self) -> usize
    {
        0
    }

    fn child_index(&self, _name: &str) -> InspectResult<Option<usize>>
    {
        Ok(None)
    }

    fn child_at_index(&self, _index: usize) -> InspectResult<Option<ValueHandle>>
    {
        Ok(None)
    }

    fn to_short_string(&self) -> InspectResult<String>
    {
        Ok(self.representation.clone())
    }

    fn to_full_string(&self) -> InspectResult<String>
    {
        Ok(self.representation.clone())
    }
}
