//! Provider for runtime arrays.

use std::cell::RefCell;

use tracing::trace;

use super::{join_children, SyntheticProvider};
use crate::bridge::InspectionBridge;
use crate::error::{InspectError, InspectResult};
use crate::field::ElementMetadata;
use crate::inspector::{Inspector, ELIDED};
use crate::types::{Address, FieldTypeCode, ObjectRef, ValueHandle};

/// An array whose elements are named by their index
///
/// Classification only reports the element count. Element types and
/// addresses are fetched on the first child access and then reused.
#[derive(Debug)]
pub struct ArrayProvider<'a, B>
{
    inspector: &'a Inspector<B>,
    handle: ObjectRef,
    child_count: usize,
    metadata: RefCell<ElementMetadata>,
}

impl<'a, B: InspectionBridge> ArrayProvider<'a, B>
{
    pub fn new(inspector: &'a Inspector<B>, handle: &ObjectRef, child_count: usize) -> Self
    {
        Self::with_metadata(inspector, handle, child_count, ElementMetadata::default())
    }

    /// An array whose element metadata is (partly) known up front.
    pub fn with_metadata(
        inspector: &'a Inspector<B>,
        handle: &ObjectRef,
        child_count: usize,
        metadata: ElementMetadata,
    ) -> Self
    {
        Self {
            inspector,
            handle: handle.clone(),
            child_count,
            metadata: RefCell::new(metadata),
        }
    }

    fn element(&self, index: usize) -> InspectResult<(FieldTypeCode, Address)>
    {
        if index >= self.child_count {
            return Err(InspectError::InvalidArgument(format!(
                "element {index} out of range (0..{})",
                self.child_count
            )));
        }

        self.metadata
            .borrow_mut()
            .ensure(|| self.inspector.fetch_element_metadata(&self.handle, self.child_count))?;
        self.metadata
            .borrow()
            .get(index)
            .ok_or_else(|| InspectError::Protocol(format!("no metadata for element {index}")))
    }

    fn limit(&self) -> InspectResult<usize>
    {
        self.inspector.max_children_count()
    }
}

impl<B: InspectionBridge> SyntheticProvider for ArrayProvider<'_, B>
{
    fn num_children(&self) -> usize
    {
        trace!(address = %self.handle.address, count = self.child_count, "array num_children");
        self.child_count
    }

    /// Element names are decimal indices; anything else is out of range.
    fn child_index(&self, name: &str) -> InspectResult<Option<usize>>
    {
        let index = name.trim().parse::<usize>().ok();
        Ok(index.filter(|&index| index < self.child_count))
    }

    fn child_at_index(&self, index: usize) -> InspectResult<Option<ValueHandle>>
    {
        let (code, address) = self.element(index)?;
        self.inspector.materialize(address, code, &index.to_string())
    }

    fn to_short_string(&self) -> InspectResult<String>
    {
        let elements = join_children(self.child_count, self.limit()?, |_| Ok(Some(ELIDED.to_string())))?;
        Ok(format!("[{elements}]"))
    }

    fn to_full_string(&self) -> InspectResult<String>
    {
        let elements = join_children(self.child_count, self.limit()?, |index| {
            self.child_at_index(index)?
                .map(|child| self.inspector.render_child(&child))
                .transpose()
        })?;
        Ok(format!("[{elements}]"))
    }
}
