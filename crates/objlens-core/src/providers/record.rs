//! Provider for composite objects.

use tracing::trace;

use super::{join_children, SyntheticProvider};
use crate::bridge::InspectionBridge;
use crate::error::{InspectError, InspectResult};
use crate::inspector::Inspector;
use crate::shape::RecordLayout;
use crate::types::{ObjectRef, ValueHandle};

/// An object with named fields, laid out by the classifier
#[derive(Debug)]
pub struct RecordProvider<'a, B>
{
    inspector: &'a Inspector<B>,
    handle: ObjectRef,
    layout: RecordLayout,
}

impl<'a, B: InspectionBridge> RecordProvider<'a, B>
{
    pub fn new(inspector: &'a Inspector<B>, handle: &ObjectRef, layout: RecordLayout) -> Self
    {
        Self {
            inspector,
            handle: handle.clone(),
            layout,
        }
    }
}

impl<B: InspectionBridge> SyntheticProvider for RecordProvider<'_, B>
{
    /// Also feeds the re-entrancy heuristic: a second sighting of the same
    /// `(address, count)` pair drops resolved helper strings.
    fn num_children(&self) -> usize
    {
        let count = self.layout.len();
        trace!(address = %self.handle.address, count, "record num_children");
        self.inspector.note_sighting(self.handle.address, count);
        count
    }

    fn has_children(&self) -> bool
    {
        !self.layout.is_empty()
    }

    fn child_index(&self, name: &str) -> InspectResult<Option<usize>>
    {
        self.layout
            .names
            .iter()
            .position(|field| field == name)
            .map(Some)
            .ok_or_else(|| InspectError::FieldNotFound(name.to_string()))
    }

    fn child_at_index(&self, index: usize) -> InspectResult<Option<ValueHandle>>
    {
        let name = self.layout.field_name(index)?;
        let code = self.layout.field_type(index)?;
        let address = self.layout.field_address(index)?;
        self.inspector.materialize(address, code, name)
    }

    fn to_short_string(&self) -> InspectResult<String>
    {
        let count = self.num_children();
        join_children(count, self.inspector.max_children_count()?, |index| {
            Ok(Some(format!("{}: ...", self.layout.field_name(index)?)))
        })
    }

    fn to_full_string(&self) -> InspectResult<String>
    {
        let count = self.num_children();
        join_children(count, self.inspector.max_children_count()?, |index| {
            let Some(child) = self.child_at_index(index)? else {
                return Ok(None);
            };
            let rendered = self.inspector.render_child(&child)?;
            Ok(Some(format!("{}: {rendered}", child.name)))
        })
    }
}
