//! Providers for objects with nothing to show.

use super::SyntheticProvider;
use crate::error::InspectResult;
use crate::types::{ValueHandle, NULL};

/// Zero-children behaviour shared by null and uninitialized objects.
fn render_null() -> InspectResult<String>
{
    Ok(NULL.to_string())
}

/// The null reference
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProvider;

/// A nonzero reference whose header does not lead to a valid type descriptor
///
/// Renders exactly like [`NullProvider`]; kept apart so the two cases can be
/// told apart when diagnosing.
#[derive(Debug, Clone, Copy, Default)]
pub struct UninitializedProvider;

impl SyntheticProvider for NullProvider
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
        render_null()
    }

    fn to_full_string(&self) -> InspectResult<String>
    {
        render_null()
    }
}

impl SyntheticProvider for UninitializedProvider
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
        render_null()
    }

    fn to_full_string(&self) -> InspectResult<String>
    {
        render_null()
    }
}
