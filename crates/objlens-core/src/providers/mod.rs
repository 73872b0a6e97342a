//! # Value Renderers
//!
//! Synthetic children providers, one per object shape.
//!
//! Each provider answers the questions a debugger asks about a value it
//! expands: how many children, which index has a given name, what the child
//! at an index is, and how to summarize the whole thing in short (children
//! elided) or full (children rendered recursively) form.
//!
//! [`Provider`] is the closed set of variants the
//! [`Inspector`](crate::Inspector) selects from; it forwards every call to
//! the variant with an exhaustive `match`.
//!
//! ## Breadth limit
//!
//! At most `target.max-children-count` children are rendered per level. When
//! an object has more, a trailing `...` marks the cut.

mod array;
mod record;
mod string;
mod zero;

pub use array::ArrayProvider;
pub use record::RecordProvider;
pub use string::StringProvider;
pub use zero::{NullProvider, UninitializedProvider};

use crate::bridge::InspectionBridge;
use crate::error::InspectResult;
use crate::inspector::ELIDED;
use crate::types::ValueHandle;

/// What a debugger can ask of an expanded value
pub trait SyntheticProvider
{
    fn num_children(&self) -> usize;

    fn has_children(&self) -> bool
    {
        self.num_children() > 0
    }

    /// Index of the child called `name`
    ///
    /// `Ok(None)` is the out-of-range answer.
    ///
    /// ## Errors
    ///
    /// Records fail with `FieldNotFound` for unknown names.
    fn child_index(&self, name: &str) -> InspectResult<Option<usize>>;

    /// Materialize child `index`; `Ok(None)` if the child is unavailable.
    ///
    /// ## Errors
    ///
    /// Bridge failures, or `InvalidArgument` for an index out of range.
    fn child_at_index(&self, index: usize) -> InspectResult<Option<ValueHandle>>;

    /// One-line summary with child values elided.
    ///
    /// ## Errors
    ///
    /// Bridge failures.
    fn to_short_string(&self) -> InspectResult<String>;

    /// Summary with every visible child rendered.
    ///
    /// ## Errors
    ///
    /// Bridge failures, or `Protocol` from a nested classification.
    fn to_full_string(&self) -> InspectResult<String>;
}

/// Provider selected for one object
#[derive(Debug)]
pub enum Provider<'a, B>
{
    Null(NullProvider),
    Uninitialized(UninitializedProvider),
    String(StringProvider),
    Array(ArrayProvider<'a, B>),
    Record(RecordProvider<'a, B>),
}

macro_rules! delegate {
    ($self:ident, $provider:ident => $call:expr) => {
        match $self {
            Self::Null($provider) => $call,
            Self::Uninitialized($provider) => $call,
            Self::String($provider) => $call,
            Self::Array($provider) => $call,
            Self::Record($provider) => $call,
        }
    };
}

impl<B: InspectionBridge> SyntheticProvider for Provider<'_, B>
{
    fn num_children(&self) -> usize
    {
        delegate!(self, provider => provider.num_children())
    }

    fn has_children(&self) -> bool
    {
        delegate!(self, provider => provider.has_children())
    }

    fn child_index(&self, name: &str) -> InspectResult<Option<usize>>
    {
        delegate!(self, provider => provider.child_index(name))
    }

    fn child_at_index(&self, index: usize) -> InspectResult<Option<ValueHandle>>
    {
        delegate!(self, provider => provider.child_at_index(index))
    }

    fn to_short_string(&self) -> InspectResult<String>
    {
        delegate!(self, provider => provider.to_short_string())
    }

    fn to_full_string(&self) -> InspectResult<String>
    {
        delegate!(self, provider => provider.to_full_string())
    }
}

/// Join the renderings of the first `min(count, limit)` children
///
/// `render` returns `None` for children that are omitted. A trailing `...`
/// is appended when `limit < count`.
pub(crate) fn join_children<F>(count: usize, limit: usize, mut render: F) -> InspectResult<String>
where
    F: FnMut(usize) -> InspectResult<Option<String>>,
{
    let shown = count.min(limit);
    let mut parts = Vec::with_capacity(shown + 1);
    for index in 0..shown {
        if let Some(part) = render(index)? {
            parts.push(part);
        }
    }
    if limit < count {
        parts.push(ELIDED.to_string());
    }
    Ok(parts.join(", "))
}
