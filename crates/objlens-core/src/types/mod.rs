//! # Types
//!
//! Plain data shared by every stage of the introspection pipeline.

pub mod address;
pub mod field;
pub mod symbols;
pub mod value;

pub use address::{Address, TAG_MASK};
pub use field::FieldTypeCode;
pub use symbols::Symbol;
pub use value::{EvalValue, ObjectRef, ValueHandle, NULL};

/// Identifier of a runtime type descriptor (its masked address)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptorId(pub Address);

impl TypeDescriptorId
{
    pub const fn address(self) -> Address
    {
        self.0
    }
}

/// Which rendering the caller wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode
{
    /// One line, child values elided as `...`
    #[default]
    Short,
    /// Every visible child rendered recursively
    Full,
}
