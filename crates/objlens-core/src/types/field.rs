//! Field type codes reported by the runtime.

use std::fmt;

use crate::error::{InspectError, InspectResult};

/// Primitive or reference type of a record field / array element
///
/// The numeric values are the ones the in-process helper reports. Any code
/// outside the table maps to [`FieldTypeCode::Unsupported`], which
/// materializes to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTypeCode
{
    /// `void *`
    VoidPointer,
    /// Same type as the declared handle, i.e. another object reference
    Declared,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// `void **`, a native pointer
    PointerPointer,
    Bool,
    Unsupported(u32),
}

impl FieldTypeCode
{
    /// Map a wire code onto the table.
    pub const fn from_code(code: u32) -> Self
    {
        match code {
            0 => Self::VoidPointer,
            1 => Self::Declared,
            2 => Self::Int8,
            3 => Self::Int16,
            4 => Self::Int32,
            5 => Self::Int64,
            6 => Self::Float32,
            7 => Self::Float64,
            8 => Self::PointerPointer,
            9 => Self::Bool,
            other => Self::Unsupported(other),
        }
    }

    /// The wire code.
    pub const fn code(self) -> u32
    {
        match self {
            Self::VoidPointer => 0,
            Self::Declared => 1,
            Self::Int8 => 2,
            Self::Int16 => 3,
            Self::Int32 => 4,
            Self::Int64 => 5,
            Self::Float32 => 6,
            Self::Float64 => 7,
            Self::PointerPointer => 8,
            Self::Bool => 9,
            Self::Unsupported(other) => other,
        }
    }

    /// Parse a decimal code as it appears in the classification protocol.
    ///
    /// ## Errors
    ///
    /// `Protocol` if `text` is not a decimal integer.
    pub fn parse(text: &str) -> InspectResult<Self>
    {
        text.trim()
            .parse::<u32>()
            .map(Self::from_code)
            .map_err(|_| InspectError::Protocol(format!("bad field type code `{text}`")))
    }

    /// Whether a field of this type holds a (possibly null) object reference.
    pub const fn is_reference(self) -> bool
    {
        matches!(self, Self::VoidPointer | Self::Declared)
    }

    /// C type used to read the field, `None` for unsupported codes.
    ///
    /// `header_type` is the declared object header pointer type, used for
    /// [`FieldTypeCode::Declared`].
    pub fn c_type(self, header_type: &str) -> Option<&str>
    {
        let c_type = match self {
            Self::VoidPointer => "void *",
            Self::Declared => header_type,
            Self::Int8 => "int8_t",
            Self::Int16 => "int16_t",
            Self::Int32 => "int32_t",
            Self::Int64 => "int64_t",
            Self::Float32 => "float",
            Self::Float64 => "double",
            Self::PointerPointer => "void **",
            Self::Bool => "bool",
            Self::Unsupported(_) => return None,
        };
        Some(c_type)
    }
}

impl fmt::Display for FieldTypeCode
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_codes_map_onto_table()
    {
        for code in 0..=9 {
            assert_eq!(FieldTypeCode::from_code(code).code(), code);
        }
        assert_eq!(FieldTypeCode::from_code(10), FieldTypeCode::Unsupported(10));
    }

    #[test]
    fn test_unsupported_code_has_no_c_type()
    {
        assert_eq!(FieldTypeCode::Unsupported(42).c_type("ObjHeader *"), None);
        assert_eq!(FieldTypeCode::Declared.c_type("ObjHeader *"), Some("ObjHeader *"));
        assert_eq!(FieldTypeCode::Int32.c_type("ObjHeader *"), Some("int32_t"));
    }

    #[test]
    fn test_parse_rejects_garbage()
    {
        assert_eq!(FieldTypeCode::parse(" 4 ").unwrap(), FieldTypeCode::Int32);
        assert!(matches!(FieldTypeCode::parse("int"), Err(InspectError::Protocol(_))));
    }
}
