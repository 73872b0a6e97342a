//! Values exchanged with the host debugger.

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::field::FieldTypeCode;

/// Rendering of the null object and of absent native values.
pub const NULL: &str = "null";

/// Typed result of evaluating an expression in the target process
///
/// Mirrors what a debugger value object exposes: the value reinterpreted as
/// unsigned and signed integers, plus the debugger's own textual rendering
/// (`None` when the debugger has none, e.g. for aggregates).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalValue
{
    pub is_valid: bool,
    pub unsigned: u64,
    pub signed: i64,
    pub value: Option<String>,
}

impl Default for EvalValue
{
    fn default() -> Self
    {
        Self {
            is_valid: true,
            unsigned: 0,
            signed: 0,
            value: None,
        }
    }
}

impl EvalValue
{
    /// A pointer-typed result.
    pub fn address(address: impl Into<Address>) -> Self
    {
        let address = address.into();
        Self {
            is_valid: true,
            unsigned: address.value(),
            #[allow(clippy::cast_possible_wrap)]
            signed: address.value() as i64,
            value: Some(address.to_string()),
        }
    }

    /// An integer-typed result.
    pub fn integer(value: i64) -> Self
    {
        Self {
            is_valid: true,
            #[allow(clippy::cast_sign_loss)]
            unsigned: value as u64,
            signed: value,
            value: Some(value.to_string()),
        }
    }

    /// A result the debugger could only render as text (floats, bools, chars).
    pub fn text(value: impl Into<String>) -> Self
    {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// The result of a failed or meaningless evaluation.
    pub fn invalid() -> Self
    {
        Self {
            is_valid: false,
            ..Self::default()
        }
    }

    /// Reinterpret the result as an address.
    pub fn as_address(&self) -> Address
    {
        Address::new(self.unsigned)
    }

    /// The debugger's textual rendering, falling back to the signed integer.
    pub fn display_value(&self) -> String
    {
        self.value.clone().unwrap_or_else(|| self.signed.to_string())
    }
}

/// A value handle as the debugger presents it to a formatter
///
/// For runtime objects `type_name` is the object header pointer type and
/// `address` is the pointer value. `value` is the debugger's native rendering
/// of the handle, used whenever nothing better can be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef
{
    pub name: String,
    pub type_name: String,
    pub address: Address,
    pub value: Option<String>,
}

impl ObjectRef
{
    /// A pointer-valued handle; its native rendering is the pointer itself.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, address: impl Into<Address>) -> Self
    {
        let address = address.into();
        Self {
            name: name.into(),
            type_name: type_name.into(),
            address,
            value: Some(address.to_string()),
        }
    }

    /// A plain native scalar handle (not a pointer).
    pub fn native(name: impl Into<String>, type_name: impl Into<String>, value: Option<String>) -> Self
    {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            address: Address::ZERO,
            value,
        }
    }

    /// Native rendering of the handle, or [`NULL`] when the debugger has none.
    pub fn native_value(&self) -> String
    {
        self.value.clone().unwrap_or_else(|| NULL.to_string())
    }
}

/// A field or element materialized through the primitive conversion table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueHandle
{
    pub name: String,
    /// Where the field lives in the target process
    pub location: Address,
    pub code: FieldTypeCode,
    /// The field's content, read through the type selected by `code`
    pub result: EvalValue,
}

impl ValueHandle
{
    /// View a reference-typed field as an object handle of `header_type`.
    pub fn to_object_ref(&self, header_type: &str) -> ObjectRef
    {
        ObjectRef {
            name: self.name.clone(),
            type_name: header_type.to_string(),
            address: self.result.as_address(),
            value: self.result.value.clone(),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_integer_result_reinterprets_sign()
    {
        let value = EvalValue::integer(-1);
        assert_eq!(value.signed, -1);
        assert_eq!(value.unsigned, u64::MAX);
        assert_eq!(value.display_value(), "-1");
    }

    #[test]
    fn test_missing_fields_default_to_valid_zero()
    {
        let value: EvalValue = serde_json::from_str(r#"{"unsigned": 16}"#).unwrap();
        assert!(value.is_valid);
        assert_eq!(value.as_address(), Address::new(16));
        assert_eq!(value.display_value(), "0");
    }

    #[test]
    fn test_native_value_of_absent_handle_is_null()
    {
        let handle = ObjectRef::native("x", "int", None);
        assert_eq!(handle.native_value(), NULL);
    }
}
