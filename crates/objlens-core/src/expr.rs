//! Expression text sent to the target.
//!
//! Every cache in the engine is keyed by the exact text built here, and the
//! text embeds the addresses literally, so two different objects never share
//! a cache entry.

use crate::config::HelperNames;
use crate::types::{Address, FieldTypeCode, TAG_MASK};

/// Self-reference test on the type descriptor of the object at `object`.
///
/// Masks the tag bits off the header word, then yields the masked pointer if
/// its own first slot points back at itself, `(void *)0` otherwise.
pub fn type_descriptor(object: Address) -> String
{
    let slot = format!("(uintptr_t)(*(void**){object:#x}) & ~{TAG_MASK:#x}");
    format!("*(void **)({slot}) == **(void***)({slot}) ? *(void **)({slot}) : (void *)0")
}

/// One-call classification of `object`.
pub fn classify(helpers: &HelperNames, object: Address, string_type: Address) -> String
{
    format!("(char *){}({object:#x}, {string_type:#x})", helpers.classify)
}

/// Types and addresses of the first `count` elements of `object`.
pub fn fields_type_and_address(helpers: &HelperNames, object: Address, count: usize) -> String
{
    format!("(char *){}({object:#x}, {count:#x})", helpers.fields_type_and_address)
}

/// Runtime type name of the object designated by `object_expr`.
pub fn type_name(helpers: &HelperNames, object_expr: &str) -> String
{
    format!("(char *){}({object_expr})", helpers.type_name)
}

/// Read the field at `location` through the conversion table.
///
/// `None` for unsupported type codes.
pub fn read_field(location: Address, code: FieldTypeCode, header_type: &str) -> Option<String>
{
    code.c_type(header_type)
        .map(|c_type| format!("*({c_type} *){location:#x}"))
}

/// Call a zero-argument getter at `function` returning `c_type`.
pub fn call_getter(c_type: &str, function: Address) -> String
{
    format!("(({c_type} (*)()){function:#x})()")
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_type_descriptor_expression_embeds_address()
    {
        let expr = type_descriptor(Address::new(0x1000));
        assert_eq!(
            expr,
            "*(void **)((uintptr_t)(*(void**)0x1000) & ~0x3) == **(void***)((uintptr_t)(*(void**)0x1000) & ~0x3) \
             ? *(void **)((uintptr_t)(*(void**)0x1000) & ~0x3) : (void *)0"
        );
        assert_ne!(expr, type_descriptor(Address::new(0x1008)));
        assert!(expr.contains(&format!("& ~{TAG_MASK:#x})")));
    }

    #[test]
    fn test_helper_calls()
    {
        let helpers = HelperNames::default();
        assert_eq!(
            classify(&helpers, Address::new(0x10), Address::new(0x20)),
            "(char *)Konan_DebugCompleteTypeInitFlow(0x10, 0x20)"
        );
        assert_eq!(
            fields_type_and_address(&helpers, Address::new(0x10), 2),
            "(char *)Konan_DebugGetFieldsTypeAndAddress(0x10, 0x2)"
        );
        assert_eq!(type_name(&helpers, "obj"), "(char *)Konan_DebugGetTypeName(obj)");
    }

    #[test]
    fn test_read_field_uses_conversion_table()
    {
        assert_eq!(
            read_field(Address::new(0x2000), FieldTypeCode::Int32, "ObjHeader *").as_deref(),
            Some("*(int32_t *)0x2000")
        );
        assert_eq!(
            read_field(Address::new(0x2008), FieldTypeCode::Declared, "ObjHeader *").as_deref(),
            Some("*(ObjHeader * *)0x2008")
        );
        assert_eq!(read_field(Address::new(0x2008), FieldTypeCode::Unsupported(11), "ObjHeader *"), None);
    }

    #[test]
    fn test_call_getter()
    {
        assert_eq!(call_getter("int", Address::new(0x400)), "((int (*)())0x400)()");
    }
}
