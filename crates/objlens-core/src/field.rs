//! # Field Accessor
//!
//! Resolves where a field lives and what it holds, then reads it through the
//! fixed primitive conversion table ([`FieldTypeCode::c_type`]).
//!
//! Records arrive from classification with their full layout, so lookups are
//! pure. Arrays are classified with a count only; their element types and
//! addresses are fetched in one extra helper call the first time an element
//! is needed, and kept in [`ElementMetadata`] for the provider's lifetime.

use tracing::{debug, trace};

use crate::bridge::InspectionBridge;
use crate::error::{InspectError, InspectResult};
use crate::expr;
use crate::inspector::Inspector;
use crate::shape::{parse_element_metadata, RecordLayout};
use crate::types::{Address, FieldTypeCode, ObjectRef, ValueHandle};

fn out_of_range(index: usize, len: usize) -> InspectError
{
    InspectError::InvalidArgument(format!("child index {index} out of range (0..{len})"))
}

impl RecordLayout
{
    /// Address of field `index`.
    ///
    /// ## Errors
    ///
    /// `InvalidArgument` if `index` is out of range.
    pub fn field_address(&self, index: usize) -> InspectResult<Address>
    {
        self.addresses.get(index).copied().ok_or_else(|| out_of_range(index, self.len()))
    }

    /// Type code of field `index`.
    ///
    /// ## Errors
    ///
    /// `InvalidArgument` if `index` is out of range.
    pub fn field_type(&self, index: usize) -> InspectResult<FieldTypeCode>
    {
        self.type_codes.get(index).copied().ok_or_else(|| out_of_range(index, self.len()))
    }

    /// Name of field `index`.
    ///
    /// ## Errors
    ///
    /// `InvalidArgument` if `index` is out of range.
    pub fn field_name(&self, index: usize) -> InspectResult<&str>
    {
        self.names.get(index).map(String::as_str).ok_or_else(|| out_of_range(index, self.len()))
    }
}

/// Element types and addresses of an array, filled on first use
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementMetadata
{
    type_codes: Option<Vec<FieldTypeCode>>,
    addresses: Option<Vec<Address>>,
}

impl ElementMetadata
{
    /// Metadata already supplied by the caller.
    pub fn known(type_codes: Vec<FieldTypeCode>, addresses: Vec<Address>) -> Self
    {
        Self {
            type_codes: Some(type_codes),
            addresses: Some(addresses),
        }
    }

    /// Addresses without types. Only reachable through a broken producer;
    /// [`ElementMetadata::ensure`] rejects it.
    pub fn addresses_only(addresses: Vec<Address>) -> Self
    {
        Self {
            type_codes: None,
            addresses: Some(addresses),
        }
    }

    pub fn is_resolved(&self) -> bool
    {
        self.type_codes.is_some() && self.addresses.is_some()
    }

    /// Make sure types and addresses are present, calling `fetch` once if not
    ///
    /// ## Errors
    ///
    /// - `Protocol` if addresses are known but types are not: the eager and
    ///   lazy metadata would contradict each other
    /// - whatever `fetch` returns
    pub fn ensure<F>(&mut self, fetch: F) -> InspectResult<()>
    where
        F: FnOnce() -> InspectResult<(Vec<FieldTypeCode>, Vec<Address>)>,
    {
        if self.type_codes.is_some() {
            return Ok(());
        }
        if self.addresses.is_some() {
            return Err(InspectError::Protocol(
                "element addresses known without element types".to_string(),
            ));
        }

        let (type_codes, addresses) = fetch()?;
        self.type_codes = Some(type_codes);
        self.addresses = Some(addresses);
        Ok(())
    }

    /// Type code and address of element `index`; `None` until resolved.
    pub fn get(&self, index: usize) -> Option<(FieldTypeCode, Address)>
    {
        let code = *self.type_codes.as_ref()?.get(index)?;
        let address = *self.addresses.as_ref()?.get(index)?;
        Some((code, address))
    }
}

impl<B: InspectionBridge> Inspector<B>
{
    /// Fetch types and addresses of the first `count` elements of `handle`
    ///
    /// ## Errors
    ///
    /// Bridge failures, or `Protocol` if the answer does not parse.
    pub fn fetch_element_metadata(
        &self,
        handle: &ObjectRef,
        count: usize,
    ) -> InspectResult<(Vec<FieldTypeCode>, Vec<Address>)>
    {
        debug!(address = %handle.address, count, "fetching element metadata");
        let expr = expr::fields_type_and_address(&self.config().helpers, handle.address, count);
        let answer = self.read_helper_string(&expr)?;
        parse_element_metadata(&answer, count)
    }

    /// Read the field at `location` as `code`
    ///
    /// Returns `None` when the field is unavailable: unsupported type code,
    /// or the host produced no valid value. Callers omit such fields.
    ///
    /// ## Errors
    ///
    /// `Evaluation` if the host fails outright.
    pub fn materialize(&self, location: Address, code: FieldTypeCode, name: &str) -> InspectResult<Option<ValueHandle>>
    {
        let Some(expr) = expr::read_field(location, code, &self.config().object_type_name) else {
            trace!(name, %code, "unsupported field type");
            return Ok(None);
        };

        let result = self.bridge().evaluate(&expr)?;
        if !result.is_valid {
            trace!(name, %location, "field value unavailable");
            return Ok(None);
        }

        Ok(Some(ValueHandle {
            name: name.to_string(),
            location,
            code,
            result,
        }))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::bridge::SnapshotBridge;
    use crate::config::InspectorConfig;
    use crate::types::EvalValue;

    #[test]
    fn test_record_layout_lookups()
    {
        let layout = RecordLayout {
            names: vec!["x".into()],
            type_codes: vec![FieldTypeCode::Int32],
            addresses: vec![Address::new(0x2000)],
        };
        assert_eq!(layout.field_address(0).unwrap(), Address::new(0x2000));
        assert_eq!(layout.field_type(0).unwrap(), FieldTypeCode::Int32);
        assert_eq!(layout.field_name(0).unwrap(), "x");
        assert!(matches!(layout.field_address(1), Err(InspectError::InvalidArgument(_))));
    }

    #[test]
    fn test_metadata_is_fetched_once()
    {
        let mut metadata = ElementMetadata::default();
        let mut calls = 0;
        for _ in 0..2 {
            metadata
                .ensure(|| {
                    calls += 1;
                    Ok((vec![FieldTypeCode::Int8], vec![Address::new(0x3000)]))
                })
                .unwrap();
        }
        assert_eq!(calls, 1);
        assert_eq!(metadata.get(0), Some((FieldTypeCode::Int8, Address::new(0x3000))));
        assert_eq!(metadata.get(1), None);
    }

    #[test]
    fn test_addresses_without_types_is_contradictory()
    {
        let mut metadata = ElementMetadata::addresses_only(vec![Address::new(0x3000)]);
        let err = metadata.ensure(|| Ok((vec![], vec![]))).unwrap_err();
        assert!(matches!(err, InspectError::Protocol(_)));
        assert!(!metadata.is_resolved());
    }

    #[test]
    fn test_materialize_reads_through_conversion_table()
    {
        let bridge = SnapshotBridge::default()
            .with_expression("*(int32_t *)0x2000", EvalValue::integer(42))
            .with_expression("*(double *)0x2010", EvalValue::text("2.5"));
        let inspector = Inspector::new(bridge, InspectorConfig::default());

        let x = inspector.materialize(Address::new(0x2000), FieldTypeCode::Int32, "x").unwrap().unwrap();
        assert_eq!(x.result.signed, 42);
        assert_eq!(x.name, "x");

        let d = inspector.materialize(Address::new(0x2010), FieldTypeCode::Float64, "d").unwrap().unwrap();
        assert_eq!(d.result.display_value(), "2.5");
    }

    #[test]
    fn test_unsupported_and_invalid_fields_are_unavailable()
    {
        let bridge = SnapshotBridge::default().with_expression("*(bool *)0x2000", EvalValue::invalid());
        let inspector = Inspector::new(bridge, InspectorConfig::default());

        let unsupported = inspector.materialize(Address::new(0x2000), FieldTypeCode::Unsupported(10), "u");
        assert_eq!(unsupported.unwrap(), None);
        assert_eq!(inspector.bridge().evaluation_count(), 0);

        let invalid = inspector.materialize(Address::new(0x2000), FieldTypeCode::Bool, "b");
        assert_eq!(invalid.unwrap(), None);
    }
}
