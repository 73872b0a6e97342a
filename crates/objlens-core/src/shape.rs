//! # Shape Classifier
//!
//! Asks the runtime what kind of object lives at an address.
//!
//! Classification happens inside the target in a single helper call, which
//! returns a `|`-delimited record whose first field is a shape tag:
//!
//! | tag | fields | shape |
//! |-----|--------|-------|
//! | `1` | buffer address, buffer length | [`ObjectShape::String`] |
//! | `2` | child count | [`ObjectShape::Array`] |
//! | other | child count, names, type codes, addresses | [`ObjectShape::Record`] |
//!
//! Numbers are decimal; lists are comma-joined. The grammar is strict: any
//! missing, extra or malformed field is a `Protocol` error, never a guess.

use tracing::debug;

use crate::bridge::InspectionBridge;
use crate::error::{InspectError, InspectResult};
use crate::expr;
use crate::inspector::Inspector;
use crate::types::{Address, FieldTypeCode, ObjectRef, TypeDescriptorId};

const FIELD_SEPARATOR: char = '|';
const LIST_SEPARATOR: char = ',';

const STRING_TAG: &str = "1";
const ARRAY_TAG: &str = "2";

/// Names, type codes and addresses of a record's fields, index-aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout
{
    pub names: Vec<String>,
    pub type_codes: Vec<FieldTypeCode>,
    pub addresses: Vec<Address>,
}

impl RecordLayout
{
    pub fn len(&self) -> usize
    {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.names.is_empty()
    }
}

/// Structural category of an inspected object
///
/// Built fresh for every render and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectShape
{
    Null,
    /// Nonzero address whose type descriptor does not resolve
    Uninitialized,
    String
    {
        buffer: Address,
        length: usize,
    },
    Array
    {
        child_count: usize,
    },
    Record(RecordLayout),
}

impl ObjectShape
{
    /// Short name of the variant, for logs.
    pub const fn kind(&self) -> &'static str
    {
        match self {
            Self::Null => "null",
            Self::Uninitialized => "uninitialized",
            Self::String { .. } => "string",
            Self::Array { .. } => "array",
            Self::Record(_) => "record",
        }
    }

    /// Parse the classification helper's answer.
    ///
    /// ## Errors
    ///
    /// `Protocol` if `text` does not follow the grammar.
    pub fn parse(text: &str) -> InspectResult<Self>
    {
        let fields: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
        match fields[0] {
            STRING_TAG => {
                expect_fields(&fields, 3, text)?;
                Ok(Self::String {
                    buffer: parse_address(fields[1])?,
                    length: parse_count(fields[2])?,
                })
            }
            ARRAY_TAG => {
                expect_fields(&fields, 2, text)?;
                Ok(Self::Array {
                    child_count: parse_count(fields[1])?,
                })
            }
            _ => {
                expect_fields(&fields, 5, text)?;
                let child_count = parse_count(fields[1])?;
                let names: Vec<String> = split_list(fields[2]).map(str::to_string).collect();
                let type_codes = parse_type_codes(fields[3])?;
                let addresses = parse_addresses(fields[4])?;
                check_lengths(child_count, &[names.len(), type_codes.len(), addresses.len()], text)?;
                Ok(Self::Record(RecordLayout {
                    names,
                    type_codes,
                    addresses,
                }))
            }
        }
    }
}

impl<B: InspectionBridge> Inspector<B>
{
    /// Classify the object at `handle` in one helper call
    ///
    /// The helper is passed the load address of the string class type info so
    /// it can recognise strings.
    ///
    /// ## Errors
    ///
    /// - `Evaluation`: the string class symbol is not loaded or the helper
    ///   call fails
    /// - `MemoryRead`: the returned string cannot be read
    /// - `Protocol`: the answer does not parse
    pub fn classify(&self, handle: &ObjectRef, descriptor: TypeDescriptorId) -> InspectResult<ObjectShape>
    {
        let string_type = self.symbol_loaded_address(&self.config().string_class_symbol)?;
        let expr = expr::classify(&self.config().helpers, handle.address, string_type);
        let answer = self.read_helper_string(&expr)?;
        debug!(address = %handle.address, descriptor = %descriptor.address(), answer = %answer, "classified");
        ObjectShape::parse(&answer)
    }
}

/// Parse the lazy element metadata answer: `<codes,>|<addresses,>`.
///
/// ## Errors
///
/// `Protocol` on grammar violations or when either list does not hold
/// exactly `count` entries.
pub fn parse_element_metadata(text: &str, count: usize) -> InspectResult<(Vec<FieldTypeCode>, Vec<Address>)>
{
    let fields: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
    expect_fields(&fields, 2, text)?;
    let type_codes = parse_type_codes(fields[0])?;
    let addresses = parse_addresses(fields[1])?;
    check_lengths(count, &[type_codes.len(), addresses.len()], text)?;
    Ok((type_codes, addresses))
}

fn expect_fields(fields: &[&str], expected: usize, text: &str) -> InspectResult<()>
{
    if fields.len() == expected {
        Ok(())
    } else {
        Err(InspectError::Protocol(format!(
            "expected {expected} fields, got {} in `{text}`",
            fields.len()
        )))
    }
}

fn check_lengths(count: usize, lengths: &[usize], text: &str) -> InspectResult<()>
{
    if lengths.iter().all(|&len| len == count) {
        Ok(())
    } else {
        Err(InspectError::Protocol(format!(
            "child count {count} disagrees with list lengths {lengths:?} in `{text}`"
        )))
    }
}

fn split_list(list: &str) -> impl Iterator<Item = &str>
{
    list.split(LIST_SEPARATOR).filter(move |_| !list.is_empty())
}

fn parse_count(text: &str) -> InspectResult<usize>
{
    text.trim()
        .parse::<usize>()
        .map_err(|_| InspectError::Protocol(format!("bad count `{text}`")))
}

fn parse_address(text: &str) -> InspectResult<Address>
{
    text.trim()
        .parse::<u64>()
        .map(Address::new)
        .map_err(|_| InspectError::Protocol(format!("bad address `{text}`")))
}

fn parse_type_codes(list: &str) -> InspectResult<Vec<FieldTypeCode>>
{
    split_list(list).map(FieldTypeCode::parse).collect()
}

fn parse_addresses(list: &str) -> InspectResult<Vec<Address>>
{
    split_list(list).map(parse_address).collect()
}
