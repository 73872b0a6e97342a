//! Symbols of the module containing the selected frame.

use serde::{Deserialize, Serialize};

use super::address::Address;

/// A loaded symbol: its (mangled) name and runtime start address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol
{
    pub name: String,
    pub load_address: Address,
}

impl Symbol
{
    pub fn new(name: impl Into<String>, load_address: impl Into<Address>) -> Self
    {
        Self {
            name: name.into(),
            load_address: load_address.into(),
        }
    }
}
