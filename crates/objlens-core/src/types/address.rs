//! Memory address type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Low bits of an object header word reserved by the runtime's memory manager.
pub const TAG_MASK: u64 = 0x3;

/// Strongly typed memory address in the target process
///
/// This wrapper around `u64` keeps addresses apart from counts, type codes and
/// the other integers that flow through the classification protocol.
///
/// ## Tagged pointers
///
/// The first word of an object header is a tagged pointer: its two low bits
/// are used by the memory manager and must be cleared ([`TAG_MASK`]) before
/// the pointer is followed. The clearing happens inside the target, as part
/// of the type descriptor expression.
///
/// ## Example
///
/// ```rust
/// use objlens_core::types::Address;
///
/// let addr = Address::parse("0x1000").unwrap();
/// assert_eq!(addr, Address::from(4096));
/// assert_eq!(addr.to_string(), "0x0000000000001000");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(u64);

impl Address
{
    /// The null address (0x0)
    ///
    /// Always denotes the null object; resolution short-circuits on it.
    pub const ZERO: Self = Address(0);

    /// Create a new address from a `u64` value
    ///
    /// This is equivalent to `Address::from(value)` but can be used in const contexts.
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Get the raw `u64` value of this address
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Whether this is the null address
    pub const fn is_null(self) -> bool
    {
        self.0 == 0
    }

    /// Parse an address the way users type them in debugger commands
    ///
    /// Accepts `0x`-prefixed hexadecimal or plain decimal.
    pub fn parse(text: &str) -> Option<Self>
    {
        let text = text.trim();
        let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => text.parse::<u64>().ok(),
        };
        parsed.map(Address)
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:016x}", self.0)
    }
}

impl fmt::LowerHex for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_parse_hex_and_decimal()
    {
        assert_eq!(Address::parse("0x1000"), Some(Address::new(0x1000)));
        assert_eq!(Address::parse(" 4096 "), Some(Address::new(0x1000)));
        assert_eq!(Address::parse("0xZZ"), None);
        assert_eq!(Address::parse("abc"), None);
    }

    #[test]
    fn test_lower_hex_formatting()
    {
        assert_eq!(format!("{:#x}", Address::new(0x2a)), "0x2a");
        assert_eq!(format!("{}", Address::new(0x2a)), "0x000000000000002a");
    }
}
