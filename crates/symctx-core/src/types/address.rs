//! File address and address range types.

use std::fmt;
use std::ops::Add;

/// Strongly typed file address
///
/// Addresses in this crate are *file* addresses: the virtual addresses
/// recorded in the object file's debug info, before any load slide is
/// applied. Keeping them in a newtype prevents mixing them up with sizes,
/// line numbers or row indices, which are all `u64`/`u32` as well.
///
/// ## Example
///
/// ```rust
/// use symctx_core::types::Address;
///
/// let addr = Address::from(0x1000);
/// let next_addr = addr + 0x10;
/// assert_eq!(next_addr.value(), 0x1010);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(u64);

impl Address
{
    /// Create a new address from a `u64` value
    ///
    /// ## Example
    ///
    /// ```rust
    /// use symctx_core::types::Address;
    ///
    /// const TEXT_BASE: Address = Address::new(0x1000);
    /// assert_eq!(TEXT_BASE.value(), 0x1000);
    /// ```
    #[must_use]
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Get the raw `u64` value of this address
    #[must_use]
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Add an offset to this address, saturating at the maximum value
    #[must_use]
    pub fn saturating_add(self, offset: u64) -> Self
    {
        Address(self.0.saturating_add(offset))
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:016x}", self.0)
    }
}

impl Add<u64> for Address
{
    type Output = Address;

    fn add(self, rhs: u64) -> Self::Output
    {
        Address(self.0.wrapping_add(rhs))
    }
}

/// Half-open range of file addresses `[base, base + size)`.
///
/// Used for line entries, function bodies and lexical/inlined blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AddressRange
{
    /// First address covered by the range
    pub base: Address,
    /// Number of bytes covered
    pub size: u64,
}

impl AddressRange
{
    /// Create a range from a base address and a byte size.
    #[must_use]
    pub const fn new(base: Address, size: u64) -> Self
    {
        Self { base, size }
    }

    /// Create a range from `[start, end)`. An inverted range is empty.
    #[must_use]
    pub fn from_bounds(start: u64, end: u64) -> Self
    {
        Self {
            base: Address::new(start),
            size: end.saturating_sub(start),
        }
    }

    /// One past the last address covered by the range
    #[must_use]
    pub fn end(&self) -> Address
    {
        self.base.saturating_add(self.size)
    }

    /// Whether `address` falls inside the range
    ///
    /// Empty ranges contain nothing.
    #[must_use]
    pub fn contains(&self, address: Address) -> bool
    {
        address >= self.base && address < self.end()
    }
}

impl fmt::Display for AddressRange
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "[{}-{})", self.base, self.end())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_range_contains_is_half_open()
    {
        let range = AddressRange::from_bounds(0x1000, 0x1010);
        assert!(range.contains(Address::new(0x1000)));
        assert!(range.contains(Address::new(0x100f)));
        assert!(!range.contains(Address::new(0x1010)));
        assert!(!range.contains(Address::new(0xfff)));
    }

    #[test]
    fn test_inverted_bounds_are_empty()
    {
        let range = AddressRange::from_bounds(0x2000, 0x1000);
        assert_eq!(range.size, 0);
        assert!(!range.contains(Address::new(0x2000)));
    }

    #[test]
    fn test_display()
    {
        let range = AddressRange::new(Address::new(0x10), 0x10);
        assert_eq!(range.to_string(), "[0x0000000000000010-0x0000000000000020)");
    }
}
