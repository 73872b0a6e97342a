//! # Resolution Cache
//!
//! Memoization of expensive round trips into the target process.
//!
//! Three independent domains front the [`InspectionBridge`](crate::bridge::InspectionBridge):
//!
//! | domain | key | value |
//! |--------|-----|-------|
//! | [`CacheDomain::LoadedAddress`] | symbol name | load address |
//! | [`CacheDomain::ResolvedAddress`] | helper expression text | address of the returned C-string |
//! | [`CacheDomain::TypeDescriptor`] | self-reference expression text | descriptor word (`0` = invalid) |
//!
//! Symbol addresses and descriptor validity do not change within one debug
//! session, so those two domains are never invalidated. Only
//! `ResolvedAddress` can be cleared, which the re-entrancy heuristic does.
//!
//! Keys are exact expression text. Expressions embed their addresses
//! literally, so this is equivalent to keying by address.

use std::collections::HashMap;
use std::fmt;

use crate::types::Address;

/// Identifies one of the three cache domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheDomain
{
    LoadedAddress,
    ResolvedAddress,
    TypeDescriptor,
}

impl fmt::Display for CacheDomain
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let name = match self {
            Self::LoadedAddress => "loaded-address",
            Self::ResolvedAddress => "resolved-address",
            Self::TypeDescriptor => "type-descriptor",
        };
        f.write_str(name)
    }
}

/// Counters kept per domain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats
{
    pub hits: usize,
    pub misses: usize,
    pub inserts: usize,
    pub clears: usize,
}

#[derive(Debug, Default)]
struct DomainCache
{
    entries: HashMap<String, u64>,
    stats: CacheStats,
}

impl DomainCache
{
    fn get(&mut self, key: &str) -> Option<u64>
    {
        let found = self.entries.get(key).copied();
        if found.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        found
    }

    fn put(&mut self, key: String, value: u64)
    {
        self.stats.inserts += 1;
        self.entries.insert(key, value);
    }

    fn clear(&mut self)
    {
        self.stats.clears += 1;
        self.entries.clear();
    }
}

/// The three resolution caches of a session
///
/// Not thread-safe; see [`SessionState`](crate::session::SessionState).
#[derive(Debug, Default)]
pub struct ResolutionCache
{
    loaded_address: DomainCache,
    resolved_address: DomainCache,
    type_descriptor: DomainCache,
}

impl ResolutionCache
{
    /// Create a new empty cache.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    fn domain(&self, domain: CacheDomain) -> &DomainCache
    {
        match domain {
            CacheDomain::LoadedAddress => &self.loaded_address,
            CacheDomain::ResolvedAddress => &self.resolved_address,
            CacheDomain::TypeDescriptor => &self.type_descriptor,
        }
    }

    fn domain_mut(&mut self, domain: CacheDomain) -> &mut DomainCache
    {
        match domain {
            CacheDomain::LoadedAddress => &mut self.loaded_address,
            CacheDomain::ResolvedAddress => &mut self.resolved_address,
            CacheDomain::TypeDescriptor => &mut self.type_descriptor,
        }
    }

    /// Look up `key`; a miss is not an error, it routes the caller to the bridge.
    pub fn get(&mut self, domain: CacheDomain, key: &str) -> Option<Address>
    {
        self.domain_mut(domain).get(key).map(Address::new)
    }

    pub fn put(&mut self, domain: CacheDomain, key: impl Into<String>, value: Address)
    {
        self.domain_mut(domain).put(key.into(), value.value());
    }

    /// Drop every resolved-address entry.
    ///
    /// The other domains are load-invariant and have no clear operation.
    pub fn clear_resolved(&mut self)
    {
        self.resolved_address.clear();
    }

    /// Number of entries currently held by `domain`.
    pub fn len(&self, domain: CacheDomain) -> usize
    {
        self.domain(domain).entries.len()
    }

    pub fn is_empty(&self) -> bool
    {
        [CacheDomain::LoadedAddress, CacheDomain::ResolvedAddress, CacheDomain::TypeDescriptor]
            .into_iter()
            .all(|domain| self.len(domain) == 0)
    }

    pub fn stats(&self, domain: CacheDomain) -> CacheStats
    {
        self.domain(domain).stats
    }

    /// Empty all domains and zero their counters.
    pub fn reset(&mut self)
    {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_domains_are_independent()
    {
        let mut cache = ResolutionCache::new();
        cache.put(CacheDomain::LoadedAddress, "sym", Address::new(0x10));
        assert_eq!(cache.get(CacheDomain::LoadedAddress, "sym"), Some(Address::new(0x10)));
        assert_eq!(cache.get(CacheDomain::ResolvedAddress, "sym"), None);
        assert_eq!(cache.get(CacheDomain::TypeDescriptor, "sym"), None);
    }

    #[test]
    fn test_clear_resolved_only_touches_resolved_domain()
    {
        let mut cache = ResolutionCache::new();
        cache.put(CacheDomain::LoadedAddress, "a", Address::new(1));
        cache.put(CacheDomain::ResolvedAddress, "b", Address::new(2));
        cache.put(CacheDomain::TypeDescriptor, "c", Address::new(3));

        cache.clear_resolved();

        assert_eq!(cache.len(CacheDomain::ResolvedAddress), 0);
        assert_eq!(cache.len(CacheDomain::LoadedAddress), 1);
        assert_eq!(cache.len(CacheDomain::TypeDescriptor), 1);
        assert_eq!(cache.stats(CacheDomain::ResolvedAddress).clears, 1);
        assert_eq!(cache.stats(CacheDomain::LoadedAddress).clears, 0);
    }

    #[test]
    fn test_stats_count_hits_and_misses()
    {
        let mut cache = ResolutionCache::new();
        assert_eq!(cache.get(CacheDomain::TypeDescriptor, "k"), None);
        cache.put(CacheDomain::TypeDescriptor, "k", Address::ZERO);
        assert_eq!(cache.get(CacheDomain::TypeDescriptor, "k"), Some(Address::ZERO));

        let stats = cache.stats(CacheDomain::TypeDescriptor);
        assert_eq!((stats.hits, stats.misses, stats.inserts), (1, 1, 1));
    }

    #[test]
    fn test_reset_empties_everything()
    {
        let mut cache = ResolutionCache::new();
        cache.put(CacheDomain::LoadedAddress, "a", Address::new(1));
        cache.reset();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(CacheDomain::LoadedAddress), CacheStats::default());
    }
}
