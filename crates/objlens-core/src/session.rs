//! # Session State
//!
//! State that outlives a single render: the resolution caches and the
//! re-entrancy sighting log.
//!
//! A `SessionState` belongs to one debug session of one target. It is
//! injected into the [`Inspector`](crate::Inspector) rather than living in a
//! global, and [`SessionState::reset`] restores it to a fresh state (tests,
//! process restarts).
//!
//! ## Thread Safety
//!
//! Interior mutability is `RefCell`-based, so the state is `!Sync`. Renders
//! are synchronous against a single stopped target; rendering several targets
//! in parallel needs one session per target.

use std::cell::{RefCell, RefMut};
use std::collections::{HashMap, VecDeque};

use crate::cache::ResolutionCache;
use crate::types::Address;

/// Recently seen `(object address, child count)` pairs
///
/// The host polls formatters for freshness and has been observed to get
/// different field values for an unchanged object between polls. A repeat
/// sighting of the same pair is the signal to drop resolved helper strings.
///
/// Bounded: once `capacity` pairs are remembered the least recently seen one
/// is forgotten. Every sighting is stamped with a generation; queue entries
/// whose stamp is no longer current are stale and skipped on eviction, so
/// `observe` is amortized O(1).
#[derive(Debug)]
pub struct SightingLog
{
    capacity: usize,
    generation: u64,
    order: VecDeque<(Sighting, u64)>,
    seen: HashMap<Sighting, u64>,
}

type Sighting = (Address, usize);

impl SightingLog
{
    pub fn new(capacity: usize) -> Self
    {
        Self {
            capacity: capacity.max(1),
            generation: 0,
            order: VecDeque::new(),
            seen: HashMap::new(),
        }
    }

    /// Record a sighting; returns `true` if the pair was already remembered.
    pub fn observe(&mut self, address: Address, child_count: usize) -> bool
    {
        let key = (address, child_count);
        self.generation += 1;
        let repeated = self.seen.insert(key, self.generation).is_some();
        self.order.push_back((key, self.generation));

        while self.seen.len() > self.capacity {
            self.evict_oldest();
        }
        // Stale entries pile up under repeat sightings of the same pairs.
        if self.order.len() > 2 * self.capacity {
            let seen = &self.seen;
            self.order.retain(|(key, stamp)| seen.get(key) == Some(stamp));
        }
        repeated
    }

    fn evict_oldest(&mut self)
    {
        while let Some((key, stamp)) = self.order.pop_front() {
            if self.seen.get(&key) == Some(&stamp) {
                self.seen.remove(&key);
                return;
            }
        }
    }

    pub fn len(&self) -> usize
    {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.seen.is_empty()
    }

    pub fn clear(&mut self)
    {
        self.order.clear();
        self.seen.clear();
    }
}

/// Caches and sighting log of one debug session
#[derive(Debug)]
pub struct SessionState
{
    cache: RefCell<ResolutionCache>,
    sightings: RefCell<SightingLog>,
}

impl SessionState
{
    pub fn new(sighting_capacity: usize) -> Self
    {
        Self {
            cache: RefCell::new(ResolutionCache::new()),
            sightings: RefCell::new(SightingLog::new(sighting_capacity)),
        }
    }

    /// Mutable access to the caches.
    ///
    /// Borrows are scoped to a single lookup or insert; never hold one across
    /// a bridge call or a nested render.
    pub fn cache(&self) -> RefMut<'_, ResolutionCache>
    {
        self.cache.borrow_mut()
    }

    pub fn sightings(&self) -> RefMut<'_, SightingLog>
    {
        self.sightings.borrow_mut()
    }

    /// Forget everything: caches, counters and sightings.
    pub fn reset(&self)
    {
        self.cache.borrow_mut().reset();
        self.sightings.borrow_mut().clear();
    }
}
