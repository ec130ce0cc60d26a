//! Allocation metadata registry.
//!
//! Every buffer handed across the ABI by the callee-allocated reader is
//! recorded here, so release calls can be checked (hardened mode) and tests
//! can assert that nothing is left outstanding.

use std::collections::HashMap;
use std::sync::OnceLock;

use parking_lot::RwLock;

/// Temporal state of a tracked region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalState {
    /// Region has no known metadata.
    Unknown,
    /// Region is currently owned by a caller.
    Live,
    /// Region has been released.
    Released,
}

/// Result of recording a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// A live region was released.
    Released,
    /// The region had already been released once.
    AlreadyReleased,
    /// The address was never registered.
    Unknown,
}

/// Metadata for a tracked allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationMeta {
    /// Base address of the tracked allocation.
    pub base: usize,
    /// Allocation length in bytes.
    pub len: usize,
    /// Bumped on every register/release transition at this address.
    pub generation: u64,
    /// Current temporal state.
    pub state: TemporalState,
}

/// Concurrent allocation metadata registry.
///
/// Holds one entry per distinct base address ever registered. Released
/// entries are kept so a second release at that address can be recognized;
/// a new allocation at the same base reuses the entry. Only
/// [`AllocationRegistry::mark_released`] moves an entry out of `Live`, so a
/// buffer freed behind the registry's back keeps counting as live.
#[derive(Debug, Default)]
pub struct AllocationRegistry {
    allocations: RwLock<HashMap<usize, AllocationMeta>>,
}

impl AllocationRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh allocation at `base`.
    ///
    /// Allocators reuse addresses, so a released entry at the same base is
    /// revived with a bumped generation.
    pub fn register_allocation(&self, base: usize, len: usize) {
        let mut allocations = self.allocations.write();
        let generation = allocations
            .get(&base)
            .map_or(1, |meta| meta.generation.saturating_add(1));
        allocations.insert(
            base,
            AllocationMeta {
                base,
                len,
                generation,
                state: TemporalState::Live,
            },
        );
    }

    /// Record that the allocation at `base` is being released.
    pub fn mark_released(&self, base: usize) -> ReleaseOutcome {
        let mut allocations = self.allocations.write();
        match allocations.get_mut(&base) {
            Some(meta) if meta.state == TemporalState::Live => {
                meta.state = TemporalState::Released;
                meta.generation = meta.generation.saturating_add(1);
                ReleaseOutcome::Released
            }
            Some(_) => ReleaseOutcome::AlreadyReleased,
            None => ReleaseOutcome::Unknown,
        }
    }

    /// Temporal state of the allocation starting at `base`.
    #[must_use]
    pub fn state_of(&self, base: usize) -> TemporalState {
        self.allocations
            .read()
            .get(&base)
            .map_or(TemporalState::Unknown, |meta| meta.state)
    }

    /// Look up metadata for the allocation starting at `base`.
    #[must_use]
    pub fn lookup(&self, base: usize) -> Option<AllocationMeta> {
        self.allocations.read().get(&base).copied()
    }

    /// Number of allocations still owned by callers.
    ///
    /// Counts entries not yet passed to [`AllocationRegistry::mark_released`].
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.allocations
            .read()
            .values()
            .filter(|meta| meta.state == TemporalState::Live)
            .count()
    }

    /// Total bytes still owned by callers.
    #[must_use]
    pub fn live_bytes(&self) -> usize {
        self.allocations
            .read()
            .values()
            .filter(|meta| meta.state == TemporalState::Live)
            .map(|meta| meta.len)
            .sum()
    }

    /// Number of entries held, live or released.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.allocations.read().len()
    }
}

static GLOBAL_REGISTRY: OnceLock<AllocationRegistry> = OnceLock::new();

/// Process-wide registry used by the exported C entry points.
#[must_use]
pub fn global_registry() -> &'static AllocationRegistry {
    GLOBAL_REGISTRY.get_or_init(AllocationRegistry::new)
}
