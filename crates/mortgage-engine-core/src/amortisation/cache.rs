//! Optional memoisation for callers that re-simulate on every input change.
//!
//! The engine itself is stateless; this cache is owned by the caller and
//! keyed on the exact input tuple.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

use super::schedule::{simulate_params, MortgageResult, SimulationParams};

pub struct SimulationCache {
    entries: HashMap<SimulationParams, Arc<MortgageResult>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl SimulationCache {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// A zero capacity is treated as one entry.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached result for `params`, simulating on a miss.
    ///
    /// When full, the cache is cleared before inserting.
    pub fn get_or_simulate(&mut self, params: &SimulationParams) -> Arc<MortgageResult> {
        if let Some(hit) = self.entries.get(params) {
            self.hits += 1;
            return Arc::clone(hit);
        }

        self.misses += 1;
        if self.entries.len() >= self.capacity {
            trace!(entries = self.entries.len(), "simulation cache full; clearing");
            self.entries.clear();
        }

        let result = Arc::new(simulate_params(params));
        self.entries.insert(*params, Arc::clone(&result));
        result
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for SimulationCache {
    fn default() -> Self {
        Self::new()
    }
}
