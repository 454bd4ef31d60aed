use super::types::LocationId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Trend baselines captured at training time and reused at serving time.
///
/// Holds the most recent lagged rolling mean for every location seen in the
/// training set, plus a dataset-wide mean for locations that were never seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BaselineState {
    by_location: BTreeMap<LocationId, f64>,
    global: f64,
}

impl BaselineState {
    pub fn new(by_location: BTreeMap<LocationId, f64>, global: f64) -> Self {
        Self {
            by_location,
            global,
        }
    }

    pub fn global(&self) -> f64 {
        self.global
    }

    pub fn for_location(&self, location_id: LocationId) -> Option<f64> {
        self.by_location.get(&location_id).copied()
    }

    /// Baseline for `location_id`, falling back to the global baseline.
    pub fn resolve(&self, location_id: LocationId) -> f64 {
        self.for_location(location_id).unwrap_or(self.global)
    }

    pub fn locations(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.by_location.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_location.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_location.is_empty()
    }
}
