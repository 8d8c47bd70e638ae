use std::{collections::HashMap, sync::Arc};

use crate::shared::{Identifiable, geo::Coordinate, time::Time};

/// A physical point where riders board or alight.
#[derive(Debug, Default, Clone)]
pub struct Stop {
    /// The internal index used for O(1) array lookups in the repository.
    pub index: u32,
    /// Unique external identifier.
    pub id: Arc<str>,
    /// Short platform or stop code (e.g. "KGL01"), if the source has one.
    pub code: Option<Arc<str>>,
    /// Human-readable name.
    pub name: Arc<str>,
    /// Lowercased, whitespace-collapsed name used by name search.
    pub normalized_name: Arc<str>,
    pub coordinate: Coordinate,
}

impl Identifiable for Stop {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn normalized_name(&self) -> &str {
        &self.normalized_name
    }
}

/// One physical track segment between two stops.
///
/// Several lines may reference the same edge when they share infrastructure.
#[derive(Debug, Default, Clone)]
pub struct Edge {
    pub index: u32,
    pub id: Arc<str>,
    pub from_stop_idx: u32,
    pub to_stop_idx: u32,
}

impl Edge {
    pub fn touches(&self, stop_idx: u32) -> bool {
        self.from_stop_idx == stop_idx || self.to_stop_idx == stop_idx
    }

    /// The endpoint across the edge from `stop_idx`, if the edge touches it.
    pub fn opposite(&self, stop_idx: u32) -> Option<u32> {
        if self.from_stop_idx == stop_idx {
            Some(self.to_stop_idx)
        } else if self.to_stop_idx == stop_idx {
            Some(self.from_stop_idx)
        } else {
            None
        }
    }
}

/// A named service path made of ordered edges and the trips that run on it.
#[derive(Debug, Default, Clone)]
pub struct Line {
    pub index: u32,
    pub id: Arc<str>,
    pub name: Arc<str>,
    pub normalized_name: Arc<str>,
    /// Edge indices in canonical path order.
    pub edges: Box<[u32]>,
    /// Schedule indices covering both directions of travel.
    pub schedules: Box<[u32]>,
}

impl Identifiable for Line {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn normalized_name(&self) -> &str {
        &self.normalized_name
    }
}

/// A single trip: the time of day it calls at each stop it serves.
#[derive(Debug, Default, Clone)]
pub struct Schedule {
    pub index: u32,
    pub id: Arc<str>,
    /// Pointer to the owning [`Line`].
    pub line_idx: u32,
    /// Stop index to time of day.
    pub times: HashMap<u32, Time>,
}

impl Schedule {
    pub fn time_at(&self, stop_idx: u32) -> Option<Time> {
        self.times.get(&stop_idx).copied()
    }
}
