use std::{cmp::Reverse, collections::BinaryHeap};

use crate::shared::time::{Duration, Time};

/// A frontier entry: reached `stop_idx` at `time` having spent `cost` since departure.
///
/// Ordered by cost first and insertion sequence second, so equal-cost entries
/// leave the queue in the order they were pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Label {
    pub cost: Duration,
    pub sequence: u64,
    pub stop_idx: u32,
    pub time: Time,
}

/// How a stop was reached: the hop from the previous stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent {
    pub from_stop_idx: u32,
    pub line_idx: u32,
    pub schedule_idx: u32,
    pub departure_time: Time,
    pub arrival_time: Time,
}

/// Working state of a single query. Never shared between queries.
#[derive(Debug, Default)]
pub struct State {
    heap: BinaryHeap<Reverse<Label>>,
    sequence: u64,
    pub visited: Vec<bool>,
    pub distance: Vec<Option<Duration>>,
    pub parents: Vec<Option<Parent>>,
}

impl State {
    pub fn new(stop_count: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            sequence: 0,
            visited: vec![false; stop_count],
            distance: vec![None; stop_count],
            parents: vec![None; stop_count],
        }
    }

    pub fn start(&mut self, stop_idx: u32, time: Time) {
        self.distance[stop_idx as usize] = Some(Duration::ZERO);
        self.push(stop_idx, Duration::ZERO, time);
    }

    fn push(&mut self, stop_idx: u32, cost: Duration, time: Time) {
        self.heap.push(Reverse(Label {
            cost,
            sequence: self.sequence,
            stop_idx,
            time,
        }));
        self.sequence += 1;
    }

    /// Pops the cheapest entry whose stop has not been settled yet.
    /// Stale entries of settled stops are dropped on the way.
    pub fn pop(&mut self) -> Option<Label> {
        while let Some(Reverse(label)) = self.heap.pop() {
            if !self.visited[label.stop_idx as usize] {
                return Some(label);
            }
        }
        None
    }

    pub fn visit(&mut self, stop_idx: u32) {
        self.visited[stop_idx as usize] = true;
    }

    pub fn is_visited(&self, stop_idx: u32) -> bool {
        self.visited[stop_idx as usize]
    }

    /// Records `parent` as the way to reach `stop_idx` if `cost` beats the
    /// best cost seen so far. Returns whether the label improved.
    pub fn relax(&mut self, stop_idx: u32, cost: Duration, parent: Parent) -> bool {
        let best = self.distance[stop_idx as usize];
        if best.is_some_and(|best| best <= cost) {
            return false;
        }
        self.distance[stop_idx as usize] = Some(cost);
        self.parents[stop_idx as usize] = Some(parent);
        self.push(stop_idx, cost, parent.arrival_time);
        true
    }
}
