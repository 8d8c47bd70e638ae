use std::{collections::HashMap, sync::Arc};

mod builder;
mod models;
mod network;
pub mod source;
mod spatial;

pub use builder::*;
pub use models::*;
pub use network::*;

use thiserror::Error;

use crate::{router::Router, shared};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Stop id {0} does not match any entry")]
    StopNotFound(String),
    #[error("Line id {0} does not match any entry")]
    LineNotFound(String),
    #[error("Edge id {0} does not match any entry")]
    EdgeNotFound(String),
    #[error("Schedule id {0} does not match any entry")]
    ScheduleNotFound(String),
    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: String },
    #[error("{owner} references unknown stop {stop}")]
    UnknownStopReference { owner: String, stop: String },
    #[error("Line {line} references unknown edge {edge}")]
    UnknownEdgeReference { line: String, edge: String },
    #[error("Schedule {schedule} references unknown line {line}")]
    UnknownLineReference { schedule: String, line: String },
    #[error("Schedule {schedule} visits stop {stop} more than once")]
    DuplicateStopInSchedule { schedule: String, stop: String },
    #[error("Schedule {schedule} calls at stop {stop} which line {line} does not serve")]
    StopNotOnLine {
        schedule: String,
        stop: String,
        line: String,
    },
}

type IdToIndex = HashMap<Arc<str>, u32>;

/// Read-only reference data for a scheduled line network.
///
/// Built once through [`RepositoryBuilder`] or [`Repository::load`] and never
/// mutated afterwards, so it can be shared between any number of concurrent
/// route queries.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    pub stops: Box<[Stop]>,
    pub edges: Box<[Edge]>,
    pub lines: Box<[Line]>,
    pub schedules: Box<[Schedule]>,

    stop_lookup: IdToIndex,
    edge_lookup: IdToIndex,
    line_lookup: IdToIndex,
    schedule_lookup: IdToIndex,
    // Edges touching each stop
    stop_to_edges: Box<[Box<[u32]>]>,
    // Lines with at least one edge touching each stop
    stop_to_lines: Box<[Box<[u32]>]>,
}

impl Repository {
    pub fn builder() -> RepositoryBuilder {
        RepositoryBuilder::new()
    }

    /// Get a stop with the given id.
    pub fn stop_by_id(&self, id: &str) -> Result<&Stop, self::Error> {
        let index = self
            .stop_lookup
            .get(id)
            .ok_or_else(|| self::Error::StopNotFound(id.to_string()))?;
        Ok(&self.stops[*index as usize])
    }

    pub fn edge_by_id(&self, id: &str) -> Result<&Edge, self::Error> {
        let index = self
            .edge_lookup
            .get(id)
            .ok_or_else(|| self::Error::EdgeNotFound(id.to_string()))?;
        Ok(&self.edges[*index as usize])
    }

    pub fn line_by_id(&self, id: &str) -> Result<&Line, self::Error> {
        let index = self
            .line_lookup
            .get(id)
            .ok_or_else(|| self::Error::LineNotFound(id.to_string()))?;
        Ok(&self.lines[*index as usize])
    }

    pub fn schedule_by_id(&self, id: &str) -> Result<&Schedule, self::Error> {
        let index = self
            .schedule_lookup
            .get(id)
            .ok_or_else(|| self::Error::ScheduleNotFound(id.to_string()))?;
        Ok(&self.schedules[*index as usize])
    }

    /// Returns the line's canonical stop sequence: the origin of the first
    /// edge followed by the destination of every edge.
    pub fn stops_by_line_id(&self, line_id: &str) -> Result<Vec<&Stop>, self::Error> {
        let line = self.line_by_id(line_id)?;
        let mut edges = line.edges.iter().map(|idx| &self.edges[*idx as usize]);
        let Some(first) = edges.next() else {
            return Ok(Vec::new());
        };
        let mut stops = vec![&self.stops[first.from_stop_idx as usize]];
        stops.push(&self.stops[first.to_stop_idx as usize]);
        stops.extend(edges.map(|edge| &self.stops[edge.to_stop_idx as usize]));
        Ok(stops)
    }

    /// Returns every line that has an edge touching the stop.
    pub fn lines_by_stop_id(&self, stop_id: &str) -> Result<Vec<&Line>, self::Error> {
        let stop = self.stop_by_id(stop_id)?;
        Ok(self.stop_to_lines[stop.index as usize]
            .iter()
            .map(|idx| &self.lines[*idx as usize])
            .collect())
    }

    /// Returns every edge touching the stop, regardless of line.
    pub fn edges_by_stop_id(&self, stop_id: &str) -> Result<Vec<&Edge>, self::Error> {
        let stop = self.stop_by_id(stop_id)?;
        Ok(self.edges_by_stop_idx(stop.index).collect())
    }

    pub(crate) fn edges_by_stop_idx(&self, stop_idx: u32) -> impl Iterator<Item = &Edge> {
        self.stop_to_edges[stop_idx as usize]
            .iter()
            .map(move |idx| &self.edges[*idx as usize])
    }

    pub fn schedules_by_line_id(&self, line_id: &str) -> Result<Vec<&Schedule>, self::Error> {
        let line = self.line_by_id(line_id)?;
        Ok(self.schedules_by_line(line).collect())
    }

    /// The edge after `edge_id` along the line's canonical order.
    /// `None` when the edge is the last one or is not part of the line.
    pub fn next_edge(&self, line_id: &str, edge_id: &str) -> Result<Option<&Edge>, self::Error> {
        let line = self.line_by_id(line_id)?;
        let edge = self.edge_by_id(edge_id)?;
        let next = line
            .edges
            .iter()
            .position(|idx| *idx == edge.index)
            .and_then(|position| line.edges.get(position + 1))
            .map(|idx| &self.edges[*idx as usize]);
        Ok(next)
    }

    /// Case-insensitive search on stop names.
    pub fn search_stops_by_name<'a>(&'a self, needle: &str) -> Vec<&'a Stop> {
        shared::search(needle, &self.stops)
    }

    /// Case-insensitive search on line names.
    pub fn search_lines_by_name<'a>(&'a self, needle: &str) -> Vec<&'a Line> {
        shared::search(needle, &self.lines)
    }

    pub fn router(&self, from: impl Into<Arc<str>>, to: impl Into<Arc<str>>) -> Router<'_, Self> {
        Router::new(self, from, to)
    }
}
