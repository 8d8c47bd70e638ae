use crate::repository::{self, Edge, Line, Repository, Schedule, Stop};

/// Read-only view of the network the router plans over.
///
/// The router only ever talks to this trait, so any store able to hand out
/// stops, edges, lines and schedules by index can back a query.
pub trait Network {
    fn stops(&self) -> &[Stop];
    fn edges(&self) -> &[Edge];
    fn lines(&self) -> &[Line];
    fn schedules(&self) -> &[Schedule];

    /// Resolves an external stop id, failing with [`repository::Error::StopNotFound`].
    fn stop_by_id(&self, id: &str) -> Result<&Stop, repository::Error>;

    fn stop(&self, stop_idx: u32) -> &Stop {
        &self.stops()[stop_idx as usize]
    }

    fn edge(&self, edge_idx: u32) -> &Edge {
        &self.edges()[edge_idx as usize]
    }

    fn line(&self, line_idx: u32) -> &Line {
        &self.lines()[line_idx as usize]
    }

    fn schedule(&self, schedule_idx: u32) -> &Schedule {
        &self.schedules()[schedule_idx as usize]
    }

    fn schedules_by_line<'a>(&'a self, line: &'a Line) -> impl Iterator<Item = &'a Schedule> {
        line.schedules.iter().map(move |idx| self.schedule(*idx))
    }

    /// The edges of `line` that start or end at the stop.
    fn edges_by_line_and_stop<'a>(
        &'a self,
        line: &'a Line,
        stop_idx: u32,
    ) -> impl Iterator<Item = &'a Edge> {
        line.edges
            .iter()
            .map(move |idx| self.edge(*idx))
            .filter(move |edge| edge.touches(stop_idx))
    }
}

impl Network for Repository {
    fn stops(&self) -> &[Stop] {
        &self.stops
    }

    fn edges(&self) -> &[Edge] {
        &self.edges
    }

    fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    fn stop_by_id(&self, id: &str) -> Result<&Stop, repository::Error> {
        Repository::stop_by_id(self, id)
    }
}
