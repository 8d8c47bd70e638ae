use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Instant,
};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    repository::{self, Edge, IdToIndex, Line, Repository, Schedule, Stop},
    shared::{self, geo::Coordinate, time::Time},
};

struct PendingStop {
    id: Arc<str>,
    code: Option<Arc<str>>,
    name: Arc<str>,
    coordinate: Coordinate,
}

struct PendingEdge {
    id: Arc<str>,
    from_stop: Arc<str>,
    to_stop: Arc<str>,
}

struct PendingLine {
    id: Arc<str>,
    name: Arc<str>,
    edges: Vec<Arc<str>>,
}

struct PendingSchedule {
    id: Arc<str>,
    line: Arc<str>,
    times: Vec<(Arc<str>, Time)>,
}

/// Collects raw network records and validates them into a [`Repository`].
///
/// References are resolved in [`RepositoryBuilder::build`], so records can be
/// added in any order.
#[derive(Default)]
pub struct RepositoryBuilder {
    stops: Vec<PendingStop>,
    edges: Vec<PendingEdge>,
    lines: Vec<PendingLine>,
    schedules: Vec<PendingSchedule>,
}

impl RepositoryBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn stop(
        self,
        id: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        coordinate: Coordinate,
    ) -> Self {
        self.stop_with_code(id, None::<Arc<str>>, name, coordinate)
    }

    pub fn stop_with_code(
        mut self,
        id: impl Into<Arc<str>>,
        code: Option<impl Into<Arc<str>>>,
        name: impl Into<Arc<str>>,
        coordinate: Coordinate,
    ) -> Self {
        self.stops.push(PendingStop {
            id: id.into(),
            code: code.map(Into::into),
            name: name.into(),
            coordinate,
        });
        self
    }

    pub fn edge(
        mut self,
        id: impl Into<Arc<str>>,
        from_stop: impl Into<Arc<str>>,
        to_stop: impl Into<Arc<str>>,
    ) -> Self {
        self.edges.push(PendingEdge {
            id: id.into(),
            from_stop: from_stop.into(),
            to_stop: to_stop.into(),
        });
        self
    }

    /// Adds a line whose canonical path is the given edges in order.
    pub fn line<I, E>(mut self, id: impl Into<Arc<str>>, name: impl Into<Arc<str>>, edges: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<str>>,
    {
        self.lines.push(PendingLine {
            id: id.into(),
            name: name.into(),
            edges: edges.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Adds one trip of `line` calling at each stop at the given time.
    pub fn schedule<I, S>(
        mut self,
        id: impl Into<Arc<str>>,
        line: impl Into<Arc<str>>,
        times: I,
    ) -> Self
    where
        I: IntoIterator<Item = (S, Time)>,
        S: Into<Arc<str>>,
    {
        self.schedules.push(PendingSchedule {
            id: id.into(),
            line: line.into(),
            times: times
                .into_iter()
                .map(|(stop, time)| (stop.into(), time))
                .collect(),
        });
        self
    }

    pub fn build(self) -> Result<Repository, repository::Error> {
        let now = Instant::now();
        let mut repository = Repository::default();

        debug!("Building stops...");
        let mut stop_lookup: IdToIndex = HashMap::with_capacity(self.stops.len());
        let mut stops: Vec<Stop> = Vec::with_capacity(self.stops.len());
        for (i, stop) in self.stops.into_iter().enumerate() {
            insert_unique(&mut stop_lookup, "stop", &stop.id, i as u32)?;
            stops.push(Stop {
                index: i as u32,
                normalized_name: shared::normalize(&stop.name).into(),
                id: stop.id,
                code: stop.code,
                name: stop.name,
                coordinate: stop.coordinate,
            });
        }

        debug!("Building edges...");
        let mut edge_lookup: IdToIndex = HashMap::with_capacity(self.edges.len());
        let mut edges: Vec<Edge> = Vec::with_capacity(self.edges.len());
        let mut stop_to_edges: Vec<Vec<u32>> = vec![Vec::new(); stops.len()];
        for (i, edge) in self.edges.into_iter().enumerate() {
            insert_unique(&mut edge_lookup, "edge", &edge.id, i as u32)?;
            let resolve = |stop: &Arc<str>| {
                stop_lookup
                    .get(stop)
                    .copied()
                    .ok_or_else(|| repository::Error::UnknownStopReference {
                        owner: format!("Edge {}", edge.id),
                        stop: stop.to_string(),
                    })
            };
            let from_stop_idx = resolve(&edge.from_stop)?;
            let to_stop_idx = resolve(&edge.to_stop)?;
            stop_to_edges[from_stop_idx as usize].push(i as u32);
            if to_stop_idx != from_stop_idx {
                stop_to_edges[to_stop_idx as usize].push(i as u32);
            }
            edges.push(Edge {
                index: i as u32,
                id: edge.id,
                from_stop_idx,
                to_stop_idx,
            });
        }

        debug!("Building lines...");
        let mut line_lookup: IdToIndex = HashMap::with_capacity(self.lines.len());
        let mut lines: Vec<Line> = Vec::with_capacity(self.lines.len());
        let mut line_schedules: Vec<Vec<u32>> = vec![Vec::new(); self.lines.len()];
        let mut stop_to_lines: Vec<Vec<u32>> = vec![Vec::new(); stops.len()];
        for (i, line) in self.lines.into_iter().enumerate() {
            insert_unique(&mut line_lookup, "line", &line.id, i as u32)?;
            let line_edges = line
                .edges
                .iter()
                .map(|edge| {
                    edge_lookup.get(edge).copied().ok_or_else(|| {
                        repository::Error::UnknownEdgeReference {
                            line: line.id.to_string(),
                            edge: edge.to_string(),
                        }
                    })
                })
                .collect::<Result<Box<[u32]>, _>>()?;
            line_edges
                .iter()
                .map(|idx| &edges[*idx as usize])
                .flat_map(|edge| [edge.from_stop_idx, edge.to_stop_idx])
                .for_each(|stop_idx| stop_to_lines[stop_idx as usize].push(i as u32));
            lines.push(Line {
                index: i as u32,
                normalized_name: shared::normalize(&line.name).into(),
                id: line.id,
                name: line.name,
                edges: line_edges,
                schedules: Box::default(),
            });
        }
        stop_to_lines.par_iter_mut().for_each(|lines| {
            lines.sort_unstable();
            lines.dedup();
        });

        debug!("Building schedules...");
        let mut schedule_lookup: IdToIndex = HashMap::with_capacity(self.schedules.len());
        let mut schedules: Vec<Schedule> = Vec::with_capacity(self.schedules.len());
        for (i, schedule) in self.schedules.into_iter().enumerate() {
            insert_unique(&mut schedule_lookup, "schedule", &schedule.id, i as u32)?;
            let line_idx = line_lookup.get(&schedule.line).copied().ok_or_else(|| {
                repository::Error::UnknownLineReference {
                    schedule: schedule.id.to_string(),
                    line: schedule.line.to_string(),
                }
            })?;
            let line = &lines[line_idx as usize];
            let served: HashSet<u32> = line
                .edges
                .iter()
                .map(|idx| &edges[*idx as usize])
                .flat_map(|edge| [edge.from_stop_idx, edge.to_stop_idx])
                .collect();

            let mut times: HashMap<u32, Time> = HashMap::with_capacity(schedule.times.len());
            for (stop, time) in schedule.times {
                let stop_idx = stop_lookup.get(&stop).copied().ok_or_else(|| {
                    repository::Error::UnknownStopReference {
                        owner: format!("Schedule {}", schedule.id),
                        stop: stop.to_string(),
                    }
                })?;
                if !served.contains(&stop_idx) {
                    return Err(repository::Error::StopNotOnLine {
                        schedule: schedule.id.to_string(),
                        stop: stop.to_string(),
                        line: line.id.to_string(),
                    });
                }
                if times.insert(stop_idx, time).is_some() {
                    return Err(repository::Error::DuplicateStopInSchedule {
                        schedule: schedule.id.to_string(),
                        stop: stop.to_string(),
                    });
                }
            }
            line_schedules[line_idx as usize].push(i as u32);
            schedules.push(Schedule {
                index: i as u32,
                id: schedule.id,
                line_idx,
                times,
            });
        }
        lines
            .iter_mut()
            .zip(line_schedules)
            .for_each(|(line, schedules)| line.schedules = schedules.into());

        info!(
            "Built network with {} stops, {} edges, {} lines and {} schedules in {:?}",
            stops.len(),
            edges.len(),
            lines.len(),
            schedules.len(),
            now.elapsed()
        );

        repository.stops = stops.into();
        repository.edges = edges.into();
        repository.lines = lines.into();
        repository.schedules = schedules.into();
        repository.stop_lookup = stop_lookup;
        repository.edge_lookup = edge_lookup;
        repository.line_lookup = line_lookup;
        repository.schedule_lookup = schedule_lookup;
        repository.stop_to_edges = stop_to_edges.into_iter().map(Into::into).collect();
        repository.stop_to_lines = stop_to_lines.into_iter().map(Into::into).collect();
        Ok(repository)
    }
}

fn insert_unique(
    lookup: &mut IdToIndex,
    kind: &'static str,
    id: &Arc<str>,
    index: u32,
) -> Result<(), repository::Error> {
    if lookup.insert(id.clone(), index).is_some() {
        return Err(repository::Error::DuplicateId {
            kind,
            id: id.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Error;

    fn base() -> RepositoryBuilder {
        RepositoryBuilder::new()
            .stop("A", "Alpha", Coordinate::default())
            .stop("B", "Beta", Coordinate::default())
            .stop("C", "Gamma", Coordinate::default())
            .edge("AB", "A", "B")
            .line("L", "Line", ["AB"])
    }

    #[test]
    fn builds_valid_network() {
        let repository = base()
            .schedule("s", "L", [("A", Time::from_hm(6, 0)), ("B", Time::from_hm(6, 5))])
            .build()
            .unwrap();
        let line = repository.line_by_id("L").unwrap();
        assert_eq!(line.schedules.len(), 1);
        let schedule = repository.schedule_by_id("s").unwrap();
        assert_eq!(schedule.line_idx, line.index);
        assert_eq!(schedule.times.len(), 2);
    }

    #[test]
    fn rejects_duplicate_stop_id() {
        let err = base()
            .stop("A", "Again", Coordinate::default())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateId {
                kind: "stop",
                id: "A".into()
            }
        );
    }

    #[test]
    fn rejects_edge_to_unknown_stop() {
        let err = base().edge("AX", "A", "X").build().unwrap_err();
        assert!(matches!(err, Error::UnknownStopReference { stop, .. } if stop == "X"));
    }

    #[test]
    fn rejects_line_with_unknown_edge() {
        let err = base().line("M", "Other", ["AB", "BC"]).build().unwrap_err();
        assert!(matches!(err, Error::UnknownEdgeReference { edge, .. } if edge == "BC"));
    }

    #[test]
    fn rejects_schedule_on_unknown_line() {
        let err = base()
            .schedule("s", "M", [("A", Time::from_hm(6, 0))])
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::UnknownLineReference { .. }));
    }

    #[test]
    fn rejects_stop_visited_twice() {
        let err = base()
            .schedule(
                "s",
                "L",
                [
                    ("A", Time::from_hm(6, 0)),
                    ("B", Time::from_hm(6, 5)),
                    ("A", Time::from_hm(6, 10)),
                ],
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateStopInSchedule { stop, .. } if stop == "A"));
    }

    #[test]
    fn rejects_stop_off_the_line() {
        let err = base()
            .schedule("s", "L", [("A", Time::from_hm(6, 0)), ("C", Time::from_hm(6, 9))])
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::StopNotOnLine { stop, .. } if stop == "C"));
    }
}
