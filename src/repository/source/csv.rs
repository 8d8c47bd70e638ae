use std::{collections::HashMap, sync::Arc, time::Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    loader::{self, NetworkReader, models::LineEdgeRow},
    repository::{self, Repository, RepositoryBuilder},
    shared::{geo::Coordinate, time::Time},
};

impl Repository {
    /// Loads a network feed and validates it into a repository.
    /// Depending on the size of the feed this can be a long blocking function.
    pub fn load(reader: NetworkReader) -> Result<Self, loader::Error> {
        let now = Instant::now();
        let builder = Repository::builder();
        let builder = load_stops(&reader, builder)?;
        let builder = load_edges(&reader, builder)?;
        let builder = load_lines(&reader, builder)?;
        let builder = load_schedules(&reader, builder)?;
        let repository = builder.build()?;
        info!("Loading network took {:?}", now.elapsed());
        Ok(repository)
    }
}

fn load_stops(
    reader: &NetworkReader,
    builder: RepositoryBuilder,
) -> Result<RepositoryBuilder, loader::Error> {
    debug!("Loading stops...");
    let now = Instant::now();
    let mut stops = Vec::new();
    reader.stream_stops(|(_, stop)| stops.push(stop))?;
    let builder = stops.into_iter().fold(builder, |builder, stop| {
        let coordinate = Coordinate {
            latitude: stop.stop_lat,
            longitude: stop.stop_lon,
        };
        let code = stop.stop_code.filter(|code| !code.is_empty());
        builder.stop_with_code(stop.stop_id, code, stop.stop_name, coordinate)
    });
    debug!("Loading stops took {:?}", now.elapsed());
    Ok(builder)
}

fn load_edges(
    reader: &NetworkReader,
    builder: RepositoryBuilder,
) -> Result<RepositoryBuilder, loader::Error> {
    debug!("Loading edges...");
    let now = Instant::now();
    let mut edges = Vec::new();
    reader.stream_edges(|(_, edge)| edges.push(edge))?;
    let builder = edges.into_iter().fold(builder, |builder, edge| {
        builder.edge(edge.edge_id, edge.from_stop_id, edge.to_stop_id)
    });
    debug!("Loading edges took {:?}", now.elapsed());
    Ok(builder)
}

fn load_lines(
    reader: &NetworkReader,
    builder: RepositoryBuilder,
) -> Result<RepositoryBuilder, loader::Error> {
    debug!("Loading lines...");
    let now = Instant::now();
    let mut line_edges: Vec<LineEdgeRow> = Vec::new();
    reader.stream_line_edges(|(_, row)| line_edges.push(row))?;
    line_edges.par_sort_by(|a, b| {
        a.line_id
            .cmp(&b.line_id)
            .then(a.edge_sequence.cmp(&b.edge_sequence))
    });
    let mut line_to_edges: HashMap<String, Vec<String>> = HashMap::new();
    line_edges.into_iter().for_each(|row| {
        line_to_edges
            .entry(row.line_id)
            .or_default()
            .push(row.edge_id)
    });

    let mut lines = Vec::new();
    reader.stream_lines(|(_, line)| lines.push(line))?;
    let builder = lines.into_iter().fold(builder, |builder, line| {
        let edges = line_to_edges.remove(&line.line_id).unwrap_or_default();
        builder.line(line.line_id, line.line_name, edges)
    });

    if let Some(line_id) = line_to_edges.into_keys().min() {
        return Err(repository::Error::LineNotFound(line_id).into());
    }
    debug!("Loading lines took {:?}", now.elapsed());
    Ok(builder)
}

fn load_schedules(
    reader: &NetworkReader,
    builder: RepositoryBuilder,
) -> Result<RepositoryBuilder, loader::Error> {
    debug!("Loading schedules...");
    let now = Instant::now();
    let mut rows = Vec::new();
    reader.stream_schedules(|(_, row)| rows.push(row))?;

    // Keeps schedules in the order they first appear in the feed
    let mut order: Vec<Arc<str>> = Vec::new();
    let mut calls: HashMap<Arc<str>, (Arc<str>, Vec<(Arc<str>, Time)>)> = HashMap::new();
    for row in rows {
        let time = Time::from_hms(&row.time).ok_or_else(|| loader::Error::InvalidTime {
            schedule: row.schedule_id.clone(),
            value: row.time.clone(),
        })?;
        let schedule_id: Arc<str> = row.schedule_id.into();
        let (line_id, times) = calls.entry(schedule_id.clone()).or_insert_with(|| {
            order.push(schedule_id.clone());
            (row.line_id.as_str().into(), Vec::new())
        });
        if **line_id != *row.line_id {
            return Err(loader::Error::ConflictingScheduleLine {
                schedule: schedule_id.to_string(),
                line: line_id.to_string(),
                other: row.line_id,
            });
        }
        times.push((row.stop_id.into(), time));
    }

    let builder = order.into_iter().fold(builder, |builder, schedule_id| {
        let (line_id, times) = calls.remove(&schedule_id).unwrap_or_default();
        builder.schedule(schedule_id, line_id, times)
    });
    debug!("Loading schedules took {:?}", now.elapsed());
    Ok(builder)
}
