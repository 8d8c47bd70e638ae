use crate::{
    repository::Network,
    router::adjacency::neighbors,
    shared::time::{Duration, Time},
};

/// A boardable hop from one stop to an adjacent one on a single trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    /// Waiting time at the stop plus riding time to `next_stop_idx`.
    pub cost: Duration,
    pub line_idx: u32,
    pub schedule_idx: u32,
    pub departure_time: Time,
    pub arrival_time: Time,
    pub next_stop_idx: u32,
}

/// Every hop a rider standing at `stop_idx` at `current_time` can still take.
///
/// A trip qualifies when it has not left yet (`departure >= current_time`)
/// and reaches the neighbor strictly later than it leaves, which pins the
/// direction the trip runs in.
pub fn connections<N>(network: &N, stop_idx: u32, current_time: Time) -> Vec<Connection>
where
    N: Network,
{
    let mut connections = Vec::new();
    for line in network.lines() {
        let neighbors = neighbors(network, line, stop_idx);
        if neighbors.is_empty() {
            continue;
        }
        for schedule in network.schedules_by_line(line) {
            let Some(departure_time) = schedule.time_at(stop_idx) else {
                continue;
            };
            let Some(waiting) = departure_time.duration_since(current_time) else {
                continue;
            };
            for next_stop_idx in neighbors.iter().copied() {
                let Some(arrival_time) = schedule.time_at(next_stop_idx) else {
                    continue;
                };
                if arrival_time <= departure_time {
                    continue;
                }
                let travel = arrival_time - departure_time;
                connections.push(Connection {
                    cost: waiting + travel,
                    line_idx: line.index,
                    schedule_idx: schedule.index,
                    departure_time,
                    arrival_time,
                    next_stop_idx,
                });
            }
        }
    }
    connections
}
