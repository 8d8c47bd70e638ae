pub mod adjacency;
pub mod connections;
pub mod itinerary;
pub mod state;

pub use adjacency::*;
pub use connections::*;
pub use itinerary::*;
pub use state::*;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    repository::Network,
    shared::time::{Duration, Time},
};

pub const DEFAULT_DEPARTURE: Time = Time::from_hm(6, 0);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Stop id {0} does not match any entry")]
    InvalidStopID(String),
    #[error("A route was found but failed to build it")]
    FailedToBuildRoute,
    #[error("Gave up after settling {0} stops")]
    ExpansionLimitReached(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// When the rider is ready to leave the origin.
    pub departure: Time,
    /// Upper bound on settled stops before the search gives up.
    pub expansion_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            departure: DEFAULT_DEPARTURE,
            expansion_limit: None,
        }
    }
}

/// Earliest-arrival search between two stops over a timetabled network.
///
/// ```ignore
/// let itinerary = repository
///     .router("KGL01", "WRYN01")
///     .departure_at(Time::from_hm(7, 30))
///     .solve()?;
/// ```
pub struct Router<'a, N: Network> {
    network: &'a N,
    from: Arc<str>,
    to: Arc<str>,
    config: Config,
}

impl<'a, N: Network> Router<'a, N> {
    pub fn new(network: &'a N, from: impl Into<Arc<str>>, to: impl Into<Arc<str>>) -> Self {
        Self {
            network,
            from: from.into(),
            to: to.into(),
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn departure_at(mut self, departure: Time) -> Self {
        self.config.departure = departure;
        self
    }

    pub fn with_expansion_limit(mut self, limit: usize) -> Self {
        self.config.expansion_limit = Some(limit);
        self
    }

    /// Runs the search. `Ok(None)` means no trip chain reaches the destination
    /// from the departure time onwards.
    pub fn solve(self) -> Result<Option<Itinerary>, self::Error> {
        let origin = self
            .network
            .stop_by_id(&self.from)
            .map_err(|_| self::Error::InvalidStopID(self.from.to_string()))?;
        let destination = self
            .network
            .stop_by_id(&self.to)
            .map_err(|_| self::Error::InvalidStopID(self.to.to_string()))?;
        let departure = self.config.departure;
        debug!(
            "Routing from {} to {} at {}",
            origin.name, destination.name, departure
        );

        if origin.index == destination.index {
            return Ok(Some(Itinerary::stay(origin, departure)));
        }

        let mut state = State::new(self.network.stops().len());
        state.start(origin.index, departure);
        let mut expansions: usize = 0;

        while let Some(label) = state.pop() {
            if let Some(limit) = self.config.expansion_limit
                && expansions >= limit
            {
                debug!("Expansion limit of {limit} reached");
                return Err(self::Error::ExpansionLimitReached(limit));
            }
            state.visit(label.stop_idx);
            expansions += 1;
            trace!(
                "Settled {} at {} (cost {})",
                self.network.stop(label.stop_idx).name,
                label.time,
                label.cost
            );

            if label.stop_idx == destination.index {
                let itinerary = Itinerary::new(
                    self.network,
                    origin,
                    destination,
                    departure,
                    label.cost,
                    &state.parents,
                )
                .ok_or(self::Error::FailedToBuildRoute)?;
                debug!(
                    "Found route in {} with {} segments after settling {expansions} stops",
                    itinerary.cost,
                    itinerary.segments.len()
                );
                return Ok(Some(itinerary));
            }

            for connection in connections(self.network, label.stop_idx, label.time) {
                if state.is_visited(connection.next_stop_idx) {
                    continue;
                }
                let cost: Duration = label.cost + connection.cost;
                state.relax(
                    connection.next_stop_idx,
                    cost,
                    Parent {
                        from_stop_idx: label.stop_idx,
                        line_idx: connection.line_idx,
                        schedule_idx: connection.schedule_idx,
                        departure_time: connection.departure_time,
                        arrival_time: connection.arrival_time,
                    },
                );
            }
        }

        debug!("No route after settling {expansions} stops");
        Ok(None)
    }
}

/// Plans the fastest route between two stops leaving no earlier than `departure`.
pub fn plan_route<N: Network>(
    network: &N,
    origin: &str,
    destination: &str,
    departure: Time,
) -> Result<Option<Itinerary>, self::Error> {
    Router::new(network, origin, destination)
        .departure_at(departure)
        .solve()
}
