use std::sync::Arc;

use serde::Serialize;

use crate::{
    repository::{Network, Stop},
    router::state::Parent,
    shared::time::{Duration, Time},
};

/// A stop on a segment and the time the ridden trip is there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Call {
    pub stop_id: Arc<str>,
    pub stop_name: Arc<str>,
    /// The trip whose timetable `time` comes from.
    pub schedule_id: Arc<str>,
    pub time: Time,
}

/// A maximal run of stops ridden on one line without a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub line_id: Arc<str>,
    pub line_name: Arc<str>,
    /// The trip boarded at the first stop of the segment. A rider may move to
    /// a later trip of the same line mid-segment, see [`Call::schedule_id`].
    pub schedule_id: Arc<str>,
    /// The stops ridden, boarding stop first.
    pub stops: Vec<Arc<str>>,
    /// The ridden timetable restricted to `stops`: departure at the first
    /// stop, arrival at every following one, each tagged with its trip.
    pub calls: Vec<Call>,
}

impl Segment {
    pub fn first_stop(&self) -> Option<&Arc<str>> {
        self.stops.first()
    }

    pub fn last_stop(&self) -> Option<&Arc<str>> {
        self.stops.last()
    }

    pub fn departure_time(&self) -> Option<Time> {
        self.calls.first().map(|call| call.time)
    }

    pub fn arrival_time(&self) -> Option<Time> {
        self.calls.last().map(|call| call.time)
    }

    /// Every trip ridden on this segment, in riding order.
    pub fn schedules(&self) -> Vec<&Arc<str>> {
        let mut schedules: Vec<&Arc<str>> = Vec::new();
        for call in self.calls.iter() {
            if schedules.last() != Some(&&call.schedule_id) {
                schedules.push(&call.schedule_id);
            }
        }
        schedules
    }

    fn open<N: Network>(network: &N, from_stop_idx: u32, hop: &Parent) -> Self {
        let line = network.line(hop.line_idx);
        let schedule = network.schedule(hop.schedule_idx);
        let stop = network.stop(from_stop_idx);
        Self {
            line_id: line.id.clone(),
            line_name: line.name.clone(),
            schedule_id: schedule.id.clone(),
            stops: vec![stop.id.clone()],
            calls: vec![call(stop, &schedule.id, hop.departure_time)],
        }
    }

    fn push<N: Network>(&mut self, network: &N, to_stop_idx: u32, hop: &Parent) {
        let stop = network.stop(to_stop_idx);
        let schedule = network.schedule(hop.schedule_idx);
        self.stops.push(stop.id.clone());
        self.calls.push(call(stop, &schedule.id, hop.arrival_time));
    }
}

fn call(stop: &Stop, schedule_id: &Arc<str>, time: Time) -> Call {
    Call {
        stop_id: stop.id.clone(),
        stop_name: stop.name.clone(),
        schedule_id: schedule_id.clone(),
        time,
    }
}

/// The fastest way found from origin to destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Itinerary {
    pub origin: Arc<str>,
    pub destination: Arc<str>,
    /// The time the rider is ready at the origin.
    pub departure_time: Time,
    pub arrival_time: Time,
    /// Total elapsed time, waiting included.
    pub cost: Duration,
    pub segments: Vec<Segment>,
}

impl Itinerary {
    /// A rider already at their destination.
    pub fn stay(stop: &Stop, departure_time: Time) -> Self {
        Self {
            origin: stop.id.clone(),
            destination: stop.id.clone(),
            departure_time,
            arrival_time: departure_time,
            cost: Duration::ZERO,
            segments: Vec::new(),
        }
    }

    /// Rebuilds the itinerary from the predecessor of every settled stop.
    ///
    /// Returns `None` when the predecessor chain from `destination` does not
    /// lead back to `origin`.
    pub fn new<N: Network>(
        network: &N,
        origin: &Stop,
        destination: &Stop,
        departure_time: Time,
        cost: Duration,
        parents: &[Option<Parent>],
    ) -> Option<Self> {
        let hops = backtrack(origin.index, destination.index, parents)?;
        let arrival_time = hops
            .last()
            .map(|(_, hop)| hop.arrival_time)
            .unwrap_or(departure_time);

        let mut segments: Vec<Segment> = Vec::new();
        for (to_stop_idx, hop) in hops.iter() {
            let line_id = &network.line(hop.line_idx).id;
            let same_line = segments
                .last()
                .is_some_and(|segment| segment.line_id == *line_id);
            if !same_line {
                segments.push(Segment::open(network, hop.from_stop_idx, hop));
            }
            if let Some(segment) = segments.last_mut() {
                segment.push(network, *to_stop_idx, hop);
            }
        }

        Some(Self {
            origin: origin.id.clone(),
            destination: destination.id.clone(),
            departure_time,
            arrival_time,
            cost,
            segments,
        })
    }

    /// Every stop passed through, transfer stops listed once.
    pub fn stops(&self) -> Vec<&Arc<str>> {
        let mut stops: Vec<&Arc<str>> = Vec::new();
        for segment in self.segments.iter() {
            let skip = usize::from(!stops.is_empty());
            stops.extend(segment.stops.iter().skip(skip));
        }
        stops
    }

    pub fn transfers(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }
}

/// Walks the predecessor chain back from `destination`, returning the hops in
/// travel order paired with the stop each hop reaches.
fn backtrack(
    origin_idx: u32,
    destination_idx: u32,
    parents: &[Option<Parent>],
) -> Option<Vec<(u32, Parent)>> {
    let mut hops = Vec::new();
    let mut current = destination_idx;
    while current != origin_idx {
        let parent = parents.get(current as usize).copied().flatten()?;
        // A chain longer than the stop count has a cycle
        if hops.len() >= parents.len() {
            return None;
        }
        hops.push((current, parent));
        current = parent.from_stop_idx;
    }
    hops.reverse();
    Some(hops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repository::Repository, shared::Coordinate};

    fn repository() -> Repository {
        Repository::builder()
            .stop("A", "Alpha", Coordinate::default())
            .stop("B", "Beta", Coordinate::default())
            .stop("C", "Gamma", Coordinate::default())
            .stop("D", "Delta", Coordinate::default())
            .edge("AB", "A", "B")
            .edge("BC", "B", "C")
            .edge("CD", "C", "D")
            .line("red", "Red", ["AB", "BC"])
            .line("blue", "Blue", ["CD"])
            .schedule(
                "red-1",
                "red",
                [
                    ("A", Time::from_hm(6, 0)),
                    ("B", Time::from_hm(6, 5)),
                    ("C", Time::from_hm(6, 10)),
                ],
            )
            .schedule(
                "blue-1",
                "blue",
                [("C", Time::from_hm(6, 15)), ("D", Time::from_hm(6, 20))],
            )
            .build()
            .unwrap()
    }

    fn hop(from: u32, line: u32, schedule: u32, departure: Time, arrival: Time) -> Option<Parent> {
        Some(Parent {
            from_stop_idx: from,
            line_idx: line,
            schedule_idx: schedule,
            departure_time: departure,
            arrival_time: arrival,
        })
    }

    #[test]
    fn splits_at_line_change() {
        let repository = repository();
        let parents = vec![
            None,
            hop(0, 0, 0, Time::from_hm(6, 0), Time::from_hm(6, 5)),
            hop(1, 0, 0, Time::from_hm(6, 5), Time::from_hm(6, 10)),
            hop(2, 1, 1, Time::from_hm(6, 15), Time::from_hm(6, 20)),
        ];
        let origin = repository.stop_by_id("A").unwrap();
        let destination = repository.stop_by_id("D").unwrap();
        let itinerary = Itinerary::new(
            &repository,
            origin,
            destination,
            Time::from_hm(6, 0),
            Duration::from_minutes(20),
            &parents,
        )
        .unwrap();

        assert_eq!(itinerary.segments.len(), 2);
        assert_eq!(itinerary.transfers(), 1);
        let red = &itinerary.segments[0];
        assert_eq!(&*red.line_id, "red");
        let expected: Vec<Arc<str>> = vec!["A".into(), "B".into(), "C".into()];
        assert_eq!(red.stops, expected);
        assert_eq!(red.departure_time(), Some(Time::from_hm(6, 0)));
        assert_eq!(red.arrival_time(), Some(Time::from_hm(6, 10)));

        let blue = &itinerary.segments[1];
        assert_eq!(blue.first_stop(), red.last_stop());
        assert_eq!(&*blue.schedule_id, "blue-1");
        assert_eq!(blue.calls[0].time, Time::from_hm(6, 15));
        assert_eq!(&*blue.calls[1].stop_name, "Delta");
        assert_eq!(&*blue.calls[1].schedule_id, "blue-1");
        assert_eq!(blue.schedules().len(), 1);

        let stops: Vec<_> = itinerary.stops().into_iter().map(|s| s.to_string()).collect();
        assert_eq!(stops, vec!["A", "B", "C", "D"]);
        assert_eq!(itinerary.arrival_time, Time::from_hm(6, 20));
    }

    #[test]
    fn broken_chain_is_rejected() {
        let repository = repository();
        let parents = vec![
            None,
            None,
            None,
            hop(2, 1, 1, Time::from_hm(6, 15), Time::from_hm(6, 20)),
        ];
        let origin = repository.stop_by_id("A").unwrap();
        let destination = repository.stop_by_id("D").unwrap();
        let itinerary = Itinerary::new(
            &repository,
            origin,
            destination,
            Time::from_hm(6, 0),
            Duration::from_minutes(20),
            &parents,
        );
        assert!(itinerary.is_none());
    }

    #[test]
    fn stay_has_no_segments() {
        let repository = repository();
        let stop = repository.stop_by_id("B").unwrap();
        let itinerary = Itinerary::stay(stop, Time::from_hm(9, 0));
        assert_eq!(itinerary.cost, Duration::ZERO);
        assert!(itinerary.segments.is_empty());
        assert!(itinerary.stops().is_empty());
        assert_eq!(itinerary.arrival_time, itinerary.departure_time);
    }
}
