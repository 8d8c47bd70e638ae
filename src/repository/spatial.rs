use rayon::prelude::*;

use crate::{
    repository::{Edge, Repository, Stop},
    shared::geo::{Coordinate, Distance},
};

impl Repository {
    /// The stop closest to the coordinate by great-circle distance.
    /// `None` only when the network has no stops.
    pub fn nearest_stop(&self, coordinate: &Coordinate) -> Option<&Stop> {
        self.stops
            .par_iter()
            .map(|stop| (stop, stop.coordinate.haversine_distance(coordinate)))
            .min_by(|(a, a_distance), (b, b_distance)| {
                a_distance
                    .total_cmp(b_distance)
                    .then_with(|| a.index.cmp(&b.index))
            })
            .map(|(stop, _)| stop)
    }

    /// Maps a reported location onto the network: among the edges touching the
    /// nearest stop, the one whose opposite endpoint lies closest.
    pub fn nearest_edge(&self, coordinate: &Coordinate) -> Option<&Edge> {
        let stop = self.nearest_stop(coordinate)?;
        self.edges_by_stop_idx(stop.index)
            .filter_map(|edge| {
                let other = edge.opposite(stop.index)?;
                let distance = self.stops[other as usize]
                    .coordinate
                    .haversine_distance(coordinate);
                Some((edge, distance))
            })
            .min_by(|(a, a_distance), (b, b_distance)| {
                a_distance
                    .total_cmp(b_distance)
                    .then_with(|| a.index.cmp(&b.index))
            })
            .map(|(edge, _)| edge)
    }

    /// Returns the stops within `distance` of the coordinate, closest first.
    pub fn stops_by_coordinate(&self, coordinate: &Coordinate, distance: Distance) -> Vec<&Stop> {
        let mut stops: Vec<_> = self
            .stops
            .par_iter()
            .map(|stop| (stop, stop.coordinate.haversine_distance(coordinate)))
            .filter(|(_, stop_distance)| *stop_distance <= distance)
            .collect();
        stops.par_sort_unstable_by(|(a, a_distance), (b, b_distance)| {
            a_distance
                .total_cmp(b_distance)
                .then_with(|| a.index.cmp(&b.index))
        });
        stops.into_iter().map(|(stop, _)| stop).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        repository::Repository,
        shared::geo::{Coordinate, Distance},
    };

    fn repository() -> Repository {
        Repository::builder()
            .stop("24", "Kraków Główny", Coordinate::from((50.068_394, 19.947_503)))
            .stop("23", "Kraków Grzegórzki", Coordinate::from((50.057_534, 19.947_919)))
            .stop("22", "Kraków Zabłocie", Coordinate::from((50.048_438, 19.956_833)))
            .stop("25", "Kraków Łobzów", Coordinate::from((50.081_906, 19.917_249)))
            .edge("22", "22", "23")
            .edge("23", "23", "24")
            .edge("24", "24", "25")
            .build()
            .unwrap()
    }

    #[test]
    fn nearest_stop_picks_closest() {
        let repository = repository();
        let near_glowny = Coordinate::from((50.067, 19.945));
        let stop = repository.nearest_stop(&near_glowny).unwrap();
        assert_eq!(&*stop.id, "24");
    }

    #[test]
    fn nearest_stop_on_empty_network() {
        let repository = Repository::builder().build().unwrap();
        assert!(repository.nearest_stop(&Coordinate::default()).is_none());
    }

    #[test]
    fn nearest_edge_leans_towards_location() {
        let repository = repository();
        // Just south of Główny, towards Grzegórzki
        let location = Coordinate::from((50.064, 19.9477));
        let edge = repository.nearest_edge(&location).unwrap();
        assert_eq!(&*edge.id, "23");
    }

    #[test]
    fn stops_within_radius_sorted() {
        let repository = repository();
        let origin = Coordinate::from((50.068_394, 19.947_503));
        let stops = repository.stops_by_coordinate(&origin, Distance::from_kilometers(1.5));
        let ids: Vec<_> = stops.iter().map(|stop| stop.id.to_string()).collect();
        assert_eq!(ids, vec!["24", "23"]);
    }
}
