use std::collections::BTreeSet;

use crate::repository::{Line, Network};

/// Stops one edge of `line` away from the stop, in either direction.
///
/// Edges are walked both ways here; which way a trip actually runs is decided
/// by its schedule. Empty when the line does not serve the stop.
pub fn neighbors<N>(network: &N, line: &Line, stop_idx: u32) -> BTreeSet<u32>
where
    N: Network,
{
    network
        .edges_by_line_and_stop(line, stop_idx)
        .filter_map(|edge| edge.opposite(stop_idx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repository::Repository, shared::Coordinate};

    fn repository() -> Repository {
        Repository::builder()
            .stop("A", "A", Coordinate::default())
            .stop("B", "B", Coordinate::default())
            .stop("C", "C", Coordinate::default())
            .stop("D", "D", Coordinate::default())
            .edge("AB", "A", "B")
            .edge("BC", "B", "C")
            .edge("CD", "C", "D")
            .line("L", "A - C", ["AB", "BC"])
            .line("M", "C - D", ["CD"])
            .build()
            .unwrap()
    }

    fn ids(repository: &Repository, stops: BTreeSet<u32>) -> Vec<String> {
        stops
            .into_iter()
            .map(|idx| repository.stop(idx).id.to_string())
            .collect()
    }

    #[test]
    fn middle_stop_sees_both_sides() {
        let repository = repository();
        let line = repository.line_by_id("L").unwrap();
        let b = repository.stop_by_id("B").unwrap().index;
        assert_eq!(ids(&repository, neighbors(&repository, line, b)), vec!["A", "C"]);
    }

    #[test]
    fn terminal_sees_one_side() {
        let repository = repository();
        let line = repository.line_by_id("L").unwrap();
        let c = repository.stop_by_id("C").unwrap().index;
        assert_eq!(ids(&repository, neighbors(&repository, line, c)), vec!["B"]);
    }

    #[test]
    fn unserved_stop_is_empty() {
        let repository = repository();
        let line = repository.line_by_id("M").unwrap();
        let a = repository.stop_by_id("A").unwrap().index;
        assert!(neighbors(&repository, line, a).is_empty());
    }
}
