pub mod geo;
pub mod time;

pub use geo::*;
pub use time::*;

use rayon::prelude::*;
use std::cmp::Ordering;

pub trait Identifiable {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn normalized_name(&self) -> &str;
}

pub(crate) fn normalize(name: &str) -> String {
    name.split_whitespace()
        .map(|token| token.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scores how well `hay` matches an already normalized `needle`.
/// Zero means no match.
fn score(needle: &str, hay: &str) -> u32 {
    if needle.is_empty() {
        0
    } else if hay == needle {
        4
    } else if hay.starts_with(needle) {
        3
    } else if hay
        .split_whitespace()
        .any(|token| token.starts_with(needle))
    {
        2
    } else if hay.contains(needle) {
        1
    } else {
        0
    }
}

/// Case-insensitive name search, best matches first.
pub fn search<'a, T>(needle: &str, haystack: &'a [T]) -> Vec<&'a T>
where
    T: Send + Sync + Identifiable,
{
    let normalized_needle = normalize(needle);
    let mut results: Vec<(&T, u32)> = haystack
        .par_iter()
        .filter_map(|hay| {
            let score = score(&normalized_needle, hay.normalized_name());
            (score > 0).then_some((hay, score))
        })
        .collect();

    results.par_sort_unstable_by(|(a, a_score), (b, b_score)| match b_score.cmp(a_score) {
        Ordering::Equal => a.name().cmp(b.name()),
        ordering => ordering,
    });
    results.into_iter().map(|(entity, _)| entity).collect()
}
