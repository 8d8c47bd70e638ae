pub mod loader;
pub mod repository;
pub mod router;
pub mod shared;

pub mod prelude {
    pub use crate::loader::NetworkReader;
    pub use crate::repository::{Edge, Line, Network, Repository, Schedule, Stop};
    pub use crate::router::{Itinerary, Router, Segment, plan_route};
    pub use crate::shared::{Coordinate, Distance, Duration, Time};
}
