pub mod location;
pub mod resources;

pub use location::Location;
pub use resources::{Business, CachedRow, Event, Movie, Trail, Weather};
