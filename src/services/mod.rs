pub mod location;
pub use location::{LocationService, ResolveError};

pub mod registry;
pub use registry::CachedResource;

pub mod resource_cache;
pub use resource_cache::{CacheError, ResourceCache};

pub mod resources;
pub use resources::{ResourcePayload, ResourceService};
