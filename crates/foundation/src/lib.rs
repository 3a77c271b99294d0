pub mod geo;
pub mod ids;

// Foundation crate: small, well-tested value types only.
pub use geo::*;
pub use ids::*;
