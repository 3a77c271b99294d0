pub mod dataset;
pub mod error;
pub mod model;
pub mod records;
pub mod sample;

pub use dataset::*;
pub use error::*;
pub use model::*;
pub use records::*;
