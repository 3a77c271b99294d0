pub mod config;
pub mod error;
pub mod picking;
pub mod state;
pub mod synchronizer;
pub mod view;

pub use config::*;
pub use error::*;
pub use picking::*;
pub use state::*;
pub use synchronizer::*;
pub use view::*;
