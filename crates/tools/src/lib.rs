pub mod render;
pub mod script;
pub mod session;
