pub mod construct;
pub mod marker;

pub use construct::*;
pub use marker::*;
