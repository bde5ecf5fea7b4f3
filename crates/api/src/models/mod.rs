pub mod marker;
pub mod namespace;
pub mod resource;
pub mod type_name;

pub use marker::*;
pub use namespace::*;
pub use resource::*;
pub use type_name::*;
