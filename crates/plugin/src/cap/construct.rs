use autofactory_api::{ConstructError, TypeName};
use std::any::Any;

/// Type-erased module instance.
pub type Instance = Box<dyn Any + Send + Sync>;

/// Builds instances through a type's parameterless constructor.
pub trait TypeConstructor: Send + Sync {
    fn construct(&self, ty: &TypeName) -> Result<Instance, ConstructError>;
}
