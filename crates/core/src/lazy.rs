//! Lazy cell: deferred construction and explicit teardown of one instance.
//!
//! A cell starts uninitialized. [`LazyCell::get_or_create`] runs the factory
//! on first use and hands out the same `Arc` until [`LazyCell::clear`] runs
//! the cleanup hook and drops the instance.
//!
//! The state transition is guarded by a mutex: concurrent callers racing on
//! an uninitialized cell invoke the factory exactly once. The factory and the
//! cleanup hook run while that mutex is held and must not call back into the
//! same cell.

use autofactory_api::ConstructError;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub type Factory<T> = Box<dyn Fn() -> Result<Arc<T>, ConstructError> + Send + Sync>;
pub type Cleanup<T> = Box<dyn Fn(&T) + Send + Sync>;

pub struct LazyCell<T: ?Sized> {
    slot: Mutex<Option<Arc<T>>>,
    factory: Factory<T>,
    cleanup: Option<Cleanup<T>>,
}

impl<T: ?Sized + Send + Sync> LazyCell<T> {
    pub fn new(
        factory: impl Fn() -> Result<Arc<T>, ConstructError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            slot: Mutex::new(None),
            factory: Box::new(factory),
            cleanup: None,
        }
    }

    /// Hook receiving the live instance right before `clear` drops it.
    pub fn with_cleanup(mut self, cleanup: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.cleanup = Some(Box::new(cleanup));
        self
    }

    /// Start initialized with an existing instance.
    pub fn with_instance(self, instance: Arc<T>) -> Self {
        *self.lock() = Some(instance);
        self
    }

    pub fn is_present(&self) -> bool {
        self.lock().is_some()
    }

    /// Current instance without creating one.
    pub fn get(&self) -> Option<Arc<T>> {
        self.lock().clone()
    }

    /// Instance of this cycle, creating it on first call.
    ///
    /// A failing factory leaves the cell uninitialized.
    pub fn get_or_create(&self) -> Result<Arc<T>, ConstructError> {
        let mut slot = self.lock();
        if let Some(instance) = slot.as_ref() {
            return Ok(Arc::clone(instance));
        }

        let instance = (self.factory)()?;
        *slot = Some(Arc::clone(&instance));
        Ok(instance)
    }

    /// Run the cleanup hook on the live instance (if both exist) and return
    /// to the uninitialized state. Safe to call repeatedly.
    pub fn clear(&self) {
        let mut slot = self.lock();
        if let Some(instance) = slot.take() {
            if let Some(cleanup) = &self.cleanup {
                cleanup(&instance);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<T>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Send + Sync + 'static> LazyCell<T> {
    /// Cell around an infallible factory.
    pub fn from_fn(factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self::new(move || Ok(Arc::new(factory())))
    }
}

impl LazyCell<dyn Any + Send + Sync> {
    /// [`get_or_create`](Self::get_or_create) downcast to `T`; `None` if the
    /// instance is of another type.
    pub fn get_or_create_as<T: Any + Send + Sync>(&self) -> Result<Option<Arc<T>>, ConstructError> {
        let instance = self.get_or_create()?;
        Ok(instance.downcast::<T>().ok())
    }
}

impl<T: ?Sized> fmt::Debug for LazyCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present = self
            .slot
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or_else(|poisoned| poisoned.into_inner().is_some());
        f.debug_struct("LazyCell")
            .field("present", &present)
            .field("has_cleanup", &self.cleanup.is_some())
            .finish()
    }
}
