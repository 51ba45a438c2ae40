//! Service container.
//!
//! A [`Container`] maps case-insensitive names to services. Each entry is one
//! of three kinds:
//!
//! - **Reference**: a pre-built value, shared by every `get`.
//! - **Singleton**: built lazily by its factory on the first `get`, then cached.
//! - **Factory**: built anew by its factory on every `get`.
//!
//! The container is an ordinary value; nothing here is global.
//! [`Container::scope`] derives a child with the same registrations and empty
//! singleton caches, which is how a request gets its own instances.
//!
//! # Example
//!
//! ```rust,ignore
//! let container = Container::new();
//! container
//!     .singleton("clock", |_| Clock::new())
//!     .factory("counter", |_| Counter::default())
//!     .reference("name", String::from("orange"));
//!
//! let clock: Arc<Clock> = container.get("clock")?;
//! ```

use indexmap::IndexMap;
use orange_core::{BoxError, ContainerError};
use std::{
    any::{Any, type_name},
    fmt,
    sync::{Arc, Mutex, OnceLock, PoisonError, RwLock},
};

type Instance = Arc<dyn Any + Send + Sync>;
type ServiceFactory = Arc<dyn Fn(&Container) -> Result<Instance, BoxError> + Send + Sync>;

enum Service {
    Reference(Instance),
    Singleton {
        factory: ServiceFactory,
        instance: OnceLock<Instance>,
        init: Mutex<()>,
    },
    Factory(ServiceFactory),
}

impl Service {
    fn kind(&self) -> &'static str {
        match self {
            Service::Reference(_) => "reference",
            Service::Singleton { .. } => "singleton",
            Service::Factory(_) => "factory",
        }
    }
}

/// A name → service registry with singleton and factory semantics.
#[derive(Default)]
pub struct Container {
    services: RwLock<IndexMap<String, Arc<Service>>>,
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service built by `factory`.
    ///
    /// With `singleton` the factory runs once, on first resolution. Without it
    /// the factory runs on every resolution.
    pub fn register<T, F>(&self, name: &str, factory: F, singleton: bool) -> &Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> T + Send + Sync + 'static,
    {
        self.try_register(name, move |c| Ok::<T, BoxError>(factory(c)), singleton)
    }

    /// Register a service whose factory may fail.
    ///
    /// A failing singleton is not cached; the next resolution runs the factory again.
    pub fn try_register<T, E, F>(&self, name: &str, factory: F, singleton: bool) -> &Self
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(&Container) -> Result<T, E> + Send + Sync + 'static,
    {
        let factory: ServiceFactory =
            Arc::new(move |c: &Container| -> Result<Instance, BoxError> {
                match factory(c) {
                    Ok(value) => Ok(Arc::new(value)),
                    Err(e) => Err(e.into()),
                }
            });

        let service = if singleton {
            Service::Singleton {
                factory,
                instance: OnceLock::new(),
                init: Mutex::new(()),
            }
        } else {
            Service::Factory(factory)
        };

        self.insert(name, service)
    }

    /// Register a lazily built, cached service.
    pub fn singleton<T, F>(&self, name: &str, factory: F) -> &Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> T + Send + Sync + 'static,
    {
        self.register(name, factory, true)
    }

    /// Register a service that is built anew on every resolution.
    pub fn factory<T, F>(&self, name: &str, factory: F) -> &Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> T + Send + Sync + 'static,
    {
        self.register(name, factory, false)
    }

    /// Register a pre-built value.
    pub fn reference<T: Any + Send + Sync>(&self, name: &str, value: T) -> &Self {
        self.reference_arc(name, Arc::new(value))
    }

    /// Register a pre-built value that is already shared.
    pub fn reference_arc<T: Any + Send + Sync>(&self, name: &str, value: Arc<T>) -> &Self {
        self.insert(name, Service::Reference(value))
    }

    /// Alias of [`Container::reference`].
    pub fn set<T: Any + Send + Sync>(&self, name: &str, value: T) -> &Self {
        self.reference(name, value)
    }

    /// Resolve a service.
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, ContainerError> {
        let key = normalize(name);

        // The table lock is released before any factory runs so that factories
        // can resolve their own dependencies.
        let service = self
            .read()
            .get(&key)
            .cloned()
            .ok_or_else(|| ContainerError::ServiceNotFound(key.clone()))?;

        let instance = match &*service {
            Service::Reference(value) => Arc::clone(value),
            Service::Factory(factory) => {
                tracing::trace!(service = %key, "building factory service");
                factory(self).map_err(|source| ContainerError::ServiceFailed {
                    name: key.clone(),
                    source,
                })?
            }
            Service::Singleton {
                factory,
                instance,
                init,
            } => match instance.get() {
                Some(value) => Arc::clone(value),
                None => {
                    let _guard = init.lock().unwrap_or_else(PoisonError::into_inner);
                    match instance.get() {
                        Some(value) => Arc::clone(value),
                        None => {
                            tracing::debug!(service = %key, "instantiating singleton");
                            let value = factory(self).map_err(|source| {
                                ContainerError::ServiceFailed {
                                    name: key.clone(),
                                    source,
                                }
                            })?;
                            Arc::clone(instance.get_or_init(|| value))
                        }
                    }
                }
            },
        };

        instance
            .downcast::<T>()
            .map_err(|_| ContainerError::ServiceTypeMismatch {
                name: key,
                expected: type_name::<T>(),
            })
    }

    /// A child container with the same registrations.
    ///
    /// References and factories are shared with `self`. Singletons keep their
    /// factory but start uncached, so the child builds its own instance.
    /// Registrations made afterwards on either side are not seen by the other.
    pub fn scope(&self) -> Container {
        let services = self
            .read()
            .iter()
            .map(|(name, service)| {
                let service = match &**service {
                    Service::Singleton { factory, .. } => Arc::new(Service::Singleton {
                        factory: Arc::clone(factory),
                        instance: OnceLock::new(),
                        init: Mutex::new(()),
                    }),
                    _ => Arc::clone(service),
                };
                (name.clone(), service)
            })
            .collect();

        Container {
            services: RwLock::new(services),
        }
    }

    /// Check if a service is registered.
    pub fn has(&self, name: &str) -> bool {
        self.read().contains_key(&normalize(name))
    }

    /// Remove a service, returning true if it was registered.
    pub fn remove(&self, name: &str) -> bool {
        self.write().shift_remove(&normalize(name)).is_some()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Get the number of registered services.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the container is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn insert(&self, name: &str, service: Service) -> &Self {
        let key = normalize(name);
        tracing::trace!(service = %key, kind = service.kind(), "registering service");
        self.write().insert(key, Arc::new(service));
        self
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, IndexMap<String, Arc<Service>>> {
        self.services.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, IndexMap<String, Arc<Service>>> {
        self.services.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let services = self.read();
        f.debug_map()
            .entries(services.iter().map(|(name, service)| (name, service.kind())))
            .finish()
    }
}

fn normalize(name: &str) -> String {
    name.to_lowercase()
}
