//! Context - registry and dispatcher for named units of work

use crate::core::{
    executable::{Birbable, Executable, Payload},
    options::{Group, Lifetime},
    state::DispatchOutcome,
};
use crate::execution::dispatcher::Dispatcher;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tracing::{debug, error};

/// Whether a registration survives being triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Removed when triggered
    Once,
    /// Kept until explicitly unsigned
    Persistent,
}

impl Retention {
    /// Group members are always transient because triggering one discards the group
    pub fn for_unit<S, U: Executable<S> + ?Sized>(unit: &U) -> Self {
        if unit.belongs_to_group() {
            return Retention::Once;
        }

        match unit.lifetime() {
            Lifetime::Single => Retention::Once,
            Lifetime::Durable => Retention::Persistent,
        }
    }
}

struct Registration<S> {
    unit: Arc<Birbable<S>>,
    retention: Retention,
}

/// Insertion-ordered name -> registration map
struct Registry<S> {
    entries: Vec<Registration<S>>,
}

impl<S: Send + 'static> Registry<S> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|r| r.unit.name() == name)
    }

    fn get(&self, name: &str) -> Option<&Registration<S>> {
        self.position(name).map(|idx| &self.entries[idx])
    }

    /// Insert, replacing an existing registration in its original slot
    fn insert(&mut self, registration: Registration<S>) -> bool {
        match self.position(registration.unit.name()) {
            Some(idx) => {
                self.entries[idx] = registration;
                true
            }
            None => {
                self.entries.push(registration);
                false
            }
        }
    }

    fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    fn remove_group(&mut self, group: &Group) -> Vec<String> {
        let mut removed = Vec::new();
        self.entries.retain(|r| {
            if r.unit.group() == Some(group) {
                removed.push(r.unit.name().to_string());
                false
            } else {
                true
            }
        });
        removed
    }

    fn names(&self) -> Vec<String> {
        self.entries.iter().map(|r| r.unit.name().to_string()).collect()
    }
}

struct ContextInner<S> {
    identifier: String,
    state: Mutex<S>,
    registry: Mutex<Registry<S>>,
    dispatcher: Dispatcher,
}

/// A named holder of user state on which procedures and pipelines are signed
///
/// `Context` is a cheap handle: clones refer to the same registry and state.
/// Units of work receive the context they were triggered on and mutate its
/// state through [`Context::with_state`].
pub struct Context<S> {
    inner: Arc<ContextInner<S>>,
}

impl<S> Clone for Context<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> std::fmt::Debug for Context<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("identifier", &self.inner.identifier)
            .finish_non_exhaustive()
    }
}

impl<S: Send + 'static> Context<S> {
    /// Create a new context with an immutable identifier
    pub fn new(identifier: impl Into<String>, state: S) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                identifier: identifier.into(),
                state: Mutex::new(state),
                registry: Mutex::new(Registry::new()),
                dispatcher: Dispatcher::new(),
            }),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.inner.identifier
    }

    fn registry(&self) -> MutexGuard<'_, Registry<S>> {
        self.inner.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a closure against the context state
    ///
    /// The lock is released before this returns, so it is never held across
    /// an `.await`.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut state = self.inner.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> S
    where
        S: Clone,
    {
        self.with_state(|state| state.clone())
    }

    /// Sign a unit of work. Only signed units can be triggered.
    ///
    /// A unit signed under a name that is already registered replaces the
    /// earlier registration.
    pub fn sign(&self, unit: impl Into<Birbable<S>>) -> &Self {
        let unit = unit.into();
        let retention = Retention::for_unit(&unit);
        let name = unit.name().to_string();

        let replaced = self.registry().insert(Registration {
            unit: Arc::new(unit),
            retention,
        });

        debug!(
            "Signed '{}' on context '{}' ({:?}{})",
            name,
            self.inner.identifier,
            retention,
            if replaced { ", replaced" } else { "" }
        );
        self
    }

    /// Remove a signed unit by name. Unknown names are ignored.
    pub fn unsign(&self, name: &str) -> &Self {
        if self.registry().remove(name) {
            debug!("Unsigned '{}' from context '{}'", name, self.inner.identifier);
        }
        self
    }

    /// Trigger a signed unit of work without waiting for it
    ///
    /// Unknown names are a silent no-op. Otherwise the discard policy is
    /// applied first: a group member removes its whole group, a single-use
    /// unit removes itself. The execution is then spawned and this returns
    /// immediately; use [`Context::settle`] to observe the result.
    ///
    /// Outside of a Tokio runtime nothing is discarded or run, and the
    /// attempt is logged as an error.
    pub fn trigger(&self, name: &str, payload: Option<Payload>) -> &Self {
        let (unit, runtime) = {
            let mut registry = self.registry();
            let (unit, retention) = match registry.get(name) {
                Some(registration) => (Arc::clone(&registration.unit), registration.retention),
                None => {
                    debug!(
                        "Ignoring trigger of unsigned '{}' on context '{}'",
                        name, self.inner.identifier
                    );
                    return self;
                }
            };

            let runtime = match Handle::try_current() {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!(
                        "Cannot trigger '{}' on context '{}': {}",
                        name, self.inner.identifier, e
                    );
                    return self;
                }
            };

            if let Some(group) = unit.group() {
                let removed = registry.remove_group(group);
                debug!(
                    "Discarded group '{}' from context '{}': {:?}",
                    group, self.inner.identifier, removed
                );
            } else if retention == Retention::Once {
                registry.remove(name);
            }

            (unit, runtime)
        };

        let context = self.clone();
        self.inner
            .dispatcher
            .spawn(&runtime, &self.inner.identifier, name, async move {
                unit.execute(&context, payload).await
            });

        self
    }

    pub fn is_signed(&self, name: &str) -> bool {
        self.registry().position(name).is_some()
    }

    /// Names of signed units in registration order
    pub fn signed_names(&self) -> Vec<String> {
        self.registry().names()
    }

    pub fn len(&self) -> usize {
        self.registry().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait for every triggered execution on this context to finish
    pub async fn settle(&self) -> Vec<DispatchOutcome> {
        self.inner.dispatcher.settle().await
    }
}
