//! Ambient slot set and scoped providers
//!
//! Each thread carries one "current" [`ConfigSet`], initially empty. A
//! [`provide`] call rebinds it for the duration of a closure and restores the
//! previous set when the closure returns, returns an error, or panics.
//! Threads never see each other's bindings; code that crosses threads should
//! pass a `ConfigSet` explicitly and use [`ConfigSet::merge`].
//!
//! # Example
//!
//! ```rust
//! use slot_context::{context, Overrides, Renderer};
//!
//! let outer = Overrides::new().with("code", Renderer::tag("kbd"));
//! let inner = Overrides::new().with("h1", Renderer::tag("h2"));
//!
//! let seen = context::provide(&outer, || context::provide(&inner, || context::resolve(None)));
//! assert_eq!(seen.get("code"), Some(&Renderer::tag("kbd")));
//! assert_eq!(seen.get("h1"), Some(&Renderer::tag("h2")));
//!
//! // Outside both scopes the ambient set is empty again
//! assert!(context::resolve(None).is_empty());
//! ```

use std::cell::{Cell, RefCell};

use tracing::debug;

use crate::config_set::ConfigSet;
use crate::overrides::Overrides;

thread_local! {
    static AMBIENT: RefCell<ConfigSet> = RefCell::new(ConfigSet::new());
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Resolve the slot set for the current scope
///
/// With no overrides this is the ambient set itself (shared, not copied).
/// Otherwise override entries win per key and everything else comes from the
/// ambient set.
pub fn resolve(overrides: Option<&Overrides>) -> ConfigSet {
    let ambient = AMBIENT.with(|cell| cell.borrow().clone());
    match overrides {
        None => ambient,
        Some(overrides) => ambient.merge(overrides),
    }
}

/// Resolve by handing the ambient set to a function
///
/// The function's result is used as-is; it is not merged with the ambient set.
pub fn resolve_with<F>(f: F) -> ConfigSet
where
    F: FnOnce(&ConfigSet) -> ConfigSet,
{
    let ambient = resolve(None);
    f(&ambient)
}

/// Run `body` with the ambient set rebound to `resolve(Some(overrides))`
pub fn provide<T, B>(overrides: &Overrides, body: B) -> T
where
    B: FnOnce() -> T,
{
    scoped(resolve(Some(overrides)), body)
}

/// Run `body` with the ambient set rebound to `resolve_with(f)`
pub fn provide_with<T, F, B>(f: F, body: B) -> T
where
    F: FnOnce(&ConfigSet) -> ConfigSet,
    B: FnOnce() -> T,
{
    scoped(resolve_with(f), body)
}

/// Number of provider scopes currently open on this thread
pub fn depth() -> usize {
    DEPTH.with(Cell::get)
}

fn scoped<T, B>(slots: ConfigSet, body: B) -> T
where
    B: FnOnce() -> T,
{
    let _guard = ScopeGuard::enter(slots);
    body()
}

/// Restores the previous ambient set when dropped
struct ScopeGuard {
    previous: Option<ConfigSet>,
}

impl ScopeGuard {
    fn enter(slots: ConfigSet) -> Self {
        let bound = slots.len();
        let previous = AMBIENT.with(|cell| cell.replace(slots));
        let depth = DEPTH.with(|d| {
            d.set(d.get() + 1);
            d.get()
        });
        debug!(depth, slots = bound, "enter provider scope");
        Self {
            previous: Some(previous),
        }
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            // try_with: the guard may outlive thread-local storage during thread teardown
            let _ = AMBIENT.try_with(|cell| *cell.borrow_mut() = previous);
            let depth = DEPTH
                .try_with(|d| {
                    d.set(d.get().saturating_sub(1));
                    d.get()
                })
                .unwrap_or_default();
            debug!(depth, "leave provider scope");
        }
    }
}

enum Components<'a> {
    Overrides(&'a Overrides),
    Function(Box<dyn FnOnce(&ConfigSet) -> ConfigSet + 'a>),
}

/// Builder for a provider scope
///
/// `Provider::new(&o).run(body)` is the same as `provide(&o, body)`. With
/// [`disable_parent_context`](Provider::disable_parent_context) the scope
/// starts from an empty set instead of the ambient one.
pub struct Provider<'a> {
    components: Components<'a>,
    disable_parent_context: bool,
}

impl<'a> Provider<'a> {
    /// Provide a partial override
    pub fn new(overrides: &'a Overrides) -> Self {
        Self {
            components: Components::Overrides(overrides),
            disable_parent_context: false,
        }
    }

    /// Provide whatever `f` computes from the parent set
    pub fn with_fn<F>(f: F) -> Self
    where
        F: FnOnce(&ConfigSet) -> ConfigSet + 'a,
    {
        Self {
            components: Components::Function(Box::new(f)),
            disable_parent_context: false,
        }
    }

    /// Ignore the ambient set when building this scope
    pub fn disable_parent_context(mut self, disable: bool) -> Self {
        self.disable_parent_context = disable;
        self
    }

    /// The set this provider would bind
    pub fn value(self) -> ConfigSet {
        match (self.components, self.disable_parent_context) {
            (Components::Overrides(o), false) => resolve(Some(o)),
            (Components::Overrides(o), true) => ConfigSet::new().merge(o),
            (Components::Function(f), false) => resolve_with(f),
            (Components::Function(f), true) => f(&ConfigSet::new()),
        }
    }

    /// Run `body` inside this provider's scope
    pub fn run<T, B>(self, body: B) -> T
    where
        B: FnOnce() -> T,
    {
        scoped(self.value(), body)
    }
}
