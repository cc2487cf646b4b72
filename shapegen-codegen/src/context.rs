//! Per-session generation context.
//!
//! A [`GenerationContext`] is created for each session and shared by every
//! generator and post-generate task in it. It holds:
//!
//! - a concurrent typed map that falls back to [`Settings`] on a miss,
//! - a category registry mapping names to ordered sets of paths, used to hand
//!   files between generators that know nothing about each other,
//! - the session's post-generate task queue.
//!
//! While a session runs, the context is also reachable through
//! [`GenerationContext::current`] on the running thread.

use std::{
    cell::RefCell,
    fmt,
    marker::PhantomData,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use dashmap::{DashMap, mapref::entry::Entry};
use indexmap::{IndexMap, IndexSet};
use shapegen_core::{AnyValue, ErasedKey, Settings, SettingsKey};

use crate::{DestinationResolver, PostTaskQueue};

/// Well-known category names.
pub mod category {
    /// Markup and static assets produced by a front-end build.
    pub const MARKUP: &str = "markup";
    /// API description documents.
    pub const SWAGGER: &str = "swagger";
}

thread_local! {
    static CURRENT: RefCell<Option<Arc<GenerationContext>>> = const { RefCell::new(None) };
}

pub struct GenerationContext {
    settings: Arc<Settings>,
    values: DashMap<ErasedKey, AnyValue>,
    categories: Mutex<IndexMap<String, IndexSet<PathBuf>>>,
    destinations: Arc<dyn DestinationResolver>,
    post_tasks: PostTaskQueue,
}

impl GenerationContext {
    pub fn new(settings: Arc<Settings>, destinations: Arc<dyn DestinationResolver>) -> Self {
        Self {
            settings,
            values: DashMap::new(),
            categories: Mutex::new(IndexMap::new()),
            destinations,
            post_tasks: PostTaskQueue::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn destinations(&self) -> &dyn DestinationResolver {
        self.destinations.as_ref()
    }

    /// Post-generate tasks registered so far in this session.
    pub fn post_tasks(&self) -> &PostTaskQueue {
        &self.post_tasks
    }

    // =========================================================================
    // Typed values
    // =========================================================================

    fn local<T: Clone + Send + Sync + 'static>(&self, key: &SettingsKey<T>) -> Option<T> {
        self.values
            .get(&key.erased())
            .and_then(|value| key.cast(value.value().as_ref()).cloned())
    }

    /// The value for `key`, falling back to the session settings.
    pub fn get<T: Clone + Send + Sync + 'static>(&self, key: &SettingsKey<T>) -> Option<T> {
        self.local(key).or_else(|| self.settings.get(key))
    }

    /// Whether a value is present here or in the settings.
    pub fn contains<T: Clone + Send + Sync + 'static>(&self, key: &SettingsKey<T>) -> bool {
        self.values.contains_key(&key.erased()) || self.settings.get(key).is_some()
    }

    /// Store a value, returning true if a previous context value was replaced.
    pub fn put<T: Send + Sync + 'static>(&self, key: &SettingsKey<T>, value: T) -> bool {
        self.values.insert(key.erased(), Arc::new(value)).is_some()
    }

    /// Remove a context value. Settings are unaffected.
    pub fn remove<T: Send + Sync + 'static>(&self, key: &SettingsKey<T>) -> bool {
        self.values.remove(&key.erased()).is_some()
    }

    /// The existing value for `key`, or the result of `f`, which is stored.
    ///
    /// `f` runs without any lock held. If two threads race, the first value
    /// stored wins and both callers receive it.
    pub fn compute_if_absent<T, F>(&self, key: &SettingsKey<T>, f: F) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        if let Some(existing) = self.get(key) {
            return existing;
        }
        let value = f();
        match self.values.entry(key.erased()) {
            Entry::Occupied(entry) => key.cast(entry.get().as_ref()).cloned().unwrap_or(value),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(value.clone()));
                value
            }
        }
    }

    /// Run `body` with `key` temporarily set to `value`.
    ///
    /// The previous value (or its absence) is restored afterwards, also when
    /// `body` panics. Only one override per key may be in flight at a time.
    pub fn with<T, R>(&self, key: &SettingsKey<T>, value: T, body: impl FnOnce() -> R) -> R
    where
        T: Send + Sync + 'static,
    {
        let erased = key.erased();
        let previous = self.values.insert(erased.clone(), Arc::new(value));
        let _restore = Restore {
            values: &self.values,
            key: erased,
            previous,
        };
        body()
    }

    // =========================================================================
    // Categories
    // =========================================================================

    fn lock_categories(&self) -> std::sync::MutexGuard<'_, IndexMap<String, IndexSet<PathBuf>>> {
        self.categories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Tag `path` as belonging to `category`.
    pub fn register_path(&self, category: &str, path: impl Into<PathBuf>) {
        self.lock_categories()
            .entry(category.to_string())
            .or_default()
            .insert(path.into());
    }

    pub fn register_paths<I, P>(&self, category: &str, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut categories = self.lock_categories();
        let set = categories.entry(category.to_string()).or_default();
        for path in paths {
            set.insert(path.into());
        }
    }

    /// Paths registered under `category`, in registration order.
    pub fn registered_paths(&self, category: &str) -> IndexSet<PathBuf> {
        self.lock_categories()
            .get(category)
            .cloned()
            .unwrap_or_default()
    }

    /// Names of every category with at least one registration.
    pub fn categories(&self) -> Vec<String> {
        self.lock_categories().keys().cloned().collect()
    }

    /// A copy of the whole category registry as it is now.
    pub fn category_snapshot(&self) -> CategorySnapshot {
        CategorySnapshot(self.lock_categories().clone())
    }

    // =========================================================================
    // Ambient access
    // =========================================================================

    /// The context entered on this thread, if any.
    pub fn current() -> Option<Arc<GenerationContext>> {
        CURRENT.with(|current| current.borrow().clone())
    }

    /// Make this context current on this thread until the guard drops.
    pub fn enter(self: &Arc<Self>) -> ContextGuard {
        let previous = CURRENT.with(|current| current.replace(Some(Arc::clone(self))));
        ContextGuard {
            previous,
            _not_send: PhantomData,
        }
    }

    /// Run `body` with this context current on this thread.
    pub fn run<R>(self: &Arc<Self>, body: impl FnOnce() -> R) -> R {
        let _guard = self.enter();
        body()
    }
}

impl fmt::Debug for GenerationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationContext")
            .field("settings", &self.settings)
            .field("values", &self.values.len())
            .field("categories", &self.categories())
            .field("post_tasks", &self.post_tasks)
            .finish_non_exhaustive()
    }
}

struct Restore<'a> {
    values: &'a DashMap<ErasedKey, AnyValue>,
    key: ErasedKey,
    previous: Option<AnyValue>,
}

impl Drop for Restore<'_> {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(previous) => {
                self.values.insert(self.key.clone(), previous);
            }
            None => {
                self.values.remove(&self.key);
            }
        }
    }
}

/// Restores the previously current context when dropped.
#[must_use = "the context is only current while the guard is alive"]
pub struct ContextGuard {
    previous: Option<Arc<GenerationContext>>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|current| {
            *current.borrow_mut() = previous;
        });
    }
}

/// Read-only copy of the category registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySnapshot(IndexMap<String, IndexSet<PathBuf>>);

impl CategorySnapshot {
    /// Paths in `category`; empty if it was never registered.
    pub fn get(&self, category: &str) -> IndexSet<PathBuf> {
        self.0.get(category).cloned().unwrap_or_default()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.get(category).is_some_and(|set| !set.is_empty())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
