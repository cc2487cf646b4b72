//! Immutable, layered generation settings.
//!
//! [`Settings`] holds three independent layers:
//!
//! - free-form string settings (`"java.package-prefix" = "com.example"`),
//! - switches, grouped by the enum type that declares them ([`Switch`]),
//! - typed values addressed by a [`SettingsKey`].
//!
//! Settings are built once through a [`SettingsBuilder`] and never mutated
//! afterwards; [`Settings::to_builder`] derives a modified copy.

use std::{
    any::{Any, TypeId, type_name},
    borrow::Cow,
    collections::HashMap,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    sync::Arc,
};

use indexmap::{IndexMap, IndexSet};

/// A type-erased, shareable settings value.
pub type AnyValue = Arc<dyn Any + Send + Sync>;

/// A typed, named key for values stored in [`Settings`] or a generation
/// context.
///
/// Two keys are equal when both the name and the value type match, so
/// `SettingsKey::<String>::new("x")` and `SettingsKey::<u32>::new("x")`
/// address different entries.
pub struct SettingsKey<T> {
    name: Cow<'static, str>,
    _type: PhantomData<fn() -> T>,
}

impl<T: 'static> SettingsKey<T> {
    /// Create a key with a static name, usable in `const` items.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            _type: PhantomData,
        }
    }

    /// Create a key with a computed name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            _type: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The runtime tag used as the map key.
    pub fn erased(&self) -> ErasedKey {
        ErasedKey {
            name: self.name.clone(),
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Downcast a stored value to this key's type.
    pub fn cast<'a>(&self, value: &'a (dyn Any + Send + Sync)) -> Option<&'a T> {
        value.downcast_ref::<T>()
    }
}

impl<T> Clone for SettingsKey<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _type: PhantomData,
        }
    }
}

impl<T: 'static> PartialEq for SettingsKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T: 'static> Eq for SettingsKey<T> {}

impl<T: 'static> Hash for SettingsKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.erased().hash(state);
    }
}

impl<T: 'static> fmt::Debug for SettingsKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SettingsKey<{}>({})", type_name::<T>(), self.name)
    }
}

/// The type-erased identity of a [`SettingsKey`]: its name plus value type.
#[derive(Clone)]
pub struct ErasedKey {
    name: Cow<'static, str>,
    type_id: TypeId,
    type_name: &'static str,
}

impl ErasedKey {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for ErasedKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.name == other.name
    }
}

impl Eq for ErasedKey {}

impl Hash for ErasedKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ErasedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.type_name)
    }
}

/// Marker for enums whose variants act as boolean feature switches.
///
/// Each implementing type forms its own switch group.
pub trait Switch: fmt::Debug + Copy + Eq + Hash + Send + Sync + 'static {}

/// Switches understood by the generation engine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationSwitch {
    /// Run everything but leave the filesystem untouched.
    DryRun,
    /// Log more detail.
    Verbose,
    /// Emit debugging aids into generated code and logs.
    Debug,
    /// Do not delete the directory children of destination roots before
    /// writing.
    DontCleanSourceRoots,
    /// Do not write marker files into directories containing generated code.
    DontGenerateWarningFiles,
}

impl Switch for GenerationSwitch {}

#[derive(Clone)]
struct SwitchGroup {
    type_name: &'static str,
    members: AnyValue,
    labels: Vec<String>,
}

/// Immutable generation settings. See the module docs.
#[derive(Clone, Default)]
pub struct Settings {
    strings: IndexMap<String, String>,
    switches: HashMap<TypeId, SwitchGroup>,
    values: HashMap<ErasedKey, AnyValue>,
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// A builder pre-populated with these settings.
    pub fn to_builder(&self) -> SettingsBuilder {
        SettingsBuilder {
            settings: self.clone(),
        }
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// `Some(true)` only for a case-insensitive `"true"`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get_string(key).map(|v| v.eq_ignore_ascii_case("true"))
    }

    /// The setting parsed as an `i32`; `None` if absent or unparsable.
    pub fn get_i32(&self, key: &str) -> Option<i32> {
        self.get_string(key).and_then(|v| v.parse().ok())
    }

    /// The setting parsed as an `i64`; `None` if absent or unparsable.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get_string(key).and_then(|v| v.parse().ok())
    }

    /// All string settings in insertion order.
    pub fn strings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.strings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether a switch is set. Groups never touched report `false`.
    pub fn is<S: Switch>(&self, switch: S) -> bool {
        self.switches
            .get(&TypeId::of::<S>())
            .and_then(|group| group.members.downcast_ref::<IndexSet<S>>())
            .is_some_and(|set| set.contains(&switch))
    }

    /// The typed value stored under `key`, if any.
    pub fn get<T: Clone + Send + Sync + 'static>(&self, key: &SettingsKey<T>) -> Option<T> {
        self.get_any(&key.erased())
            .and_then(|value| key.cast(value.as_ref()))
            .cloned()
    }

    /// The raw stored value for an erased key.
    pub fn get_any(&self, key: &ErasedKey) -> Option<&AnyValue> {
        self.values.get(key)
    }

    pub fn dry_run(&self) -> bool {
        self.is(GenerationSwitch::DryRun)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let switches: Vec<String> = self
            .switches
            .values()
            .map(|g| format!("{}{:?}", g.type_name, g.labels))
            .collect();
        f.debug_struct("Settings")
            .field("strings", &self.strings)
            .field("switches", &switches)
            .field("values", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builds [`Settings`].
#[derive(Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    /// Set a string setting. Both name and value are trimmed.
    pub fn with_string(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.settings.strings.insert(
            name.as_ref().trim().to_string(),
            value.as_ref().trim().to_string(),
        );
        self
    }

    pub fn with_int(self, name: impl AsRef<str>, value: i64) -> Self {
        self.with_string(name, value.to_string())
    }

    /// Add every entry of `settings` as a string setting.
    pub fn with_string_settings<I, K, V>(mut self, settings: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (k, v) in settings {
            self = self.with_string(k, v);
        }
        self
    }

    /// Turn on a switch.
    pub fn with_switch<S: Switch>(mut self, switch: S) -> Self {
        let group = self
            .settings
            .switches
            .entry(TypeId::of::<S>())
            .or_insert_with(|| SwitchGroup {
                type_name: type_name::<S>(),
                members: Arc::new(IndexSet::<S>::new()),
                labels: Vec::new(),
            });
        let mut members = group
            .members
            .downcast_ref::<IndexSet<S>>()
            .cloned()
            .unwrap_or_default();
        if members.insert(switch) {
            group.labels.push(format!("{:?}", switch));
        }
        group.members = Arc::new(members);
        self
    }

    /// Turn on a switch when `enabled` is true.
    pub fn with_switch_if<S: Switch>(self, enabled: bool, switch: S) -> Self {
        if enabled { self.with_switch(switch) } else { self }
    }

    /// Store a typed value.
    pub fn with_value<T: Send + Sync + 'static>(mut self, key: &SettingsKey<T>, value: T) -> Self {
        self.settings.values.insert(key.erased(), Arc::new(value));
        self
    }

    pub fn build(self) -> Settings {
        self.settings
    }
}
