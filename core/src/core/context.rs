// templar/src/core/context.rs

//! The per-run context store: a string-keyed bag of answers that steps write
//! (`set_many`) and later steps read back (`get`, `get_many`).
//!
//! Keys are declared once as typed `ContextKey<T>` constants, so the writer and
//! the reader of a key agree on its value type at compile time while the store
//! itself stays open-ended.

use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type StoredValue = Arc<dyn Any + Send + Sync>;

/// A typed name for one entry of the context store.
pub struct ContextKey<T> {
  name: &'static str,
  _value: PhantomData<fn() -> T>,
}

impl<T> ContextKey<T> {
  pub const fn new(name: &'static str) -> Self {
    Self {
      name,
      _value: PhantomData,
    }
  }

  pub const fn name(&self) -> &'static str {
    self.name
  }
}

impl<T> Clone for ContextKey<T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for ContextKey<T> {}

impl<T> fmt::Debug for ContextKey<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("ContextKey").field(&self.name).finish()
  }
}

/// A batch of writes applied by `ContextStore::set_many`.
///
/// A `None` value is a null write: it overwrites whatever was stored and reads
/// of that key fall back to their default afterwards.
#[derive(Default)]
pub struct ContextPatch {
  entries: Vec<(&'static str, Option<StoredValue>)>,
}

impl ContextPatch {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set<T: Send + Sync + 'static>(mut self, key: ContextKey<T>, value: T) -> Self {
    self.entries.push((key.name, Some(Arc::new(value))));
    self
  }

  pub fn set_opt<T: Send + Sync + 'static>(mut self, key: ContextKey<T>, value: Option<T>) -> Self {
    self
      .entries
      .push((key.name, value.map(|v| Arc::new(v) as StoredValue)));
    self
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl fmt::Debug for ContextPatch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list()
      .entries(self.entries.iter().map(|(name, value)| (name, value.is_some())))
      .finish()
  }
}

/// Shared handle to one run's context store.
///
/// Cloning the handle shares the same underlying map. Access is sequential (one
/// step at a time), and guards never outlive a single call, so nothing here is
/// held across an `.await`.
#[derive(Clone, Default)]
pub struct ContextStore(Arc<RwLock<HashMap<&'static str, Option<StoredValue>>>>);

impl ContextStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Merges every entry of `patch`, overwriting existing values.
  pub fn set_many(&self, patch: ContextPatch) {
    let mut guard = self.0.write();
    for (name, value) in patch.entries {
      guard.insert(name, value);
    }
  }

  /// Returns the stored value, or `default` when the key is absent, was
  /// written as null, or holds a value of another type.
  pub fn get<T: Clone + Send + Sync + 'static>(&self, key: ContextKey<T>, default: T) -> T {
    self.try_get(key).unwrap_or(default)
  }

  pub fn try_get<T: Clone + Send + Sync + 'static>(&self, key: ContextKey<T>) -> Option<T> {
    let guard = self.0.read();
    guard
      .get(key.name)
      .and_then(Option::as_ref)
      .and_then(|value| value.downcast_ref::<T>())
      .cloned()
  }

  pub fn contains(&self, name: &str) -> bool {
    matches!(self.0.read().get(name), Some(Some(_)))
  }

  /// Batch form of `get`: reads several keys under one lock. Absent keys are
  /// simply missing from the snapshot; callers supply their own defaults.
  pub fn get_many<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> ContextSnapshot {
    let guard = self.0.read();
    let values = names
      .into_iter()
      .filter_map(|name| {
        guard
          .get_key_value(name)
          .and_then(|(stored_name, value)| value.clone().map(|v| (*stored_name, v)))
      })
      .collect();
    ContextSnapshot { values }
  }
}

impl fmt::Debug for ContextStore {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let guard = self.0.read();
    let mut keys: Vec<_> = guard.keys().copied().collect();
    keys.sort_unstable();
    f.debug_struct("ContextStore").field("keys", &keys).finish()
  }
}

/// Values read by `ContextStore::get_many`.
pub struct ContextSnapshot {
  values: HashMap<&'static str, StoredValue>,
}

impl ContextSnapshot {
  pub fn get<T: Clone + Send + Sync + 'static>(&self, key: ContextKey<T>) -> Option<T> {
    self
      .values
      .get(key.name)
      .and_then(|value| value.downcast_ref::<T>())
      .cloned()
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}
