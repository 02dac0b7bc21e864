use crate::error::ModuleMapError;
use crate::module::ModuleUrl;
use crate::module_job::{JobHandle, ModuleJob};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

// Loader-level cache of module jobs, keyed by normalised URL.
//
// The map wraps its storage instead of exposing it: `has`, `get` and `set`
// are the only ways in, and every one of them validates its arguments first.

/// Anything that may be offered to the map as a key.
pub trait CacheKey {
  fn cache_key(&self) -> Result<&str, ModuleMapError>;
}

impl CacheKey for str {
  fn cache_key(&self) -> Result<&str, ModuleMapError> {
    if self.is_empty() {
      return Err(ModuleMapError::invalid_key("an empty string"));
    }
    Ok(self)
  }
}

impl CacheKey for String {
  fn cache_key(&self) -> Result<&str, ModuleMapError> {
    self.as_str().cache_key()
  }
}

impl CacheKey for ModuleUrl {
  fn cache_key(&self) -> Result<&str, ModuleMapError> {
    Ok(self.as_str())
  }
}

impl CacheKey for serde_json::Value {
  fn cache_key(&self) -> Result<&str, ModuleMapError> {
    match self {
      serde_json::Value::String(key) => key.cache_key(),
      other => Err(ModuleMapError::invalid_key(describe_json(other))),
    }
  }
}

/// Anything that may be offered to the map as a value. Only real module jobs
/// get through.
pub trait CacheValue {
  fn into_job(self) -> Result<JobHandle, ModuleMapError>;
}

impl CacheValue for JobHandle {
  fn into_job(self) -> Result<JobHandle, ModuleMapError> {
    Ok(self)
  }
}

impl CacheValue for Option<JobHandle> {
  fn into_job(self) -> Result<JobHandle, ModuleMapError> {
    self.ok_or_else(|| ModuleMapError::invalid_value("null"))
  }
}

impl CacheValue for Arc<dyn Any + Send + Sync> {
  fn into_job(self) -> Result<JobHandle, ModuleMapError> {
    self
      .downcast::<ModuleJob>()
      .map_err(|_| ModuleMapError::invalid_value("an instance of another type"))
  }
}

impl CacheValue for serde_json::Value {
  fn into_job(self) -> Result<JobHandle, ModuleMapError> {
    Err(ModuleMapError::invalid_value(describe_json(&self)))
  }
}

fn describe_json(value: &serde_json::Value) -> String {
  use serde_json::Value;

  match value {
    Value::Null => "null".to_string(),
    Value::Bool(b) => format!("type boolean ({})", b),
    Value::Number(n) => format!("type number ({})", n),
    Value::String(s) => format!("type string ('{}')", s),
    Value::Array(_) => "an instance of Array".to_string(),
    Value::Object(_) => "an instance of Object".to_string(),
  }
}

#[derive(Debug, Default)]
pub struct ModuleMap {
  jobs: HashMap<String, JobHandle>,
}

impl ModuleMap {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn has<K: CacheKey + ?Sized>(&self, url: &K) -> Result<bool, ModuleMapError> {
    let url = url.cache_key()?;
    Ok(self.jobs.contains_key(url))
  }

  /// Returns the job stored under `url`. The handle is shared with every other
  /// caller that asked for the same URL.
  pub fn get<K: CacheKey + ?Sized>(&self, url: &K) -> Result<Option<JobHandle>, ModuleMapError> {
    let url = url.cache_key()?;
    Ok(self.jobs.get(url).cloned())
  }

  /// Stores `job` under `url`, replacing whatever was there. Whether a
  /// replacement is legitimate is for the loader to decide before calling.
  pub fn set<K: CacheKey + ?Sized>(
    &mut self,
    url: &K,
    job: impl CacheValue,
  ) -> Result<&mut Self, ModuleMapError> {
    let url = url.cache_key()?;
    let job = job.into_job()?;

    tracing::debug!(target: "esm", "Storing {} in ModuleMap", url);
    self.jobs.insert(url.to_owned(), job);
    Ok(self)
  }

  pub fn len(&self) -> usize {
    self.jobs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.jobs.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &JobHandle)> + '_ {
    self.jobs.iter().map(|(url, job)| (url.as_str(), job))
  }
}

/// A module map for loaders whose resolution runs on several threads.
///
/// `get_or_insert_with` is the operation such loaders need: the presence
/// check and the insert happen under one write lock, so two threads asking for
/// the same URL can never both create a job.
#[derive(Debug, Clone, Default)]
pub struct SharedModuleMap {
  inner: Arc<RwLock<ModuleMap>>,
}

impl SharedModuleMap {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn has<K: CacheKey + ?Sized>(&self, url: &K) -> Result<bool, ModuleMapError> {
    self.inner.read().has(url)
  }

  pub fn get<K: CacheKey + ?Sized>(&self, url: &K) -> Result<Option<JobHandle>, ModuleMapError> {
    self.inner.read().get(url)
  }

  pub fn set<K: CacheKey + ?Sized>(&self, url: &K, job: impl CacheValue) -> Result<(), ModuleMapError> {
    self.inner.write().set(url, job)?;
    Ok(())
  }

  /// Returns the job for `url`, creating and storing one with `create` if
  /// there is none. The flag is true when this call did the insert.
  pub fn get_or_insert_with<K, F>(&self, url: &K, create: F) -> Result<(JobHandle, bool), ModuleMapError>
  where
    K: CacheKey + ?Sized,
    F: FnOnce() -> JobHandle,
  {
    let key = url.cache_key()?;
    if let Some(job) = self.inner.read().get(key)? {
      return Ok((job, false));
    }

    let mut map = self.inner.write();
    // another thread may have won between the two locks
    if let Some(job) = map.get(key)? {
      return Ok((job, false));
    }
    let job = create();
    map.set(key, job.clone())?;
    Ok((job, true))
  }

  pub fn len(&self) -> usize {
    self.inner.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.inner.read().is_empty()
  }
}
