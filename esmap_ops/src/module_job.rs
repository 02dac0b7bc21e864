use crate::module::ModuleUrl;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Shared reference to a job. The loader owns the job's lifecycle; the module
/// map and other jobs only hold handles.
pub type JobHandle = Arc<ModuleJob>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
  Pending,
  Linking,
  Linked,
  Errored,
}

/// The unit of work for a single module URL.
///
/// Dependencies are recorded as URLs and looked up through the module map,
/// so a cycle in the import graph never becomes a cycle of `Arc`s.
pub struct ModuleJob {
  url: ModuleUrl,
  status: RwLock<JobStatus>,
  dependencies: RwLock<Vec<ModuleUrl>>,
  dynamic_imports: RwLock<Vec<ModuleUrl>>,
  error: RwLock<Option<String>>,
}

impl Debug for ModuleJob {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ModuleJob")
      .field("url", &self.url)
      .field("status", &self.status())
      .finish()
  }
}

impl ModuleJob {
  pub fn new(url: ModuleUrl) -> JobHandle {
    Arc::new(Self {
      url,
      status: RwLock::new(JobStatus::Pending),
      dependencies: RwLock::new(vec![]),
      dynamic_imports: RwLock::new(vec![]),
      error: RwLock::new(None),
    })
  }

  pub fn url(&self) -> &ModuleUrl {
    &self.url
  }

  pub fn status(&self) -> JobStatus {
    *self.status.read()
  }

  pub fn dependencies(&self) -> Vec<ModuleUrl> {
    self.dependencies.read().clone()
  }

  pub fn dynamic_imports(&self) -> Vec<ModuleUrl> {
    self.dynamic_imports.read().clone()
  }

  pub fn error(&self) -> Option<String> {
    self.error.read().clone()
  }

  pub fn is_same_job(a: &JobHandle, b: &JobHandle) -> bool {
    Arc::ptr_eq(a, b)
  }

  pub(crate) fn start_linking(&self) {
    *self.status.write() = JobStatus::Linking;
  }

  pub(crate) fn add_dependency(&self, url: ModuleUrl) {
    let mut dependencies = self.dependencies.write();
    // `import "./a"` twice in one module still links a single edge
    if !dependencies.contains(&url) {
      dependencies.push(url);
    }
  }

  pub(crate) fn add_dynamic_import(&self, url: ModuleUrl) {
    let mut dynamic_imports = self.dynamic_imports.write();
    if !dynamic_imports.contains(&url) {
      dynamic_imports.push(url);
    }
  }

  pub(crate) fn finish_linking(&self) {
    *self.status.write() = JobStatus::Linked;
  }

  pub(crate) fn fail(&self, message: impl Into<String>) {
    *self.error.write() = Some(message.into());
    *self.status.write() = JobStatus::Errored;
  }
}
