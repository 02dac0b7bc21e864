use crate::error::CoreError;
use crate::module::ModuleUrl;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Read;

/// Where module source text comes from.
pub trait ModuleSource {
  fn exists(&self, url: &ModuleUrl) -> bool;

  fn fetch(&self, url: &ModuleUrl) -> Result<String, CoreError>;
}

/// Serves `file:` URLs from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystemSource;

impl ModuleSource for FileSystemSource {
  fn exists(&self, url: &ModuleUrl) -> bool {
    url.to_file_path().map(|path| path.is_file()).unwrap_or(false)
  }

  #[tracing::instrument(skip(self))]
  fn fetch(&self, url: &ModuleUrl) -> Result<String, CoreError> {
    let path = url.to_file_path().ok_or_else(|| {
      CoreError::custom(&format!(
        "Only file: URLs can be loaded from disk. Received protocol '{}:'",
        url.scheme()
      ))
    })?;

    let mut file_handle = OpenOptions::new().read(true).open(&path)?;
    let mut contents = String::new();
    file_handle.read_to_string(&mut contents)?;

    tracing::trace!("Read {} bytes from {:?}", contents.len(), &path);
    Ok(contents)
  }
}

/// Module sources held in memory, keyed by URL.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
  modules: HashMap<ModuleUrl, String>,
}

impl MemorySource {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, url: ModuleUrl, source: impl Into<String>) {
    self.modules.insert(url, source.into());
  }

  pub fn with_module(mut self, url: &str, source: impl Into<String>) -> Result<Self, CoreError> {
    self.insert(ModuleUrl::parse(url)?, source);
    Ok(self)
  }
}

impl ModuleSource for MemorySource {
  fn exists(&self, url: &ModuleUrl) -> bool {
    self.modules.contains_key(url)
  }

  fn fetch(&self, url: &ModuleUrl) -> Result<String, CoreError> {
    self
      .modules
      .get(url)
      .cloned()
      .ok_or_else(|| CoreError::custom(&format!("Cannot find module {}", url)))
  }
}
