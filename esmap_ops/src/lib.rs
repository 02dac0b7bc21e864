use std::path::Path;

pub use parking_lot::RwLock;

use crate::config::LoaderConfig;
use crate::error::CoreError;
use crate::loader::Loader;
use crate::module::{Location, ModuleUrl};
use crate::module_job::JobHandle;
use crate::source::FileSystemSource;

pub mod config;
pub mod error;
pub mod graph;
pub mod loader;
pub mod module;
pub mod module_job;
pub mod module_map;
pub mod parser;
pub mod resolve;
pub mod source;

/// Builds a filesystem loader for `config` and loads the module graph rooted
/// at `entrypoint`.
#[tracing::instrument(skip(config))]
pub fn load_entrypoint(
  config: LoaderConfig,
  entrypoint: impl AsRef<Path> + std::fmt::Debug,
) -> Result<(Loader<FileSystemSource>, JobHandle), CoreError> {
  let file = Location::new(entrypoint)?;
  let url = ModuleUrl::from_location(&file)?;

  tracing::info!("Start loading module graph {:?}", &file);
  let mut loader = Loader::from_config(config)?;
  let job = loader.import(url.as_str())?;
  tracing::info!("Loaded module graph {:?}", &file);

  Ok((loader, job))
}
