use crate::config::LoaderConfig;
use crate::error::CoreError;
use crate::graph::ModuleGraph;
use crate::module::{Location, ModuleUrl};
use crate::module_job::{JobHandle, JobStatus, ModuleJob};
use crate::module_map::ModuleMap;
use crate::parser::UnresolvedImport;
use crate::resolve::Resolver;
use crate::source::{FileSystemSource, ModuleSource};
use std::collections::HashMap;

// dependency URL -> (its job, the jobs in this batch that statically import it)
type Importers = HashMap<ModuleUrl, (JobHandle, Vec<JobHandle>)>;

/// A loader context. Each loader owns its own module map; jobs are never
/// shared between loaders.
pub struct Loader<S: ModuleSource> {
  config: LoaderConfig,
  resolver: Resolver,
  source: S,
  root: ModuleUrl,
  module_map: ModuleMap,
  jobs_created: usize,
}

impl Loader<FileSystemSource> {
  /// A loader over the filesystem, rooted at the canonical form of
  /// `config.root`.
  pub fn from_config(config: LoaderConfig) -> Result<Self, CoreError> {
    let root = Location::new(&config.root)?;
    let root = ModuleUrl::from_directory_path(root.as_ref())?;
    Ok(Self::new(config, FileSystemSource, root))
  }
}

impl<S: ModuleSource> Loader<S> {
  /// `root` is the URL entry specifiers are resolved against. It should end
  /// in `/` when it names a directory.
  pub fn new(config: LoaderConfig, source: S, root: ModuleUrl) -> Self {
    Self {
      resolver: Resolver::new(&config),
      config,
      source,
      root,
      module_map: ModuleMap::new(),
      jobs_created: 0,
    }
  }

  pub fn root(&self) -> &ModuleUrl {
    &self.root
  }

  pub fn config(&self) -> &LoaderConfig {
    &self.config
  }

  pub fn module_map(&self) -> &ModuleMap {
    &self.module_map
  }

  pub fn jobs_created(&self) -> usize {
    self.jobs_created
  }

  /// Loads the module graph starting at `specifier`, resolved against the
  /// loader root.
  #[tracing::instrument(skip(self))]
  pub fn import(&mut self, specifier: &str) -> Result<JobHandle, CoreError> {
    tracing::info!("Start loading {} from {}", specifier, &self.root);
    let root = self.root.clone();
    let job = self.get_module_job(specifier, &root)?;
    tracing::info!("Loaded {} modules", self.module_map.len());
    Ok(job)
  }

  /// Returns the job for `specifier` as imported from `parent`, creating and
  /// linking it if this loader has not seen its URL yet.
  ///
  /// A job goes into the module map before any of its imports are followed,
  /// so an import cycle that leads back to its URL finds the job instead of
  /// starting a second one. A job that failed to link stays failed: asking for
  /// it again returns its error.
  #[tracing::instrument(skip(self))]
  pub fn get_module_job(&mut self, specifier: &str, parent: &ModuleUrl) -> Result<JobHandle, CoreError> {
    let url = self.resolver.resolve(specifier, parent, &self.source)?;

    let (job, created) = self.job_for(&url)?;
    if created {
      self.link(&job);
    }

    match job.status() {
      JobStatus::Errored => Err(CoreError::custom(&job.error().unwrap_or_default())),
      _ => Ok(job),
    }
  }

  fn job_for(&mut self, url: &ModuleUrl) -> Result<(JobHandle, bool), CoreError> {
    if let Some(job) = self.module_map.get(url)? {
      tracing::debug!("Reusing job for {} ({:?})", url, job.status());
      return Ok((job, false));
    }

    let job = ModuleJob::new(url.clone());
    self.module_map.set(url, job.clone())?;
    self.jobs_created += 1;
    Ok((job, true))
  }

  /// Links `entry` and every job it pulls in from a worklist, so the depth of
  /// an import chain never turns into stack depth.
  ///
  /// Jobs are marked `Linked` only once the whole batch is done. A job that
  /// fails marks every job that statically imports it, directly or not, as
  /// failed with the same message; the errored jobs stay cached.
  fn link(&mut self, entry: &JobHandle) {
    let mut pending = vec![entry.clone()];
    let mut batch = vec![];
    let mut importers = Importers::new();

    while let Some(job) = pending.pop() {
      job.start_linking();
      if let Err(error) = self.link_imports(&job, &mut pending, &mut importers) {
        job.fail(error.to_string());
      }
      batch.push(job);
    }

    let mut failed: Vec<JobHandle> = importers
      .values()
      .map(|(dependency, _)| dependency)
      .filter(|dependency| dependency.status() == JobStatus::Errored)
      .cloned()
      .collect();
    while let Some(dependency) = failed.pop() {
      let message = dependency.error().unwrap_or_default();
      let importers_of = importers
        .get(dependency.url())
        .map(|(_, importers_of)| importers_of.as_slice())
        .unwrap_or_default();

      for importer in importers_of {
        if importer.status() != JobStatus::Errored {
          importer.fail(message.clone());
          failed.push(importer.clone());
        }
      }
    }

    for job in batch {
      if job.status() != JobStatus::Errored {
        job.finish_linking();
      }
    }
  }

  fn link_imports(
    &mut self,
    job: &JobHandle,
    pending: &mut Vec<JobHandle>,
    importers: &mut Importers,
  ) -> Result<(), CoreError> {
    let source = self.source.fetch(job.url())?;
    let imports = UnresolvedImport::parse_many(&source)?;
    tracing::trace!("{} has {} imports", job.url(), imports.len());

    for import in imports.iter() {
      let url = self
        .resolver
        .resolve(import.specifier(), job.url(), &self.source)?;

      if import.is_dynamic() {
        job.add_dynamic_import(url.clone());

        // a failing `import()` target does not fail its importer
        if self.config.follow_dynamic_imports {
          let (target, created) = self.job_for(&url)?;
          if created {
            pending.push(target);
          }
        }
        continue;
      }

      let (dependency, created) = self.job_for(&url)?;
      job.add_dependency(url.clone());
      importers
        .entry(url)
        .or_insert_with(|| (dependency.clone(), vec![]))
        .1
        .push(job.clone());

      if created {
        pending.push(dependency);
      }
    }

    Ok(())
  }

  pub fn graph(&self) -> ModuleGraph {
    ModuleGraph::from_module_map(&self.root, &self.module_map)
  }
}
