use crate::module::{Location, ModuleUrl, RelativePath};
use crate::module_job::JobStatus;
use crate::module_map::ModuleMap;
use serde::{Deserialize, Serialize};

/// A point-in-time view of every job a loader knows about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleGraph {
  pub root: ModuleUrl,
  pub modules: Vec<ModuleNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleNode {
  pub url: ModuleUrl,
  pub status: JobStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub relative_path: Option<RelativePath>,
  pub dependencies: Vec<ModuleUrl>,
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub dynamic_imports: Vec<ModuleUrl>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl ModuleGraph {
  pub fn from_module_map(root: &ModuleUrl, module_map: &ModuleMap) -> Self {
    let root_location = root
      .to_file_path()
      .and_then(|path| Location::new(path).ok());

    let mut modules: Vec<ModuleNode> = module_map
      .iter()
      .map(|(_, job)| ModuleNode {
        url: job.url().clone(),
        status: job.status(),
        relative_path: root_location
          .as_ref()
          .and_then(|root| relative_path(job.url(), root)),
        dependencies: job.dependencies(),
        dynamic_imports: job.dynamic_imports(),
        error: job.error(),
      })
      .collect();
    modules.sort_by(|a, b| a.url.cmp(&b.url));

    Self {
      root: root.clone(),
      modules,
    }
  }

  pub fn get(&self, url: &ModuleUrl) -> Option<&ModuleNode> {
    self.modules.iter().find(|node| &node.url == url)
  }

  /// URLs that import `url`, sorted.
  pub fn importers_of(&self, url: &ModuleUrl) -> Vec<&ModuleUrl> {
    self
      .modules
      .iter()
      .filter(|node| node.dependencies.contains(url))
      .map(|node| &node.url)
      .collect()
  }
}

fn relative_path(url: &ModuleUrl, root: &Location) -> Option<RelativePath> {
  let location = Location::new(url.to_file_path()?).ok()?;
  location.make_relative_to(root).ok()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::LoaderConfig;
  use crate::loader::Loader;
  use crate::source::MemorySource;
  use std::path::Path;

  fn url(input: &str) -> ModuleUrl {
    ModuleUrl::parse(input).unwrap()
  }

  #[test]
  fn it_snapshots_jobs_sorted_by_url() {
    let source = MemorySource::new()
      .with_module("file:///proj/main.mod", "import './b.mod'; import './a.mod';")
      .unwrap()
      .with_module("file:///proj/a.mod", "")
      .unwrap()
      .with_module("file:///proj/b.mod", "import './a.mod';")
      .unwrap();
    let mut loader = Loader::new(LoaderConfig::default(), source, url("file:///proj/"));
    loader.import("./main.mod").unwrap();

    let graph = loader.graph();
    let urls: Vec<&str> = graph.modules.iter().map(|node| node.url.as_str()).collect();
    assert_eq!(
      urls,
      vec!["file:///proj/a.mod", "file:///proj/b.mod", "file:///proj/main.mod"]
    );

    let a = url("file:///proj/a.mod");
    assert_eq!(
      graph.importers_of(&a),
      vec![&url("file:///proj/b.mod"), &url("file:///proj/main.mod")]
    );
    assert_eq!(graph.get(&a).unwrap().status, JobStatus::Linked);
    // nothing under /proj exists on disk
    assert!(graph.get(&a).unwrap().relative_path.is_none());
  }

  #[test]
  fn it_serialises_to_json() {
    let source = MemorySource::new()
      .with_module("file:///proj/a.mod", "import './missing.mod';")
      .unwrap();
    let mut loader = Loader::new(LoaderConfig::default(), source, url("file:///proj/"));
    assert!(loader.import("./a.mod").is_err());

    let value = serde_json::to_value(loader.graph()).unwrap();
    assert_eq!(value["root"], "file:///proj/");
    assert_eq!(value["modules"][0]["url"], "file:///proj/a.mod");
    assert_eq!(value["modules"][0]["status"], "errored");
    assert!(value["modules"][0].get("dynamic_imports").is_none());
    assert!(value["modules"][0]["error"]
      .as_str()
      .unwrap()
      .starts_with("Cannot find module"));
  }

  #[test]
  fn it_adds_paths_relative_to_the_root_for_files_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("lib")).unwrap();
    std::fs::write(dir.path().join("main.mjs"), "import './lib/util.mjs';").unwrap();
    std::fs::write(dir.path().join("lib/util.mjs"), "").unwrap();

    let config = LoaderConfig {
      root: dir.path().to_path_buf(),
      ..LoaderConfig::default()
    };
    let mut loader = Loader::from_config(config).unwrap();
    loader.import("./main.mjs").unwrap();

    let graph = loader.graph();
    let paths: Vec<&Path> = graph
      .modules
      .iter()
      .filter_map(|node| node.relative_path.as_deref())
      .collect();
    assert_eq!(paths, vec![Path::new("lib/util.mjs"), Path::new("main.mjs")]);
  }
}
