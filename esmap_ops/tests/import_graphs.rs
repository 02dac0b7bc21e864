use esmap_ops::config::LoaderConfig;
use esmap_ops::loader::Loader;
use esmap_ops::module::ModuleUrl;
use esmap_ops::module_job::{JobStatus, ModuleJob};
use esmap_ops::source::MemorySource;

fn url(input: &str) -> ModuleUrl {
  ModuleUrl::parse(input).unwrap()
}

fn loader(source: MemorySource) -> Loader<MemorySource> {
  Loader::new(LoaderConfig::default(), source, url("file:///proj/"))
}

#[test]
fn a_circular_import_attaches_to_the_job_already_in_flight() {
  let source = MemorySource::new()
    .with_module("file:///proj/a.mod", "import { b } from './b.mod';\nexport const a = 1;")
    .unwrap()
    .with_module("file:///proj/b.mod", "import { a } from './a.mod';\nexport const b = 2;")
    .unwrap();
  let mut loader = loader(source);

  assert!(!loader.module_map().has("file:///proj/a.mod").unwrap());

  let j1 = loader.import("./a.mod").unwrap();
  assert_eq!(j1.url().as_str(), "file:///proj/a.mod");

  // b's import of './a.mod' resolved while J1 was still linking and got J1 back
  let b = loader.module_map().get("file:///proj/b.mod").unwrap().unwrap();
  assert_eq!(b.dependencies(), vec![url("file:///proj/a.mod")]);
  let stored = loader.module_map().get("file:///proj/a.mod").unwrap().unwrap();
  assert!(ModuleJob::is_same_job(&stored, &j1));

  assert_eq!(loader.jobs_created(), 2);
  assert_eq!(j1.status(), JobStatus::Linked);
  assert_eq!(b.status(), JobStatus::Linked);
}

#[test]
fn a_module_importing_itself_links() {
  let source = MemorySource::new()
    .with_module("file:///proj/self.mod", "import * as me from './self.mod';")
    .unwrap();
  let mut loader = loader(source);

  let job = loader.import("./self.mod").unwrap();

  assert_eq!(job.dependencies(), vec![url("file:///proj/self.mod")]);
  assert_eq!(loader.jobs_created(), 1);
}

#[test]
fn a_diamond_creates_one_job_per_module() {
  let source = MemorySource::new()
    .with_module("file:///proj/a.mod", "import './b.mod';\nimport './c.mod';")
    .unwrap()
    .with_module("file:///proj/b.mod", "import './d.mod';")
    .unwrap()
    .with_module("file:///proj/c.mod", "import '../proj/d.mod';")
    .unwrap()
    .with_module("file:///proj/d.mod", "export default 'shared';")
    .unwrap();
  let mut loader = loader(source);

  loader.import("./a.mod").unwrap();

  assert_eq!(loader.jobs_created(), 4);
  assert_eq!(loader.module_map().len(), 4);

  let graph = loader.graph();
  let d = url("file:///proj/d.mod");
  assert_eq!(
    graph.importers_of(&d),
    vec![&url("file:///proj/b.mod"), &url("file:///proj/c.mod")]
  );
}

#[test]
fn a_longer_cycle_is_walked_once() {
  let source = MemorySource::new()
    .with_module("file:///proj/one.mod", "import './two.mod';")
    .unwrap()
    .with_module("file:///proj/two.mod", "import './three.mod';")
    .unwrap()
    .with_module("file:///proj/three.mod", "import './one.mod'; import('./two.mod');")
    .unwrap();
  let config = LoaderConfig {
    follow_dynamic_imports: true,
    ..LoaderConfig::default()
  };
  let mut loader = Loader::new(config, source, url("file:///proj/"));

  loader.import("./one.mod").unwrap();

  assert_eq!(loader.jobs_created(), 3);
  let three = loader.module_map().get("file:///proj/three.mod").unwrap().unwrap();
  assert_eq!(three.dependencies(), vec![url("file:///proj/one.mod")]);
  assert_eq!(three.dynamic_imports(), vec![url("file:///proj/two.mod")]);
}

#[test]
fn separate_loaders_do_not_share_jobs() {
  let source = MemorySource::new()
    .with_module("file:///proj/a.mod", "")
    .unwrap();
  let mut first = loader(source.clone());
  let mut second = loader(source);

  let a1 = first.import("./a.mod").unwrap();
  let a2 = second.import("./a.mod").unwrap();

  assert!(!ModuleJob::is_same_job(&a1, &a2));
  assert_eq!(first.jobs_created(), 1);
  assert_eq!(second.jobs_created(), 1);
}

#[test]
fn a_long_import_chain_links_without_deep_recursion() {
  const LENGTH: usize = 5000;

  let mut source = MemorySource::new();
  for index in 0..LENGTH {
    let body = if index + 1 < LENGTH {
      format!("import './m{}.mod';", index + 1)
    } else {
      "export default 'end';".to_string()
    };
    source.insert(url(&format!("file:///proj/m{}.mod", index)), body);
  }
  let mut loader = loader(source);

  let head = loader.import("./m0.mod").unwrap();

  assert_eq!(head.status(), JobStatus::Linked);
  assert_eq!(head.dependencies(), vec![url("file:///proj/m1.mod")]);
  assert_eq!(loader.jobs_created(), LENGTH);
  assert!(loader
    .module_map()
    .iter()
    .all(|(_, job)| job.status() == JobStatus::Linked));
}

#[test]
fn a_failure_at_the_end_of_a_long_chain_reaches_the_head() {
  const LENGTH: usize = 2000;

  let mut source = MemorySource::new();
  for index in 0..LENGTH {
    source.insert(
      url(&format!("file:///proj/m{}.mod", index)),
      format!("import './m{}.mod';", index + 1),
    );
  }
  let mut loader = loader(source);

  let error = loader.import("./m0.mod").unwrap_err();

  assert!(error.to_string().starts_with("Cannot find module"), "{}", error);
  assert!(loader
    .module_map()
    .iter()
    .all(|(_, job)| job.status() == JobStatus::Errored));
}
