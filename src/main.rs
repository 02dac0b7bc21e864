use std::path::PathBuf;

use clap::Parser;
use tracing::subscriber::set_global_default;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

use esmap_ops::config::LoaderConfig;
use esmap_ops::error::CoreError;

/// Load an ES module graph and print it as JSON.
#[derive(Debug, Parser)]
#[command(name = "esmap", version)]
struct Args {
  /// Entry module file
  entry: PathBuf,

  /// JSON loader config file
  #[arg(long)]
  config: Option<PathBuf>,

  /// Directory specifiers are resolved against, overrides the config file
  #[arg(long)]
  root: Option<PathBuf>,

  /// Follow `import()` expressions while linking
  #[arg(long)]
  follow_dynamic: bool,
}

fn load_config(args: &Args) -> Result<LoaderConfig, CoreError> {
  let mut config = match &args.config {
    Some(path) => LoaderConfig::from_json_file(path)?,
    None => LoaderConfig::default(),
  };

  if let Some(root) = &args.root {
    config.root = root.clone();
  }
  if args.follow_dynamic {
    config.follow_dynamic_imports = true;
  }
  Ok(config)
}

fn run(args: Args) -> Result<(), String> {
  let config = load_config(&args)?;
  tracing::info!("Loading {:?} with {:?}", &args.entry, &config);

  let (loader, _entry) = esmap_ops::load_entrypoint(config, &args.entry)?;

  let graph = serde_json::to_string_pretty(&loader.graph()).map_err(CoreError::from)?;
  println!("{}", graph);
  Ok(())
}

fn main() {
  let registry = Registry::default()
    .with(EnvFilter::from_default_env())
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
  if let Err(error) = set_global_default(registry) {
    eprintln!("could not install the log subscriber: {}", error);
  }

  if let Err(error) = run(Args::parse()) {
    eprintln!("{}", error);
    std::process::exit(1);
  }
}
