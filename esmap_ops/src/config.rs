use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
  /// Directory entry specifiers are resolved against.
  pub root: PathBuf,
  /// Tried in order when a specifier names a file without its extension.
  pub extensions: Vec<String>,
  pub follow_dynamic_imports: bool,
}

impl Default for LoaderConfig {
  fn default() -> Self {
    Self {
      root: PathBuf::from("."),
      extensions: ["mjs", "js"].iter().map(|str| str.to_string()).collect(),
      follow_dynamic_imports: false,
    }
  }
}

impl LoaderConfig {
  pub fn from_reader(reader: impl Read) -> Result<Self, CoreError> {
    Ok(serde_json::from_reader(reader)?)
  }

  #[tracing::instrument]
  pub fn from_json_file(path: &Path) -> Result<Self, CoreError> {
    let file = OpenOptions::new().read(true).open(path)?;
    let config = Self::from_reader(BufReader::new(file))?;

    tracing::debug!("Loaded loader config {:?}", &config);
    Ok(config)
  }
}
