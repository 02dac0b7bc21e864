use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Clone, PartialOrd, PartialEq, Eq, Serialize, Deserialize, Default, Ord)]
pub struct Location(PathBuf);

#[derive(Debug, Clone, PartialOrd, PartialEq, Eq, Serialize, Deserialize, Hash, Ord)]
pub struct RelativePath(PathBuf);

impl Deref for RelativePath {
  type Target = Path;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl Debug for Location {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

impl Hash for Location {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.0.hash(state)
  }
}

impl Location {
  pub fn new(path: impl AsRef<Path>) -> Result<Self, CoreError> {
    let path = path.as_ref();

    Ok(Self(path.canonicalize().map_err(|_e| {
      CoreError::custom(&format!("Could not resolve path {:?}", &path))
    })?))
  }

  pub fn make_relative_to(&self, location: &Location) -> Result<RelativePath, CoreError> {
    let next = pathdiff::diff_paths(&self.0, &location);
    match next {
      None => Err(CoreError::custom(&format!(
        "relative path {} cannot be made relative to {}",
        self.0.to_string_lossy(),
        location.as_ref().to_string_lossy()
      ))),
      Some(next) => Ok(RelativePath(next)),
    }
  }
}

impl AsRef<Path> for Location {
  fn as_ref(&self) -> &Path {
    &self.0
  }
}

/// A normalised module URL, the key jobs are cached under.
///
/// Always absolute and never empty. Two references to the same module must
/// produce byte-identical URLs, so everything that builds one goes through
/// `url::Url` normalisation.
#[derive(Clone, PartialOrd, PartialEq, Eq, Hash, Ord, Serialize, Deserialize)]
pub struct ModuleUrl(Url);

impl ModuleUrl {
  pub fn parse(input: &str) -> Result<Self, CoreError> {
    Ok(Self(Url::parse(input)?))
  }

  pub fn from_location(location: &Location) -> Result<Self, CoreError> {
    Self::from_file_path(location.as_ref())
  }

  /// `path` must be absolute. No canonicalisation happens here.
  pub fn from_file_path(path: &Path) -> Result<Self, CoreError> {
    Url::from_file_path(path)
      .map(Self)
      .map_err(|_| CoreError::custom(&format!("{:?} is not an absolute path", path)))
  }

  /// Same as `from_file_path`, but for a directory: the URL gets a trailing
  /// slash so relative specifiers join onto it rather than its parent.
  pub fn from_directory_path(path: &Path) -> Result<Self, CoreError> {
    Url::from_directory_path(path)
      .map(Self)
      .map_err(|_| CoreError::custom(&format!("{:?} is not an absolute path", path)))
  }

  pub fn join(&self, specifier: &str) -> Result<Self, CoreError> {
    Ok(Self(self.0.join(specifier)?))
  }

  /// Returns the URL with `.{extension}` appended to its path.
  pub fn with_appended_extension(&self, extension: &str) -> Self {
    let mut url = self.0.clone();
    let path = format!("{}.{}", url.path(), extension);
    url.set_path(&path);
    Self(url)
  }

  pub fn as_str(&self) -> &str {
    self.0.as_str()
  }

  pub fn scheme(&self) -> &str {
    self.0.scheme()
  }

  pub fn to_file_path(&self) -> Option<PathBuf> {
    if self.0.scheme() != "file" {
      return None;
    }
    self.0.to_file_path().ok()
  }
}

impl Debug for ModuleUrl {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    Debug::fmt(self.0.as_str(), f)
  }
}

impl Display for ModuleUrl {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.0.as_str())
  }
}

impl AsRef<str> for ModuleUrl {
  fn as_ref(&self) -> &str {
    self.0.as_str()
  }
}
