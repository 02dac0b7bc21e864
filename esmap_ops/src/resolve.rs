use crate::config::LoaderConfig;
use crate::error::CoreError;
use crate::module::ModuleUrl;
use crate::source::ModuleSource;

#[derive(Debug, Clone, PartialEq)]
enum SpecifierKind {
  Relative,
  Absolute,
  Bare,
}

impl SpecifierKind {
  fn of(specifier: &str) -> Self {
    if specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/') {
      SpecifierKind::Relative
    } else if url::Url::parse(specifier).is_ok() {
      SpecifierKind::Absolute
    } else {
      SpecifierKind::Bare
    }
  }
}

pub struct Resolver {
  pub extensions: Vec<String>,
}

impl Default for Resolver {
  fn default() -> Self {
    Self {
      extensions: LoaderConfig::default().extensions,
    }
  }
}

impl Resolver {
  pub fn new(config: &LoaderConfig) -> Self {
    Self {
      extensions: config.extensions.clone(),
    }
  }

  /// Turns `specifier`, as written in the module at `parent`, into the
  /// normalised URL its job is cached under.
  #[tracing::instrument(skip(self, source))]
  pub fn resolve(
    &self,
    specifier: &str,
    parent: &ModuleUrl,
    source: &impl ModuleSource,
  ) -> Result<ModuleUrl, CoreError> {
    let candidate = match SpecifierKind::of(specifier) {
      SpecifierKind::Relative => parent.join(specifier)?,
      SpecifierKind::Absolute => ModuleUrl::parse(specifier)?,
      SpecifierKind::Bare => {
        return Err(CoreError::custom(&format!(
          "Cannot find package '{}' imported from {}",
          specifier, parent
        )))
      }
    };

    for url in self.candidates(&candidate) {
      tracing::trace!("Trying {}", &url);
      if source.exists(&url) {
        tracing::debug!("Resolved {} to {}", specifier, &url);
        return Ok(url);
      }
    }

    Err(CoreError::custom(&format!(
      "Cannot find module {} imported from {}",
      candidate, parent
    )))
  }

  fn candidates<'a>(&'a self, url: &'a ModuleUrl) -> impl Iterator<Item = ModuleUrl> + 'a {
    std::iter::once(url.clone()).chain(
      self
        .extensions
        .iter()
        .map(move |extension| url.with_appended_extension(extension)),
    )
  }
}
