use crate::parser::ParseError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Contract violations reported by the module map.
///
/// Both kinds are raised before the map is touched, so a caller that gets one
/// back can rely on the map being exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModuleMapError {
  #[error("The \"url\" argument must be of type string. Received {received}")]
  InvalidKeyType { received: String },
  #[error("The \"job\" argument must be an instance of ModuleJob. Received {received}")]
  InvalidValueType { received: String },
}

impl ModuleMapError {
  pub fn invalid_key(received: impl Into<String>) -> Self {
    Self::InvalidKeyType {
      received: received.into(),
    }
  }

  pub fn invalid_value(received: impl Into<String>) -> Self {
    Self::InvalidValueType {
      received: received.into(),
    }
  }
}

#[derive(Debug)]
pub struct CoreError {
  source_error: Box<dyn Error + Send + Sync>,
}

impl CoreError {
  pub fn custom(message: &str) -> Self {
    tracing::error!("{}", &message);
    Self {
      source_error: message.into(),
    }
  }

  /// The map error behind this failure, if there is one.
  pub fn as_module_map_error(&self) -> Option<&ModuleMapError> {
    self.source_error.downcast_ref::<ModuleMapError>()
  }
}

impl Display for CoreError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    self.source_error.fmt(f)
  }
}

impl Error for CoreError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    Some(&*self.source_error)
  }
}

impl From<std::io::Error> for CoreError {
  fn from(err: std::io::Error) -> Self {
    tracing::error!("{}", err.to_string());

    Self {
      source_error: Box::new(err),
    }
  }
}

impl From<ParseError> for CoreError {
  fn from(parse_error: ParseError) -> Self {
    tracing::error!("{}", parse_error.to_string());
    Self {
      source_error: Box::new(parse_error),
    }
  }
}

impl From<serde_json::Error> for CoreError {
  fn from(err: serde_json::Error) -> Self {
    tracing::error!("{}", err.to_string());
    Self {
      source_error: Box::new(err),
    }
  }
}

impl From<url::ParseError> for CoreError {
  fn from(err: url::ParseError) -> Self {
    tracing::error!("{}", err.to_string());
    Self {
      source_error: Box::new(err),
    }
  }
}

impl From<ModuleMapError> for CoreError {
  fn from(err: ModuleMapError) -> Self {
    tracing::error!("{}", err.to_string());
    Self {
      source_error: Box::new(err),
    }
  }
}

impl From<CoreError> for String {
  fn from(error: CoreError) -> Self {
    error.to_string()
  }
}

impl From<&str> for CoreError {
  fn from(error: &str) -> Self {
    Self::custom(error)
  }
}
