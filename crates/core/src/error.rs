use thiserror::Error;

use crate::config::ConfigError;
use crate::model::{ParseClassLevelError, PreferencesError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Preferences(#[from] PreferencesError),
    #[error(transparent)]
    ClassLevel(#[from] ParseClassLevelError),
}
