use serde_yaml::Error as SerdeYamlError;
use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] IoError),
    #[error("Yaml error: {0}")]
    SerdeError(#[from] SerdeYamlError),
    #[error("no credentials: set F5XC_API_TOKEN, or F5XC_CERT and F5XC_KEY")]
    MissingCredentials,
    #[error("client certificate {0} given without a matching key")]
    MissingKey(String),
    #[error("invalid api url {0:?}")]
    InvalidUrl(String),
    #[error("Unknown error: {0}")]
    Other(String),
}
