use std::fs::File;
use std::path::Path;
use std::path::PathBuf;

use dirs::home_dir;
use serde::Deserialize;
use serde::Serialize;

use crate::ConfigError;
use crate::OperationTimeouts;

/// on disk form of the configuration, every field is optional
#[derive(Debug, Eq, PartialEq, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConfigFile {
    #[serde(skip)]
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
    /// seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetrySection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeouts: Option<TimeoutSection>,
}

/// seconds
#[derive(Debug, Eq, PartialEq, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RetrySection {
    pub max_retries: Option<u32>,
    pub wait_min: Option<u64>,
    pub wait_max: Option<u64>,
}

/// seconds
#[derive(Debug, Eq, PartialEq, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSection {
    pub create: Option<u64>,
    pub read: Option<u64>,
    pub update: Option<u64>,
    pub delete: Option<u64>,
}

impl TimeoutSection {
    /// overlay the configured values on top of `base`
    pub fn apply(&self, base: OperationTimeouts) -> OperationTimeouts {
        use std::time::Duration;

        OperationTimeouts {
            create: self.create.map(Duration::from_secs).unwrap_or(base.create),
            read: self.read.map(Duration::from_secs).unwrap_or(base.read),
            update: self.update.map(Duration::from_secs).unwrap_or(base.update),
            delete: self.delete.map(Duration::from_secs).unwrap_or(base.delete),
        }
    }
}

impl ConfigFile {
    /// `~/.f5xc/config.yaml`
    pub fn home_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".f5xc").join("config.yaml"))
    }

    /// read from default home directory
    pub fn from_home() -> Result<Self, ConfigError> {
        let path = Self::home_path()
            .ok_or_else(|| ConfigError::Other("unable to find home directory".to_owned()))?;
        Self::from_file(path)
    }

    pub fn from_file<T: AsRef<Path>>(path: T) -> Result<Self, ConfigError> {
        let file = File::open(path.as_ref())?;
        let mut config: Self = serde_yaml::from_reader(file)?;
        config.path = path.as_ref().to_path_buf();
        Ok(config)
    }

    pub fn to_file<T: AsRef<Path>>(&self, path: T) -> Result<(), ConfigError> {
        let file = File::create(path)?;
        Ok(serde_yaml::to_writer(file, self)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.to_file(&self.path)
    }
}
