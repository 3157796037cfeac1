mod config;
mod error;
mod policy;

pub use config::*;
pub use error::ConfigError;
pub use policy::*;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

pub const ENV_API_URL: &str = "F5XC_API_URL";
pub const ENV_API_TOKEN: &str = "F5XC_API_TOKEN";
pub const ENV_CERT: &str = "F5XC_CERT";
pub const ENV_KEY: &str = "F5XC_KEY";
pub const ENV_CA_CERT: &str = "F5XC_CACERT";
pub const ENV_CONFIG: &str = "F5XC_CONFIG";

pub const DEFAULT_API_URL: &str = "https://console.ves.volterra.io";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// how requests are authenticated
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// sent as `Authorization: APIToken <token>`
    ApiToken(String),
    /// mutual TLS with PEM encoded certificate and key
    Certificate { cert_path: PathBuf, key_path: PathBuf },
}

// keep tokens out of logs
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiToken(_) => write!(f, "ApiToken(****)"),
            Self::Certificate {
                cert_path,
                key_path,
            } => f
                .debug_struct("Certificate")
                .field("cert_path", cert_path)
                .field("key_path", key_path)
                .finish(),
        }
    }
}

/// resolved configuration used to build a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct F5Config {
    /// scheme and host, without trailing `/api`
    pub api_url: String,
    pub auth: Auth,
    /// extra trust anchor besides the native roots
    pub ca_cert: Option<PathBuf>,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub timeouts: OperationTimeouts,
}

impl F5Config {
    /// resolve from the environment and the config file
    pub fn load() -> Result<Self, ConfigError> {
        F5ConfigBuilder::default().build()
    }

    pub fn with_token<S: Into<String>>(api_url: &str, token: S) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: normalize_url(api_url)?,
            auth: Auth::ApiToken(token.into()),
            ca_cert: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
            timeouts: OperationTimeouts::default(),
        })
    }
}

/// explicit settings, which win over environment and config file
#[derive(Debug, Default, Clone)]
pub struct F5ConfigBuilder {
    api_url: Option<String>,
    api_token: Option<String>,
    cert: Option<PathBuf>,
    key: Option<PathBuf>,
    ca_cert: Option<PathBuf>,
    config_path: Option<PathBuf>,
    request_timeout: Option<Duration>,
    retry: Option<RetryPolicy>,
}

impl F5ConfigBuilder {
    pub fn api_url<S: Into<String>>(mut self, api_url: S) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn api_token<S: Into<String>>(mut self, token: S) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn client_certificate<P: Into<PathBuf>>(mut self, cert: P, key: P) -> Self {
        self.cert = Some(cert.into());
        self.key = Some(key.into());
        self
    }

    pub fn ca_cert<P: Into<PathBuf>>(mut self, ca_cert: P) -> Self {
        self.ca_cert = Some(ca_cert.into());
        self
    }

    pub fn config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn build(self) -> Result<F5Config, ConfigError> {
        self.build_with(|key| std::env::var(key).ok())
    }

    /// resolve using `env` as the environment lookup.
    /// precedence: explicit, environment, config file, defaults
    pub fn build_with<E>(self, env: E) -> Result<F5Config, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|value| !value.is_empty());

        let file = self.load_file(&env)?;

        let api_url = self
            .api_url
            .or_else(|| env(ENV_API_URL))
            .or_else(|| file.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());

        let token = self
            .api_token
            .or_else(|| env(ENV_API_TOKEN))
            .or_else(|| file.api_token.clone());
        let cert = self
            .cert
            .or_else(|| env(ENV_CERT).map(PathBuf::from))
            .or_else(|| file.cert.clone());
        let key = self
            .key
            .or_else(|| env(ENV_KEY).map(PathBuf::from))
            .or_else(|| file.key.clone());

        let auth = match (token, cert, key) {
            (Some(token), _, _) => Auth::ApiToken(token),
            (None, Some(cert_path), Some(key_path)) => Auth::Certificate {
                cert_path,
                key_path,
            },
            (None, Some(cert_path), None) => {
                return Err(ConfigError::MissingKey(cert_path.display().to_string()))
            }
            (None, None, _) => return Err(ConfigError::MissingCredentials),
        };

        let ca_cert = self
            .ca_cert
            .or_else(|| env(ENV_CA_CERT).map(PathBuf::from))
            .or_else(|| file.ca_cert.clone());

        let request_timeout = self
            .request_timeout
            .or_else(|| file.request_timeout.map(Duration::from_secs))
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let retry = self.retry.unwrap_or_else(|| {
            let mut retry = RetryPolicy::default();
            if let Some(section) = &file.retry {
                retry.max_retries = section.max_retries.unwrap_or(retry.max_retries);
                retry.wait_min = section
                    .wait_min
                    .map(Duration::from_secs)
                    .unwrap_or(retry.wait_min);
                retry.wait_max = section
                    .wait_max
                    .map(Duration::from_secs)
                    .unwrap_or(retry.wait_max);
            }
            retry
        });

        let timeouts = file
            .timeouts
            .as_ref()
            .map(|section| section.apply(OperationTimeouts::standard()))
            .unwrap_or_default();

        let config = F5Config {
            api_url: normalize_url(&api_url)?,
            auth,
            ca_cert,
            request_timeout,
            retry,
            timeouts,
        };
        debug!(api_url = %config.api_url, auth = ?config.auth, "resolved config");
        Ok(config)
    }

    /// explicit path and `F5XC_CONFIG` must exist, the home file is optional
    fn load_file<E>(&self, env: &E) -> Result<ConfigFile, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        if let Some(path) = self
            .config_path
            .clone()
            .or_else(|| env(ENV_CONFIG).map(PathBuf::from))
        {
            debug!(path = %path.display(), "reading config file");
            return ConfigFile::from_file(path);
        }

        match ConfigFile::home_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "reading config file");
                ConfigFile::from_file(path)
            }
            _ => Ok(ConfigFile::default()),
        }
    }
}

/// strip trailing `/` and `/api`, paths are built with the `/api` prefix
fn normalize_url(url: &str) -> Result<String, ConfigError> {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix("/api").unwrap_or(trimmed);
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(ConfigError::InvalidUrl(url.to_owned()));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod test {

    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    use super::{Auth, ConfigError, F5ConfigBuilder, DEFAULT_API_URL};

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn empty_file() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.yaml");
        std::fs::write(&path, "{}").expect("write");
        (dir, path)
    }

    #[test]
    fn test_env_token() {
        let (_dir, path) = empty_file();
        let config = F5ConfigBuilder::default()
            .config_path(path)
            .build_with(env_of(&[("F5XC_API_TOKEN", "env-token")]))
            .expect("config");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.auth, Auth::ApiToken("env-token".to_owned()));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.retry.max_retries, 0);
    }

    #[test]
    fn test_explicit_wins_over_env_and_file() {
        let config = F5ConfigBuilder::default()
            .api_token("explicit")
            .api_url("https://other.console.ves.volterra.io/api/")
            .config_path("data/config.yaml")
            .build_with(env_of(&[
                ("F5XC_API_TOKEN", "env-token"),
                ("F5XC_API_URL", "https://env.console.ves.volterra.io"),
            ]))
            .expect("config");
        assert_eq!(config.auth, Auth::ApiToken("explicit".to_owned()));
        assert_eq!(config.api_url, "https://other.console.ves.volterra.io");
    }

    #[test]
    fn test_env_wins_over_file() {
        let config = F5ConfigBuilder::default()
            .build_with(env_of(&[
                ("F5XC_CONFIG", "data/config.yaml"),
                ("F5XC_API_TOKEN", "env-token"),
            ]))
            .expect("config");
        assert_eq!(config.auth, Auth::ApiToken("env-token".to_owned()));
        assert_eq!(config.api_url, "https://acme.console.ves.volterra.io");
        assert_eq!(config.request_timeout, Duration::from_secs(45));
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.wait_max, Duration::from_secs(10));
    }

    #[test]
    fn test_certificate_from_file() {
        let config = F5ConfigBuilder::default()
            .config_path("data/cert-config.yaml")
            .build_with(env_of(&[]))
            .expect("config");
        assert_eq!(
            config.auth,
            Auth::Certificate {
                cert_path: "/etc/f5xc/client.crt".into(),
                key_path: "/etc/f5xc/client.key".into(),
            }
        );
        assert_eq!(config.ca_cert, Some("/etc/f5xc/ca.crt".into()));
        assert_eq!(config.timeouts.create, Duration::from_secs(900));
        assert_eq!(config.api_url, "https://acme.console.ves.volterra.io");
    }

    #[test]
    fn test_missing_credentials() {
        let (_dir, path) = empty_file();
        let err = F5ConfigBuilder::default()
            .config_path(path)
            .build_with(env_of(&[("F5XC_API_TOKEN", "")]))
            .expect_err("no credentials");
        assert!(matches!(err, ConfigError::MissingCredentials));
    }

    #[test]
    fn test_cert_without_key() {
        let (_dir, path) = empty_file();
        let err = F5ConfigBuilder::default()
            .config_path(path)
            .build_with(env_of(&[("F5XC_CERT", "/tmp/client.crt")]))
            .expect_err("no key");
        assert!(matches!(err, ConfigError::MissingKey(_)));
    }

    #[test]
    fn test_invalid_url() {
        let (_dir, path) = empty_file();
        let err = F5ConfigBuilder::default()
            .api_token("t")
            .api_url("console.ves.volterra.io")
            .config_path(path)
            .build_with(env_of(&[]))
            .expect_err("url");
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }
}
