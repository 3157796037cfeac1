use std::path::Path;

use tracing::debug;

use f5xc_config::{Auth, F5Config};

use crate::ClientError;

pub trait ConfigBuilder: Sized {
    type Client;

    fn new() -> Self;

    fn build(self) -> Result<Self::Client, ClientError>;

    /// trust an extra PEM encoded CA bundle
    fn load_ca_certificate(self, ca_path: impl AsRef<Path>) -> Result<Self, ClientError>;

    // load client certificate (crt) and private key
    fn load_client_certificate<P: AsRef<Path>>(
        self,
        client_crt_path: P,
        client_key_path: P,
    ) -> Result<Self, ClientError>;
}

/// Build Client
#[derive(Debug)]
pub struct ClientConfigBuilder<B> {
    config: F5Config,
    builder: B,
}

impl<B> ClientConfigBuilder<B>
where
    B: ConfigBuilder,
{
    pub fn new(config: F5Config) -> Result<Self, ClientError> {
        let builder = Self::configure(&config)?;
        Ok(Self { config, builder })
    }

    fn configure(config: &F5Config) -> Result<B, ClientError> {
        let mut builder = B::new();

        if let Some(ca_path) = &config.ca_cert {
            debug!("loading CA from: {}", ca_path.display());
            builder = builder.load_ca_certificate(ca_path)?;
        }

        if let Auth::Certificate {
            cert_path,
            key_path,
        } = &config.auth
        {
            debug!(
                "loading client crt: {} and client key: {}",
                cert_path.display(),
                key_path.display()
            );
            builder = builder.load_client_certificate(cert_path, key_path)?;
        }

        Ok(builder)
    }

    pub fn f5_config(&self) -> &F5Config {
        &self.config
    }

    /// api token, only present in token mode
    pub fn token(&self) -> Option<String> {
        match &self.config.auth {
            Auth::ApiToken(token) => Some(token.clone()),
            Auth::Certificate { .. } => None,
        }
    }

    pub fn host(&self) -> String {
        self.config.api_url.clone()
    }

    pub fn build(self) -> Result<B::Client, ClientError> {
        self.builder.build()
    }
}
