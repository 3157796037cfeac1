use std::fs::File;
use std::io::BufReader;
use std::io::Error as IoError;
use std::io::ErrorKind;
use std::path::Path;

use hyper::client::HttpConnector;
use hyper::Body;
use hyper::Client;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use rustls::{Certificate, ClientConfig, PrivateKey, RootCertStore};
use rustls_pemfile::Item;
use tracing::{debug, warn};

use crate::cert::{ClientConfigBuilder, ConfigBuilder};
use crate::ClientError;

pub type HyperClient = Client<HttpsConnector<HttpConnector>, Body>;

pub type HyperConfigBuilder = ClientConfigBuilder<HyperClientBuilder>;

/// rustls backed connector; trusts the platform roots plus an optional CA bundle
pub struct HyperClientBuilder {
    roots: RootCertStore,
    client_auth: Option<(Vec<Certificate>, PrivateKey)>,
}

impl HyperClientBuilder {
    fn native_roots() -> RootCertStore {
        let mut roots = RootCertStore::empty();
        match rustls_native_certs::load_native_certs() {
            Ok(certs) => {
                let ders: Vec<Vec<u8>> = certs.into_iter().map(|cert| cert.0).collect();
                let (added, ignored) = roots.add_parsable_certificates(&ders);
                debug!(added, ignored, "loaded native root certificates");
            }
            Err(err) => warn!("unable to load native root certificates: {}", err),
        }
        roots
    }
}

fn open_pem(path: &Path) -> Result<BufReader<File>, IoError> {
    File::open(path).map(BufReader::new).map_err(|err| {
        IoError::new(
            err.kind(),
            format!("unable to read {}: {}", path.display(), err),
        )
    })
}

fn load_certs(path: &Path) -> Result<Vec<Certificate>, IoError> {
    let certs = rustls_pemfile::certs(&mut open_pem(path)?)?;
    if certs.is_empty() {
        return Err(IoError::new(
            ErrorKind::InvalidInput,
            format!("no certificate found in {}", path.display()),
        ));
    }
    Ok(certs.into_iter().map(Certificate).collect())
}

fn load_private_key(path: &Path) -> Result<PrivateKey, IoError> {
    let mut reader = open_pem(path)?;
    loop {
        match rustls_pemfile::read_one(&mut reader)? {
            Some(Item::RSAKey(key)) | Some(Item::PKCS8Key(key)) | Some(Item::ECKey(key)) => {
                return Ok(PrivateKey(key))
            }
            Some(_) => continue,
            None => {
                return Err(IoError::new(
                    ErrorKind::InvalidInput,
                    format!("no private key found in {}", path.display()),
                ))
            }
        }
    }
}

impl ConfigBuilder for HyperClientBuilder {
    type Client = HyperClient;

    fn new() -> Self {
        Self {
            roots: Self::native_roots(),
            client_auth: None,
        }
    }

    fn build(self) -> Result<Self::Client, ClientError> {
        let tls = ClientConfig::builder()
            .with_safe_defaults()
            .with_root_certificates(self.roots);

        let tls = match self.client_auth {
            Some((certs, key)) => tls.with_client_auth_cert(certs, key)?,
            None => tls.with_no_client_auth(),
        };

        let connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls)
            .https_or_http()
            .enable_http1()
            .build();

        Ok(Client::builder().build::<_, Body>(connector))
    }

    fn load_ca_certificate(mut self, ca_path: impl AsRef<Path>) -> Result<Self, ClientError> {
        for cert in load_certs(ca_path.as_ref())? {
            self.roots.add(&cert)?;
        }
        Ok(self)
    }

    fn load_client_certificate<P: AsRef<Path>>(
        mut self,
        client_crt_path: P,
        client_key_path: P,
    ) -> Result<Self, ClientError> {
        let certs = load_certs(client_crt_path.as_ref())?;
        let key = load_private_key(client_key_path.as_ref())?;
        self.client_auth = Some((certs, key));
        Ok(self)
    }
}
