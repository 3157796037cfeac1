mod cert;
mod client;
mod error;
mod quota;
mod uri;

pub use self::cert::{ClientConfigBuilder, ConfigBuilder};
pub use self::client::{F5Client, HyperClient, HyperClientBuilder};
pub use self::error::{ApiStatus, ClientError};
pub use self::quota::{ObjectQuota, QuotaCount, QuotaInfo, QuotaLimit, QuotaUsage};
pub use self::uri::{item_uri, items_uri, prefix_uri};
pub use f5xc_config::F5Config;

pub mod metadata {
    pub use f5xc_metadata_client::*;
}

pub use shared::new_shared;
pub use shared::SharedF5Client;

mod shared {

    use std::sync::Arc;

    use super::ClientError;
    use super::F5Client;
    use super::F5Config;

    pub type SharedF5Client = Arc<F5Client>;

    pub fn new_shared(config: F5Config) -> Result<SharedF5Client, ClientError> {
        let client = F5Client::new(config)?;
        Ok(Arc::new(client))
    }
}
