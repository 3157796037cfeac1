//! Per namespace object quotas, `GET /api/web/namespaces/{ns}/quota/usage`

use std::collections::BTreeMap;

use hyper::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::uri::quota_usage_uri;
use crate::{ClientError, F5Client};

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct QuotaUsage {
    /// keyed by object type, e.g. `origin_pool`
    pub objects: BTreeMap<String, ObjectQuota>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ObjectQuota {
    pub limit: QuotaLimit,
    pub usage: QuotaCount,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct QuotaLimit {
    pub maximum: i64,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct QuotaCount {
    pub current: i64,
}

/// limit and usage of one object type
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct QuotaInfo {
    pub resource_type: String,
    pub limit: i64,
    pub used: i64,
    pub available: i64,
}

impl QuotaInfo {
    fn new(resource_type: &str, quota: &ObjectQuota) -> Self {
        Self {
            resource_type: resource_type.to_owned(),
            limit: quota.limit.maximum,
            used: quota.usage.current,
            available: quota.limit.maximum - quota.usage.current,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available > 0
    }
}

impl QuotaUsage {
    pub fn info(&self, resource_type: &str) -> Option<QuotaInfo> {
        self.objects
            .get(resource_type)
            .map(|quota| QuotaInfo::new(resource_type, quota))
    }

    pub fn all(&self) -> Vec<QuotaInfo> {
        self.objects
            .iter()
            .map(|(resource_type, quota)| QuotaInfo::new(resource_type, quota))
            .collect()
    }
}

impl F5Client {
    pub async fn quota_usage(&self, namespace: &str) -> Result<QuotaUsage, ClientError> {
        let uri = quota_usage_uri(self.hostname(), namespace)?;
        debug!("quota: retrieving usage: {}", uri);
        self.handle_request(Method::GET, uri, None).await
    }

    /// quota of one object type, `None` when the tenant reports none for it
    pub async fn quota_info(
        &self,
        namespace: &str,
        resource_type: &str,
    ) -> Result<Option<QuotaInfo>, ClientError> {
        Ok(self.quota_usage(namespace).await?.info(resource_type))
    }
}
