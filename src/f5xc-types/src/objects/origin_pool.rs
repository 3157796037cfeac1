use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::Kind;
use crate::Spec;
use crate::CONFIG_SERVICE;

use super::Empty;
use super::ObjectRef;

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct OriginPoolSpec {
    pub origin_servers: Vec<OriginServer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_tls: Option<Empty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_tls: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_as_endpoint_port: Option<Empty>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub healthcheck: Vec<ObjectRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_selection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loadbalancer_algorithm: Option<String>,
    /// fields without a typed counterpart
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

const API: Kind = Kind {
    service: CONFIG_SERVICE,
    kind: "origin_pool",
    plural: "origin_pools",
};

impl Spec for OriginPoolSpec {
    fn metadata() -> &'static Kind {
        &API
    }

    /// drop the empty label maps the server adds to origin servers
    fn make_same(&mut self, other: &Self) {
        for (server, desired) in self.origin_servers.iter_mut().zip(&other.origin_servers) {
            if desired.labels.is_none()
                && server.labels.as_ref().map(HashMap::is_empty).unwrap_or(false)
            {
                server.labels = None;
            }
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct OriginServer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_name: Option<PublicName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_ip: Option<PublicIp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_ip: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k8s_service: Option<Value>,
    // api returns an empty map even if never set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

impl OriginServer {
    pub fn dns_name<S: Into<String>>(dns_name: S) -> Self {
        Self {
            public_name: Some(PublicName {
                dns_name: dns_name.into(),
                refresh_interval: None,
            }),
            ..Default::default()
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PublicName {
    pub dns_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<u32>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PublicIp {
    pub ip: String,
}
