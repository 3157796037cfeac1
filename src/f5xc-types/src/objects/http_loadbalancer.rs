use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::f5xc_spec;

use super::Empty;
use super::ObjectRef;

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct HttpLoadBalancerSpec {
    pub domains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpListener>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https_auto_cert: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertise_on_public_default_vip: Option<Empty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_not_advertise: Option<Empty>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default_route_pools: Vec<PoolWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_firewall: Option<ObjectRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_waf: Option<Empty>,
    /// fields without a typed counterpart
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

f5xc_spec!(HttpLoadBalancerSpec, "http_loadbalancer", "http_loadbalancers");

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HttpListener {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dns_volterra_managed: bool,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PoolWeight {
    pub pool: ObjectRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}
