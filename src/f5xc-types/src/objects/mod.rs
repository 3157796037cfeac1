//!
//! # Object kinds
//!
//! Typed specs for the commonly managed kinds. Every other kind keeps its
//! spec as an opaque json map so that it round trips unchanged.
//!
mod namespace;
mod healthcheck;
mod origin_pool;
mod http_loadbalancer;
mod opaque;

pub use self::healthcheck::*;
pub use self::http_loadbalancer::*;
pub use self::namespace::*;
pub use self::opaque::*;
pub use self::origin_pool::*;

use serde::Deserialize;
use serde::Serialize;

/// marker for a `oneof` choice which carries no value, written as `{}`
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Empty {}

/// reference from one object to another
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ObjectRef {
    pub name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
}

impl ObjectRef {
    pub fn new<S: Into<String>>(name: S, namespace: S) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            tenant: None,
        }
    }
}
