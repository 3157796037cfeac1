//!
//! # Kind Definition
//!
//! Where an object type lives in the F5XC api
//!

/// service segment used by most configuration objects
pub const CONFIG_SERVICE: &str = "config";
/// service segment used by tenant level objects such as namespaces
pub const WEB_SERVICE: &str = "web";

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Kind {
    /// api service, `/api/{service}/...`
    pub service: &'static str,
    /// singular name, e.g. `http_loadbalancer`
    pub kind: &'static str,
    /// collection name, e.g. `http_loadbalancers`
    pub plural: &'static str,
}

impl Kind {
    /// terraform style resource type name
    pub fn resource_type(&self) -> String {
        format!("f5xc_{}", self.kind)
    }
}
