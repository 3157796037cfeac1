use serde::Deserialize;
use serde::Serialize;

use crate::f5xc_spec;

use super::Empty;

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HealthcheckSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_health_check: Option<HttpHealthCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp_health_check: Option<TcpHealthCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udp_icmp_health_check: Option<Empty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthy_threshold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unhealthy_threshold: Option<u32>,
    /// seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    /// seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jitter_percent: Option<u32>,
}

f5xc_spec!(HealthcheckSpec, "healthcheck", "healthchecks");

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HttpHealthCheck {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_origin_server_name: Option<Empty>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub use_http2: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expected_status_codes: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TcpHealthCheck {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_response: Option<String>,
}

#[cfg(test)]
mod test {

    use crate::Spec;

    use super::HealthcheckSpec;

    #[test]
    fn test_healthcheck_kind() {
        let kind = HealthcheckSpec::metadata();
        assert_eq!(kind.service, "config");
        assert_eq!(kind.plural, "healthchecks");
        assert_eq!(HealthcheckSpec::label(), "healthcheck");
        assert!(HealthcheckSpec::NAME_SPACED);
        assert_eq!(HealthcheckSpec::scoped_namespace("shop"), "shop");
    }

    #[test]
    fn test_decode_tcp_check() {
        let data = r#"
        {
            "healthy_threshold": 1,
            "unhealthy_threshold": 2,
            "timeout": 3,
            "interval": 5,
            "tcp_health_check": {}
        }"#;
        let spec: HealthcheckSpec = serde_json::from_str(data).expect("decode");
        assert_eq!(spec.unhealthy_threshold, Some(2));
        assert!(spec.tcp_health_check.is_some());
        assert!(spec.http_health_check.is_none());

        let json = serde_json::to_value(&spec).expect("encode");
        assert_eq!(json["tcp_health_check"], serde_json::json!({}));
        assert!(json.get("jitter_percent").is_none());
    }
}
