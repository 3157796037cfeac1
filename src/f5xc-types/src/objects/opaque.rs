//! kinds whose spec is passed through as raw json

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

macro_rules! opaque_spec {
    ($spec:ident, $kind:expr, $plural:expr) => {
        #[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
        pub struct $spec {
            #[serde(flatten)]
            pub fields: Map<String, Value>,
        }

        impl From<Map<String, Value>> for $spec {
            fn from(fields: Map<String, Value>) -> Self {
                Self { fields }
            }
        }

        crate::f5xc_spec!($spec, $kind, $plural);
    };
}

// load balancing
opaque_spec!(TcpLoadBalancerSpec, "tcp_loadbalancer", "tcp_loadbalancers");
opaque_spec!(UdpLoadBalancerSpec, "udp_loadbalancer", "udp_loadbalancers");
opaque_spec!(CdnLoadBalancerSpec, "cdn_loadbalancer", "cdn_loadbalancers");
opaque_spec!(RouteSpec, "route", "routes");
opaque_spec!(VirtualHostSpec, "virtual_host", "virtual_hosts");

// security
opaque_spec!(AppFirewallSpec, "app_firewall", "app_firewalls");
opaque_spec!(ServicePolicySpec, "service_policy", "service_policys");
opaque_spec!(ServicePolicyRuleSpec, "service_policy_rule", "service_policy_rules");
opaque_spec!(RateLimiterSpec, "rate_limiter", "rate_limiters");
opaque_spec!(UserIdentificationSpec, "user_identification", "user_identifications");
opaque_spec!(
    MaliciousUserMitigationSpec,
    "malicious_user_mitigation",
    "malicious_user_mitigations"
);
opaque_spec!(WafExclusionPolicySpec, "waf_exclusion_policy", "waf_exclusion_policys");
opaque_spec!(ForwardProxyPolicySpec, "forward_proxy_policy", "forward_proxy_policys");
opaque_spec!(FastAclSpec, "fast_acl", "fast_acls");
opaque_spec!(NetworkPolicySpec, "network_policy", "network_policys");
opaque_spec!(NetworkFirewallSpec, "network_firewall", "network_firewalls");

// sets
opaque_spec!(IpPrefixSetSpec, "ip_prefix_set", "ip_prefix_sets");
opaque_spec!(GeoLocationSetSpec, "geo_location_set", "geo_location_sets");
opaque_spec!(BgpAsnSetSpec, "bgp_asn_set", "bgp_asn_sets");
opaque_spec!(KnownLabelSpec, "known_label", "known_labels");

// networking
opaque_spec!(BgpSpec, "bgp", "bgps");
opaque_spec!(TunnelSpec, "tunnel", "tunnels");
opaque_spec!(NetworkConnectorSpec, "network_connector", "network_connectors");
opaque_spec!(NetworkInterfaceSpec, "network_interface", "network_interfaces");
opaque_spec!(VirtualSiteSpec, "virtual_site", "virtual_sites");
opaque_spec!(FleetSpec, "fleet", "fleets");
opaque_spec!(PolicerSpec, "policer", "policers");
opaque_spec!(AddressAllocatorSpec, "address_allocator", "address_allocators");
opaque_spec!(AdvertisePolicySpec, "advertise_policy", "advertise_policys");

// dns
opaque_spec!(DnsZoneSpec, "dns_zone", "dns_zones");
opaque_spec!(DnsDomainSpec, "dns_domain", "dns_domains");
opaque_spec!(DnsLoadBalancerSpec, "dns_load_balancer", "dns_load_balancers");

// certificates and credentials
opaque_spec!(CertificateSpec, "certificate", "certificates");
opaque_spec!(CertificateChainSpec, "certificate_chain", "certificate_chains");
opaque_spec!(TrustedCaListSpec, "trusted_ca_list", "trusted_ca_lists");
opaque_spec!(CloudCredentialsSpec, "cloud_credentials", "cloud_credentialss");

// alerting
opaque_spec!(AlertPolicySpec, "alert_policy", "alert_policys");
opaque_spec!(AlertReceiverSpec, "alert_receiver", "alert_receivers");

// sites and clusters
opaque_spec!(AwsVpcSiteSpec, "aws_vpc_site", "aws_vpc_sites");
opaque_spec!(AwsTgwSiteSpec, "aws_tgw_site", "aws_tgw_sites");
opaque_spec!(AzureVnetSiteSpec, "azure_vnet_site", "azure_vnet_sites");
opaque_spec!(GcpVpcSiteSpec, "gcp_vpc_site", "gcp_vpc_sites");
opaque_spec!(VoltstackSiteSpec, "voltstack_site", "voltstack_sites");
opaque_spec!(SecuremeshSiteSpec, "securemesh_site", "securemesh_sites");
opaque_spec!(SecuremeshSiteV2Spec, "securemesh_site_v2", "securemesh_site_v2s");
opaque_spec!(K8sClusterSpec, "k8s_cluster", "k8s_clusters");
opaque_spec!(VirtualK8sSpec, "virtual_k8s", "virtual_k8ss");
