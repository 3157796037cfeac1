//!
//! # Kind registry
//!
//! Static table of every kind the mapper knows about, addressed by its
//! resource type name (`f5xc_origin_pool`) or its kind (`origin_pool`).
//! [`visit`] turns a runtime name back into a typed call.
//!
use f5xc_config::OperationTimeouts;
use f5xc_types::objects::*;
use f5xc_types::{Kind, Spec};

const RESOURCE_PREFIX: &str = "f5xc_";

/// default deadline group of a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    Standard,
    /// sites and clusters
    LongRunning,
}

impl ResourceClass {
    pub fn timeouts(self) -> OperationTimeouts {
        match self {
            Self::Standard => OperationTimeouts::standard(),
            Self::LongRunning => OperationTimeouts::long_running(),
        }
    }
}

pub struct KindEntry {
    metadata: fn() -> &'static Kind,
    name_spaced: bool,
    class: ResourceClass,
}

impl KindEntry {
    pub fn kind(&self) -> &'static Kind {
        (self.metadata)()
    }

    /// e.g. `f5xc_http_loadbalancer`
    pub fn resource_type(&self) -> String {
        self.kind().resource_type()
    }

    pub fn name_spaced(&self) -> bool {
        self.name_spaced
    }

    pub fn class(&self) -> ResourceClass {
        self.class
    }

    pub fn timeouts(&self) -> OperationTimeouts {
        self.class.timeouts()
    }
}

impl std::fmt::Debug for KindEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KindEntry")
            .field("kind", self.kind())
            .field("name_spaced", &self.name_spaced)
            .field("class", &self.class)
            .finish()
    }
}

/// typed callback selected by [`visit`]
pub trait KindVisitor {
    type Output;

    fn visit<S: Spec + 'static>(self, entry: &'static KindEntry) -> Self::Output;
}

/// entry by resource type or kind name
pub fn lookup(name: &str) -> Option<&'static KindEntry> {
    let kind = name.strip_prefix(RESOURCE_PREFIX).unwrap_or(name);
    KINDS.iter().find(|entry| entry.kind().kind == kind)
}

pub fn entries() -> &'static [KindEntry] {
    KINDS
}

macro_rules! kinds {
    ($($spec:ty => $class:ident),* $(,)?) => {
        static KINDS: &[KindEntry] = &[
            $(
                KindEntry {
                    metadata: <$spec as Spec>::metadata,
                    name_spaced: <$spec as Spec>::NAME_SPACED,
                    class: ResourceClass::$class,
                },
            )*
        ];

        /// call `visitor` with the spec type registered under `name`
        pub fn visit<V: KindVisitor>(name: &str, visitor: V) -> Option<V::Output> {
            let entry = lookup(name)?;
            let kind = entry.kind();
            $(
                if kind == <$spec as Spec>::metadata() {
                    return Some(visitor.visit::<$spec>(entry));
                }
            )*
            None
        }
    };
}

kinds! {
    NamespaceSpec => Standard,

    // load balancing
    HttpLoadBalancerSpec => Standard,
    TcpLoadBalancerSpec => Standard,
    UdpLoadBalancerSpec => Standard,
    CdnLoadBalancerSpec => Standard,
    OriginPoolSpec => Standard,
    HealthcheckSpec => Standard,
    RouteSpec => Standard,
    VirtualHostSpec => Standard,

    // security
    AppFirewallSpec => Standard,
    ServicePolicySpec => Standard,
    ServicePolicyRuleSpec => Standard,
    RateLimiterSpec => Standard,
    UserIdentificationSpec => Standard,
    MaliciousUserMitigationSpec => Standard,
    WafExclusionPolicySpec => Standard,
    ForwardProxyPolicySpec => Standard,
    FastAclSpec => Standard,
    NetworkPolicySpec => Standard,
    NetworkFirewallSpec => Standard,

    // sets and labels
    IpPrefixSetSpec => Standard,
    GeoLocationSetSpec => Standard,
    BgpAsnSetSpec => Standard,
    KnownLabelSpec => Standard,

    // networking
    BgpSpec => Standard,
    TunnelSpec => Standard,
    NetworkConnectorSpec => Standard,
    NetworkInterfaceSpec => Standard,
    VirtualSiteSpec => Standard,
    FleetSpec => Standard,
    PolicerSpec => Standard,
    AddressAllocatorSpec => Standard,
    AdvertisePolicySpec => Standard,

    // dns
    DnsZoneSpec => Standard,
    DnsDomainSpec => Standard,
    DnsLoadBalancerSpec => Standard,

    // certificates and credentials
    CertificateSpec => Standard,
    CertificateChainSpec => Standard,
    TrustedCaListSpec => Standard,
    CloudCredentialsSpec => Standard,

    // alerting
    AlertPolicySpec => Standard,
    AlertReceiverSpec => Standard,

    // sites and clusters
    AwsVpcSiteSpec => LongRunning,
    AwsTgwSiteSpec => LongRunning,
    AzureVnetSiteSpec => LongRunning,
    GcpVpcSiteSpec => LongRunning,
    VoltstackSiteSpec => LongRunning,
    SecuremeshSiteSpec => LongRunning,
    SecuremeshSiteV2Spec => LongRunning,
    K8sClusterSpec => LongRunning,
    VirtualK8sSpec => LongRunning,
}
