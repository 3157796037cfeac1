use serde::Deserialize;
use serde::Serialize;

use crate::Kind;
use crate::Spec;
use crate::WEB_SERVICE;

const API: Kind = Kind {
    service: WEB_SERVICE,
    kind: "namespace",
    plural: "namespaces",
};

/// namespaces carry no configuration of their own
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct NamespaceSpec {}

impl Spec for NamespaceSpec {
    const NAME_SPACED: bool = false;
    // plain DELETE is not implemented by the api
    const CASCADE_DELETE: bool = true;

    fn metadata() -> &'static Kind {
        &API
    }
}

#[cfg(test)]
mod test {

    use crate::Spec;

    use super::NamespaceSpec;

    #[test]
    fn test_namespaces_live_in_system() {
        assert_eq!(NamespaceSpec::scoped_namespace(""), "system");
        assert_eq!(NamespaceSpec::scoped_namespace("shop"), "system");
    }
}
