use std::borrow::Cow;

use serde::Serialize;

use f5xc_types::options::ListOptions;
use f5xc_types::{Kind, Spec};
use f5xc_metadata_client::NameSpace;

use crate::client::http::Uri;
use crate::ClientError;

/// single item uri, `sub_resource` is appended after the name
pub fn item_uri<S>(
    host: &str,
    name: &str,
    namespace: &str,
    sub_resource: Option<&str>,
) -> Result<Uri, ClientError>
where
    S: Spec,
{
    let ns = if S::NAME_SPACED {
        NameSpace::Named(namespace.to_owned())
    } else {
        NameSpace::All
    };

    let prefix = prefix_uri(S::metadata(), host, ns, None)?;
    let name = segment("name", name)?;
    let sub_resource = sub_resource.unwrap_or("");

    let uri: Uri = format!("{prefix}/{name}{sub_resource}").parse()?;
    Ok(uri)
}

/// collection uri, used to list and create
pub fn items_uri<S>(
    host: &str,
    namespace: NameSpace,
    list_options: Option<ListOptions>,
) -> Result<Uri, ClientError>
where
    S: Spec,
{
    let ns = if S::NAME_SPACED {
        namespace
    } else {
        NameSpace::All
    };
    let uri: Uri = prefix_uri(S::metadata(), host, ns, list_options)?.parse()?;
    Ok(uri)
}

/// generate prefix for given kind.
/// namespaced kinds live under `/api/{service}/namespaces/{ns}/{plural}`
pub fn prefix_uri<N>(
    kind: &Kind,
    host: &str,
    ns: N,
    options: Option<ListOptions>,
) -> Result<String, ClientError>
where
    N: Into<NameSpace>,
{
    let namespace = ns.into();
    let service = kind.service;
    let plural = kind.plural;

    let query = match options.filter(|opt| !opt.is_empty()) {
        Some(opt) => format!("?{}", query_string(&opt)?),
        None => "".to_owned(),
    };

    if namespace.is_all() {
        Ok(format!("{host}/api/{service}/{plural}{query}"))
    } else {
        let ns = segment("namespace", namespace.named())?;
        Ok(format!("{host}/api/{service}/namespaces/{ns}/{plural}{query}"))
    }
}

/// usage and limits of every object type in `namespace`
pub(crate) fn quota_usage_uri(host: &str, namespace: &str) -> Result<Uri, ClientError> {
    let ns = segment("namespace", namespace)?;
    let uri: Uri = format!("{host}/api/web/namespaces/{ns}/quota/usage").parse()?;
    Ok(uri)
}

/// percent encoded path segment; empty values and dot segments are refused
fn segment<'a>(field: &'static str, value: &'a str) -> Result<Cow<'a, str>, ClientError> {
    if value.is_empty() || value == "." || value == ".." {
        return Err(ClientError::InvalidSegment {
            field,
            value: value.to_owned(),
        });
    }
    Ok(urlencoding::encode(value))
}

fn query_string<Q: Serialize>(query: &Q) -> Result<String, ClientError> {
    serde_qs::to_string(query).map_err(|err| ClientError::Other(format!("query string: {err}")))
}

#[cfg(test)]
mod test {
    use f5xc_metadata_client::NameSpace;
    use f5xc_types::objects::NamespaceSpec;
    use f5xc_types::objects::OriginPoolSpec;
    use f5xc_types::options::ListOptions;
    use f5xc_types::{Kind, CONFIG_SERVICE};

    use crate::ClientError;

    use super::{item_uri, items_uri, prefix_uri};

    const POOLS: Kind = Kind {
        service: CONFIG_SERVICE,
        kind: "origin_pool",
        plural: "origin_pools",
    };

    #[test]
    fn test_prefix_namespaced() {
        let uri = prefix_uri(&POOLS, "https://tenant.example.com", "shop", None).expect("uri");
        assert_eq!(
            uri,
            "https://tenant.example.com/api/config/namespaces/shop/origin_pools"
        );
    }

    #[test]
    fn test_prefix_with_label_filter() {
        let uri = prefix_uri(
            &POOLS,
            "https://tenant.example.com",
            "shop",
            Some(ListOptions::with_labels("web")),
        )
        .expect("uri");
        assert_eq!(
            uri,
            "https://tenant.example.com/api/config/namespaces/shop/origin_pools?label_filter=web"
        );
    }

    #[test]
    fn test_empty_options_add_no_query() {
        let uri = prefix_uri(
            &POOLS,
            "https://tenant.example.com",
            "shop",
            Some(ListOptions::default()),
        )
        .expect("uri");
        assert!(!uri.contains('?'));
    }

    #[test]
    fn test_item_uri() {
        let uri = item_uri::<OriginPoolSpec>("http://localhost:8080", "pool1", "shop", None)
            .expect("uri");
        assert_eq!(
            uri.to_string(),
            "http://localhost:8080/api/config/namespaces/shop/origin_pools/pool1"
        );
    }

    #[test]
    fn test_namespace_uris_ignore_namespace() {
        let uri = item_uri::<NamespaceSpec>(
            "http://localhost:8080",
            "shop",
            "system",
            Some("/cascade_delete"),
        )
        .expect("uri");
        assert_eq!(
            uri.to_string(),
            "http://localhost:8080/api/web/namespaces/shop/cascade_delete"
        );

        let uri = items_uri::<NamespaceSpec>("http://localhost:8080", NameSpace::All, None)
            .expect("uri");
        assert_eq!(uri.to_string(), "http://localhost:8080/api/web/namespaces");
    }

    #[test]
    fn test_segments_are_encoded() {
        let host = "http://localhost:8080";
        let uri = item_uri::<OriginPoolSpec>(host, "pool1?report_fields", "shop", None)
            .expect("uri");
        assert_eq!(
            uri.path(),
            "/api/config/namespaces/shop/origin_pools/pool1%3Freport_fields"
        );
        assert!(uri.query().is_none());

        let uri = item_uri::<OriginPoolSpec>(host, "pool1#frag", "shop", None).expect("uri");
        assert_eq!(uri.path(), "/api/config/namespaces/shop/origin_pools/pool1%23frag");

        let uri = item_uri::<OriginPoolSpec>(host, "x", "../../web/namespaces/other", None)
            .expect("uri");
        assert_eq!(
            uri.path(),
            "/api/config/namespaces/..%2F..%2Fweb%2Fnamespaces%2Fother/origin_pools/x"
        );
    }

    #[test]
    fn test_dot_segments_refused() {
        let host = "http://localhost:8080";
        let cases = [
            ("..", "shop"),
            (".", "shop"),
            ("", "shop"),
            ("x", ".."),
            ("x", ""),
        ];
        for (name, namespace) in cases {
            let err = item_uri::<OriginPoolSpec>(host, name, namespace, None)
                .expect_err("dot segment");
            assert!(
                matches!(err, ClientError::InvalidSegment { .. }),
                "{name:?} {namespace:?}"
            );
        }
    }
}
