use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use f5xc_client::metadata::{ApplyResult, ErrorClass, ListArg, MetadataClient, MetadataClientError};
use f5xc_client::{F5Client, F5Config};
use f5xc_config::RetryPolicy;
use f5xc_types::objects::NamespaceSpec;
use f5xc_types::objects::OriginPoolSpec;
use f5xc_types::{InputF5Obj, InputObjectMeta};

const POOL_PATH: &str = "/api/config/namespaces/shop/origin_pools/pool1";

fn client_for(server: &MockServer) -> F5Client {
    let config = F5Config::with_token(&server.uri(), "secret").expect("config");
    F5Client::new(config).expect("client")
}

fn pool_body() -> serde_json::Value {
    json!({
        "metadata": { "name": "pool1", "namespace": "shop", "uid": "u-1" },
        "spec": { "port": 443 },
        "system_metadata": { "uid": "u-1", "tenant": "acme" }
    })
}

fn pool_input() -> InputF5Obj<OriginPoolSpec> {
    let spec = OriginPoolSpec {
        port: Some(443),
        ..Default::default()
    };
    InputF5Obj::new(spec, InputObjectMeta::named("pool1", "shop"))
}

#[tokio::test]
async fn test_retrieve_sends_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POOL_PATH))
        .and(header("authorization", "APIToken secret"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pool_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let pool = client
        .retrieve_item::<OriginPoolSpec, _>(&InputObjectMeta::named("pool1", "shop"))
        .await
        .expect("pool");
    assert_eq!(pool.metadata.name, "pool1");
    assert_eq!(pool.spec.port, Some(443));
    assert_eq!(pool.system_metadata.tenant.as_deref(), Some("acme"));
}

#[tokio::test]
async fn test_error_classes() {
    let server = MockServer::start().await;
    for (name, status) in [("missing", 404), ("bad", 400), ("denied", 401), ("hidden", 403)] {
        Mock::given(method("GET"))
            .and(path(format!("/api/config/namespaces/shop/origin_pools/{name}")))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "code": "ERR",
                "message": format!("{name} failed"),
                "details": []
            })))
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let classify = |name: &'static str| {
        let client = &client;
        async move {
            client
                .retrieve_item::<OriginPoolSpec, _>(&InputObjectMeta::named(name, "shop"))
                .await
                .expect_err("should fail")
        }
    };

    let err = classify("missing").await;
    assert!(err.not_founded());
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("missing failed"));

    assert_eq!(classify("bad").await.classify(), ErrorClass::Validation);
    assert_eq!(classify("denied").await.classify(), ErrorClass::Auth);
    assert_eq!(classify("hidden").await.classify(), ErrorClass::Auth);
}

#[tokio::test]
async fn test_create_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/config/namespaces/shop/origin_pools"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": 9,
            "message": "already exists"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.create_item(pool_input()).await.expect_err("conflict");
    assert_eq!(err.classify(), ErrorClass::Conflict);
}

#[tokio::test]
async fn test_create_posts_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/config/namespaces/shop/origin_pools"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "metadata": { "name": "pool1", "namespace": "shop" },
            "spec": { "port": 443 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(pool_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let created = client.create_item(pool_input()).await.expect("created");
    assert_eq!(created.metadata.uid, "u-1");
}

#[tokio::test]
async fn test_replace_reads_back_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(POOL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(POOL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(pool_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let replaced = client.replace_item(pool_input()).await.expect("replaced");
    assert_eq!(replaced.metadata.name, "pool1");
    assert_eq!(replaced.spec.port, Some(443));
}

#[tokio::test]
async fn test_delete_paths() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(POOL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/web/namespaces/shop/cascade_delete"))
        .and(body_partial_json(json!({ "name": "shop" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .delete_item::<OriginPoolSpec, _>(&InputObjectMeta::named("pool1", "shop"))
        .await
        .expect("pool deleted");
    client
        .delete_item::<NamespaceSpec, _>(&InputObjectMeta::named("shop", ""))
        .await
        .expect("namespace deleted");
}

#[tokio::test]
async fn test_list_with_label_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/config/namespaces/shop/origin_pools"))
        .and(query_param("label_filter", "app=web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "name": "pool1", "namespace": "shop", "labels": { "app": "web" }, "get_spec": { "port": 80 } },
                { "name": "pool2", "namespace": "shop", "labels": { "app": "web" } }
            ],
            "errors": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let list = client
        .retrieve_items_with_option::<OriginPoolSpec, _>(
            "shop",
            Some(ListArg {
                label_filter: Some("app=web".to_owned()),
            }),
        )
        .await
        .expect("list");
    assert_eq!(list.items.len(), 2);
    assert_eq!(list.items[0].spec.port, Some(80));
    assert_eq!(list.items[1].spec.port, None);
}

#[tokio::test]
async fn test_no_retry_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POOL_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .retrieve_item::<OriginPoolSpec, _>(&InputObjectMeta::named("pool1", "shop"))
        .await
        .expect_err("unavailable");
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_retry_when_enabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POOL_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(POOL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(pool_body()))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = F5Config::with_token(&server.uri(), "secret").expect("config");
    config.retry = RetryPolicy {
        max_retries: 3,
        wait_min: Duration::from_millis(5),
        wait_max: Duration::from_millis(20),
        ..Default::default()
    };
    let client = F5Client::new(config).expect("client");

    let pool = client
        .retrieve_item::<OriginPoolSpec, _>(&InputObjectMeta::named("pool1", "shop"))
        .await
        .expect("pool after retries");
    assert_eq!(pool.metadata.name, "pool1");
}

#[tokio::test]
async fn test_quota_usage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/web/namespaces/shop/quota/usage"))
        .and(header("authorization", "APIToken secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": {
                "origin_pool": { "limit": { "maximum": 25 }, "usage": { "current": 25 } }
            }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let pools = client
        .quota_info("shop", "origin_pool")
        .await
        .expect("quota")
        .expect("pool quota");
    assert_eq!(pools.limit, 25);
    assert_eq!(pools.available, 0);
    assert!(!pools.is_available());

    let missing = client.quota_info("shop", "healthcheck").await.expect("quota");
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_apply_ignores_server_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POOL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": { "name": "pool1", "namespace": "shop", "uid": "u-1" },
            "spec": {
                "port": 443,
                "loadbalancer_algorithm": "ROUND_ROBIN",
                "endpoint_selection": "LOCAL_PREFERRED",
                "advanced_options": null
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(POOL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(pool_body()))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.apply(pool_input()).await.expect("apply");
    assert!(matches!(result, ApplyResult::None));
}

#[tokio::test]
async fn test_apply_replaces_changed_spec() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POOL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": { "name": "pool1", "namespace": "shop", "uid": "u-1" },
            "spec": { "port": 80, "loadbalancer_algorithm": "ROUND_ROBIN" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(POOL_PATH))
        .and(body_partial_json(json!({ "spec": { "port": 443 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(pool_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.apply(pool_input()).await.expect("apply");
    assert!(matches!(result, ApplyResult::Replaced(_)));
}

#[tokio::test]
async fn test_encoded_name_stays_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POOL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(pool_body()))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .retrieve_item::<OriginPoolSpec, _>(&InputObjectMeta::named("pool1?report_fields", "shop"))
        .await
        .expect_err("other object");
    assert!(err.not_founded());
}
