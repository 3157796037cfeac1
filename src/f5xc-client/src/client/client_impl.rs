use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use hyper::header::HeaderValue;
use hyper::header::ACCEPT;
use hyper::header::AUTHORIZATION;
use hyper::header::CONTENT_TYPE;
use hyper::Body;
use hyper::Method;
use hyper::Request;
use hyper::Uri;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;
use tracing::error;
use tracing::trace;

use f5xc_config::{F5Config, RetryPolicy};
use f5xc_metadata_client::{ListArg, MetadataClient, NameSpace};
use f5xc_types::options::ListOptions;
use f5xc_types::{F5List, F5Meta, F5Obj, InputF5Obj, ListError, ObjectMeta, Spec};

use crate::error::{ApiStatus, ClientError};
use crate::uri::{item_uri, items_uri};

use super::{HyperClient, HyperConfigBuilder};

const JSON: &str = "application/json";

/// F5 Distributed Cloud tenant accessible thru the REST api
pub struct F5Client {
    client: HyperClient,
    host: String,
    token: Option<String>,
    request_timeout: Duration,
    retry: RetryPolicy,
}

impl fmt::Debug for F5Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("F5Client")
            .field("host", &self.host)
            .field("token", &self.token.as_ref().map(|_| "****"))
            .field("request_timeout", &self.request_timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl F5Client {
    // load using environment and default config file
    pub fn try_default() -> Result<Self, ClientError> {
        let config = F5Config::load()?;
        Self::new(config)
    }

    pub fn new(config: F5Config) -> Result<Self, ClientError> {
        let request_timeout = config.request_timeout;
        let retry = config.retry;
        let helper = HyperConfigBuilder::new(config)?;
        let host = helper.host();
        let token = helper.token();
        let client = helper.build()?;
        debug!(%host, token = token.is_some(), "f5xc client created");
        Ok(Self {
            client,
            host,
            token,
            request_timeout,
            retry,
        })
    }

    pub fn hostname(&self) -> &str {
        &self.host
    }

    fn finish_request(&self, request: &mut Request<Body>) -> Result<(), ClientError> {
        let headers = request.headers_mut();
        if let Some(ref token) = self.token {
            let full_token = format!("APIToken {token}");
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&full_token)?);
        }
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        Ok(())
    }

    /// single round trip, bounded by the request timeout
    async fn send_once(
        &self,
        method: &Method,
        uri: &Uri,
        body: Option<&[u8]>,
    ) -> Result<Bytes, ClientError> {
        let body = match body {
            Some(bytes) => Body::from(bytes.to_vec()),
            None => Body::empty(),
        };
        let mut request = Request::builder()
            .method(method.clone())
            .uri(uri.clone())
            .body(body)?;
        self.finish_request(&mut request)?;

        trace!("request: {} {}", method, uri);

        let round_trip = async {
            let resp = self.client.request(request).await?;
            let status = resp.status();
            let buffer = hyper::body::to_bytes(resp.into_body()).await?;
            Ok::<_, ClientError>((status, buffer))
        };

        let (status, buffer) = tokio::time::timeout(self.request_timeout, round_trip)
            .await
            .map_err(|_| ClientError::Timeout(self.request_timeout))??;

        if status.is_success() {
            trace!(%status, "success response: {}", String::from_utf8_lossy(&buffer));
            Ok(buffer)
        } else {
            debug!(%status, "error response received");
            trace!("error body: {}", String::from_utf8_lossy(&buffer));
            Err(ApiStatus::from_response(status.as_u16(), &buffer).into())
        }
    }

    /// send request, retrying throttled and failed attempts when the retry policy allows
    async fn send(
        &self,
        method: Method,
        uri: Uri,
        body: Option<Vec<u8>>,
    ) -> Result<Bytes, ClientError> {
        let mut attempt = 0;
        loop {
            match self.send_once(&method, &uri, body.as_deref()).await {
                Ok(buffer) => return Ok(buffer),
                Err(err) if attempt < self.retry.max_retries && err.is_retryable() => {
                    let wait = if err.status() == Some(429) {
                        self.retry.rate_limit_wait
                    } else {
                        self.retry.backoff(attempt)
                    };
                    debug!(
                        attempt = attempt + 1,
                        max = self.retry.max_retries,
                        "{} {} failed: {}, retrying in {:?}",
                        method,
                        uri,
                        err,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub(crate) async fn handle_request<T>(
        &self,
        method: Method,
        uri: Uri,
        body: Option<Vec<u8>>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let buffer = self.send(method, uri, body).await?;
        decode(&buffer)
    }

    /// objects returned by a write; fetch the object when the body carries no metadata
    async fn written_object<S>(
        &self,
        buffer: Bytes,
        name: &str,
        namespace: &str,
    ) -> Result<F5Obj<S>, ClientError>
    where
        S: Spec,
    {
        let value: Value = if buffer.is_empty() {
            Value::Null
        } else {
            decode(&buffer)?
        };
        let has_metadata = value
            .get("metadata")
            .and_then(|meta| meta.get("name"))
            .is_some();
        if has_metadata {
            Ok(serde_json::from_value(value)?)
        } else {
            debug!(
                "{}: write response has no object, reading back '{}/{}'",
                S::label(),
                namespace,
                name
            );
            let uri = item_uri::<S>(&self.host, name, namespace, None)?;
            self.handle_request(Method::GET, uri, None).await
        }
    }
}

fn decode<T: DeserializeOwned>(buffer: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice(buffer).map_err(|err| {
        error!("json error: {}", err);
        error!("source: {}", String::from_utf8_lossy(buffer));
        err.into()
    })
}

/// list responses carry either full objects or flat entries with `get_spec`
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct RawList {
    items: Vec<Map<String, Value>>,
    errors: Vec<ListError>,
}

fn list_item<S: Spec>(mut item: Map<String, Value>) -> Result<F5Obj<S>, ClientError> {
    if item.contains_key("metadata") {
        return Ok(serde_json::from_value(Value::Object(item))?);
    }

    let spec = match item.remove("get_spec") {
        Some(Value::Null) | None => S::default(),
        Some(spec) => serde_json::from_value(spec)?,
    };
    let metadata: ObjectMeta = serde_json::from_value(Value::Object(item))?;
    Ok(F5Obj {
        metadata,
        spec,
        system_metadata: Default::default(),
    })
}

#[async_trait]
impl MetadataClient for F5Client {
    type MetadataClientError = ClientError;

    async fn retrieve_item<S, M>(&self, metadata: &M) -> Result<F5Obj<S>, ClientError>
    where
        S: Spec,
        M: F5Meta + Send + Sync,
    {
        let uri = item_uri::<S>(&self.host, metadata.name(), metadata.namespace(), None)?;
        debug!("{}: retrieving item: {}", S::label(), uri);
        self.handle_request(Method::GET, uri, None).await
    }

    async fn retrieve_items_with_option<S, N>(
        &self,
        namespace: N,
        option: Option<ListArg>,
    ) -> Result<F5List<S>, ClientError>
    where
        S: Spec,
        N: Into<NameSpace> + Send + Sync,
    {
        let mut options: ListOptions = option.map(Into::into).unwrap_or_default();
        // full objects rather than name only entries
        options.report_fields.get_or_insert_with(String::new);

        let uri = items_uri::<S>(&self.host, namespace.into(), Some(options))?;
        debug!("{}: retrieving items: {}", S::label(), uri);

        let raw: RawList = self.handle_request(Method::GET, uri, None).await?;
        for list_error in &raw.errors {
            error!("{}: list error: {}", S::label(), list_error.message);
        }

        let items = raw
            .items
            .into_iter()
            .map(list_item::<S>)
            .collect::<Result<Vec<_>, _>>()?;
        trace!("{}: retrieved {} items", S::label(), items.len());
        Ok(F5List {
            items,
            errors: raw.errors,
        })
    }

    async fn create_item<S>(&self, value: InputF5Obj<S>) -> Result<F5Obj<S>, ClientError>
    where
        S: Spec,
    {
        let uri = items_uri::<S>(
            &self.host,
            NameSpace::Named(value.metadata.namespace.clone()),
            None,
        )?;
        debug!("{}: creating '{}'", S::label(), value.metadata);
        trace!("{}: creating {:#?}", S::label(), value);

        let body = serde_json::to_vec(&value)?;
        let buffer = self.send(Method::POST, uri, Some(body)).await?;
        self.written_object(buffer, &value.metadata.name, &value.metadata.namespace)
            .await
    }

    async fn replace_item<S>(&self, value: InputF5Obj<S>) -> Result<F5Obj<S>, ClientError>
    where
        S: Spec,
    {
        let uri = item_uri::<S>(
            &self.host,
            &value.metadata.name,
            &value.metadata.namespace,
            None,
        )?;
        debug!("{}: replacing '{}'", S::label(), value.metadata);
        trace!("{}: replacing {:#?}", S::label(), value);

        let body = serde_json::to_vec(&value)?;
        let buffer = self.send(Method::PUT, uri, Some(body)).await?;
        self.written_object(buffer, &value.metadata.name, &value.metadata.namespace)
            .await
    }

    async fn delete_item<S, M>(&self, metadata: &M) -> Result<(), ClientError>
    where
        S: Spec,
        M: F5Meta + Send + Sync,
    {
        let name = metadata.name();
        let (method, uri, body) = if S::CASCADE_DELETE {
            let uri = item_uri::<S>(&self.host, name, metadata.namespace(), Some("/cascade_delete"))?;
            let body = serde_json::to_vec(&serde_json::json!({ "name": name }))?;
            (Method::POST, uri, Some(body))
        } else {
            let uri = item_uri::<S>(&self.host, name, metadata.namespace(), None)?;
            (Method::DELETE, uri, None)
        };
        debug!("{}: delete item on url: {}", S::label(), uri);
        self.send(method, uri, body).await?;
        Ok(())
    }
}
