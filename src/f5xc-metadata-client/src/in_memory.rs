use std::collections::HashMap;
use std::io::Error as IoError;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use thiserror::Error;
use tracing::debug;

use f5xc_diff::DiffError;
use f5xc_types::{F5List, F5Meta, F5Obj, InputF5Obj, Kind, ObjectMeta, Spec, SystemMetadata};

use crate::ErrorClass;
use crate::ListArg;
use crate::MetadataClient;
use crate::MetadataClientError;
use crate::NameSpace;

pub const IN_MEMORY_TENANT: &str = "in-memory";

#[derive(Error, Debug)]
pub enum InMemoryError {
    #[error("io: {0}")]
    IoError(#[from] IoError),
    #[error("{0}")]
    DiffError(#[from] DiffError),
    #[error("{0}")]
    JsonError(#[from] serde_json::Error),
    #[error("lock poison error")]
    LockPoisonError,
    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        kind: &'static str,
        namespace: String,
        name: String,
    },
    #[error("{kind} {namespace}/{name} already exists")]
    AlreadyExists {
        kind: &'static str,
        namespace: String,
        name: String,
    },
    #[error("invalid object: {0}")]
    Invalid(String),
}

impl<T> From<PoisonError<T>> for InMemoryError {
    fn from(_error: PoisonError<T>) -> Self {
        Self::LockPoisonError
    }
}

impl MetadataClientError for InMemoryError {
    fn classify(&self) -> ErrorClass {
        match self {
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::AlreadyExists { .. } => ErrorClass::Conflict,
            Self::Invalid(_) => ErrorClass::Validation,
            _ => ErrorClass::Other,
        }
    }

    fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::AlreadyExists { .. } => Some(409),
            Self::Invalid(_) => Some(400),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ItemKey {
    kind: &'static Kind,
    ns: String,
    name: String,
}

impl ItemKey {
    fn new<S>(metadata: &dyn F5Meta) -> Self
    where
        S: Spec,
    {
        ItemKey {
            kind: S::metadata(),
            ns: S::scoped_namespace(metadata.namespace()).to_owned(),
            name: metadata.name().to_owned(),
        }
    }

    fn not_found(&self) -> InMemoryError {
        InMemoryError::NotFound {
            kind: self.kind.kind,
            namespace: self.ns.clone(),
            name: self.name.clone(),
        }
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `k=v` pairs separated by `,`
fn matches_labels(filter: &str, labels: &HashMap<String, String>) -> bool {
    filter
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .all(|term| match term.split_once("!=") {
            Some((key, value)) => labels.get(key.trim()).map(String::as_str) != Some(value.trim()),
            None => match term.split_once('=') {
                Some((key, value)) => {
                    labels.get(key.trim()).map(String::as_str) == Some(value.trim())
                }
                None => labels.contains_key(term),
            },
        })
}

type ItemMap = HashMap<ItemKey, serde_json::Value>;

/// objects kept in process memory, behaving like the remote api
#[derive(Debug, Default)]
pub struct InMemoryClient {
    store: RwLock<ItemMap>,
}

impl InMemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// number of stored objects of every kind
    pub fn len(&self) -> usize {
        self.store.read().map(|store| store.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MetadataClient for InMemoryClient {
    type MetadataClientError = InMemoryError;

    async fn retrieve_item<S, M>(&self, metadata: &M) -> Result<F5Obj<S>, Self::MetadataClientError>
    where
        S: Spec,
        M: F5Meta + Send + Sync,
    {
        let store = self.store.read()?;
        let item_key = ItemKey::new::<S>(metadata);
        let item_value = store.get(&item_key).ok_or_else(|| item_key.not_found())?;
        Ok(serde_json::from_value(item_value.clone())?)
    }

    async fn retrieve_items_with_option<S, N>(
        &self,
        namespace: N,
        option: Option<ListArg>,
    ) -> Result<F5List<S>, Self::MetadataClientError>
    where
        S: Spec,
        N: Into<NameSpace> + Send + Sync,
    {
        let namespace = namespace.into();
        let label_filter = option.and_then(|opt| opt.label_filter);
        let store = self.store.read()?;

        let mut items = vec![];
        for (key, value) in store.iter() {
            if key.kind != S::metadata() {
                continue;
            }
            if S::NAME_SPACED && !namespace.is_all() && key.ns != namespace.named() {
                continue;
            }
            let item: F5Obj<S> = serde_json::from_value(value.clone())?;
            if let Some(filter) = &label_filter {
                if !matches_labels(filter, &item.metadata.labels) {
                    continue;
                }
            }
            items.push(item);
        }
        items.sort_by(|a, b| a.id().cmp(&b.id()));

        Ok(F5List {
            items,
            errors: vec![],
        })
    }

    async fn create_item<S>(&self, value: InputF5Obj<S>) -> Result<F5Obj<S>, Self::MetadataClientError>
    where
        S: Spec,
    {
        if value.metadata.name.is_empty() {
            return Err(InMemoryError::Invalid("metadata.name is required".to_owned()));
        }

        let item_key = ItemKey::new::<S>(&value.metadata);
        let mut store = self.store.write()?;
        if store.contains_key(&item_key) {
            return Err(InMemoryError::AlreadyExists {
                kind: S::label(),
                namespace: item_key.ns,
                name: item_key.name,
            });
        }

        let uid = uuid::Uuid::new_v4().to_string();
        let timestamp = now();
        let obj = F5Obj {
            metadata: ObjectMeta {
                namespace: item_key.ns.clone(),
                uid: uid.clone(),
                ..value.metadata.into_object_meta()
            },
            spec: value.spec,
            system_metadata: SystemMetadata {
                uid,
                creation_timestamp: Some(timestamp.clone()),
                modification_timestamp: Some(timestamp),
                creator_class: Some(IN_MEMORY_TENANT.to_owned()),
                creator_id: None,
                tenant: Some(IN_MEMORY_TENANT.to_owned()),
            },
        };

        debug!("{}: created '{}'", S::label(), obj.id());
        store.insert(item_key, serde_json::to_value(&obj)?);
        Ok(obj)
    }

    async fn replace_item<S>(&self, value: InputF5Obj<S>) -> Result<F5Obj<S>, Self::MetadataClientError>
    where
        S: Spec,
    {
        let item_key = ItemKey::new::<S>(&value.metadata);
        let mut store = self.store.write()?;
        let item_value = store
            .get_mut(&item_key)
            .ok_or_else(|| item_key.not_found())?;
        let current: F5Obj<S> = serde_json::from_value(item_value.clone())?;

        let mut system_metadata = current.system_metadata;
        system_metadata.modification_timestamp = Some(now());
        let obj = F5Obj {
            metadata: ObjectMeta {
                namespace: item_key.ns.clone(),
                uid: current.metadata.uid,
                ..value.metadata.into_object_meta()
            },
            spec: value.spec,
            system_metadata,
        };

        debug!("{}: replaced '{}'", S::label(), obj.id());
        *item_value = serde_json::to_value(&obj)?;
        Ok(obj)
    }

    async fn delete_item<S, M>(&self, metadata: &M) -> Result<(), Self::MetadataClientError>
    where
        S: Spec,
        M: F5Meta + Send + Sync,
    {
        let mut store = self.store.write()?;
        let item_key = ItemKey::new::<S>(metadata);
        store.remove(&item_key).ok_or_else(|| item_key.not_found())?;

        if S::CASCADE_DELETE {
            let before = store.len();
            store.retain(|key, _| key.ns != item_key.name);
            debug!(
                "{}: cascade deleted {} objects in '{}'",
                S::label(),
                before - store.len(),
                item_key.name
            );
        }
        Ok(())
    }
}
