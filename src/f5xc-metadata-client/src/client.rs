use std::fmt;
use std::io::Error as IoError;

use async_trait::async_trait;
use serde_json::Error as SerdeJsonError;
use tracing::debug;
use tracing::trace;

use f5xc_diff::DiffError;
use f5xc_types::options::ListOptions;
use f5xc_types::{F5List, F5Meta, F5Obj, InputF5Obj, Spec};

use crate::{changed_paths, ApplyResult, CompareError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameSpace {
    All,
    Named(String),
}

impl NameSpace {
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn named(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Named(name) => name,
        }
    }
}

impl From<String> for NameSpace {
    fn from(namespace: String) -> Self {
        NameSpace::Named(namespace)
    }
}

impl From<&str> for NameSpace {
    fn from(namespace: &str) -> Self {
        NameSpace::Named(namespace.to_owned())
    }
}

impl fmt::Display for NameSpace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.named())
    }
}

#[derive(Default, Clone, Debug)]
pub struct ListArg {
    pub label_filter: Option<String>,
}

impl From<ListArg> for ListOptions {
    fn from(arg: ListArg) -> Self {
        ListOptions {
            label_filter: arg.label_filter,
            ..Default::default()
        }
    }
}

/// coarse category of a backend failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    NotFound,
    Conflict,
    Validation,
    Auth,
    Transport,
    Other,
}

/// errors reported by a metadata client
pub trait MetadataClientError: std::error::Error + Send + Sync + 'static {
    fn classify(&self) -> ErrorClass;

    /// http status reported by the backend, if any
    fn status(&self) -> Option<u16> {
        None
    }

    /// is not founded
    fn not_founded(&self) -> bool {
        self.classify() == ErrorClass::NotFound
    }
}

#[async_trait]
pub trait MetadataClient: Send + Sync {
    type MetadataClientError: MetadataClientError
        + From<IoError>
        + From<DiffError>
        + From<SerdeJsonError>;

    /// retrieval a single item
    async fn retrieve_item<S, M>(&self, metadata: &M) -> Result<F5Obj<S>, Self::MetadataClientError>
    where
        S: Spec,
        M: F5Meta + Send + Sync;

    /// retrieve all items in a single chunk
    async fn retrieve_items<S, N>(&self, namespace: N) -> Result<F5List<S>, Self::MetadataClientError>
    where
        S: Spec,
        N: Into<NameSpace> + Send + Sync,
    {
        self.retrieve_items_with_option(namespace, None).await
    }

    async fn retrieve_items_with_option<S, N>(
        &self,
        namespace: N,
        option: Option<ListArg>,
    ) -> Result<F5List<S>, Self::MetadataClientError>
    where
        S: Spec,
        N: Into<NameSpace> + Send + Sync;

    /// create new object, fails if it already exists
    async fn create_item<S>(&self, value: InputF5Obj<S>) -> Result<F5Obj<S>, Self::MetadataClientError>
    where
        S: Spec;

    /// replace existing object.
    /// object must exist
    async fn replace_item<S>(&self, value: InputF5Obj<S>) -> Result<F5Obj<S>, Self::MetadataClientError>
    where
        S: Spec;

    /// delete object, kinds with `CASCADE_DELETE` take their content with them
    async fn delete_item<S, M>(&self, metadata: &M) -> Result<(), Self::MetadataClientError>
    where
        S: Spec,
        M: F5Meta + Send + Sync;

    /// apply object.
    /// if object doesn't exist, it will be created.
    /// if object exist and differs, it is replaced as a whole.
    /// server defaults the desired spec leaves out don't count as a difference
    async fn apply<S>(&self, value: InputF5Obj<S>) -> Result<ApplyResult<S>, Self::MetadataClientError>
    where
        S: Spec,
    {
        debug!("{}: applying '{}' changes", S::label(), value.metadata);
        trace!("{}: applying {:#?}", S::label(), value);
        match self.retrieve_item::<S, _>(&value.metadata).await {
            Ok(item) => {
                let paths = changed_paths(&item, &value)
                    .map_err(CompareError::into_client::<Self::MetadataClientError>)?;
                if paths.is_empty() {
                    debug!("{}: no diff detected, doing nothing", S::label());
                    Ok(ApplyResult::None)
                } else {
                    debug!("{}: detected diff at {:?}", S::label(), paths);
                    trace!("{}: old: {:#?}", S::label(), &item);
                    let replaced = self.replace_item(value).await?;
                    Ok(ApplyResult::Replaced(replaced))
                }
            }
            Err(err) => {
                if err.not_founded() {
                    debug!(
                        "{}: item '{}' not found, creating ...",
                        S::label(),
                        value.metadata
                    );
                    let created_item = self.create_item(value).await?;
                    Ok(ApplyResult::Created(created_item))
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Check if the object exists, return true or false.
    async fn exists<S, M>(&self, metadata: &M) -> Result<bool, Self::MetadataClientError>
    where
        S: Spec,
        M: F5Meta + Send + Sync,
    {
        debug!(
            "{}: check if '{}/{}' exists",
            S::label(),
            metadata.namespace(),
            metadata.name()
        );
        match self.retrieve_item::<S, M>(metadata).await {
            Ok(_) => Ok(true),
            Err(err) => {
                if err.not_founded() {
                    Ok(false)
                } else {
                    Err(err)
                }
            }
        }
    }
}
