use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use f5xc_metadata_client::{ErrorClass, MetadataClientError};
use f5xc_types::MalformedIdError;

use crate::CancelReason;

pub type Cause = Box<dyn StdError + Send + Sync + 'static>;

/// object an operation was acting on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub kind: &'static str,
    pub namespace: String,
    pub name: String,
}

impl Target {
    pub fn new<N: Into<String>>(kind: &'static str, namespace: N, name: N) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{} in namespace '{}'", self.kind, self.namespace)
        } else {
            write!(f, "{} '{}/{}'", self.kind, self.namespace, self.name)
        }
    }
}

#[derive(Error, Debug)]
pub enum CrudError {
    #[error("{target} not found")]
    NotFound { target: Target, source: Cause },
    #[error("{target} already exists")]
    Conflict { target: Target, source: Cause },
    #[error("{target} is invalid: {source}")]
    Validation { target: Target, source: Cause },
    #[error("{target}: not authorized: {source}")]
    Auth { target: Target, source: Cause },
    #[error("{kind}: {source}")]
    MalformedId {
        kind: &'static str,
        source: MalformedIdError,
    },
    #[error("{target}: transport failure: {source}")]
    Transport { target: Target, source: Cause },
    #[error("{target}: {reason}")]
    Cancelled { target: Target, reason: CancelReason },
    #[error("{target}: {source}")]
    Api {
        target: Target,
        status: Option<u16>,
        source: Cause,
    },
}

impl CrudError {
    /// map a backend failure onto the taxonomy
    pub fn from_client<E>(target: Target, err: E) -> Self
    where
        E: MetadataClientError,
    {
        let status = err.status();
        let class = err.classify();
        let source: Cause = Box::new(err);
        match class {
            ErrorClass::NotFound => Self::NotFound { target, source },
            ErrorClass::Conflict => Self::Conflict { target, source },
            ErrorClass::Validation => Self::Validation { target, source },
            ErrorClass::Auth => Self::Auth { target, source },
            ErrorClass::Transport => Self::Transport { target, source },
            ErrorClass::Other => Self::Api {
                target,
                status,
                source,
            },
        }
    }

    pub fn validation<E>(target: Target, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Validation {
            target,
            source: Box::new(err),
        }
    }

    /// local failure that is not reported by the backend, e.g. encoding
    pub fn other<E>(target: Target, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Api {
            target,
            status: None,
            source: Box::new(err),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    pub fn target(&self) -> Option<&Target> {
        match self {
            Self::NotFound { target, .. }
            | Self::Conflict { target, .. }
            | Self::Validation { target, .. }
            | Self::Auth { target, .. }
            | Self::Transport { target, .. }
            | Self::Cancelled { target, .. }
            | Self::Api { target, .. } => Some(target),
            Self::MalformedId { .. } => None,
        }
    }
}

#[cfg(test)]
mod test {

    use f5xc_metadata_client::InMemoryError;
    use f5xc_types::ObjectId;

    use crate::CancelReason;

    use super::{CrudError, Target};

    fn target() -> Target {
        Target::new("origin_pool", "shop", "pool1")
    }

    #[test]
    fn test_not_found_mapping() {
        let err = CrudError::from_client(
            target(),
            InMemoryError::NotFound {
                kind: "origin_pool",
                namespace: "shop".to_owned(),
                name: "pool1".to_owned(),
            },
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "origin_pool 'shop/pool1' not found");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_malformed_id() {
        let source = ObjectId::parse_import_id("onlyname").expect_err("malformed");
        let err = CrudError::MalformedId {
            kind: "origin_pool",
            source,
        };
        assert!(err.target().is_none());
        assert!(err.to_string().starts_with("origin_pool: "));
    }

    #[test]
    fn test_cancelled_display() {
        let err = CrudError::Cancelled {
            target: target(),
            reason: CancelReason::DeadlineExceeded,
        };
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), "origin_pool 'shop/pool1': deadline exceeded");
    }

    #[test]
    fn test_list_target_display() {
        assert_eq!(
            Target::new("origin_pool", "shop", "").to_string(),
            "origin_pool in namespace 'shop'"
        );
    }
}
