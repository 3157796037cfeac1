//!
//! # Generic CRUD mapper
//!
//! Every F5XC object kind shares one lifecycle: create, read, replace, delete
//! and import by `namespace/name`. [`ResourceMapper`] implements it once for
//! any [`Spec`](f5xc_types::Spec) on top of a [`MetadataClient`](f5xc_metadata_client::MetadataClient).
//!
mod context;
mod error;
mod mapper;
mod plan;
pub mod registry;
mod state;

pub use self::context::{CancelHandle, CancelReason, Context};
pub use self::error::{CrudError, Target};
pub use self::mapper::ResourceMapper;
pub use self::plan::{Drift, PlannedAction};
pub use self::registry::{KindEntry, KindVisitor, ResourceClass};
pub use self::state::ResourceState;

pub use f5xc_config::OperationTimeouts;
pub use f5xc_metadata_client::ApplyResult;
