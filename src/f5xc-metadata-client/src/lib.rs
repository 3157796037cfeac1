mod client;
mod diff;
mod in_memory;

pub use diff::*;

pub use client::ErrorClass;
pub use client::ListArg;
pub use client::MetadataClient;
pub use client::MetadataClientError;
pub use client::NameSpace;
pub use in_memory::InMemoryClient;
pub use in_memory::InMemoryError;

pub type SharedClient<C> = std::sync::Arc<C>;
