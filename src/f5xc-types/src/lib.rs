mod kind;
mod id;
mod metadata;
pub mod options;
pub mod validate;
#[cfg(feature = "objects")]
pub mod objects;

pub use self::id::*;
pub use self::kind::*;
pub use self::metadata::*;
pub use self::spec_def::*;

mod spec_def {

    use std::fmt::Debug;

    use serde::de::DeserializeOwned;
    use serde::Serialize;

    use super::Kind;
    use super::SYSTEM_NS;

    /// F5XC object spec
    pub trait Spec:
        Sized + Debug + Clone + Default + Serialize + DeserializeOwned + Send + Sync
    {
        /// if true, objects live under `/namespaces/{namespace}`
        const NAME_SPACED: bool = true;

        /// if true, deletion goes through the `cascade_delete` endpoint
        const CASCADE_DELETE: bool = false;

        /// api location of this kind
        fn metadata() -> &'static Kind;

        fn label() -> &'static str {
            Self::metadata().kind
        }

        /// namespace an object of this kind is known under.
        /// cluster scoped kinds always report `system`
        fn scoped_namespace(namespace: &str) -> &str {
            if Self::NAME_SPACED {
                namespace
            } else {
                SYSTEM_NS
            }
        }

        /// server may fill in defaults that the desired spec doesn't mention.
        /// reset them here so desired and observed specs can be compared
        fn make_same(&mut self, _other: &Self) {}
    }
}

/// implement [`Spec`] for a type given its api location
#[macro_export]
macro_rules! f5xc_spec {
    ($spec:ident, $kind:expr, $plural:expr) => {
        $crate::f5xc_spec!($spec, $crate::CONFIG_SERVICE, $kind, $plural);
    };
    ($spec:ident, $service:expr, $kind:expr, $plural:expr) => {
        impl $crate::Spec for $spec {
            fn metadata() -> &'static $crate::Kind {
                static KIND: $crate::Kind = $crate::Kind {
                    service: $service,
                    kind: $kind,
                    plural: $plural,
                };
                &KIND
            }
        }
    };
}
