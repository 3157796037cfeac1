use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;
use tracing::trace;

use f5xc_metadata_client::{
    changed_paths, ApplyResult, MetadataClient, MetadataClientError, NameSpace,
};
use f5xc_types::validate::{validate_label_keys, validate_name, validate_namespace};
use f5xc_types::{F5Obj, InputF5Obj, InputObjectMeta, ObjectId, Spec, SYSTEM_NS};
use f5xc_config::OperationTimeouts;

use crate::{Context, CrudError, Drift, PlannedAction, ResourceClass, Target};

/// typed lifecycle of one object kind
pub struct ResourceMapper<S, C> {
    client: Arc<C>,
    class: ResourceClass,
    data: PhantomData<fn() -> S>,
}

impl<S, C> Clone for ResourceMapper<S, C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            class: self.class,
            data: PhantomData,
        }
    }
}

impl<S, C> fmt::Debug for ResourceMapper<S, C>
where
    S: Spec,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceMapper")
            .field("kind", &S::label())
            .field("class", &self.class)
            .finish()
    }
}

impl<S, C> ResourceMapper<S, C>
where
    S: Spec,
    C: MetadataClient,
{
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            class: ResourceClass::Standard,
            data: PhantomData,
        }
    }

    pub fn with_class(mut self, class: ResourceClass) -> Self {
        self.class = class;
        self
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// default deadlines the caller may apply with [`Context::with_timeout`]
    pub fn timeouts(&self) -> OperationTimeouts {
        self.class.timeouts()
    }

    fn target(namespace: &str, name: &str) -> Target {
        Target::new(S::label(), namespace, name)
    }

    async fn guard<T, E, F>(ctx: &Context, target: Target, fut: F) -> Result<T, CrudError>
    where
        F: Future<Output = Result<T, E>>,
        E: MetadataClientError,
    {
        match ctx.run(fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                debug!("{}: failed: {}", target, err);
                Err(CrudError::from_client(target, err))
            }
            Err(reason) => {
                debug!("{}: {}", target, reason);
                Err(CrudError::Cancelled { target, reason })
            }
        }
    }

    /// reject identities the api would misread before any request is sent
    fn check_id(target: &Target, namespace: &str, name: &str) -> Result<(), CrudError> {
        validate_name(name).map_err(|err| CrudError::validation(target.clone(), err))?;
        if S::NAME_SPACED {
            validate_namespace(namespace)
                .map_err(|err| CrudError::validation(target.clone(), err))?;
        }
        Ok(())
    }

    fn check_identity(target: &Target, metadata: &InputObjectMeta) -> Result<(), CrudError> {
        Self::check_id(target, &metadata.namespace, &metadata.name)?;
        validate_label_keys(metadata.labels.keys())
            .map_err(|err| CrudError::validation(target.clone(), err))
    }

    /// desired object with the namespace its kind is known under
    fn scoped(mut desired: InputF5Obj<S>) -> InputF5Obj<S> {
        if !S::NAME_SPACED {
            desired.metadata.namespace = SYSTEM_NS.to_owned();
        }
        desired
    }

    /// cluster scoped objects always report `system`, whatever the backend echoes
    fn canonical(mut obj: F5Obj<S>) -> F5Obj<S> {
        if !S::NAME_SPACED {
            obj.metadata.namespace = SYSTEM_NS.to_owned();
        }
        obj
    }

    /// create new object, returns the canonical object including server computed fields
    pub async fn create(
        &self,
        ctx: &Context,
        desired: InputF5Obj<S>,
    ) -> Result<F5Obj<S>, CrudError> {
        let desired = Self::scoped(desired);
        let target = Self::target(&desired.metadata.namespace, &desired.metadata.name);
        Self::check_identity(&target, &desired.metadata)?;
        debug!("{}: creating", target);
        trace!("{}: desired {:#?}", target, desired);
        let created = Self::guard(ctx, target, self.client.create_item(desired)).await?;
        Ok(Self::canonical(created))
    }

    pub async fn read(
        &self,
        ctx: &Context,
        namespace: &str,
        name: &str,
    ) -> Result<F5Obj<S>, CrudError> {
        let namespace = S::scoped_namespace(namespace);
        let target = Self::target(namespace, name);
        Self::check_id(&target, namespace, name)?;
        debug!("{}: reading", target);
        let metadata = InputObjectMeta::named(name, namespace);
        let obj = Self::guard(ctx, target, self.client.retrieve_item::<S, _>(&metadata)).await?;
        Ok(Self::canonical(obj))
    }

    /// read, with absence reported as `None` instead of an error
    pub async fn refresh(
        &self,
        ctx: &Context,
        namespace: &str,
        name: &str,
    ) -> Result<Option<F5Obj<S>>, CrudError> {
        match self.read(ctx, namespace, name).await {
            Ok(obj) => Ok(Some(obj)),
            Err(err) if err.is_not_found() => {
                debug!("{}: '{}/{}' is gone", S::label(), namespace, name);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// compare desired state with the remote object.
    /// server side defaults the desired spec never mentions are ignored
    pub async fn drift(&self, ctx: &Context, desired: &InputF5Obj<S>) -> Result<Drift, CrudError> {
        let meta = &desired.metadata;
        let observed = match self.refresh(ctx, &meta.namespace, &meta.name).await? {
            Some(observed) => observed,
            None => return Ok(Drift::Gone),
        };

        let target = Self::target(&meta.namespace, &meta.name);
        let paths = changed_paths(&observed, desired)
            .map_err(|err| CrudError::other(target.clone(), err))?;

        if paths.is_empty() {
            Ok(Drift::InSync)
        } else {
            debug!("{}: drifted at {:?}", target, paths);
            Ok(Drift::Changed(paths))
        }
    }

    /// replace spec, labels and annotations of an existing object
    pub async fn update(
        &self,
        ctx: &Context,
        desired: InputF5Obj<S>,
    ) -> Result<F5Obj<S>, CrudError> {
        let desired = Self::scoped(desired);
        let target = Self::target(&desired.metadata.namespace, &desired.metadata.name);
        Self::check_identity(&target, &desired.metadata)?;
        debug!("{}: replacing", target);
        trace!("{}: desired {:#?}", target, desired);
        let name = desired.metadata.name.clone();
        let namespace = desired.metadata.namespace.clone();

        let mut replaced = Self::guard(ctx, target, self.client.replace_item(desired)).await?;
        // identity is immutable; some responses omit it
        if replaced.metadata.name.is_empty() {
            replaced.metadata.name = name;
        }
        if replaced.metadata.namespace.is_empty() {
            replaced.metadata.namespace = namespace;
        }
        Ok(Self::canonical(replaced))
    }

    pub fn plan(&self, prior: &ObjectId, desired: &InputF5Obj<S>) -> PlannedAction {
        PlannedAction::classify(prior, desired)
    }

    /// delete the prior object, tolerating its absence, then create `desired`
    pub async fn apply_replace(
        &self,
        ctx: &Context,
        prior: &ObjectId,
        desired: InputF5Obj<S>,
    ) -> Result<F5Obj<S>, CrudError> {
        debug!("{}: replacing '{}' with '{}'", S::label(), prior, desired.metadata);
        match self.delete(ctx, &prior.namespace, &prior.name).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                debug!("{}: '{}' already gone", S::label(), prior);
            }
            Err(err) => return Err(err),
        }
        self.create(ctx, desired).await
    }

    /// create when absent, replace when the remote object differs
    pub async fn apply(
        &self,
        ctx: &Context,
        desired: InputF5Obj<S>,
    ) -> Result<ApplyResult<S>, CrudError> {
        let desired = Self::scoped(desired);
        let target = Self::target(&desired.metadata.namespace, &desired.metadata.name);
        Self::check_identity(&target, &desired.metadata)?;
        let result = Self::guard(ctx, target, self.client.apply(desired)).await?;
        Ok(match result {
            ApplyResult::None => ApplyResult::None,
            ApplyResult::Created(obj) => ApplyResult::Created(Self::canonical(obj)),
            ApplyResult::Replaced(obj) => ApplyResult::Replaced(Self::canonical(obj)),
        })
    }

    pub async fn delete(&self, ctx: &Context, namespace: &str, name: &str) -> Result<(), CrudError> {
        let namespace = S::scoped_namespace(namespace);
        let target = Self::target(namespace, name);
        Self::check_id(&target, namespace, name)?;
        debug!("{}: deleting", target);
        let metadata = InputObjectMeta::named(name, namespace);
        Self::guard(ctx, target, self.client.delete_item::<S, _>(&metadata)).await
    }

    pub async fn exists(&self, ctx: &Context, namespace: &str, name: &str) -> Result<bool, CrudError> {
        let namespace = S::scoped_namespace(namespace);
        let target = Self::target(namespace, name);
        Self::check_id(&target, namespace, name)?;
        let metadata = InputObjectMeta::named(name, namespace);
        Self::guard(ctx, target, self.client.exists::<S, _>(&metadata)).await
    }

    /// every object of this kind in `namespace`
    pub async fn list(&self, ctx: &Context, namespace: &str) -> Result<Vec<F5Obj<S>>, CrudError> {
        let target = Self::target(namespace, "");
        debug!("{}: listing", target);
        let ns = if S::NAME_SPACED {
            validate_namespace(namespace)
                .map_err(|err| CrudError::validation(target.clone(), err))?;
            NameSpace::from(namespace)
        } else {
            NameSpace::All
        };
        let list = Self::guard(ctx, target, self.client.retrieve_items::<S, _>(ns)).await?;
        Ok(list.items.into_iter().map(Self::canonical).collect())
    }

    /// adopt an existing object by its `namespace/name` id
    pub async fn import(&self, ctx: &Context, id: &str) -> Result<F5Obj<S>, CrudError> {
        let object_id = ObjectId::parse_import_id(id).map_err(|source| CrudError::MalformedId {
            kind: S::label(),
            source,
        })?;
        debug!("{}: importing '{}'", S::label(), object_id);
        self.read(ctx, &object_id.namespace, &object_id.name).await
    }
}
