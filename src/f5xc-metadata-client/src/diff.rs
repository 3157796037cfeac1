use thiserror::Error;

use f5xc_diff::{prune_to, Changes, Diff, DiffError};
use f5xc_types::{F5Obj, InputF5Obj, Spec};

#[derive(Debug)]
pub enum ApplyResult<S>
where
    S: Spec,
{
    None,
    Created(F5Obj<S>),
    Replaced(F5Obj<S>),
}

impl<S> ApplyResult<S>
where
    S: Spec,
{
    pub fn into_object(self) -> Option<F5Obj<S>> {
        match self {
            Self::None => None,
            Self::Created(obj) | Self::Replaced(obj) => Some(obj),
        }
    }
}

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Diff(#[from] DiffError),
}

impl CompareError {
    /// hand the failure over to a client error type
    pub fn into_client<E>(self) -> E
    where
        E: From<serde_json::Error> + From<DiffError>,
    {
        match self {
            Self::Json(err) => err.into(),
            Self::Diff(err) => err.into(),
        }
    }
}

/// dotted paths where the observed object no longer matches the desired one,
/// empty when both agree.
///
/// Spec members the desired spec never mentions are server defaults and are
/// ignored. Labels, annotations, description and the disable flag are
/// compared as a whole. Identity is not compared, the object was looked up by it.
pub fn changed_paths<S>(
    observed: &F5Obj<S>,
    desired: &InputF5Obj<S>,
) -> Result<Vec<String>, CompareError>
where
    S: Spec,
{
    let mut observed_spec = observed.spec.clone();
    observed_spec.make_same(&desired.spec);

    let desired_value = serde_json::to_value(&desired.spec)?;
    let observed_value = prune_to(&serde_json::to_value(&observed_spec)?, &desired_value);

    let mut paths = match observed_value.diff(&desired_value)? {
        Diff::None => vec![],
        Diff::Patch(patch) => patch.changed_paths("spec"),
        Diff::Delete | Diff::Replace(_) => vec!["spec".to_owned()],
    };

    let observed_meta = &observed.metadata;
    let desired_meta = &desired.metadata;
    if observed_meta.labels != desired_meta.labels {
        paths.push("metadata.labels".to_owned());
    }
    if observed_meta.annotations != desired_meta.annotations {
        paths.push("metadata.annotations".to_owned());
    }
    if observed_meta.description != desired_meta.description {
        paths.push("metadata.description".to_owned());
    }
    if observed_meta.disable != desired_meta.disable {
        paths.push("metadata.disable".to_owned());
    }
    Ok(paths)
}
