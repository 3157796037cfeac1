use f5xc_types::{InputF5Obj, ObjectId, Spec};

/// how a change to an existing object is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedAction {
    /// replace spec, labels and annotations in place
    Update,
    /// identity changed: delete the prior object, then create the new one
    Replace,
}

impl PlannedAction {
    /// name and namespace are immutable, any change to them forces a replace
    pub fn classify<S: Spec>(prior: &ObjectId, desired: &InputF5Obj<S>) -> Self {
        if prior.namespace == desired.metadata.namespace && prior.name == desired.metadata.name {
            Self::Update
        } else {
            Self::Replace
        }
    }

    pub fn is_replace(&self) -> bool {
        matches!(self, Self::Replace)
    }
}

/// result of comparing desired state with the remote object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drift {
    /// remote object no longer exists
    Gone,
    InSync,
    /// dotted paths that differ, e.g. `spec.port` or `metadata.labels`
    Changed(Vec<String>),
}

impl Drift {
    pub fn is_in_sync(&self) -> bool {
        matches!(self, Self::InSync)
    }
}

#[cfg(test)]
mod test {

    use f5xc_types::objects::HealthcheckSpec;
    use f5xc_types::{InputF5Obj, InputObjectMeta, ObjectId};

    use super::PlannedAction;

    fn desired(namespace: &str, name: &str) -> InputF5Obj<HealthcheckSpec> {
        InputF5Obj::new(
            HealthcheckSpec::default(),
            InputObjectMeta::named(name, namespace),
        )
    }

    #[test]
    fn test_same_identity_updates() {
        let prior = ObjectId::new("shop", "hc");
        let mut obj = desired("shop", "hc");
        obj.metadata.labels.insert("tier".to_owned(), "web".to_owned());
        assert_eq!(PlannedAction::classify(&prior, &obj), PlannedAction::Update);
    }

    #[test]
    fn test_identity_change_replaces() {
        let prior = ObjectId::new("shop", "hc");
        assert!(PlannedAction::classify(&prior, &desired("shop", "hc2")).is_replace());
        assert!(PlannedAction::classify(&prior, &desired("store", "hc")).is_replace());
    }
}
