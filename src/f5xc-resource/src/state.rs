use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use f5xc_types::{F5Obj, InputF5Obj, InputObjectMeta, ObjectId, Spec};

/// flat snapshot of an object as stored by a declarative host.
/// empty label and annotation maps are stored as absent
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct ResourceState {
    /// import id, `namespace/name`
    pub id: String,
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub spec: Value,
}

fn non_empty(map: &HashMap<String, String>) -> Option<BTreeMap<String, String>> {
    if map.is_empty() {
        None
    } else {
        Some(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl ResourceState {
    pub fn from_object<S: Spec>(obj: &F5Obj<S>) -> Result<Self, serde_json::Error> {
        let meta = &obj.metadata;
        let namespace = S::scoped_namespace(&meta.namespace);
        Ok(Self {
            id: ObjectId::import_id(namespace, &meta.name),
            name: meta.name.clone(),
            namespace: namespace.to_owned(),
            labels: non_empty(&meta.labels),
            annotations: non_empty(&meta.annotations),
            description: meta.description.clone().filter(|d| !d.is_empty()),
            spec: serde_json::to_value(&obj.spec)?,
        })
    }

    /// desired object for create or update
    pub fn to_input<S: Spec>(&self) -> Result<InputF5Obj<S>, serde_json::Error> {
        let spec: S = match &self.spec {
            Value::Null => S::default(),
            spec => serde_json::from_value(spec.clone())?,
        };
        let mut metadata = InputObjectMeta::named(self.name.as_str(), self.namespace.as_str());
        metadata.labels = self.labels.clone().unwrap_or_default().into_iter().collect();
        metadata.annotations = self
            .annotations
            .clone()
            .unwrap_or_default()
            .into_iter()
            .collect();
        metadata.description = self.description.clone();
        Ok(InputF5Obj::new(spec, metadata))
    }

    pub fn object_id(&self) -> ObjectId {
        ObjectId::new(self.namespace.as_str(), self.name.as_str())
    }
}
