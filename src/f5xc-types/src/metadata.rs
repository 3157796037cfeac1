use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::ObjectId;
use crate::Spec;

/// namespace holding tenant wide objects, including namespaces themselves
pub const SYSTEM_NS: &str = "system";
/// namespace shared by every other namespace
pub const SHARED_NS: &str = "shared";

pub trait F5Meta {
    /// object name
    fn name(&self) -> &str;

    /// namespace
    fn namespace(&self) -> &str;

    fn id(&self) -> ObjectId {
        ObjectId::new(self.namespace(), self.name())
    }
}

pub trait LabelProvider: Sized {
    fn set_label_map(self, labels: HashMap<String, String>) -> Self;

    /// helper for setting list of labels
    fn set_labels<T: ToString>(self, labels: Vec<(T, T)>) -> Self {
        let mut label_map = HashMap::new();
        for (key, value) in labels {
            label_map.insert(key.to_string(), value.to_string());
        }
        self.set_label_map(label_map)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// metadata associated with object when returned
/// here name and namespace must be populated
#[derive(Deserialize, Serialize, PartialEq, Eq, Debug, Default, Clone)]
#[serde(default)]
pub struct ObjectMeta {
    // mandatory fields
    pub name: String,
    pub namespace: String,
    // optional
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub annotations: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub disable: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uid: String,
}

impl LabelProvider for ObjectMeta {
    fn set_label_map(mut self, labels: HashMap<String, String>) -> Self {
        self.labels = labels;
        self
    }
}

impl F5Meta for ObjectMeta {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl ObjectMeta {
    pub fn new<S>(name: S, name_space: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            namespace: name_space.into(),
            ..Default::default()
        }
    }

    pub fn as_input(&self) -> InputObjectMeta {
        InputObjectMeta {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            labels: self.labels.clone(),
            annotations: self.annotations.clone(),
            description: self.description.clone(),
            disable: self.disable,
        }
    }
}

/// metadata sent on create and replace
#[derive(Deserialize, Serialize, PartialEq, Eq, Debug, Default, Clone)]
#[serde(default)]
pub struct InputObjectMeta {
    pub name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub annotations: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub disable: bool,
}

impl LabelProvider for InputObjectMeta {
    fn set_label_map(mut self, labels: HashMap<String, String>) -> Self {
        self.labels = labels;
        self
    }
}

impl fmt::Display for InputObjectMeta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl F5Meta for InputObjectMeta {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl InputObjectMeta {
    // shorthand to create just with name and namespace
    pub fn named<S: Into<String>>(name: S, namespace: S) -> Self {
        InputObjectMeta {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    pub fn set_annotations<T: ToString>(mut self, annotations: Vec<(T, T)>) -> Self {
        self.annotations = annotations
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        self
    }

    pub fn set_description<T: Into<String>>(mut self, description: T) -> Self {
        self.description = Some(description.into());
        self
    }

    /// metadata as the server would echo it, before it assigns a uid
    pub fn into_object_meta(self) -> ObjectMeta {
        ObjectMeta {
            name: self.name,
            namespace: self.namespace,
            labels: self.labels,
            annotations: self.annotations,
            description: self.description,
            disable: self.disable,
            uid: String::new(),
        }
    }
}

impl From<ObjectMeta> for InputObjectMeta {
    fn from(meta: ObjectMeta) -> Self {
        Self {
            name: meta.name,
            namespace: meta.namespace,
            labels: meta.labels,
            annotations: meta.annotations,
            description: meta.description,
            disable: meta.disable,
        }
    }
}

/// fields computed by the server, never sent back
#[derive(Deserialize, Serialize, PartialEq, Eq, Debug, Default, Clone)]
#[serde(default)]
pub struct SystemMetadata {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modification_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
}

impl SystemMetadata {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(bound(serialize = "S: Serialize"))]
#[serde(bound(deserialize = "S: DeserializeOwned"))]
pub struct F5Obj<S>
where
    S: Spec,
{
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: S,
    #[serde(default, skip_serializing_if = "SystemMetadata::is_empty")]
    pub system_metadata: SystemMetadata,
}

impl<S> F5Obj<S>
where
    S: Spec,
{
    pub fn new<N>(name: N, namespace: N, spec: S) -> Self
    where
        N: Into<String>,
    {
        Self {
            metadata: ObjectMeta::new(name, namespace),
            spec,
            system_metadata: SystemMetadata::default(),
        }
    }

    pub fn as_input(&self) -> InputF5Obj<S> {
        InputF5Obj {
            metadata: self.metadata.as_input(),
            spec: self.spec.clone(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.metadata.id()
    }
}

/// For creating and replacing, only metadata and spec are sent
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(bound(serialize = "S: Serialize"))]
#[serde(bound(deserialize = "S: DeserializeOwned"))]
pub struct InputF5Obj<S>
where
    S: Spec,
{
    pub metadata: InputObjectMeta,
    pub spec: S,
}

impl<S> InputF5Obj<S>
where
    S: Spec,
{
    pub fn new(spec: S, metadata: InputObjectMeta) -> Self {
        Self { metadata, spec }
    }

    pub fn id(&self) -> ObjectId {
        self.metadata.id()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(bound(serialize = "F5Obj<S>: Serialize"))]
#[serde(bound(deserialize = "F5Obj<S>: DeserializeOwned"))]
pub struct F5List<S>
where
    S: Spec,
{
    #[serde(default)]
    pub items: Vec<F5Obj<S>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ListError>,
}

impl<S> F5List<S>
where
    S: Spec,
{
    pub fn new() -> Self {
        F5List {
            items: vec![],
            errors: vec![],
        }
    }
}

impl<S> Default for F5List<S>
where
    S: Spec,
{
    fn default() -> Self {
        Self::new()
    }
}

/// per item failure reported inside a list response
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ListError {
    pub code: Option<i64>,
    pub message: String,
}

#[cfg(test)]
mod test {

    use serde::{Deserialize, Serialize};

    use crate::{Kind, Spec, CONFIG_SERVICE};

    use super::{F5Obj, InputF5Obj, InputObjectMeta, LabelProvider, ObjectMeta};

    const TEST_KIND: Kind = Kind {
        service: CONFIG_SERVICE,
        kind: "test",
        plural: "tests",
    };

    #[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
    struct TestSpec {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        port: Option<u16>,
    }

    impl Spec for TestSpec {
        fn metadata() -> &'static Kind {
            &TEST_KIND
        }
    }

    #[test]
    fn test_metadata_label() {
        let metadata = ObjectMeta::default().set_labels(vec![("app", "test")]);

        let maps = metadata.labels;
        assert_eq!(maps.len(), 1);
        assert_eq!(maps.get("app").unwrap(), "test");
    }

    #[test]
    fn test_empty_maps_omitted() {
        let input = InputF5Obj::new(TestSpec::default(), InputObjectMeta::named("lb1", "ns1"));
        let json = serde_json::to_value(&input).expect("json");
        assert_eq!(
            json,
            serde_json::json!({
                "metadata": { "name": "lb1", "namespace": "ns1" },
                "spec": {}
            })
        );
    }

    #[test]
    fn test_decode_object() {
        let data = r#"
        {
            "metadata": {
                "name": "pool1",
                "namespace": "app",
                "labels": { "env": "prod" },
                "description": "demo"
            },
            "spec": { "port": 8080 },
            "system_metadata": {
                "uid": "3f5b3c9e",
                "creation_timestamp": "2024-01-01T00:00:00Z",
                "tenant": "acme"
            }
        }"#;

        let obj: F5Obj<TestSpec> = serde_json::from_str(data).expect("decode");
        assert_eq!(obj.metadata.name, "pool1");
        assert_eq!(obj.metadata.namespace, "app");
        assert_eq!(obj.metadata.description.as_deref(), Some("demo"));
        assert_eq!(obj.spec.port, Some(8080));
        assert_eq!(obj.system_metadata.uid, "3f5b3c9e");
        assert_eq!(obj.id().to_string(), "app/pool1");

        let input = obj.as_input();
        let json = serde_json::to_value(&input).expect("json");
        assert!(json.get("system_metadata").is_none());
        assert_eq!(json["metadata"]["labels"]["env"], "prod");
    }
}
