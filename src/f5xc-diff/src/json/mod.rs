mod diff;

use std::collections::BTreeMap;

use serde::Serialize;
use serde::Serializer;
use serde_json::Map;
use serde_json::Value;
use tracing::trace;

use crate::Changes;
use crate::Diff;
use crate::DiffError;

pub type JsonDiff = Diff<Value, PatchObject>;

/// changes between two json objects, keyed by member name.
/// serializes as a json merge patch
#[derive(Debug, Default)]
pub struct PatchObject(BTreeMap<String, JsonDiff>);

impl PatchObject {
    pub fn diff(old: &Map<String, Value>, new: &Map<String, Value>) -> Result<Self, DiffError> {
        let mut delta = BTreeMap::new();

        for (key, new_val) in new.iter() {
            match old.get(key) {
                Some(old_val) => {
                    let diff_value = old_val.diff(new_val)?;
                    if !diff_value.is_none() {
                        delta.insert(key.clone(), diff_value);
                    }
                }
                None => {
                    delta.insert(key.clone(), Diff::Replace(new_val.clone()));
                }
            }
        }

        for key in old.keys() {
            if !new.contains_key(key) {
                trace!(key = %key, "member removed");
                delta.insert(key.clone(), Diff::Delete);
            }
        }

        Ok(Self(delta))
    }

    pub fn get_inner_ref(&self) -> &BTreeMap<String, JsonDiff> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// dotted paths of every changed leaf, e.g. `spec.http.port`
    pub fn changed_paths(&self, prefix: &str) -> Vec<String> {
        let mut paths = vec![];
        for (key, diff) in &self.0 {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match diff {
                Diff::None => {}
                Diff::Patch(patch) => paths.extend(patch.changed_paths(&path)),
                Diff::Delete | Diff::Replace(_) => paths.push(path),
            }
        }
        paths
    }
}

impl Serialize for PatchObject {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, val) in &self.0 {
            match val {
                Diff::None => {}
                Diff::Delete => map.serialize_entry(key, &Value::Null)?,
                Diff::Patch(patch) => map.serialize_entry(key, patch)?,
                Diff::Replace(value) => map.serialize_entry(key, value)?,
            }
        }
        map.end()
    }
}

/// copy of `observed` restricted to the object members that `desired` mentions.
/// server side defaults that the desired value never set are dropped,
/// lists and scalars are kept whole
pub fn prune_to(observed: &Value, desired: &Value) -> Value {
    match (observed, desired) {
        (Value::Object(observed), Value::Object(desired)) => {
            let pruned = observed
                .iter()
                .filter_map(|(key, observed_val)| {
                    desired
                        .get(key)
                        .map(|desired_val| (key.clone(), prune_to(observed_val, desired_val)))
                })
                .collect();
            Value::Object(pruned)
        }
        _ => observed.clone(),
    }
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use super::prune_to;
    use crate::Changes;

    #[test]
    fn test_changed_paths() {
        let old = json!({
            "http": { "port": 80 },
            "domains": ["a.example.com"],
            "waf": {}
        });
        let new = json!({
            "http": { "port": 8080 },
            "domains": ["a.example.com", "b.example.com"]
        });

        let diff = old.diff(&new).expect("diff");
        let patch = diff.as_patch_ref().expect("patch");
        assert_eq!(
            patch.changed_paths("spec"),
            vec!["spec.domains", "spec.http.port", "spec.waf"]
        );
    }

    #[test]
    fn test_prune_ignores_server_defaults() {
        let observed = json!({
            "port": 443,
            "loadbalancer_algorithm": "ROUND_ROBIN",
            "origin_servers": [ { "public_name": { "dns_name": "example.com" }, "labels": {} } ]
        });
        let desired = json!({
            "port": 443,
            "origin_servers": [ { "public_name": { "dns_name": "example.com" } } ]
        });

        let pruned = prune_to(&observed, &desired);
        assert!(pruned.get("loadbalancer_algorithm").is_none());
        // lists are compared whole
        assert_eq!(pruned["origin_servers"], observed["origin_servers"]);
    }

    #[test]
    fn test_merge_patch_encoding() {
        let old = json!({ "a": 1, "b": { "c": true, "d": "x" } });
        let new = json!({ "a": 1, "b": { "c": false } });

        let diff = old.diff(&new).expect("diff");
        let patch = serde_json::to_value(diff.as_patch_ref().expect("patch")).expect("json");
        assert_eq!(patch, json!({ "b": { "c": false, "d": null } }));
    }
}
