use serde_json::Value;

use super::JsonDiff;
use super::PatchObject;
use crate::Changes;
use crate::Diff;
use crate::DiffError;

impl Changes for Value {
    type Replace = Value;
    type Patch = PatchObject;

    fn diff(&self, new: &Self) -> Result<JsonDiff, DiffError> {
        if *self == *new {
            return Ok(Diff::None);
        }
        match (self, new) {
            (Value::Object(old_val), Value::Object(new_val)) => {
                let patch = PatchObject::diff(old_val, new_val)?;
                if patch.is_empty() {
                    Ok(Diff::None)
                } else {
                    Ok(Diff::Patch(patch))
                }
            }
            // lists are replaced as a whole
            _ => Ok(Diff::Replace(new.clone())),
        }
    }
}

#[cfg(test)]
mod test {

    use serde_json::json;
    use serde_json::Value;

    use super::Changes;

    #[test]
    fn test_null_comparision() {
        let n1 = Value::Null;
        let str1 = Value::String("test".to_owned());
        let str2 = Value::String("test".to_owned());

        assert!(n1.diff(&str1).expect("diff").is_replace());
        assert!(str1.diff(&str2).expect("diff").is_none());
    }

    #[test]
    fn test_object_comparision() {
        let old_spec = json!({
            "healthy_threshold": 2,
            "interval": 5
        });
        let new_spec = json!({
            "healthy_threshold": 3,
            "interval": 5
        });

        let diff = old_spec.diff(&new_spec).expect("diff");
        assert!(diff.is_patch());
        let patch = diff.as_patch_ref().expect("patch").get_inner_ref();
        assert_eq!(patch.len(), 1);
        let diff_threshold = patch.get("healthy_threshold").expect("threshold");
        assert_eq!(diff_threshold.as_replace_ref(), Some(&json!(3)));
    }

    #[test]
    fn test_replace_some_with_none() {
        use serde::Serialize;
        use serde_json::to_value;

        #[derive(Serialize)]
        struct Test {
            choice: Option<bool>,
            value: u16,
        }

        let old_spec = to_value(Test {
            choice: Some(true),
            value: 5,
        })
        .expect("json");
        let new_spec = to_value(Test {
            choice: None,
            value: 5,
        })
        .expect("json");

        let diff = old_spec.diff(&new_spec).expect("diff");
        let json_diff = serde_json::to_value(diff.as_patch_ref().expect("patch")).expect("json");
        assert_eq!(json_diff, json!({ "choice": null }));
    }
}
