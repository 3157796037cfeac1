//! Client side checks of object names before anything is sent to the api

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::SYSTEM_NS;

pub const MAX_NAME_LEN: usize = 64;
pub const MAX_LABEL_KEY_LEN: usize = 253;

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z]([a-z0-9-]{0,62}[a-z0-9])?$").expect("name pattern compiles")
});

// optional `prefix/` then the key, both alphanumeric at either end
static LABEL_KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z0-9]([a-zA-Z0-9_.-]*[a-zA-Z0-9])?/)?[a-zA-Z0-9]([a-zA-Z0-9_.-]*[a-zA-Z0-9])?$")
        .expect("label key pattern compiles")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidName {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} {value:?} is longer than {MAX_NAME_LEN} characters")]
    TooLong { field: &'static str, value: String },
    #[error("{field} {value:?} must start with a lowercase letter and contain only lowercase letters, digits and '-'")]
    Pattern { field: &'static str, value: String },
    #[error("label key {key:?} must be an optional 'prefix/' and a name of alphanumerics, '-', '_' or '.', at most {MAX_LABEL_KEY_LEN} characters")]
    LabelKey { key: String },
}

fn check(field: &'static str, value: &str) -> Result<(), InvalidName> {
    if value.is_empty() {
        return Err(InvalidName::Empty { field });
    }
    if value.len() > MAX_NAME_LEN {
        return Err(InvalidName::TooLong {
            field,
            value: value.to_owned(),
        });
    }
    if NAME_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(InvalidName::Pattern {
            field,
            value: value.to_owned(),
        })
    }
}

/// object names: 1 to 64 lowercase alphanumerics or '-', starting with a letter
/// and not ending with '-'
pub fn validate_name(name: &str) -> Result<(), InvalidName> {
    check("name", name)
}

/// namespaces follow the name rules, `system` is always accepted
pub fn validate_namespace(namespace: &str) -> Result<(), InvalidName> {
    if namespace == SYSTEM_NS {
        return Ok(());
    }
    check("namespace", namespace)
}

/// label keys follow the kubernetes convention, `app` or `app.kubernetes.io/name`
pub fn validate_label_key(key: &str) -> Result<(), InvalidName> {
    if key.len() > MAX_LABEL_KEY_LEN || !LABEL_KEY_PATTERN.is_match(key) {
        return Err(InvalidName::LabelKey {
            key: key.to_owned(),
        });
    }
    Ok(())
}

/// every key of `labels`, in sorted order so the first failure is stable
pub fn validate_label_keys<'a, I>(keys: I) -> Result<(), InvalidName>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut keys: Vec<&String> = keys.into_iter().collect();
    keys.sort();
    keys.into_iter().try_for_each(|key| validate_label_key(key))
}

#[cfg(test)]
mod test {

    use std::collections::HashMap;

    use super::{validate_label_key, validate_label_keys, validate_name, validate_namespace, InvalidName};

    #[test]
    fn test_valid_names() {
        for name in ["a", "lb1", "my-origin-pool", &"a".repeat(64)] {
            assert!(validate_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(
            validate_name(""),
            Err(InvalidName::Empty { field: "name" })
        );
        assert!(matches!(
            validate_name(&"a".repeat(65)),
            Err(InvalidName::TooLong { .. })
        ));
        for name in ["1abc", "Abc", "abc-", "ab_c", "ab.c", "-ab"] {
            assert!(
                matches!(validate_name(name), Err(InvalidName::Pattern { .. })),
                "{name}"
            );
        }
    }

    #[test]
    fn test_namespace() {
        assert!(validate_namespace("system").is_ok());
        assert!(validate_namespace("shared").is_ok());
        assert!(validate_namespace("app-ns").is_ok());
        assert!(validate_namespace("").is_err());
        assert!(validate_namespace("App").is_err());
    }

    #[test]
    fn test_label_keys() {
        for key in ["app", "kubernetes.io/name", "app.kubernetes.io/name", "ves.io_x", "A1"] {
            assert!(validate_label_key(key).is_ok(), "{key}");
        }
        for key in ["", "-app", "app-", "a/b/c", "/app", "app/", "a b", &"a".repeat(254)] {
            assert!(
                matches!(validate_label_key(key), Err(InvalidName::LabelKey { .. })),
                "{key}"
            );
        }

        let labels: HashMap<String, String> = [("app", "web"), ("z z", "1"), ("a a", "2")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        assert_eq!(
            validate_label_keys(labels.keys()),
            Err(InvalidName::LabelKey {
                key: "a a".to_owned()
            })
        );
    }
}
