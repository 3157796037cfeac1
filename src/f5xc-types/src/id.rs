//!
//! # Object identity
//!
//! `(namespace, name)` identifies an object of a given kind.
//! The pair is written as `namespace/name` when importing existing objects.
//!
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    pub namespace: String,
    pub name: String,
}

impl ObjectId {
    pub fn new<S: Into<String>>(namespace: S, name: S) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// encode identity as `namespace/name`
    pub fn import_id(namespace: &str, name: &str) -> String {
        format!("{namespace}{SEPARATOR}{name}")
    }

    /// decode `namespace/name`.
    /// exactly one separator is allowed and neither part may be empty
    pub fn parse_import_id(id: &str) -> Result<Self, MalformedIdError> {
        let mut parts = id.split(SEPARATOR);
        let (namespace, name) = match (parts.next(), parts.next(), parts.next()) {
            (Some(namespace), Some(name), None) => (namespace, name),
            (_, None, _) => return Err(MalformedIdError::new(id, IdDefect::MissingSeparator)),
            _ => return Err(MalformedIdError::new(id, IdDefect::TooManySeparators)),
        };

        if namespace.is_empty() {
            return Err(MalformedIdError::new(id, IdDefect::EmptyNamespace));
        }
        if name.is_empty() {
            return Err(MalformedIdError::new(id, IdDefect::EmptyName));
        }

        Ok(Self::new(namespace, name))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", Self::import_id(&self.namespace, &self.name))
    }
}

impl FromStr for ObjectId {
    type Err = MalformedIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_import_id(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdDefect {
    MissingSeparator,
    TooManySeparators,
    EmptyNamespace,
    EmptyName,
}

impl fmt::Display for IdDefect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingSeparator => write!(f, "missing '/' separator"),
            Self::TooManySeparators => write!(f, "more than one '/' separator"),
            Self::EmptyNamespace => write!(f, "namespace is empty"),
            Self::EmptyName => write!(f, "name is empty"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unexpected import id {id:?}: {defect}, expected namespace/name")]
pub struct MalformedIdError {
    pub id: String,
    pub defect: IdDefect,
}

impl MalformedIdError {
    fn new(id: &str, defect: IdDefect) -> Self {
        Self {
            id: id.to_owned(),
            defect,
        }
    }
}

#[cfg(test)]
mod test {

    use super::{IdDefect, ObjectId};

    #[test]
    fn test_round_trip() {
        for (ns, name) in [("system", "test"), ("app-1", "lb"), ("a", "b-c-d")] {
            let id = ObjectId::import_id(ns, name);
            let parsed = ObjectId::parse_import_id(&id).expect("parse");
            assert_eq!(parsed.namespace, ns);
            assert_eq!(parsed.name, name);
            assert_eq!(parsed.to_string(), id);
        }
    }

    #[test]
    fn test_import_id_format() {
        assert_eq!(ObjectId::import_id("shared", "pool"), "shared/pool");
    }

    #[test]
    fn test_malformed() {
        let cases = [
            ("onlyname", IdDefect::MissingSeparator),
            ("ns/name/extra", IdDefect::TooManySeparators),
            ("/name", IdDefect::EmptyNamespace),
            ("ns/", IdDefect::EmptyName),
            ("", IdDefect::MissingSeparator),
        ];
        for (id, defect) in cases {
            let err = ObjectId::parse_import_id(id).expect_err(id);
            assert_eq!(err.defect, defect);
            assert_eq!(err.id, id);
        }
    }

    #[test]
    fn test_from_str() {
        let id: ObjectId = "ns1/obj".parse().expect("parse");
        assert_eq!(id, ObjectId::new("ns1", "obj"));
    }
}
