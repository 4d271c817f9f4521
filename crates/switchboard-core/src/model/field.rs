// ── Condition field identifier ──
//
// A field is a (namespace, name) pair such as `user` + `id`. On the wire
// it travels as the comma-joined string `"user,id"`; internally it is
// always the parsed pair.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Which input dimension a condition tests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    namespace: String,
    name: String,
}

impl FieldPath {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Result<Self, CoreError> {
        let namespace = namespace.into();
        let name = name.into();
        if !is_segment(&namespace) || !is_segment(&name) {
            return Err(CoreError::InvalidFieldPath {
                raw: format!("{namespace},{name}"),
            });
        }
        Ok(Self { namespace, name })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn is_segment(s: &str) -> bool {
    !s.is_empty() && !s.contains(',') && s.trim() == s
}

impl FromStr for FieldPath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, name) = s.split_once(',').ok_or_else(|| CoreError::InvalidFieldPath {
            raw: s.to_owned(),
        })?;
        Self::new(namespace.trim(), name.trim()).map_err(|_| CoreError::InvalidFieldPath {
            raw: s.to_owned(),
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.namespace, self.name)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}
