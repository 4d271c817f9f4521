// ── Switch and Condition: canonical payload types ──
//
// These deserialize directly from the console's canonical switch payload
// and are stored as-is. The server is authoritative for every field; the
// only client-side adjustment is dropping duplicate conditions so that a
// resubmitted identical condition never shows up twice.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::field::FieldPath;
use super::status::Status;

/// A named feature switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    /// Unique, immutable identity. Every operation addresses a switch by key.
    pub key: String,
    /// Display label.
    #[serde(default, rename = "label", alias = "name")]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default, deserialize_with = "unique_conditions")]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTime<Utc>>,
}

impl Switch {
    /// A bare switch with no conditions.
    pub fn new(key: impl Into<String>, status: Status) -> Self {
        Self {
            key: key.into(),
            name: None,
            description: None,
            status,
            conditions: Vec::new(),
            date_created: None,
            date_modified: None,
        }
    }

    /// Label if set, key otherwise.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.key)
    }

    /// Find a condition by its identifying triple.
    pub fn condition(&self, id: &str, field: &FieldPath, value: &str) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|c| c.id == id && &c.field == field && c.value == value)
    }
}

impl AsRef<Switch> for Switch {
    fn as_ref(&self) -> &Switch {
        self
    }
}

/// One predicate attached to a switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Which condition kind (condition set) this instantiates. Opaque.
    pub id: String,
    pub field: FieldPath,
    #[serde(deserialize_with = "coerced_value")]
    pub value: String,
    /// Exclusion conditions force the switch off when they match.
    #[serde(default)]
    pub exclude: bool,
    /// Human rendering supplied by the console, e.g. `"Percent: 50% (0-50)"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Condition {
    pub fn new(id: impl Into<String>, field: FieldPath, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field,
            value: value.into(),
            exclude: false,
            display: None,
        }
    }

    /// Text to show for this condition.
    pub fn display_value(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.value)
    }
}

/// Keep the first occurrence of each `(id, field, value)`.
fn unique_conditions<'de, D>(deserializer: D) -> Result<Vec<Condition>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Condition>>::deserialize(deserializer)?.unwrap_or_default();
    let mut seen = HashSet::new();
    Ok(raw
        .into_iter()
        .filter(|c| seen.insert((c.id.clone(), c.field.clone(), c.value.clone())))
        .collect())
}

/// Condition values arrive as strings, but checkbox fields may come back
/// as booleans or numbers. Normalize to the `"1"` / `"0"` text form.
fn coerced_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Flag(bool),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Flag(b) => String::from(if b { "1" } else { "0" }),
        Raw::Number(n) => n.to_string(),
    })
}
