// ── Condition catalog ──
//
// The console advertises which kinds of condition it can evaluate. Each
// condition set owns a namespace and a list of fields; the editor builds
// one sub-form per (namespace, field) pair.

use serde::{Deserialize, Serialize};

use super::field::FieldPath;

/// How a field's input is rendered and collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text.
    Text,
    /// A single checkbox, submitted as `"1"` / `"0"`.
    Boolean,
    /// One of a fixed list of values.
    Choice { choices: Vec<String> },
    /// Two integers, `name[min]` and `name[max]`.
    Range,
    /// A range restricted to 0..=100.
    Percent,
}

/// One testable field of a condition set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            help_text: None,
        }
    }

    /// Explicit label, or the name title-cased with underscores as spaces.
    pub fn display_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| titlize(&self.name))
    }

    /// Help text, falling back to the kind's default hint.
    pub fn help(&self) -> Option<&str> {
        self.help_text.as_deref().or(match self.kind {
            FieldKind::Percent => Some("Enter two ranges. e.g. 0-50 is lower 50%"),
            _ => None,
        })
    }
}

fn titlize(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A kind of condition the console can evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionSet {
    /// Opaque identifier sent back as the `id` form field.
    pub id: String,
    pub label: String,
    pub namespace: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// Everything the console can evaluate, in advertised order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    sets: Vec<ConditionSet>,
}

impl Catalog {
    pub fn new(sets: Vec<ConditionSet>) -> Self {
        Self { sets }
    }

    pub fn sets(&self) -> &[ConditionSet] {
        &self.sets
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Look up the set and field definition addressed by `path`.
    pub fn field(&self, path: &FieldPath) -> Option<(&ConditionSet, &FieldDef)> {
        self.sets
            .iter()
            .filter(|set| set.namespace == path.namespace())
            .find_map(|set| {
                set.fields
                    .iter()
                    .find(|f| f.name == path.name())
                    .map(|f| (set, f))
            })
    }

    /// The condition set with the given id.
    pub fn set(&self, id: &str) -> Option<&ConditionSet> {
        self.sets.iter().find(|set| set.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn catalog() -> Catalog {
        serde_json::from_value(json!([
            {
                "id": "builtins.UserConditionSet(auth.user)",
                "label": "User",
                "namespace": "user",
                "fields": [
                    {"name": "id", "type": "text"},
                    {"name": "is_staff", "type": "boolean", "label": "Staff"},
                    {"name": "percent", "type": "percent"}
                ]
            },
            {
                "id": "builtins.IPAddressConditionSet",
                "label": "IP Address",
                "namespace": "ip",
                "fields": [
                    {"name": "ip_address", "type": "text"},
                    {"name": "tier", "type": "choice", "choices": ["free", "paid"]}
                ]
            }
        ]))
        .unwrap()
    }

    #[test]
    fn finds_field_by_path() {
        let cat = catalog();
        let path: FieldPath = "user,is_staff".parse().unwrap();
        let (set, field) = cat.field(&path).unwrap();
        assert_eq!(set.label, "User");
        assert_eq!(field.kind, FieldKind::Boolean);
        assert_eq!(field.display_label(), "Staff");
    }

    #[test]
    fn namespace_must_match() {
        let cat = catalog();
        assert!(cat.field(&"ip,id".parse().unwrap()).is_none());
        assert!(cat.field(&"user,ip_address".parse().unwrap()).is_none());
    }

    #[test]
    fn choice_kind_carries_choices() {
        let cat = catalog();
        let (_, field) = cat.field(&"ip,tier".parse().unwrap()).unwrap();
        assert_eq!(
            field.kind,
            FieldKind::Choice {
                choices: vec!["free".into(), "paid".into()]
            }
        );
    }

    #[test]
    fn labels_are_titlized() {
        let field = FieldDef::new("ip_address", FieldKind::Text);
        assert_eq!(field.display_label(), "Ip Address");
    }

    #[test]
    fn percent_has_default_help() {
        let field = FieldDef::new("percent", FieldKind::Percent);
        assert!(field.help().unwrap().contains("0-50"));
        assert!(FieldDef::new("id", FieldKind::Text).help().is_none());
    }

    #[test]
    fn set_lookup_by_id() {
        let cat = catalog();
        assert_eq!(cat.set("builtins.IPAddressConditionSet").unwrap().namespace, "ip");
        assert!(cat.set("missing").is_none());
    }
}
