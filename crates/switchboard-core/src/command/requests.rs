// ── Typed request payloads for Intent variants ──
//
// Each request knows how to flatten itself into the form-encoded
// parameter list its endpoint expects.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::FieldPath;

/// Form parameters, in submission order.
pub type FormParams = Vec<(String, String)>;

fn param(name: &str, value: impl Into<String>) -> (String, String) {
    (name.to_owned(), value.into())
}

/// Parameter names the add-condition form uses for itself.
const RESERVED: [&str; 4] = ["key", "id", "field", "exclude"];

// ── Switch details ─────────────────────────────────────────────────

/// The editable attributes of a switch.
///
/// The console replaces label and description wholesale on update, so
/// an absent value is sent as an empty field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchDetails {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SwitchDetails {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn form(&self) -> FormParams {
        vec![
            param("name", self.name.clone().unwrap_or_default()),
            param("key", &*self.key),
            param("desc", self.description.clone().unwrap_or_default()),
        ]
    }
}

// ── Conditions ─────────────────────────────────────────────────────

/// Attach a condition to a switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddConditionRequest {
    pub key: String,
    /// Condition set id, as advertised in the catalog.
    pub set_id: String,
    pub field: FieldPath,
    /// Collected input values keyed by input name. Checkbox inputs are
    /// already `"1"` / `"0"`; range inputs appear as `name[min]` and
    /// `name[max]`.
    pub values: IndexMap<String, String>,
    #[serde(default)]
    pub exclude: bool,
}

impl AddConditionRequest {
    pub(crate) fn form(&self) -> FormParams {
        let mut form = vec![
            param("key", &*self.key),
            param("id", &*self.set_id),
            param("field", self.field.to_string()),
        ];
        if self.exclude {
            form.push(param("exclude", "1"));
        }
        form.extend(
            self.values
                .iter()
                .map(|(name, v)| (self.input_param(name), v.clone())),
        );
        form
    }

    /// Wire name for an input value. Inputs whose base name would shadow
    /// one of the form's own params travel under the full field path
    /// instead (`id` on `user,id` is sent as `user,id`).
    fn input_param(&self, name: &str) -> String {
        let base = name.split('[').next().unwrap_or(name);
        if RESERVED.contains(&base) {
            format!("{},{name}", self.field.namespace())
        } else {
            name.to_owned()
        }
    }
}

/// Detach one condition, identified by its `(id, field, value)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveConditionRequest {
    pub key: String,
    pub set_id: String,
    pub field: FieldPath,
    pub value: String,
}

impl RemoveConditionRequest {
    pub(crate) fn form(&self) -> FormParams {
        vec![
            param("key", &*self.key),
            param("id", &*self.set_id),
            param("field", self.field.to_string()),
            param("value", &*self.value),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn names(form: &FormParams) -> Vec<&str> {
        form.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn switch_details_send_empty_for_absent_fields() {
        let form = SwitchDetails::new("beta").with_name("Beta").form();
        assert_eq!(
            form,
            vec![
                ("name".into(), "Beta".into()),
                ("key".into(), "beta".into()),
                ("desc".into(), String::new()),
            ]
        );
    }

    #[test]
    fn add_condition_flattens_values_after_fixed_params() {
        let mut values = IndexMap::new();
        values.insert("percent[min]".to_owned(), "0".to_owned());
        values.insert("percent[max]".to_owned(), "50".to_owned());
        let req = AddConditionRequest {
            key: "beta".into(),
            set_id: "builtins.UserConditionSet".into(),
            field: "user,percent".parse().unwrap(),
            values,
            exclude: false,
        };
        let form = req.form();
        assert_eq!(
            names(&form),
            vec!["key", "id", "field", "percent[min]", "percent[max]"]
        );
        assert_eq!(form[2].1, "user,percent");
    }

    #[test]
    fn input_named_like_a_form_param_travels_under_field_path() {
        let mut values = IndexMap::new();
        values.insert("id".to_owned(), "42".to_owned());
        let req = AddConditionRequest {
            key: "beta".into(),
            set_id: "builtins.UserConditionSet(auth.user)".into(),
            field: "user,id".parse().unwrap(),
            values,
            exclude: false,
        };
        let form = req.form();
        assert_eq!(names(&form), vec!["key", "id", "field", "user,id"]);
        let ids: Vec<_> = form.iter().filter(|(k, _)| k == "id").collect();
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].1, "builtins.UserConditionSet(auth.user)");
        assert_eq!(form[3].1, "42");
    }

    #[test]
    fn range_inputs_on_reserved_names_keep_their_suffix() {
        let mut values = IndexMap::new();
        values.insert("key[min]".to_owned(), "1".to_owned());
        let req = AddConditionRequest {
            key: "beta".into(),
            set_id: "s".into(),
            field: "doc,key".parse().unwrap(),
            values,
            exclude: false,
        };
        assert_eq!(names(&req.form()), vec!["key", "id", "field", "doc,key[min]"]);
    }

    #[test]
    fn exclude_is_sent_only_when_set() {
        let mut req = AddConditionRequest {
            key: "beta".into(),
            set_id: "s".into(),
            field: "user,id".parse().unwrap(),
            values: IndexMap::new(),
            exclude: true,
        };
        assert!(req.form().contains(&("exclude".into(), "1".into())));
        req.exclude = false;
        assert!(!names(&req.form()).contains(&"exclude"));
    }

    #[test]
    fn remove_condition_sends_identifying_triple() {
        let req = RemoveConditionRequest {
            key: "beta".into(),
            set_id: "s".into(),
            field: "user,id".parse().unwrap(),
            value: "42".into(),
        };
        assert_eq!(names(&req.form()), vec!["key", "id", "field", "value"]);
    }
}
