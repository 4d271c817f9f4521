// ── Condition editor ──
//
// Form state for adding a condition to a switch. The catalog yields one
// sub-form per (namespace, field) pair; choosing a field shows its
// sub-form and hides all others. Collected values are what the console
// expects in the add-condition request.

use indexmap::IndexMap;

use crate::command::{AddConditionRequest, Intent, RemoveConditionRequest};
use crate::error::CoreError;
use crate::model::{Catalog, Condition, FieldDef, FieldKind, FieldPath, Switch};

/// How an input collects its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Submitted as `"1"` when checked, `"0"` otherwise.
    Checkbox,
    /// Submitted verbatim.
    Text,
}

/// One named input inside a sub-form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub name: String,
    pub kind: InputKind,
    /// Text inputs may offer a fixed list of choices.
    pub choices: Vec<String>,
    text: String,
    checked: bool,
}

impl Input {
    fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: InputKind::Text,
            choices: Vec::new(),
            text: String::new(),
            checked: false,
        }
    }

    fn checkbox(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: InputKind::Checkbox,
            choices: Vec::new(),
            text: String::new(),
            // A boolean condition is normally "field is true".
            checked: true,
        }
    }

    /// The value this input submits.
    pub fn value(&self) -> String {
        match self.kind {
            InputKind::Checkbox => String::from(if self.checked { "1" } else { "0" }),
            InputKind::Text => self.text.clone(),
        }
    }
}

/// Inputs for one field of one condition set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubForm {
    pub set_id: String,
    pub set_label: String,
    pub field: FieldPath,
    pub label: String,
    pub help: Option<String>,
    pub inputs: Vec<Input>,
    visible: bool,
}

impl SubForm {
    fn build(set_id: &str, set_label: &str, field: FieldPath, def: &FieldDef) -> Self {
        let inputs = match &def.kind {
            FieldKind::Text => vec![Input::text(&def.name)],
            FieldKind::Boolean => vec![Input::checkbox(&def.name)],
            FieldKind::Choice { choices } => vec![Input {
                choices: choices.clone(),
                ..Input::text(&def.name)
            }],
            FieldKind::Range | FieldKind::Percent => vec![
                Input::text(format!("{}[min]", def.name)),
                Input::text(format!("{}[max]", def.name)),
            ],
        };
        Self {
            set_id: set_id.to_owned(),
            set_label: set_label.to_owned(),
            field,
            label: def.display_label(),
            help: def.help().map(str::to_owned),
            inputs,
            visible: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn input_mut(&mut self, name: &str) -> Result<&mut Input, CoreError> {
        let field = self.field.to_string();
        self.inputs
            .iter_mut()
            .find(|i| i.name == name)
            .ok_or_else(|| CoreError::Validation {
                message: format!("field {field} has no input named '{name}'"),
            })
    }
}

/// The add-condition form for one switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    key: String,
    subforms: Vec<SubForm>,
    exclude: bool,
}

impl FormState {
    /// Key of the switch this form edits.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn subforms(&self) -> &[SubForm] {
        &self.subforms
    }

    /// The sub-form currently shown, if a field has been chosen.
    pub fn visible(&self) -> Option<&SubForm> {
        self.subforms.iter().find(|s| s.visible)
    }

    /// Show the sub-form for `field` and hide every other one.
    ///
    /// If several condition sets advertise the same field, the first in
    /// catalog order wins.
    pub fn select_field(&mut self, field: &FieldPath) -> Result<(), CoreError> {
        let chosen = self
            .subforms
            .iter()
            .position(|s| &s.field == field)
            .ok_or_else(|| CoreError::UnknownField {
                field: field.to_string(),
            })?;
        for (i, sub) in self.subforms.iter_mut().enumerate() {
            sub.visible = i == chosen;
        }
        Ok(())
    }

    /// Set a text input on the visible sub-form.
    pub fn set_text(&mut self, name: &str, value: impl Into<String>) -> Result<(), CoreError> {
        let input = self.visible_mut()?.input_mut(name)?;
        if input.kind != InputKind::Text {
            return Err(CoreError::Validation {
                message: format!("'{name}' is a checkbox"),
            });
        }
        input.text = value.into();
        Ok(())
    }

    /// Tick or clear a checkbox on the visible sub-form.
    pub fn set_checked(&mut self, name: &str, checked: bool) -> Result<(), CoreError> {
        let input = self.visible_mut()?.input_mut(name)?;
        if input.kind != InputKind::Checkbox {
            return Err(CoreError::Validation {
                message: format!("'{name}' is not a checkbox"),
            });
        }
        input.checked = checked;
        Ok(())
    }

    /// Set an input from its textual form: checkboxes accept the usual
    /// yes/no spellings, text inputs take the value verbatim.
    pub fn set_input(&mut self, name: &str, raw: &str) -> Result<(), CoreError> {
        let kind = self.visible_mut()?.input_mut(name)?.kind;
        match kind {
            InputKind::Text => self.set_text(name, raw),
            InputKind::Checkbox => {
                let checked = match raw.trim().to_ascii_lowercase().as_str() {
                    "1" | "true" | "yes" | "on" => true,
                    "0" | "false" | "no" | "off" | "" => false,
                    other => {
                        return Err(CoreError::Validation {
                            message: format!("'{other}' is not a yes/no value for '{name}'"),
                        });
                    }
                };
                self.set_checked(name, checked)
            }
        }
    }

    /// Mark the condition as an exclusion.
    pub fn set_exclude(&mut self, exclude: bool) {
        self.exclude = exclude;
    }

    pub fn exclude(&self) -> bool {
        self.exclude
    }

    /// Values of the visible sub-form, keyed by input name.
    ///
    /// Checkboxes yield `"1"` / `"0"`; everything else is passed through
    /// as typed. Empty when no field has been chosen.
    pub fn collect_values(&self) -> IndexMap<String, String> {
        self.visible()
            .map(|sub| {
                sub.inputs
                    .iter()
                    .map(|i| (i.name.clone(), i.value()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn visible_mut(&mut self) -> Result<&mut SubForm, CoreError> {
        self.subforms
            .iter_mut()
            .find(|s| s.visible)
            .ok_or_else(|| CoreError::Validation {
                message: "no condition field selected".into(),
            })
    }
}

// ── Editor ───────────────────────────────────────────────────────────

/// Builds condition forms from the console's catalog and turns them into
/// intents.
#[derive(Debug, Clone, Default)]
pub struct ConditionEditor {
    catalog: Catalog,
}

impl ConditionEditor {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// A fresh add-condition form for `switch`.
    ///
    /// The first field in catalog order starts out visible, so exactly
    /// one sub-form is shown whenever the catalog is non-empty.
    pub fn open_form_for(&self, switch: &Switch) -> FormState {
        let mut subforms = Vec::new();
        for set in self.catalog.sets() {
            for def in &set.fields {
                // Catalog entries with unusable names cannot be addressed.
                let Ok(path) = FieldPath::new(&set.namespace, &def.name) else {
                    continue;
                };
                subforms.push(SubForm::build(&set.id, &set.label, path, def));
            }
        }
        if let Some(first) = subforms.first_mut() {
            first.visible = true;
        }
        FormState {
            key: switch.key.clone(),
            subforms,
            exclude: false,
        }
    }

    /// Turn a filled-in form into an add-condition intent.
    pub fn submit_add(&self, form: &FormState) -> Result<Intent, CoreError> {
        let sub = form.visible().ok_or_else(|| CoreError::Validation {
            message: "no condition field selected".into(),
        })?;
        Ok(Intent::AddCondition(AddConditionRequest {
            key: form.key.clone(),
            set_id: sub.set_id.clone(),
            field: sub.field.clone(),
            values: form.collect_values(),
            exclude: form.exclude,
        }))
    }

    /// An intent removing `condition` from `switch`.
    pub fn submit_remove(switch: &Switch, condition: &Condition) -> Intent {
        Intent::RemoveCondition(RemoveConditionRequest {
            key: switch.key.clone(),
            set_id: condition.id.clone(),
            field: condition.field.clone(),
            value: condition.value.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::Status;

    fn editor() -> ConditionEditor {
        ConditionEditor::new(
            serde_json::from_value(json!([
                {
                    "id": "builtins.UserConditionSet(auth.user)",
                    "label": "User",
                    "namespace": "user",
                    "fields": [
                        {"name": "id", "type": "text"},
                        {"name": "is_staff", "type": "boolean"},
                        {"name": "percent", "type": "percent"}
                    ]
                },
                {
                    "id": "builtins.IPAddressConditionSet",
                    "label": "IP Address",
                    "namespace": "ip",
                    "fields": [{"name": "ip_address", "type": "text"}]
                }
            ]))
            .unwrap(),
        )
    }

    fn visible_count(form: &FormState) -> usize {
        form.subforms().iter().filter(|s| s.is_visible()).count()
    }

    #[test]
    fn one_subform_per_field_first_visible() {
        let form = editor().open_form_for(&Switch::new("beta", Status::Conditional));
        assert_eq!(form.subforms().len(), 4);
        assert_eq!(visible_count(&form), 1);
        assert_eq!(form.visible().unwrap().field.to_string(), "user,id");
    }

    #[test]
    fn selecting_a_field_shows_exactly_that_subform() {
        let mut form = editor().open_form_for(&Switch::new("beta", Status::Conditional));
        for raw in ["ip,ip_address", "user,percent", "user,is_staff"] {
            let path: FieldPath = raw.parse().unwrap();
            form.select_field(&path).unwrap();
            assert_eq!(visible_count(&form), 1);
            assert_eq!(form.visible().unwrap().field, path);
        }
    }

    #[test]
    fn duplicate_field_across_sets_shows_only_first() {
        let ed = ConditionEditor::new(
            serde_json::from_value(json!([
                {
                    "id": "builtins.UserConditionSet(auth.user)",
                    "label": "User",
                    "namespace": "user",
                    "fields": [{"name": "username", "type": "text"}]
                },
                {
                    "id": "custom.StaffConditionSet",
                    "label": "Staff",
                    "namespace": "user",
                    "fields": [{"name": "username", "type": "text"}]
                }
            ]))
            .unwrap(),
        );
        let mut form = ed.open_form_for(&Switch::new("beta", Status::Conditional));
        form.select_field(&"user,username".parse().unwrap()).unwrap();
        assert_eq!(visible_count(&form), 1);
        assert_eq!(
            form.visible().unwrap().set_id,
            "builtins.UserConditionSet(auth.user)"
        );
    }

    #[test]
    fn selecting_unknown_field_keeps_current_selection() {
        let mut form = editor().open_form_for(&Switch::new("beta", Status::Conditional));
        let err = form.select_field(&"ip,id".parse().unwrap()).unwrap_err();
        assert!(matches!(err, CoreError::UnknownField { .. }));
        assert_eq!(form.visible().unwrap().field.to_string(), "user,id");
    }

    #[test]
    fn checkbox_values_coerce_to_digits() {
        let mut form = editor().open_form_for(&Switch::new("beta", Status::Conditional));
        form.select_field(&"user,is_staff".parse().unwrap()).unwrap();
        assert_eq!(form.collect_values()["is_staff"], "1");

        form.set_checked("is_staff", false).unwrap();
        assert_eq!(form.collect_values()["is_staff"], "0");

        form.set_input("is_staff", "yes").unwrap();
        assert_eq!(form.collect_values()["is_staff"], "1");
    }

    #[test]
    fn text_values_pass_through_raw() {
        let mut form = editor().open_form_for(&Switch::new("beta", Status::Conditional));
        form.set_text("id", " 42 ").unwrap();
        assert_eq!(form.collect_values()["id"], " 42 ");
        assert!(form.set_checked("id", true).is_err());
    }

    #[test]
    fn range_fields_collect_min_and_max() {
        let mut form = editor().open_form_for(&Switch::new("beta", Status::Conditional));
        form.select_field(&"user,percent".parse().unwrap()).unwrap();
        form.set_text("percent[min]", "0").unwrap();
        form.set_text("percent[max]", "50").unwrap();

        let values: Vec<_> = form.collect_values().into_iter().collect();
        assert_eq!(
            values,
            vec![
                ("percent[min]".to_owned(), "0".to_owned()),
                ("percent[max]".to_owned(), "50".to_owned())
            ]
        );
    }

    #[test]
    fn only_visible_subform_is_collected() {
        let mut form = editor().open_form_for(&Switch::new("beta", Status::Conditional));
        form.set_text("id", "42").unwrap();
        form.select_field(&"ip,ip_address".parse().unwrap()).unwrap();
        form.set_text("ip_address", "10.0.0.1").unwrap();

        let values = form.collect_values();
        assert_eq!(values.len(), 1);
        assert_eq!(values["ip_address"], "10.0.0.1");
    }

    #[test]
    fn submit_add_builds_intent() {
        let ed = editor();
        let mut form = ed.open_form_for(&Switch::new("beta", Status::Conditional));
        form.set_text("id", "42").unwrap();
        form.set_exclude(true);

        let Intent::AddCondition(req) = ed.submit_add(&form).unwrap() else {
            panic!("expected AddCondition");
        };
        assert_eq!(req.key, "beta");
        assert_eq!(req.set_id, "builtins.UserConditionSet(auth.user)");
        assert_eq!(req.field.to_string(), "user,id");
        assert_eq!(req.values["id"], "42");
        assert!(req.exclude);
    }

    #[test]
    fn empty_catalog_cannot_submit() {
        let ed = ConditionEditor::default();
        let form = ed.open_form_for(&Switch::new("beta", Status::Conditional));
        assert!(form.visible().is_none());
        assert!(form.collect_values().is_empty());
        assert!(ed.submit_add(&form).is_err());
    }

    #[test]
    fn submit_remove_uses_condition_triple() {
        let field: FieldPath = "user,id".parse().unwrap();
        let mut sw = Switch::new("beta", Status::Conditional);
        sw.conditions.push(Condition::new("u", field.clone(), "42"));

        let intent = ConditionEditor::submit_remove(&sw, &sw.conditions[0]);
        assert_eq!(
            intent,
            Intent::RemoveCondition(RemoveConditionRequest {
                key: "beta".into(),
                set_id: "u".into(),
                field,
                value: "42".into(),
            })
        );
    }
}
