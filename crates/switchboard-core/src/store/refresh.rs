// ── Index load ──
//
// Decodes the console's index listing. Applying it is the one full
// render the view ever performs (see `SwitchStore::replace_all`).

use serde::Deserialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::model::{Catalog, Switch};

/// The index listing as the console serves it.
///
/// Older consoles answer with a bare array of switches; newer ones wrap
/// it together with the condition catalog and the applied sort order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexPayload {
    pub switches: Vec<Switch>,
    pub catalog: Catalog,
    pub sorted_by: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIndex {
    Listing(Vec<Switch>),
    Full {
        switches: Vec<Switch>,
        #[serde(default)]
        all_conditions: Catalog,
        #[serde(default)]
        sorted_by: Option<String>,
    },
}

impl IndexPayload {
    pub(crate) fn from_value(value: Value) -> Result<Self, CoreError> {
        let raw: RawIndex = serde_json::from_value(value).map_err(|e| CoreError::Transport {
            reason: format!("unreadable switch listing: {e}"),
        })?;
        Ok(match raw {
            RawIndex::Listing(switches) => Self {
                switches,
                ..Self::default()
            },
            RawIndex::Full {
                switches,
                all_conditions,
                sorted_by,
            } => Self {
                switches,
                catalog: all_conditions,
                sorted_by,
            },
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::SwitchStore;

    #[test]
    fn bare_array_is_accepted() {
        let payload =
            IndexPayload::from_value(json!([{"key": "a", "status": 1}, {"key": "b", "status": 3}]))
                .unwrap();
        assert_eq!(payload.switches.len(), 2);
        assert!(payload.catalog.is_empty());
        assert!(payload.sorted_by.is_none());
    }

    #[test]
    fn wrapped_listing_carries_catalog() {
        let payload = IndexPayload::from_value(json!({
            "switches": [{"key": "a", "status": 2}],
            "all_conditions": [{
                "id": "builtins.UserConditionSet",
                "label": "User",
                "namespace": "user",
                "fields": [{"name": "id", "type": "text"}]
            }],
            "sorted_by": "-date_modified"
        }))
        .unwrap();
        assert_eq!(payload.switches[0].key, "a");
        assert_eq!(payload.catalog.sets().len(), 1);
        assert_eq!(payload.sorted_by.as_deref(), Some("-date_modified"));
    }

    #[test]
    fn garbage_is_a_transport_failure() {
        let err = IndexPayload::from_value(json!({"nope": true})).unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn duplicate_keys_keep_first_position_last_value() {
        let store = SwitchStore::new();
        let payload = IndexPayload::from_value(json!([
            {"key": "a", "status": 1},
            {"key": "b", "status": 1},
            {"key": "a", "status": 3}
        ]))
        .unwrap();
        store.replace_all(payload.switches);
        let keys: Vec<_> = store.all().iter().map(|s| s.key.clone()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(store.get("a").unwrap().status.wire_value(), 3);
    }
}
