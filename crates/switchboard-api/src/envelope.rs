use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The console's uniform response envelope: `{"success": bool, "data": ...}`.
///
/// On success `data` is the payload (usually a canonical switch); on
/// failure it is a human-readable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::String(message.into()),
        }
    }

    /// Split into the success payload or the failure message.
    ///
    /// Failure payloads that are not strings are rendered as compact JSON
    /// so nothing the console said is lost.
    pub fn into_result(self) -> Result<Value, String> {
        if self.success {
            return Ok(self.data);
        }
        Err(match self.data {
            Value::String(message) => message,
            Value::Null => "request failed".to_owned(),
            other => other.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_keeps_payload() {
        let env: Envelope =
            serde_json::from_value(json!({"success": true, "data": {"key": "beta"}})).unwrap();
        assert_eq!(env.into_result().unwrap(), json!({"key": "beta"}));
    }

    #[test]
    fn failure_message_is_verbatim() {
        let env: Envelope = serde_json::from_value(
            json!({"success": false, "data": "Switch with key beta already exists"}),
        )
        .unwrap();
        assert_eq!(
            env.into_result().unwrap_err(),
            "Switch with key beta already exists"
        );
    }

    #[test]
    fn missing_data_defaults_to_null() {
        let env: Envelope = serde_json::from_value(json!({"success": true})).unwrap();
        assert_eq!(env.data, Value::Null);

        let env: Envelope = serde_json::from_value(json!({"success": false})).unwrap();
        assert_eq!(env.into_result().unwrap_err(), "request failed");
    }

    #[test]
    fn structured_failure_is_rendered_as_json() {
        let env = Envelope {
            success: false,
            data: json!(["Key cannot be empty"]),
        };
        assert_eq!(env.into_result().unwrap_err(), r#"["Key cannot be empty"]"#);
    }
}
