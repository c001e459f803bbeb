//! Structural validation of the command and response contracts.
//!
//! Checks run against raw `serde_json::Value` so untrusted model output is
//! judged before any typed decoding. Only structure and the closed
//! vocabularies are checked; game-rule feasibility belongs to the dispatcher.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::{ActionType, Priority, SpatialDirection};

/// First structural violation found, with the JSON path that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Schema validation failed at {path}: {message}")]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

impl SchemaViolation {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

type Check = Result<(), SchemaViolation>;

/// Validate a command produced by the intent compiler.
pub fn validate_command(value: &Value) -> Check {
    let root = expect_object(value, "$")?;

    expect_string(root, "$", "command_id", true)?;
    let actions = expect_actions(root, "$")?;
    for (i, action) in actions.iter().enumerate() {
        validate_command_action(action, &format!("$.actions[{}]", i))?;
    }
    expect_string(root, "$", "dialogue_context", true)?;
    expect_bool(root, "$", "requires_clarification")?;
    Ok(())
}

/// Validate a response produced by the dispatcher.
pub fn validate_response(value: &Value) -> Check {
    let root = expect_object(value, "$")?;

    if let Some(signal) = expect_string(root, "$", "signal_type", true)? {
        if signal != "validation" {
            return Err(SchemaViolation::new(
                "$.signal_type",
                format!("\"{}\" is not one of [\"validation\"]", signal),
            ));
        }
    }
    expect_string(root, "$", "command_id", true)?;
    let actions = expect_actions(root, "$")?;
    for (i, result) in actions.iter().enumerate() {
        validate_action_result(result, &format!("$.actions[{}]", i))?;
    }
    Ok(())
}

fn validate_command_action(value: &Value, path: &str) -> Check {
    let action = expect_object(value, path)?;

    expect_string(action, path, "action_id", true)?;

    let kind = expect_string(action, path, "type", true)?;
    if let Some(kind) = kind {
        if kind.parse::<ActionType>().is_err() {
            return Err(SchemaViolation::new(
                format!("{}.type", path),
                format!("\"{}\" is not a supported action type", kind),
            ));
        }
    }

    if let Some(target) = action.get("target") {
        let target_path = format!("{}.target", path);
        let target = expect_object(target, &target_path)?;
        let descriptors = required(target, &target_path, "descriptors")?;
        let descriptors_path = format!("{}.descriptors", target_path);
        let Some(items) = descriptors.as_array() else {
            return Err(SchemaViolation::new(&descriptors_path, type_message(descriptors, "array")));
        };
        for (i, item) in items.iter().enumerate() {
            if !item.is_string() {
                return Err(SchemaViolation::new(
                    format!("{}[{}]", descriptors_path, i),
                    type_message(item, "string"),
                ));
            }
        }
        expect_nullable_string(target, &target_path, "category_hint", true)?;
    }

    if let Some(parameters) = action.get("parameters") {
        let parameters_path = format!("{}.parameters", path);
        let parameters = expect_object(parameters, &parameters_path)?;
        if let Some(direction) =
            expect_string(parameters, &parameters_path, "spatial_direction", false)?
        {
            check_direction(direction, &format!("{}.spatial_direction", parameters_path))?;
        }
    }

    expect_string(action, path, "assigned_to", true)?;

    let priority = expect_string(action, path, "priority", true)?;
    if let Some(priority) = priority {
        if priority.parse::<Priority>().is_err() {
            return Err(SchemaViolation::new(
                format!("{}.priority", path),
                format!(
                    "\"{}\" is not one of [\"low\", \"normal\", \"high\", \"critical\"]",
                    priority
                ),
            ));
        }
    }

    expect_nullable_string(action, path, "depends_on", false)?;
    Ok(())
}

fn validate_action_result(value: &Value, path: &str) -> Check {
    let result = expect_object(value, path)?;

    expect_string(result, path, "action_id", true)?;
    expect_string(result, path, "action_type_executed", true)?;
    if let Some(direction) = expect_nullable_string(result, path, "spatial_direction", false)? {
        check_direction(direction, &format!("{}.spatial_direction", path))?;
    }
    expect_bool(result, path, "status")?;
    expect_nullable_string(result, path, "reason", true)?;
    expect_string(result, path, "companion_id", true)?;
    expect_string(result, path, "response_id", true)?;
    Ok(())
}

fn check_direction(direction: &str, path: &str) -> Check {
    if direction.parse::<SpatialDirection>().is_err() {
        return Err(SchemaViolation::new(
            path,
            format!(
                "\"{}\" is not one of [\"Front\", \"Left\", \"Right\", \"Back\"]",
                direction
            ),
        ));
    }
    Ok(())
}

fn expect_object<'a>(
    value: &'a Value,
    path: &str,
) -> Result<&'a Map<String, Value>, SchemaViolation> {
    value
        .as_object()
        .ok_or_else(|| SchemaViolation::new(path, type_message(value, "object")))
}

fn expect_actions<'a>(
    object: &'a Map<String, Value>,
    path: &str,
) -> Result<&'a Vec<Value>, SchemaViolation> {
    let value = required(object, path, "actions")?;
    let actions_path = format!("{}.actions", path);
    let actions = value
        .as_array()
        .ok_or_else(|| SchemaViolation::new(&actions_path, type_message(value, "array")))?;
    if actions.is_empty() {
        return Err(SchemaViolation::new(actions_path, "[] should be non-empty"));
    }
    Ok(actions)
}

fn required<'a>(
    object: &'a Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<&'a Value, SchemaViolation> {
    object
        .get(key)
        .ok_or_else(|| SchemaViolation::new(path, format!("'{}' is a required property", key)))
}

/// Returns the string when present. Absent keys are an error only if required.
fn expect_string<'a>(
    object: &'a Map<String, Value>,
    path: &str,
    key: &str,
    is_required: bool,
) -> Result<Option<&'a str>, SchemaViolation> {
    let Some(value) = lookup(object, path, key, is_required)? else {
        return Ok(None);
    };
    value
        .as_str()
        .map(Some)
        .ok_or_else(|| {
            SchemaViolation::new(format!("{}.{}", path, key), type_message(value, "string"))
        })
}

fn expect_nullable_string<'a>(
    object: &'a Map<String, Value>,
    path: &str,
    key: &str,
    is_required: bool,
) -> Result<Option<&'a str>, SchemaViolation> {
    match lookup(object, path, key, is_required)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(SchemaViolation::new(
            format!("{}.{}", path, key),
            type_message(other, "string or null"),
        )),
    }
}

fn expect_bool(object: &Map<String, Value>, path: &str, key: &str) -> Check {
    let value = required(object, path, key)?;
    if value.is_boolean() {
        Ok(())
    } else {
        Err(SchemaViolation::new(format!("{}.{}", path, key), type_message(value, "boolean")))
    }
}

fn lookup<'a>(
    object: &'a Map<String, Value>,
    path: &str,
    key: &str,
    is_required: bool,
) -> Result<Option<&'a Value>, SchemaViolation> {
    match object.get(key) {
        Some(value) => Ok(Some(value)),
        None if is_required => Err(SchemaViolation::new(
            path,
            format!("'{}' is a required property", key),
        )),
        None => Ok(None),
    }
}

fn type_message(value: &Value, expected: &str) -> String {
    format!("{} is not of type '{}'", describe(value), expected)
}

fn describe(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.len() > 60 {
        let cut: String = rendered.chars().take(57).collect();
        format!("{}...", cut)
    } else {
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_command() -> Value {
        json!({
            "command_id": "cmd_001",
            "actions": [{
                "action_id": "act_001",
                "type": "follow",
                "target": {"descriptors": ["player"], "category_hint": "player"},
                "parameters": {"spatial_direction": "Right"},
                "assigned_to": "companion_01",
                "priority": "normal",
                "depends_on": null
            }],
            "dialogue_context": "follow me",
            "requires_clarification": false
        })
    }

    fn valid_response() -> Value {
        json!({
            "signal_type": "validation",
            "command_id": "cmd_001",
            "actions": [{
                "action_id": "act_001",
                "action_type_executed": "follow",
                "spatial_direction": null,
                "status": true,
                "reason": null,
                "companion_id": "companion_01",
                "response_id": "RESP_FOLLOW_ACCEPT"
            }]
        })
    }

    #[test]
    fn accepts_valid_command() {
        assert_eq!(validate_command(&valid_command()), Ok(()));
    }

    #[test]
    fn accepts_minimal_action() {
        let mut command = valid_command();
        command["actions"][0] = json!({
            "action_id": "act_001",
            "type": "wait",
            "assigned_to": "companion_01",
            "priority": "low"
        });
        assert_eq!(validate_command(&command), Ok(()));
    }

    #[test]
    fn rejects_unsupported_type_with_path() {
        let mut command = valid_command();
        command["actions"][0]["type"] = json!("do_a_barrel_roll");
        let err = validate_command(&command).unwrap_err();
        assert_eq!(err.path, "$.actions[0].type");
        assert!(err.message.contains("do_a_barrel_roll"));
    }

    #[test]
    fn rejects_empty_actions() {
        let mut command = valid_command();
        command["actions"] = json!([]);
        let err = validate_command(&command).unwrap_err();
        assert_eq!(err.path, "$.actions");
    }

    #[test]
    fn rejects_missing_required_field() {
        let mut command = valid_command();
        command
            .as_object_mut()
            .unwrap()
            .remove("requires_clarification");
        let err = validate_command(&command).unwrap_err();
        assert_eq!(err.path, "$");
        assert!(err.message.contains("requires_clarification"));
    }

    #[test]
    fn rejects_wrong_json_type() {
        let mut command = valid_command();
        command["requires_clarification"] = json!("no");
        let err = validate_command(&command).unwrap_err();
        assert_eq!(err.path, "$.requires_clarification");
    }

    #[test]
    fn rejects_bad_direction_and_priority() {
        let mut command = valid_command();
        command["actions"][0]["parameters"]["spatial_direction"] = json!("left");
        let err = validate_command(&command).unwrap_err();
        assert_eq!(err.path, "$.actions[0].parameters.spatial_direction");

        let mut command = valid_command();
        command["actions"][0]["priority"] = json!("urgent");
        let err = validate_command(&command).unwrap_err();
        assert_eq!(err.path, "$.actions[0].priority");
    }

    #[test]
    fn target_requires_descriptors_and_hint() {
        let mut command = valid_command();
        command["actions"][0]["target"] = json!({"descriptors": ["barrel"]});
        let err = validate_command(&command).unwrap_err();
        assert_eq!(err.path, "$.actions[0].target");

        let mut command = valid_command();
        command["actions"][0]["target"] = json!({"descriptors": [], "category_hint": null});
        assert_eq!(validate_command(&command), Ok(()));
    }

    #[test]
    fn rejects_non_string_descriptor() {
        let mut command = valid_command();
        command["actions"][0]["target"]["descriptors"] = json!(["barrel", 7]);
        let err = validate_command(&command).unwrap_err();
        assert_eq!(err.path, "$.actions[0].target.descriptors[1]");
    }

    #[test]
    fn rejects_non_object_root() {
        let err = validate_command(&json!(["not", "a", "command"])).unwrap_err();
        assert_eq!(err.path, "$");
    }

    #[test]
    fn accepts_valid_response() {
        assert_eq!(validate_response(&valid_response()), Ok(()));
    }

    #[test]
    fn response_reason_must_be_present() {
        let mut response = valid_response();
        response["actions"][0]
            .as_object_mut()
            .unwrap()
            .remove("reason");
        let err = validate_response(&response).unwrap_err();
        assert_eq!(err.path, "$.actions[0]");
    }

    #[test]
    fn response_direction_is_checked() {
        let mut response = valid_response();
        response["actions"][0]["spatial_direction"] = json!("Up");
        let err = validate_response(&response).unwrap_err();
        assert_eq!(err.path, "$.actions[0].spatial_direction");
    }

    #[test]
    fn response_signal_type_is_closed() {
        let mut response = valid_response();
        response["signal_type"] = json!("telemetry");
        let err = validate_response(&response).unwrap_err();
        assert_eq!(err.path, "$.signal_type");
    }

    #[test]
    fn display_names_path() {
        let err = SchemaViolation::new("$.actions", "[] should be non-empty");
        assert_eq!(
            err.to_string(),
            "Schema validation failed at $.actions: [] should be non-empty"
        );
    }
}
