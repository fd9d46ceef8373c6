//! Structural search for entity references inside config trees

use serde_json::Value;

use crate::types::RecordKind;

/// Whether `target` appears as an identifier anywhere inside `value`
///
/// Strings match on equality and arrays when any element matches. Maps check
/// `entity_id` first, then `target.entity_id`, then recurse into every
/// value, since triggers and actions put ids under many different keys.
/// Null, booleans and numbers never match.
pub fn references_entity(value: &Value, target: &str) -> bool {
    match value {
        Value::String(s) => s == target,
        Value::Array(items) => items.iter().any(|item| references_entity(item, target)),
        Value::Object(map) => {
            if map
                .get("entity_id")
                .is_some_and(|id| references_entity(id, target))
            {
                return true;
            }
            if let Some(Value::Object(service_target)) = map.get("target") {
                if service_target
                    .get("entity_id")
                    .is_some_and(|id| references_entity(id, target))
                {
                    return true;
                }
            }
            map.values().any(|nested| references_entity(nested, target))
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Whether any searchable section of a record's config references `target`
///
/// Each section (an automation's triggers, conditions and actions) is
/// searched independently.
pub fn record_references(kind: RecordKind, config: &Value, target: &str) -> bool {
    kind.reference_sections(config)
        .into_iter()
        .any(|section| references_entity(section, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_entity_id() {
        let trigger = json!({ "platform": "state", "entity_id": "light.x" });
        assert!(references_entity(&trigger, "light.x"));
    }

    #[test]
    fn test_service_target() {
        let action = json!({ "target": { "entity_id": "switch.y" } });
        assert!(references_entity(&action, "switch.y"));
    }

    #[test]
    fn test_entity_id_list() {
        let action = json!({
            "service": "light.turn_on",
            "target": { "entity_id": ["light.a", "light.b"] }
        });
        assert!(references_entity(&action, "light.b"));
        assert!(!references_entity(&action, "light.c"));
    }

    #[test]
    fn test_absent_target() {
        let tree = json!({
            "trigger": [{ "platform": "time", "at": "07:00:00" }],
            "action": [{ "service": "notify.mobile", "data": { "message": "hi" } }]
        });
        assert!(!references_entity(&tree, "light.kitchen"));
    }

    #[test]
    fn test_other_keys_and_deep_nesting() {
        let tree = json!({
            "choose": [{
                "conditions": [{ "condition": "template", "value_template": "x" }],
                "sequence": [{
                    "repeat": {
                        "sequence": [{ "scene": "scene.movie_night" }]
                    }
                }]
            }]
        });
        assert!(references_entity(&tree, "scene.movie_night"));
    }

    #[test]
    fn test_substrings_and_scalars_do_not_match() {
        assert!(!references_entity(&json!("light.kitchen_lamp"), "light.kitchen"));
        assert!(!references_entity(&json!(null), "light.kitchen"));
        assert!(!references_entity(&json!(42), "42"));
        assert!(!references_entity(&json!(true), "true"));
    }

    #[test]
    fn test_map_keys_are_not_values() {
        let tree = json!({ "light.kitchen": "on" });
        assert!(!references_entity(&tree, "light.kitchen"));
    }

    #[test]
    fn test_tolerates_deep_trees() {
        let mut tree = json!({ "entity_id": "sensor.deep" });
        for _ in 0..200 {
            tree = json!({ "sequence": [tree] });
        }
        assert!(references_entity(&tree, "sensor.deep"));
    }

    #[test]
    fn test_record_references_sections() {
        let automation = json!({
            "alias": "light.kitchen",
            "triggers": [{ "platform": "time", "at": "07:00" }],
            "conditions": [{ "condition": "state", "entity_id": "binary_sensor.door", "state": "on" }],
            "actions": [{ "action": "light.turn_on", "target": { "entity_id": "light.hall" } }]
        });

        assert!(record_references(RecordKind::Automation, &automation, "binary_sensor.door"));
        assert!(record_references(RecordKind::Automation, &automation, "light.hall"));
        // alias is not a searched section
        assert!(!record_references(RecordKind::Automation, &automation, "light.kitchen"));
    }
}
