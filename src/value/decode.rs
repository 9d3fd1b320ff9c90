//! Ingestion of JSON and YAML documents as generic values.
//!
//! Documents decode the way the host decodes into `interface {}`: objects
//! become `map[string]interface {}`, arrays `[]interface {}`, JSON numbers
//! `float64`, and null a nil interface.

use super::reflect::Reflect;
use super::types::Type;
use super::value::{Data, Value};

fn generic_map_type() -> Type {
    Type::map_of(&Type::string(), &Type::any())
}

fn generic_slice_type() -> Type {
    Type::slice_of(&Type::any())
}

/// Parse a value from JSON.
pub fn from_json(json: &str) -> Result<Value, serde_json::Error> {
    let parsed: serde_json::Value = serde_json::from_str(json)?;
    Ok(from_json_value(&parsed))
}

fn from_json_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::nil(),
        serde_json::Value::Bool(b) => b.to_value(),
        serde_json::Value::Number(n) => n.as_f64().unwrap_or_default().to_value(),
        serde_json::Value::String(s) => s.to_value(),
        serde_json::Value::Array(items) => Value::slice(
            &generic_slice_type(),
            items.iter().map(from_json_value).collect(),
        ),
        serde_json::Value::Object(fields) => Value::map(
            &generic_map_type(),
            fields
                .iter()
                .map(|(k, v)| (k.to_value(), from_json_value(v)))
                .collect(),
        ),
    }
}

/// Parse a value from YAML. Integers decode as `int`, other numbers as
/// `float64`; non-string mapping keys are rendered to strings.
pub fn from_yaml(yaml: &str) -> Result<Value, serde_yaml::Error> {
    let parsed: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    Ok(from_yaml_value(&parsed))
}

fn from_yaml_value(v: &serde_yaml::Value) -> Value {
    match v {
        serde_yaml::Value::Null => Value::nil(),
        serde_yaml::Value::Bool(b) => b.to_value(),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from_parts(&Type::int(), Data::Int(i))
            } else if let Some(u) = n.as_u64() {
                u.to_value()
            } else {
                n.as_f64().unwrap_or_default().to_value()
            }
        }
        serde_yaml::Value::String(s) => s.to_value(),
        serde_yaml::Value::Sequence(items) => Value::slice(
            &generic_slice_type(),
            items.iter().map(from_yaml_value).collect(),
        ),
        serde_yaml::Value::Mapping(fields) => Value::map(
            &generic_map_type(),
            fields
                .iter()
                .map(|(k, v)| (yaml_key(k).to_value(), from_yaml_value(v)))
                .collect(),
        ),
        serde_yaml::Value::Tagged(tagged) => from_yaml_value(&tagged.value),
    }
}

fn yaml_key(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        other => from_yaml_value(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Kind;

    #[test]
    fn test_from_json() {
        let v = from_json(r#"{"name": "foo", "tags": ["a", null], "n": 1}"#).expect("json");
        assert_eq!(
            v.ty().map(ToString::to_string).as_deref(),
            Some("map[string]interface {}")
        );
        let name = v.map_index(&"name".to_value()).and_then(|n| n.elem());
        assert_eq!(name.as_ref().and_then(Value::as_str), Some("foo"));

        let n = v.map_index(&"n".to_value()).and_then(|n| n.elem());
        assert_eq!(n.as_ref().and_then(Value::kind), Some(Kind::Float64));

        let tags = v.map_index(&"tags".to_value()).and_then(|t| t.elem());
        let tags = tags.expect("tags");
        assert_eq!(tags.len(), 2);
        assert!(tags.index(1).is_some_and(|t| t.is_nil()));

        assert!(!from_json("null").expect("json").is_valid());
        assert!(from_json("{").is_err());
    }

    #[test]
    fn test_from_yaml() {
        let v = from_yaml("port: 8080\nratio: 0.5\n1: one\nlist:\n  - x\n").expect("yaml");
        let port = v.map_index(&"port".to_value()).and_then(|p| p.elem());
        assert_eq!(port.as_ref().and_then(Value::kind), Some(Kind::Int));
        assert_eq!(port.as_ref().and_then(Value::as_i64), Some(8080));

        let ratio = v.map_index(&"ratio".to_value()).and_then(|p| p.elem());
        assert_eq!(ratio.as_ref().and_then(Value::as_f64), Some(0.5));

        assert!(v.map_index(&"1".to_value()).is_some());
        assert!(from_yaml("a: [").is_err());
    }
}
