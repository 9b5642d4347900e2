//! # Field Decoding
//!
//! Odoo encodes an empty field as `false` whatever its declared type, and
//! relational fields come back in two different shapes depending on the
//! field kind:
//!
//! - many2one: `[id, "display name"]`
//! - many2many / one2many: `[id, id, ...]`
//!
//! Everything here decodes once at the boundary and never fails. A value with
//! an unexpected shape degrades to the empty form of its type.
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Reference {
    #[default]
    Empty,
    Resolved {
        id: i64,
        label: String,
    },
    Unresolved(Vec<i64>),
}

impl Reference {
    pub fn from_value(value: &Value) -> Self {
        let Value::Array(items) = value else {
            return Reference::Empty;
        };

        match items.as_slice() {
            [id, Value::String(label)] => match id.as_i64() {
                Some(id) => Reference::Resolved {
                    id,
                    label: label.clone(),
                },
                None => Reference::Empty,
            },
            [first, ..] if first.is_i64() => {
                Reference::Unresolved(items.iter().filter_map(Value::as_i64).collect())
            }
            _ => Reference::Empty,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Reference::Resolved { label, .. } => Some(label),
            _ => None,
        }
    }

    pub fn unresolved_ids(&self) -> &[i64] {
        match self {
            Reference::Unresolved(ids) => ids,
            _ => &[],
        }
    }
}

impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Reference::from_value(&value))
    }
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reference::Empty => serializer.serialize_none(),
            Reference::Resolved { id, label } => (id, label).serialize(serializer),
            Reference::Unresolved(ids) => ids.serialize(serializer),
        }
    }
}

/// `deserialize_with` helpers for plain Odoo fields.
pub mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    /// Accepts numbers and numeric strings.
    pub fn float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let number = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        Ok(number.filter(|n| n.is_finite()))
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::Null => false,
        })
    }

    pub fn ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<i64>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items.iter().filter_map(Value::as_i64).collect(),
            _ => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::{Reference, lenient};

    #[derive(Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "lenient::text")]
        name: Option<String>,
        #[serde(default, deserialize_with = "lenient::float")]
        hours: Option<f64>,
        #[serde(default, deserialize_with = "lenient::flag")]
        confirmed: bool,
        #[serde(default, deserialize_with = "lenient::ids")]
        children: Vec<i64>,
        #[serde(default)]
        owner: Reference,
    }

    #[test]
    fn test_resolved_pair() {
        assert_eq!(
            Reference::from_value(&json!([7, "Jean Dupont"])),
            Reference::Resolved {
                id: 7,
                label: "Jean Dupont".to_string()
            }
        );
    }

    #[test]
    fn test_id_list() {
        assert_eq!(
            Reference::from_value(&json!([3, 4])),
            Reference::Unresolved(vec![3, 4])
        );
        assert_eq!(
            Reference::from_value(&json!([12])),
            Reference::Unresolved(vec![12])
        );
    }

    #[test]
    fn test_empty_shapes() {
        assert_eq!(Reference::from_value(&json!(false)), Reference::Empty);
        assert_eq!(Reference::from_value(&json!([])), Reference::Empty);
        assert_eq!(Reference::from_value(&json!(["a", "b"])), Reference::Empty);
        assert_eq!(Reference::from_value(&json!({"id": 1})), Reference::Empty);
    }

    #[test]
    fn test_reference_serializes_back_to_odoo_shapes() {
        let resolved = Reference::Resolved {
            id: 1,
            label: "Acme".to_string(),
        };

        assert_eq!(serde_json::to_value(&resolved).unwrap(), json!([1, "Acme"]));
        assert_eq!(
            serde_json::to_value(Reference::Unresolved(vec![1, 2])).unwrap(),
            json!([1, 2])
        );
        assert_eq!(serde_json::to_value(Reference::Empty).unwrap(), json!(null));
    }

    #[test]
    fn test_false_fields_decode_to_empty() {
        let record: Record = serde_json::from_value(json!({
            "name": false,
            "hours": false,
            "confirmed": false,
            "children": false,
            "owner": false
        }))
        .unwrap();

        assert_eq!(record.name, None);
        assert_eq!(record.hours, None);
        assert!(!record.confirmed);
        assert!(record.children.is_empty());
        assert_eq!(record.owner, Reference::Empty);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let record: Record = serde_json::from_value(json!({})).unwrap();

        assert_eq!(record.name, None);
        assert_eq!(record.owner, Reference::Empty);
    }

    #[test]
    fn test_numeric_strings_are_hours() {
        let record: Record =
            serde_json::from_value(json!({ "hours": " 8.5 ", "children": [1, "x", 2] })).unwrap();

        assert_eq!(record.hours, Some(8.5));
        assert_eq!(record.children, vec![1, 2]);
    }

    #[test]
    fn test_garbage_hours_are_absent() {
        let record: Record = serde_json::from_value(json!({ "hours": "soon" })).unwrap();

        assert_eq!(record.hours, None);
    }
}
