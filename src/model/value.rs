use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A decoded attribute value, shaped so the JSON encoder downstream can
/// render it without any type wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    String(String),
    Double(f64),
    Long(i64),
    Boolean(bool),
    List(Vec<AttributeValue>),
    Map(HashMap<String, AttributeValue>),
}

/// Attribute name with case-insensitive identity and ordering.
///
/// Two names that differ only in case are the same key, and the
/// first-seen spelling is the one that is kept. This treatment applies
/// only to the top-level attribute map, not to maps nested inside
/// attribute values.
#[derive(Debug, Clone)]
pub struct AttributeName(String);

impl AttributeName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for AttributeName {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AttributeName {}

impl PartialOrd for AttributeName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AttributeName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.to_lowercase().cmp(&other.0.to_lowercase())
    }
}

/// The attribute map attached to an expanded leaf, kept in
/// case-insensitive name order. Duplicate names collapse, last value
/// wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMap {
    entries: BTreeMap<AttributeName, AttributeValue>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: String, value: AttributeValue) {
        self.entries.insert(AttributeName(name), value);
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries.get(&AttributeName(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in output order, with their original spelling.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(AttributeName::as_str)
    }
}

impl Serialize for AttributeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name.as_str(), value)?;
        }
        map.end()
    }
}

/// One managed resource as handed over by the inspection source: its
/// identifier plus whatever attributes the query asked to include.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub identifier: String,
    #[serde(default)]
    pub attributes: Vec<WireAttribute>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireAttribute {
    pub name: String,
    pub value: WireValue,
}

/// Tagged-union wire value. The explicit null flag takes precedence over
/// the kind tag.
///
/// On the wire this is an object carrying `null` plus at most one kind
/// key (`string`, `double`, `long`, `boolean`, `list`, `map`). A kind
/// key this build does not know is skipped, leaving `kind` unset, the
/// same way an unknown field disappears from a protobuf oneof.
#[derive(Debug, Clone)]
pub struct WireValue {
    pub null: bool,
    pub kind: Option<WireKind>,
}

#[derive(Debug, Clone)]
pub enum WireKind {
    String(String),
    Double(f64),
    Long(i64),
    Boolean(bool),
    List(Vec<WireValue>),
    Map(Vec<WireMapEntry>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMapEntry {
    pub key: String,
    pub value: WireValue,
}

impl Serialize for WireValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("null", &self.null)?;
        match &self.kind {
            Some(WireKind::String(value)) => map.serialize_entry("string", value)?,
            Some(WireKind::Double(value)) => map.serialize_entry("double", value)?,
            Some(WireKind::Long(value)) => map.serialize_entry("long", value)?,
            Some(WireKind::Boolean(value)) => map.serialize_entry("boolean", value)?,
            Some(WireKind::List(items)) => map.serialize_entry("list", items)?,
            Some(WireKind::Map(entries)) => map.serialize_entry("map", entries)?,
            None => {}
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WireValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WireValueVisitor;

        impl<'de> Visitor<'de> for WireValueVisitor {
            type Value = WireValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a wire value object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<WireValue, A::Error> {
                let mut null = false;
                let mut kind = None;
                while let Some(key) = access.next_key::<String>()? {
                    match key.as_str() {
                        "null" => null = access.next_value()?,
                        "string" => kind = Some(WireKind::String(access.next_value()?)),
                        "double" => kind = Some(WireKind::Double(access.next_value()?)),
                        "long" => kind = Some(WireKind::Long(access.next_value()?)),
                        "boolean" => kind = Some(WireKind::Boolean(access.next_value()?)),
                        "list" => kind = Some(WireKind::List(access.next_value()?)),
                        "map" => kind = Some(WireKind::Map(access.next_value()?)),
                        _ => {
                            access.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(WireValue { null, kind })
            }
        }

        deserializer.deserialize_map(WireValueVisitor)
    }
}

impl WireValue {
    pub fn null() -> Self {
        Self {
            null: true,
            kind: None,
        }
    }

    /// A value whose kind was never set, or was produced under a schema
    /// this build does not know.
    pub fn unset() -> Self {
        Self {
            null: false,
            kind: None,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::of(WireKind::String(value.into()))
    }

    pub fn double(value: f64) -> Self {
        Self::of(WireKind::Double(value))
    }

    pub fn long(value: i64) -> Self {
        Self::of(WireKind::Long(value))
    }

    pub fn boolean(value: bool) -> Self {
        Self::of(WireKind::Boolean(value))
    }

    pub fn list(items: Vec<WireValue>) -> Self {
        Self::of(WireKind::List(items))
    }

    pub fn map(entries: Vec<WireMapEntry>) -> Self {
        Self::of(WireKind::Map(entries))
    }

    fn of(kind: WireKind) -> Self {
        Self {
            null: false,
            kind: Some(kind),
        }
    }
}

impl WireMapEntry {
    pub fn new(key: impl Into<String>, value: WireValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_map_sorts_case_insensitively() {
        let mut map = AttributeMap::new();
        map.insert("Zeta".to_string(), AttributeValue::Long(1));
        map.insert("apple".to_string(), AttributeValue::Long(2));
        map.insert("Bar".to_string(), AttributeValue::Long(3));

        let names: Vec<&str> = map.names().collect();
        assert_eq!(names, vec!["apple", "Bar", "Zeta"]);
    }

    #[test]
    fn test_attribute_map_collapses_case_variant_duplicates() {
        let mut map = AttributeMap::new();
        map.insert("HeapUsage".to_string(), AttributeValue::Long(1));
        map.insert("heapusage".to_string(), AttributeValue::Long(2));

        assert_eq!(map.len(), 1);
        // last value wins, first-seen spelling is kept
        assert_eq!(map.get("HeapUsage"), Some(&AttributeValue::Long(2)));
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["HeapUsage"]);
    }

    #[test]
    fn test_attribute_map_serializes_in_sorted_order() {
        let mut map = AttributeMap::new();
        map.insert("b".to_string(), AttributeValue::Boolean(true));
        map.insert("A".to_string(), AttributeValue::Null);

        let text = serde_json::to_string(&map).unwrap();
        assert_eq!(text, r#"{"A":null,"b":true}"#);
    }

    #[test]
    fn test_attribute_value_serializes_without_type_wrapper() {
        assert_eq!(
            serde_json::to_value(AttributeValue::Null).unwrap(),
            json!(null)
        );
        assert_eq!(
            serde_json::to_value(AttributeValue::String("x".to_string())).unwrap(),
            json!("x")
        );
        assert_eq!(
            serde_json::to_value(AttributeValue::Double(1.5)).unwrap(),
            json!(1.5)
        );
        assert_eq!(
            serde_json::to_value(AttributeValue::Long(-7)).unwrap(),
            json!(-7)
        );
        assert_eq!(
            serde_json::to_value(AttributeValue::List(vec![
                AttributeValue::Long(1),
                AttributeValue::Null,
            ]))
            .unwrap(),
            json!([1, null])
        );
    }

    #[test]
    fn test_wire_value_round_trips_through_json() {
        let value = WireValue::list(vec![
            WireValue::long(42),
            WireValue::map(vec![WireMapEntry::new("k", WireValue::string("v"))]),
        ]);
        let text = serde_json::to_string(&value).unwrap();
        let back: WireValue = serde_json::from_str(&text).unwrap();
        assert!(!back.null);
        match back.kind {
            Some(WireKind::List(items)) => assert_eq!(items.len(), 2),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_wire_value_unrecognized_kind_deserializes_as_unset() {
        let value: WireValue =
            serde_json::from_str(r#"{"null":false,"timestamp":123}"#).unwrap();
        assert!(value.kind.is_none());
        assert!(!value.null);
    }

    #[test]
    fn test_wire_value_null_flag_survives_round_trip() {
        let text = serde_json::to_string(&WireValue::null()).unwrap();
        assert_eq!(text, r#"{"null":true}"#);
        let back: WireValue = serde_json::from_str(&text).unwrap();
        assert!(back.null);
        assert!(back.kind.is_none());
    }
}
