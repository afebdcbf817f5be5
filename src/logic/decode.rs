use std::collections::HashMap;

use crate::error::InspectError;
use crate::model::value::{AttributeMap, AttributeValue, WireAttribute, WireKind, WireValue};

/// Decode a full attribute batch into the case-insensitively sorted map
/// attached to an expanded leaf. Any unknown kind inside the batch fails
/// the whole decode; there is no partial map.
pub fn decode_attributes(attributes: &[WireAttribute]) -> Result<AttributeMap, InspectError> {
    let mut map = AttributeMap::new();
    for attribute in attributes {
        map.insert(attribute.name.clone(), decode_value(&attribute.value)?);
    }
    Ok(map)
}

/// Decode one wire value, recursively for lists and maps. The explicit
/// null flag wins over the kind tag.
pub fn decode_value(value: &WireValue) -> Result<AttributeValue, InspectError> {
    if value.null {
        return Ok(AttributeValue::Null);
    }
    match &value.kind {
        Some(WireKind::String(text)) => Ok(AttributeValue::String(text.clone())),
        Some(WireKind::Double(number)) => Ok(AttributeValue::Double(*number)),
        Some(WireKind::Long(number)) => Ok(AttributeValue::Long(*number)),
        Some(WireKind::Boolean(flag)) => Ok(AttributeValue::Boolean(*flag)),
        Some(WireKind::List(items)) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                list.push(decode_value(item)?);
            }
            Ok(AttributeValue::List(list))
        }
        Some(WireKind::Map(entries)) => {
            // nested map keys are taken verbatim, no case folding here
            let mut map = HashMap::with_capacity(entries.len());
            for entry in entries {
                map.insert(entry.key.clone(), decode_value(&entry.value)?);
            }
            Ok(AttributeValue::Map(map))
        }
        None => Err(InspectError::UnknownValueKind(
            "value kind not set".to_string(),
        )),
    }
}
