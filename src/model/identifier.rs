use crate::error::InspectError;

/// A resource identifier split into its tree-path components.
///
/// Identifiers look like `domain:key1=val1,key2=val2`. Only the property
/// values participate in path construction; the keys are discarded. The
/// final value names the leaf, so there is always at least one.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIdentifier {
    pub domain: String,
    pub property_values: Vec<String>,
}

impl ParsedIdentifier {
    /// Split an identifier into domain and ordered property values.
    ///
    /// The split is naive: the identifier format has no escaping, so a
    /// `:`, `,` or `=` inside a value is a limitation of the format
    /// itself, not something this parser recovers from. A value keeps
    /// everything after the first `=` of its segment.
    pub fn parse(identifier: &str) -> Result<Self, InspectError> {
        let (domain, properties) = identifier
            .split_once(':')
            .ok_or_else(|| InspectError::MalformedIdentifier(identifier.to_string()))?;
        if domain.is_empty() {
            return Err(InspectError::MalformedIdentifier(identifier.to_string()));
        }
        let mut property_values = Vec::new();
        for segment in properties.split(',') {
            let (_key, value) = segment
                .split_once('=')
                .ok_or_else(|| InspectError::MalformedIdentifier(identifier.to_string()))?;
            property_values.push(value.to_string());
        }
        Ok(Self {
            domain: domain.to_string(),
            property_values,
        })
    }
}
