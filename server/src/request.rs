use indexmap::IndexMap;
use serde_json::Value;

use crate::error::BroadcastError;

/// How a leaf attribute's error label is rendered
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplayHint {
    /// Humanized attribute name followed by the raw message
    #[default]
    Default,
    /// Custom label prepended to the raw message
    Override(String),
    /// Raw message only, no label
    Suppressed,
}

/// One entry in a requested attribute set
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeRequest {
    /// A leaf attribute to evaluate against the error set
    Leaf(DisplayHint),
    /// Traversal into a nested association. For a one-to-many association
    /// the nested keys are collection indices (`"0"`, `"1"`, ...), each
    /// mapping to its own requested set; for a one-to-one association the
    /// nested set applies to the child directly.
    Branch(RequestedAttributes),
}

// RequestedAttributes

/// Insertion-ordered set of attributes and association branches to
/// broadcast. Traversal visits keys in the order they were requested.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestedAttributes {
    entries: IndexMap<String, AttributeRequest>,
}

impl RequestedAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a leaf attribute with the default label
    pub fn leaf(self, attribute: &str) -> Self {
        self.leaf_with(attribute, DisplayHint::Default)
    }

    /// Requests a leaf attribute with an explicit display hint
    pub fn leaf_with(mut self, attribute: &str, hint: DisplayHint) -> Self {
        self.entries
            .insert(attribute.to_string(), AttributeRequest::Leaf(hint));
        self
    }

    /// Requests traversal into a nested association. The key must carry
    /// the `_attributes` branch suffix (e.g. `"items_attributes"`).
    pub fn branch(mut self, key: &str, nested: RequestedAttributes) -> Self {
        self.entries
            .insert(key.to_string(), AttributeRequest::Branch(nested));
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttributeRequest> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeRequest)> {
        self.entries
            .iter()
            .map(|(key, request)| (key.as_str(), request))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// AttributesInput

/// The loosely-typed attributes argument accepted by
/// [`Broadcaster::broadcast_errors`](crate::Broadcaster::broadcast_errors).
///
/// Anything that is not a map, a sequence of attribute names, or a single
/// attribute name is rejected with a descriptive
/// [`BroadcastError::InvalidAttributes`] before any traversal begins.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributesInput {
    /// A single attribute name
    Single(String),
    /// An ordered sequence of attribute names
    Many(Vec<String>),
    /// A fully-typed requested set
    Requested(RequestedAttributes),
    /// Untyped request parameters, e.g. deserialized form params
    Params(Value),
}

impl AttributesInput {
    /// Normalizes the input into a requested set, rejecting invalid shapes
    pub fn normalize(self) -> Result<RequestedAttributes, BroadcastError> {
        match self {
            AttributesInput::Single(name) => Ok(RequestedAttributes::new().leaf(&name)),
            AttributesInput::Many(names) => Ok(names
                .iter()
                .fold(RequestedAttributes::new(), |set, name| set.leaf(name))),
            AttributesInput::Requested(requested) => Ok(requested),
            AttributesInput::Params(value) => requested_from_value(&value),
        }
    }
}

impl From<&str> for AttributesInput {
    fn from(name: &str) -> Self {
        AttributesInput::Single(name.to_string())
    }
}

impl From<String> for AttributesInput {
    fn from(name: String) -> Self {
        AttributesInput::Single(name)
    }
}

impl From<Vec<String>> for AttributesInput {
    fn from(names: Vec<String>) -> Self {
        AttributesInput::Many(names)
    }
}

impl From<Vec<&str>> for AttributesInput {
    fn from(names: Vec<&str>) -> Self {
        AttributesInput::Many(names.iter().map(|name| name.to_string()).collect())
    }
}

impl From<RequestedAttributes> for AttributesInput {
    fn from(requested: RequestedAttributes) -> Self {
        AttributesInput::Requested(requested)
    }
}

impl From<Value> for AttributesInput {
    fn from(value: Value) -> Self {
        AttributesInput::Params(value)
    }
}

fn requested_from_value(value: &Value) -> Result<RequestedAttributes, BroadcastError> {
    match value {
        Value::String(name) => Ok(RequestedAttributes::new().leaf(name)),
        Value::Array(items) => {
            let mut names = Vec::new();
            flatten_names(items, &mut names)?;
            Ok(names
                .iter()
                .fold(RequestedAttributes::new(), |set, name| set.leaf(name)))
        }
        Value::Object(map) => {
            let mut requested = RequestedAttributes::new();
            for (key, entry) in map {
                let request = match entry {
                    Value::Null => AttributeRequest::Leaf(DisplayHint::Default),
                    Value::Bool(false) => AttributeRequest::Leaf(DisplayHint::Suppressed),
                    Value::String(label) if label.is_empty() => {
                        AttributeRequest::Leaf(DisplayHint::Default)
                    }
                    Value::String(label) => {
                        AttributeRequest::Leaf(DisplayHint::Override(label.clone()))
                    }
                    Value::Object(_) => AttributeRequest::Branch(requested_from_value(entry)?),
                    other => {
                        return Err(BroadcastError::InvalidAttributes {
                            reason: format!(
                                "value {other} under key {key:?} is not a display hint or a nested attribute map"
                            ),
                        })
                    }
                };
                requested.entries.insert(key.clone(), request);
            }
            Ok(requested)
        }
        other => Err(BroadcastError::InvalidAttributes {
            reason: format!("got {other}; expected a map, sequence, or attribute name"),
        }),
    }
}

fn flatten_names(items: &[Value], names: &mut Vec<String>) -> Result<(), BroadcastError> {
    for item in items {
        match item {
            Value::String(name) => names.push(name.clone()),
            Value::Array(nested) => flatten_names(nested, names)?,
            other => {
                return Err(BroadcastError::InvalidAttributes {
                    reason: format!("sequence element {other} is not an attribute name"),
                })
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_name_becomes_one_leaf() {
        let requested = AttributesInput::from("email").normalize().unwrap();
        assert_eq!(requested.len(), 1);
        assert_eq!(
            requested.get("email"),
            Some(&AttributeRequest::Leaf(DisplayHint::Default))
        );
    }

    #[test]
    fn nested_sequences_are_flattened_in_order() {
        let requested = AttributesInput::Params(json!(["name", ["email", "age"]]))
            .normalize()
            .unwrap();
        let keys: Vec<&str> = requested.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["name", "email", "age"]);
    }

    #[test]
    fn map_values_become_display_hints_and_branches() {
        let requested = AttributesInput::Params(json!({
            "name": null,
            "email": "Your email",
            "age": false,
            "items_attributes": {"0": {"quantity": null}},
        }))
        .normalize()
        .unwrap();

        assert_eq!(
            requested.get("name"),
            Some(&AttributeRequest::Leaf(DisplayHint::Default))
        );
        assert_eq!(
            requested.get("email"),
            Some(&AttributeRequest::Leaf(DisplayHint::Override(
                "Your email".to_string()
            )))
        );
        assert_eq!(
            requested.get("age"),
            Some(&AttributeRequest::Leaf(DisplayHint::Suppressed))
        );
        match requested.get("items_attributes") {
            Some(AttributeRequest::Branch(nested)) => {
                assert!(nested.get("0").is_some());
            }
            other => panic!("Expected a branch, got {other:?}"),
        }
    }
}
