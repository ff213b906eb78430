use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Validation errors recorded against a model's attributes.
///
/// Owned and populated by the model/validation collaborator; the broadcast
/// engine only reads it. Maps each invalid attribute to an ordered,
/// non-empty list of human-readable messages. Absence of a key means the
/// attribute is currently valid. Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSet {
    messages: IndexMap<String, Vec<String>>,
}

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against an attribute, preserving the order in
    /// which messages were added
    pub fn add(&mut self, attribute: &str, message: &str) {
        self.messages
            .entry(attribute.to_string())
            .or_default()
            .push(message.to_string());
    }

    /// All messages recorded against an attribute, oldest first
    pub fn messages_for(&self, attribute: &str) -> Option<&[String]> {
        self.messages
            .get(attribute)
            .filter(|list| !list.is_empty())
            .map(|list| list.as_slice())
    }

    /// The first message recorded against an attribute
    pub fn first_message(&self, attribute: &str) -> Option<&str> {
        self.messages_for(attribute)
            .and_then(|list| list.first())
            .map(|message| message.as_str())
    }

    /// Whether any attribute currently holds an error
    pub fn any(&self) -> bool {
        self.messages.values().any(|list| !list.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        !self.any()
    }

    /// Removes all recorded errors
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Attributes holding at least one error, in insertion order
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(attribute, _)| attribute.as_str())
    }

    /// Default human rendering of an error: humanized attribute label
    /// followed by the raw message, e.g. `("first_name", "can't be blank")`
    /// renders as `"First name can't be blank"`.
    pub fn full_message(attribute: &str, message: &str) -> String {
        let label = humanize(attribute);
        if label.is_empty() {
            message.to_string()
        } else {
            format!("{label} {message}")
        }
    }
}

/// Rails-convention humanization: a trailing `_id` is stripped,
/// underscores become spaces, the first letter is upper-cased.
fn humanize(attribute: &str) -> String {
    let base = attribute.strip_suffix("_id").unwrap_or(attribute);
    let spaced = base.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_attribute_is_valid() {
        let errors = ErrorSet::new();
        assert!(errors.is_empty());
        assert!(errors.messages_for("email").is_none());
    }

    #[test]
    fn messages_keep_insertion_order() {
        let mut errors = ErrorSet::new();
        errors.add("quantity", "must be positive");
        errors.add("email", "can't be blank");
        errors.add("quantity", "must be an integer");

        let attributes: Vec<&str> = errors.attributes().collect();
        assert_eq!(attributes, vec!["quantity", "email"]);
        assert_eq!(errors.first_message("quantity"), Some("must be positive"));
        assert_eq!(
            errors.messages_for("quantity").map(|list| list.len()),
            Some(2)
        );
    }

    #[test]
    fn full_message_humanizes_the_attribute() {
        assert_eq!(
            ErrorSet::full_message("first_name", "can't be blank"),
            "First name can't be blank"
        );
        assert_eq!(
            ErrorSet::full_message("author_id", "must exist"),
            "Author must exist"
        );
    }
}
