//! Per-field validation messages.

use std::collections::HashMap;

use serde::Serialize;

/// Validation messages keyed by field name.
///
/// Each field keeps its messages in the order they were added; the first one
/// is what [`get`](Errors::get) shows next to the input. A field with no
/// entry has no errors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Errors(HashMap<String, Vec<String>>);

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `message` to the messages already recorded for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_owned()).or_default().push(message.into());
    }

    /// First message recorded for `field`, or `""`.
    pub fn get(&self, field: &str) -> &str {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map_or("", String::as_str)
    }

    /// Every message recorded for `field`, oldest first.
    pub fn all(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Drops every message for `field`, returning them.
    pub fn remove(&mut self, field: &str) -> Option<Vec<String>> {
        self.0.remove(field)
    }

    /// Number of fields with at least one message.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_appends_in_order() {
        let mut errors = Errors::new();

        errors.add("name", "invalid");
        errors.add("name", "length error");

        assert_eq!(errors.all("name"), ["invalid", "length error"]);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn get_returns_first_message_or_empty() {
        let mut errors = Errors::new();
        assert_eq!(errors.get("name"), "");

        errors.add("name", "invalid");
        errors.add("name", "length error");

        assert_eq!(errors.get("name"), "invalid");
        assert_eq!(errors.get("email"), "");
    }

    #[test]
    fn remove_clears_field() {
        let mut errors = Errors::new();
        errors.add("email", "This field cannot be blank");

        assert_eq!(errors.remove("email"), Some(vec!["This field cannot be blank".to_owned()]));
        assert!(errors.is_empty());
        assert_eq!(errors.remove("email"), None);
    }
}
