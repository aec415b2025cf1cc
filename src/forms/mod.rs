//! Form validation.
//!
//! A [`Form`] wraps the values of one submission and collects
//! [`Errors`] as rules are applied to its fields. Rules are independent:
//! call whichever apply, in any order. A failing rule appends one message to
//! its field and never replaces an earlier one.
//!
//! ```rust
//! use stitch::forms::{EMAIL_RX, FieldValues, Form};
//!
//! let values = FieldValues::parse(b"email=alice%40example.com&password=pa55&expires=7").unwrap();
//! let mut form = Form::new(values);
//!
//! form.required("email")
//!     .required("password")
//!     .matches_pattern("email", &EMAIL_RX)
//!     .min_length("password", 10)
//!     .permitted_values("expires", &["365", "7", "1"]);
//!
//! assert!(!form.valid());
//! assert_eq!(form.errors().get("password"), "This field is too short (minimum is 10 characters)");
//! assert_eq!(form.errors().get("email"), "");
//! ```

mod errors;

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::Error;
use crate::request::Request;

pub use errors::Errors;

/// Loose email shape check (the WHATWG `input[type=email]` pattern).
pub static EMAIL_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

// ── FieldValues ───────────────────────────────────────────────────────────────

/// Submitted values keyed by field name. A field may repeat (checkboxes,
/// multi-selects); the first value is the one rules look at.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldValues(HashMap<String, Vec<String>>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an `application/x-www-form-urlencoded` body.
    pub fn parse(body: &[u8]) -> Result<Self, Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
        Ok(pairs.into_iter().collect())
    }

    /// Appends `value` to `field`.
    pub fn add(&mut self, field: &str, value: impl Into<String>) {
        self.0.entry(field.to_owned()).or_default().push(value.into());
    }

    /// First value of `field`, or `""` when the field was not submitted.
    pub fn get(&self, field: &str) -> &str {
        self.0
            .get(field)
            .and_then(|values| values.first())
            .map_or("", String::as_str)
    }

    /// Every value submitted for `field`.
    pub fn get_all(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

impl FromIterator<(String, String)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (field, value) in iter {
            values.add(&field, value);
        }
        values
    }
}

// ── Form ──────────────────────────────────────────────────────────────────────

/// One submission plus the validation errors found in it so far.
///
/// Scoped to a single request: create it, run rules, check [`valid`](Form::valid),
/// then render it back into the page or act on it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Form {
    values: FieldValues,
    errors: Errors,
}

impl Form {
    pub fn new(values: FieldValues) -> Self {
        Self { values, errors: Errors::new() }
    }

    /// Decodes the request body as a URL-encoded form.
    pub fn from_request(req: &Request) -> Result<Self, Error> {
        FieldValues::parse(req.body()).map(Self::new)
    }

    pub fn values(&self) -> &FieldValues { &self.values }
    pub fn errors(&self) -> &Errors { &self.errors }
    pub fn errors_mut(&mut self) -> &mut Errors { &mut self.errors }

    /// First submitted value of `field`, or `""`.
    pub fn get(&self, field: &str) -> &str {
        self.values.get(field)
    }

    /// `true` when no rule has failed.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fails when `field` is missing or only whitespace.
    pub fn required(&mut self, field: &str) -> &mut Self {
        if self.values.get(field).trim().is_empty() {
            self.errors.add(field, "This field cannot be blank");
        }
        self
    }

    /// Fails when `field` has more than `max` characters.
    pub fn max_length(&mut self, field: &str, max: usize) -> &mut Self {
        let value = self.values.get(field);
        if value.chars().count() > max {
            self.errors.add(field, format!("This field is too long (maximum is {max} characters)"));
        }
        self
    }

    /// Fails when `field` has fewer than `min` characters. An absent field
    /// counts as empty.
    pub fn min_length(&mut self, field: &str, min: usize) -> &mut Self {
        let value = self.values.get(field);
        if value.chars().count() < min {
            self.errors.add(field, format!("This field is too short (minimum is {min} characters)"));
        }
        self
    }

    /// Fails when `field` is not one of `allowed`, including when it is
    /// empty or absent and `""` is not allowed.
    pub fn permitted_values(&mut self, field: &str, allowed: &[&str]) -> &mut Self {
        let value = self.values.get(field);
        if !allowed.iter().any(|&option| option == value) {
            self.errors.add(
                field,
                format!("This field is invalid. Permitted [{}]", allowed.join(" ")),
            );
        }
        self
    }

    /// Fails when `field` does not match `pattern`. An absent field is
    /// matched as `""`.
    pub fn matches_pattern(&mut self, field: &str, pattern: &Regex) -> &mut Self {
        let value = self.values.get(field);
        if !pattern.is_match(value) {
            self.errors.add(field, "This field is invalid");
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> Form {
        Form::new(pairs.iter().map(|&(k, v)| (k.to_owned(), v.to_owned())).collect())
    }

    #[test]
    fn new_form_has_no_errors() {
        let form = form(&[("name", "john")]);

        assert!(form.valid());
        assert_eq!(form.get("name"), "john");
    }

    #[test]
    fn required_flags_blank_fields_only() {
        let mut form = form(&[("name", "john"), ("email", "")]);

        form.required("email").required("name");

        assert_eq!(form.errors().get("email"), "This field cannot be blank");
        assert_eq!(form.errors().get("name"), "");
    }

    #[test]
    fn required_treats_whitespace_and_absence_as_blank() {
        let mut form = form(&[("title", " \t\n ")]);

        form.required("title").required("content");

        assert_eq!(form.errors().all("title"), ["This field cannot be blank"]);
        assert_eq!(form.errors().all("content"), ["This field cannot be blank"]);
    }

    #[test]
    fn required_appends_once_per_call() {
        let mut form = form(&[("email", "")]);

        form.required("email").required("email");

        assert_eq!(form.errors().all("email").len(), 2);
    }

    #[test]
    fn max_length_boundary() {
        let mut form = form(&[("name", "john"), ("nickname", "xxxxxxxxxxxxxxx"), ("exact", "xxxxxxxxxx")]);

        form.max_length("nickname", 10).max_length("exact", 10);

        assert_eq!(form.errors().get("nickname"), "This field is too long (maximum is 10 characters)");
        assert_eq!(form.errors().get("exact"), "");
        assert_eq!(form.errors().get("name"), "");
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let mut form = form(&[("city", "Zürich")]);

        form.max_length("city", 6).min_length("city", 6);

        assert!(form.valid());
    }

    #[test]
    fn min_length_boundary() {
        let mut form = form(&[("name", "john"), ("nickname", "xxxx")]);

        form.min_length("nickname", 5);

        assert_eq!(form.errors().get("nickname"), "This field is too short (minimum is 5 characters)");
        assert_eq!(form.errors().get("name"), "");
    }

    #[test]
    fn permitted_values_lists_allowed_set() {
        let mut form = form(&[("sex", "female"), ("occupation", "student")]);

        form.permitted_values("sex", &["male", "female"])
            .permitted_values("occupation", &["software engineer", "data analyst"]);

        assert_eq!(form.errors().get("sex"), "");
        assert_eq!(
            form.errors().get("occupation"),
            "This field is invalid. Permitted [software engineer data analyst]",
        );
    }

    #[test]
    fn matches_pattern_with_email_rx() {
        let mut form = form(&[("email", "john@test.com"), ("alternative email", "john@")]);

        form.matches_pattern("email", &EMAIL_RX)
            .matches_pattern("alternative email", &EMAIL_RX);

        assert_eq!(form.errors().get("email"), "");
        assert_eq!(form.errors().get("alternative email"), "This field is invalid");
    }

    #[test]
    fn rules_accumulate_on_one_field() {
        let mut form = form(&[("password", "short")]);

        form.min_length("password", 10)
            .matches_pattern("password", &Regex::new(r"\d").unwrap());

        assert_eq!(
            form.errors().all("password"),
            ["This field is too short (minimum is 10 characters)", "This field is invalid"],
        );
    }

    #[test]
    fn min_length_fails_on_empty_and_absent_fields() {
        let mut form = form(&[("nickname", "")]);

        form.min_length("nickname", 5).min_length("absent", 5);

        assert_eq!(form.errors().get("nickname"), "This field is too short (minimum is 5 characters)");
        assert_eq!(form.errors().get("absent"), "This field is too short (minimum is 5 characters)");
    }

    #[test]
    fn permitted_values_rejects_empty() {
        let mut form = form(&[("occupation", "")]);

        form.permitted_values("occupation", &["a", "b"])
            .permitted_values("absent", &["a", "b"])
            .permitted_values("optional", &["", "a"]);

        assert_eq!(form.errors().get("occupation"), "This field is invalid. Permitted [a b]");
        assert_eq!(form.errors().get("absent"), "This field is invalid. Permitted [a b]");
        assert_eq!(form.errors().get("optional"), "");
    }

    #[test]
    fn matches_pattern_rejects_empty() {
        let zip = Regex::new(r"^\d{5}$").unwrap();
        let mut form = form(&[("zip", "")]);

        form.matches_pattern("zip", &zip).matches_pattern("absent", &zip);

        assert_eq!(form.errors().get("zip"), "This field is invalid");
        assert_eq!(form.errors().get("absent"), "This field is invalid");
    }

    #[test]
    fn max_length_passes_empty() {
        let mut form = form(&[("title", "")]);

        form.max_length("title", 10).max_length("absent", 10);

        assert!(form.valid());
    }

    #[test]
    fn every_rule_fails_an_empty_submission() {
        let mut form = form(&[("nickname", ""), ("occupation", ""), ("zip", "")]);

        form.min_length("nickname", 5)
            .min_length("absent", 5)
            .permitted_values("occupation", &["a", "b"])
            .matches_pattern("zip", &Regex::new(r"^\d{5}$").unwrap());

        assert!(!form.valid());
        assert_eq!(form.errors().len(), 4);
    }

    #[test]
    fn valid_flips_when_errors_removed() {
        let mut form = form(&[("name", "john"), ("email", "")]);

        form.required("name").required("email");
        assert!(!form.valid());

        form.errors_mut().remove("email");
        assert!(form.valid());
    }

    #[test]
    fn parse_decodes_urlencoded_body() {
        let values = FieldValues::parse(b"title=O+snail&tags=a&tags=b&content=%C3%A9").unwrap();

        assert_eq!(values.get("title"), "O snail");
        assert_eq!(values.get_all("tags"), ["a", "b"]);
        assert_eq!(values.get("content"), "é");
        assert!(!values.contains("expires"));
    }

    #[test]
    fn from_request_reads_body() {
        let req = Request::builder().body("name=john&email=").build();

        let form = Form::from_request(&req).unwrap();

        assert_eq!(form.get("name"), "john");
        assert!(form.values().contains("email"));
    }
}
