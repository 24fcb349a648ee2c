//! Field rules shared by the candidate and section payloads.
//!
//! Each rule is exposed as a `custom` validator function so the derive on
//! the payload structs collects every failing field in one pass.

use std::collections::BTreeMap;
use std::str::FromStr;

use validator::{ValidateEmail, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::models::candidate::{CandidateStatus, Gender};

/// Message of the `required` rule; the derive attributes repeat it verbatim.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Named validation failures reported by the transfer layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileRule {
    ExperienceNegative,
    InvalidGender,
    InvalidChoice,
    Blank,
    InvalidUrl,
    InvalidEmail,
    UnknownCandidate,
    Required,
}

impl ProfileRule {
    pub fn code(self) -> &'static str {
        match self {
            ProfileRule::ExperienceNegative => "experience_negative",
            ProfileRule::InvalidGender => "invalid_gender",
            ProfileRule::InvalidChoice => "invalid_choice",
            ProfileRule::Blank => "blank",
            ProfileRule::InvalidUrl => "invalid_url",
            ProfileRule::InvalidEmail => "invalid_email",
            ProfileRule::UnknownCandidate => "does_not_exist",
            ProfileRule::Required => "required",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ProfileRule::ExperienceNegative => "Experience cannot be negative",
            ProfileRule::InvalidGender => "Invalid gender choice",
            ProfileRule::InvalidChoice => "Not a valid choice.",
            ProfileRule::Blank => "This field may not be blank.",
            ProfileRule::InvalidUrl => "Enter a valid URL.",
            ProfileRule::InvalidEmail => "Enter a valid email address.",
            ProfileRule::UnknownCandidate => "Candidate does not exist.",
            ProfileRule::Required => REQUIRED_MESSAGE,
        }
    }

    pub fn error(self) -> ValidationError {
        let mut error = ValidationError::new(self.code());
        error.message = Some(self.message().into());
        error
    }
}

/// A single-field error set, for failures detected outside the derive.
pub fn field_error(field: &'static str, rule: ProfileRule) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, rule.error());
    errors
}

pub fn validate_experience(value: f64) -> Result<(), ValidationError> {
    if value < 0.0 {
        return Err(ProfileRule::ExperienceNegative.error());
    }
    Ok(())
}

/// Guard kept in front of the `Gender` parse; blank means "not supplied".
pub fn validate_gender(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && !Gender::CHOICES.contains(&value) {
        return Err(ProfileRule::InvalidGender.error());
    }
    Ok(())
}

pub fn validate_status(value: &str) -> Result<(), ValidationError> {
    CandidateStatus::from_str(value)
        .map(|_| ())
        .map_err(|_| ProfileRule::InvalidChoice.error())
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ProfileRule::Blank.error());
    }
    Ok(())
}

pub fn url_or_blank(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    let valid = url::Url::parse(value)
        .map(|parsed| {
            matches!(parsed.scheme(), "http" | "https" | "ftp" | "ftps")
                && parsed.host_str().is_some()
        })
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(ProfileRule::InvalidUrl.error())
    }
}

pub fn email_or_blank(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(ProfileRule::InvalidEmail.error())
    }
}

/// Presence check for fields the derive could not see; a miss is recorded
/// under `field` as `required`.
pub fn require<T>(field: &'static str, value: Option<T>, errors: &mut ValidationErrors) -> Option<T> {
    if value.is_none() {
        errors.add(field, ProfileRule::Required.error());
    }
    value
}

/// Type-level choice parse; failures land in `errors` under `field`.
pub fn parse_choice<T: FromStr>(
    field: &'static str,
    rule: ProfileRule,
    value: Option<String>,
    errors: &mut ValidationErrors,
) -> Option<T> {
    let raw = value?;
    match raw.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.add(field, rule.error());
            None
        }
    }
}

/// Flattens nested validator output into `field -> messages`, with
/// list entries addressed as `projects[0].title`.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    collect_messages(None, errors, &mut out);
    out
}

fn collect_messages(
    prefix: Option<&str>,
    errors: &ValidationErrors,
    out: &mut BTreeMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let key = match prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages = out.entry(key).or_default();
                for error in list {
                    messages.push(
                        error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| error.code.to_string()),
                    );
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(Some(&key), nested, out),
            ValidationErrorsKind::List(entries) => {
                for (index, nested) in entries {
                    let entry_key = format!("{}[{}]", key, index);
                    collect_messages(Some(&entry_key), nested, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_rejects_only_negative_values() {
        assert!(validate_experience(0.0).is_ok());
        assert!(validate_experience(12.5).is_ok());
        let err = validate_experience(-0.5).unwrap_err();
        assert_eq!(err.code, "experience_negative");
    }

    #[test]
    fn gender_guard_accepts_blank_and_known_choices() {
        for ok in ["", "M", "F", "O"] {
            assert!(validate_gender(ok).is_ok(), "{ok} should pass");
        }
        for bad in ["m", "X", "male", " "] {
            assert_eq!(validate_gender(bad).unwrap_err().code, "invalid_gender");
        }
    }

    #[test]
    fn urls_must_carry_a_web_scheme_and_host() {
        assert!(url_or_blank("").is_ok());
        assert!(url_or_blank("https://github.com/jane").is_ok());
        assert!(url_or_blank("ftp://files.example.org/cv.pdf").is_ok());
        assert!(url_or_blank("mailto:jane@example.com").is_err());
        assert!(url_or_blank("github.com/jane").is_err());
    }

    #[test]
    fn email_allows_blank() {
        assert!(email_or_blank("").is_ok());
        assert!(email_or_blank("jane@example.com").is_ok());
        assert!(email_or_blank("jane@").is_err());
    }

    #[test]
    fn status_must_be_a_known_choice() {
        assert!(validate_status("active").is_ok());
        assert!(validate_status("suspended").is_ok());
        assert_eq!(validate_status("archived").unwrap_err().code, "invalid_choice");
    }

    #[test]
    fn field_errors_render_their_messages() {
        let errors = field_error("candidate_id", ProfileRule::UnknownCandidate);
        let messages = field_messages(&errors);
        assert_eq!(
            messages.get("candidate_id").map(Vec::as_slice),
            Some(&["Candidate does not exist.".to_string()][..])
        );
    }

    #[test]
    fn require_records_missing_values_only() {
        let mut errors = ValidationErrors::new();
        assert_eq!(require("user_id", Some(4), &mut errors), Some(4));
        assert!(errors.is_empty());
        assert_eq!(require::<i64>("user_id", None, &mut errors), None);
        assert_eq!(field_messages(&errors)["user_id"], vec![REQUIRED_MESSAGE]);
    }

    #[test]
    fn choice_parse_records_the_given_rule() {
        let mut errors = ValidationErrors::new();
        let parsed: Option<Gender> =
            parse_choice("gender", ProfileRule::InvalidGender, Some("Q".into()), &mut errors);
        assert!(parsed.is_none());
        assert_eq!(field_messages(&errors)["gender"], vec!["Invalid gender choice"]);

        let mut errors = ValidationErrors::new();
        let parsed: Option<CandidateStatus> =
            parse_choice("status", ProfileRule::InvalidChoice, Some("active".into()), &mut errors);
        assert_eq!(parsed, Some(CandidateStatus::Active));
        assert!(errors.is_empty());
    }
}
