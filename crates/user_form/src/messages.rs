//! Error message resolver.
//!
//! Error codes are turned into display strings through a closed `match` per input,
//! so the set of messages cannot drift from the set of codes.
//!
//! Two resolution modes exist: `All` concatenates every message in code order (names),
//! `First` keeps only the first resolved message (email address, each phone entry).
//! The email behavior is the historical default; `FormConfig::email_messages` can
//! switch it to `All`.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::field::Field;
use crate::user_info::FieldId;
use crate::validation::{ErrorCode, ErrorSet};

/// How multiple failing codes are turned into one string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageMode {
    /// Keep only the first resolved message.
    #[default]
    First,
    /// Concatenate all messages in code order.
    All,
}

/// Message table for a tracked input. `None` means "no message configured".
pub fn message_for(field: FieldId, code: ErrorCode) -> Option<&'static str> {
    match (field, code) {
        (FieldId::FirstName, ErrorCode::Required) => Some("First Name field is required "),
        (FieldId::FirstName, ErrorCode::MinLength) => Some("First Name must be 3 characters long"),
        (FieldId::FirstName, ErrorCode::MaxLength) => {
            Some("First Name must be at most 50 characters long")
        }

        (FieldId::LastName, ErrorCode::Required) => Some("Last Name field is required "),
        (FieldId::LastName, ErrorCode::MinLength) => Some("Last Name must be 3 characters long"),
        (FieldId::LastName, ErrorCode::MaxLength) => {
            Some("Last Name must be at most 50 characters long")
        }

        (FieldId::EmailAddress, ErrorCode::Required) => Some("Email Address is a required "),
        (FieldId::EmailAddress, ErrorCode::MinLength) => {
            Some("Email Address must be 8 characters long")
        }
        (FieldId::EmailAddress, ErrorCode::Pattern) => Some("Please enter valid email address"),

        (FieldId::PhoneNumbers, ErrorCode::Required) => Some("Phone Number is required "),
        (FieldId::PhoneNumbers, ErrorCode::MinLength) => {
            Some("Phone Number must be 10 digits long")
        }

        _ => None,
    }
}

/// Message for the email group's cross-field rule.
pub fn email_group_message(code: ErrorCode) -> Option<&'static str> {
    match code {
        ErrorCode::Unmatch => Some("Email Address and Confirm Email do not match"),
        _ => None,
    }
}

/// Default resolution mode per input.
pub fn default_mode(field: FieldId) -> MessageMode {
    match field {
        FieldId::EmailAddress | FieldId::PhoneNumbers => MessageMode::First,
        FieldId::FirstName | FieldId::LastName => MessageMode::All,
    }
}

/// Resolve a set of codes through `table`. Unknown codes contribute nothing.
pub fn resolve_with(
    table: impl Fn(ErrorCode) -> Option<&'static str>,
    errors: &ErrorSet,
    mode: MessageMode,
) -> String {
    let mut messages = errors.iter().filter_map(table);
    match mode {
        MessageMode::First => messages.next().unwrap_or_default().to_string(),
        MessageMode::All => messages.collect::<Vec<_>>().join(""),
    }
}

/// Resolve the codes of a tracked input.
pub fn resolve(field: FieldId, errors: &ErrorSet, mode: MessageMode) -> String {
    resolve_with(|code| message_for(field, code), errors, mode)
}

/// The string to display for `field`: empty until the user interacted with it.
pub fn display(id: FieldId, field: &Field, mode: MessageMode) -> String {
    if !field.is_interacted() {
        return String::new();
    }
    resolve(id, &field.errors(), mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Rule;
    use pretty_assertions::assert_eq;

    fn set(codes: &[ErrorCode]) -> ErrorSet {
        codes.iter().copied().collect()
    }

    #[test]
    fn empty_set_resolves_to_empty_string() {
        for id in [FieldId::FirstName, FieldId::EmailAddress] {
            assert_eq!(resolve(id, &ErrorSet::new(), MessageMode::All), "");
            assert_eq!(resolve(id, &ErrorSet::new(), MessageMode::First), "");
        }
    }

    #[test]
    fn required_resolves_to_configured_message() {
        assert_eq!(
            resolve(FieldId::FirstName, &set(&[ErrorCode::Required]), MessageMode::All),
            "First Name field is required "
        );
        assert_eq!(
            resolve(FieldId::EmailAddress, &set(&[ErrorCode::Required]), MessageMode::First),
            "Email Address is a required "
        );
    }

    #[test]
    fn all_mode_concatenates_in_set_order() {
        let errors = set(&[ErrorCode::MinLength, ErrorCode::Pattern]);
        assert_eq!(
            resolve(FieldId::EmailAddress, &errors, MessageMode::All),
            "Email Address must be 8 characters longPlease enter valid email address"
        );
    }

    #[test]
    fn first_mode_keeps_first_message_only() {
        let errors = set(&[ErrorCode::MinLength, ErrorCode::Pattern]);
        assert_eq!(
            resolve(FieldId::EmailAddress, &errors, MessageMode::First),
            "Email Address must be 8 characters long"
        );
    }

    #[test]
    fn unknown_codes_contribute_nothing() {
        let errors = set(&[ErrorCode::Pattern, ErrorCode::MinLength]);
        assert_eq!(
            resolve(FieldId::FirstName, &errors, MessageMode::All),
            "First Name must be 3 characters long"
        );
        // No message for the first code: `First` skips to the next resolvable one.
        assert_eq!(
            resolve(FieldId::FirstName, &errors, MessageMode::First),
            "First Name must be 3 characters long"
        );
        assert_eq!(
            resolve(FieldId::LastName, &set(&[ErrorCode::Unmatch]), MessageMode::All),
            ""
        );
    }

    #[test]
    fn display_waits_for_interaction() {
        let mut field = Field::new("firstName").rules_from([Rule::Required, Rule::MinLength(3)]);
        assert_eq!(display(FieldId::FirstName, &field, MessageMode::All), "");

        field.touch();
        assert_eq!(
            display(FieldId::FirstName, &field, MessageMode::All),
            "First Name field is required "
        );

        let mut edited = Field::new("firstName").rules_from([Rule::Required, Rule::MinLength(3)]);
        edited.set_value("Al");
        assert_eq!(
            display(FieldId::FirstName, &edited, MessageMode::All),
            "First Name must be 3 characters long"
        );
    }

    #[test]
    fn default_modes_per_input() {
        assert_eq!(default_mode(FieldId::FirstName), MessageMode::All);
        assert_eq!(default_mode(FieldId::LastName), MessageMode::All);
        assert_eq!(default_mode(FieldId::EmailAddress), MessageMode::First);
        assert_eq!(default_mode(FieldId::PhoneNumbers), MessageMode::First);
    }

    #[test]
    fn group_message_covers_unmatch() {
        let errors = set(&[ErrorCode::Unmatch]);
        assert_eq!(
            resolve_with(email_group_message, &errors, MessageMode::All),
            "Email Address and Confirm Email do not match"
        );
    }
}
